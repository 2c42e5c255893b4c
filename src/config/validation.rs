use std::net::SocketAddr;
use thiserror::Error;

use crate::config::models::ServerConfig;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Configuration validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid listen address: {address} - {reason}")]
    InvalidListenAddress { address: String, reason: String },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Pre-start configuration validator with detailed error reporting
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete server configuration
    pub fn validate(config: &ServerConfig) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_listen_address(&config.listen_addr) {
            errors.push(e);
        }

        if config.api_token.is_empty() {
            errors.push(ValidationError::MissingField {
                field: "api_token".to_string(),
            });
        }

        if config.streams_dir.is_empty() {
            errors.push(ValidationError::MissingField {
                field: "streams_dir".to_string(),
            });
        }

        if config.nginx.binary.is_empty() {
            errors.push(ValidationError::MissingField {
                field: "nginx.binary".to_string(),
            });
        }

        if config.nginx.timeout_secs == 0 {
            errors.push(ValidationError::InvalidField {
                field: "nginx.timeout_secs".to_string(),
                message: "Timeout must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::ValidationFailed {
                message: Self::format_multiple_errors(errors),
            })
        }
    }

    /// Validate listen address format
    fn validate_listen_address(address: &str) -> ValidationResult<()> {
        if address.parse::<SocketAddr>().is_err() {
            return Err(ValidationError::InvalidListenAddress {
                address: address.to_string(),
                reason: "Must be in format 'IP:PORT' (e.g., '127.0.0.1:3000' or '0.0.0.0:8080')"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Format multiple validation errors into a single message
    fn format_multiple_errors(errors: Vec<ValidationError>) -> String {
        let mut message = format!("Found {} validation error(s):\n", errors.len());
        for (i, error) in errors.iter().enumerate() {
            message.push_str(&format!("  {}. {}\n", i + 1, error));
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::NginxConfig;

    fn create_valid_config() -> ServerConfig {
        ServerConfig {
            listen_addr: "127.0.0.1:3000".to_string(),
            api_token: "secret".to_string(),
            streams_dir: "/etc/nginx/streams".to_string(),
            nginx: NginxConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        let config = create_valid_config();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_listen_address() {
        let mut config = create_valid_config();
        config.listen_addr = "invalid_address".to_string();

        let result = ConfigValidator::validate(&config);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid listen address")
        );
    }

    #[test]
    fn test_empty_token_rejected() {
        let mut config = create_valid_config();
        config.api_token = String::new();

        let result = ConfigValidator::validate(&config);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Missing required field: api_token")
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = create_valid_config();
        config.nginx.timeout_secs = 0;

        let result = ConfigValidator::validate(&config);
        assert!(result.is_err());
    }

    #[test]
    fn test_multiple_errors_are_aggregated() {
        let mut config = create_valid_config();
        config.api_token = String::new();
        config.streams_dir = String::new();

        let message = ConfigValidator::validate(&config).unwrap_err().to_string();
        assert!(message.contains("2 validation error(s)"));
    }
}
