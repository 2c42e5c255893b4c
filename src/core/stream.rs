use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;

// The name doubles as the fragment file stem and as a token inside the
// generated config, so the charset is restricted to both-safe characters.
static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").unwrap());

static HOST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9.-]{0,252})?$").unwrap());

/// A named TCP forwarding rule: connections accepted on `listen` are
/// forwarded to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDefinition {
    pub name: String,
    pub listen: String,
    pub target: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidStream {
    #[error("invalid stream name: {0}")]
    Name(String),

    #[error("invalid listen address: {0}")]
    Listen(String),

    #[error("invalid target address: {0}")]
    Target(String),
}

impl StreamDefinition {
    /// Check all fields against their syntactic constraints. Runs before
    /// anything touches the store, so a rejected definition has no side
    /// effects.
    pub fn validate(&self) -> Result<(), InvalidStream> {
        if !is_valid_name(&self.name) {
            return Err(InvalidStream::Name(self.name.clone()));
        }
        if !is_valid_endpoint(&self.listen) {
            return Err(InvalidStream::Listen(self.listen.clone()));
        }
        if !is_valid_endpoint(&self.target) {
            return Err(InvalidStream::Target(self.target.clone()));
        }
        Ok(())
    }
}

pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

/// Accepts the address shapes nginx takes in a stream `listen` directive:
/// a bare port, `host:port`, `IPv4:port` or bracketed `[IPv6]:port`.
pub fn is_valid_endpoint(endpoint: &str) -> bool {
    if let Ok(port) = endpoint.parse::<u16>() {
        return port != 0;
    }
    if endpoint.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match endpoint.rsplit_once(':') {
        Some((host, port)) => {
            port.parse::<u16>().is_ok_and(|p| p != 0) && HOST_RE.is_match(host)
        }
        None => false,
    }
}
