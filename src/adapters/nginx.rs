use async_trait::async_trait;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::models::NginxConfig;
use crate::ports::proxy_controller::{ControllerError, ProxyController};

/// Drives the nginx daemon through its binary: `nginx -t` for the config
/// test, `nginx -s reload` to apply. Both invocations carry a timeout; an
/// unresponsive daemon must not stall a request forever.
pub struct NginxController {
    binary: String,
    test_args: Vec<String>,
    reload_args: Vec<String>,
    timeout: Duration,
}

impl NginxController {
    pub fn new(config: &NginxConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            test_args: config.test_args.clone(),
            reload_args: config.reload_args.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    async fn run(&self, args: &[String]) -> Result<Output, ControllerError> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(err)) => Err(ControllerError::Spawn(err)),
            Err(_) => Err(ControllerError::TimedOut(self.timeout.as_secs())),
        }
    }
}

#[async_trait]
impl ProxyController for NginxController {
    async fn test(&self) -> Result<bool, ControllerError> {
        let output = self.run(&self.test_args).await?;
        if !output.status.success() {
            tracing::debug!(
                "config test failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(output.status.success())
    }

    async fn reload(&self) -> Result<(), ControllerError> {
        let output = self.run(&self.reload_args).await?;
        if !output.status.success() {
            return Err(ControllerError::Failed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The tests drive the controller with coreutils standing in for the
    // nginx binary: exit status is all the controller inspects.
    fn controller(binary: &str, test_args: &[&str], timeout_secs: u64) -> NginxController {
        NginxController::new(&NginxConfig {
            binary: binary.to_string(),
            test_args: test_args.iter().map(|s| s.to_string()).collect(),
            reload_args: test_args.iter().map(|s| s.to_string()).collect(),
            timeout_secs,
        })
    }

    #[tokio::test]
    async fn test_reports_success_exit_as_valid() {
        let ctl = controller("true", &[], 5);
        assert!(ctl.test().await.unwrap());
    }

    #[tokio::test]
    async fn test_reports_failure_exit_as_invalid_not_as_error() {
        let ctl = controller("false", &[], 5);
        assert!(!ctl.test().await.unwrap());
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let ctl = controller("definitely-not-a-real-binary-1b8f", &[], 5);
        assert!(matches!(
            ctl.test().await,
            Err(ControllerError::Spawn(_))
        ));
    }

    #[tokio::test]
    async fn reload_maps_failure_exit_to_failed() {
        let ctl = controller("false", &[], 5);
        assert!(matches!(
            ctl.reload().await,
            Err(ControllerError::Failed { .. })
        ));
    }

    #[tokio::test]
    async fn hung_invocation_times_out() {
        let ctl = NginxController::new(&NginxConfig {
            binary: "sleep".to_string(),
            test_args: vec!["5".to_string()],
            reload_args: vec!["5".to_string()],
            timeout_secs: 1,
        });
        let started = std::time::Instant::now();
        assert!(matches!(ctl.test().await, Err(ControllerError::TimedOut(1))));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
