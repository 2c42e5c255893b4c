use async_trait::async_trait;
use thiserror::Error;

/// Error type for proxy daemon invocations. A configuration the daemon
/// rejects is NOT an error here; that is the `Ok(false)` result of
/// [`ProxyController::test`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ControllerError {
    /// The daemon binary could not be invoked at all
    #[error("failed to invoke proxy binary: {0}")]
    Spawn(#[from] std::io::Error),

    /// The invocation did not finish within the configured timeout
    #[error("proxy command timed out after {0}s")]
    TimedOut(u64),

    /// The command ran but exited non-zero where success was required
    #[error("proxy command exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },
}

/// ProxyController defines the port for the two external operations of
/// the proxy daemon.
#[async_trait]
pub trait ProxyController: Send + Sync + 'static {
    /// Ask the daemon to validate its full configuration tree without
    /// applying it. Returns whether validation succeeded.
    async fn test(&self) -> Result<bool, ControllerError>;

    /// Ask the daemon to apply its current configuration tree live. Does
    /// not re-validate; callers needing a guarantee must `test` first.
    async fn reload(&self) -> Result<(), ControllerError>;
}
