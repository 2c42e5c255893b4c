use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::core::stream::{InvalidStream, StreamDefinition};
use crate::ports::proxy_controller::ProxyController;
use crate::ports::stream_store::{StoreError, StoreResult, StreamStore};

/// Outcome of a create flow that did not end in a live, daemon-validated
/// stream.
#[derive(Error, Debug)]
pub enum CreateError {
    #[error(transparent)]
    Invalid(#[from] InvalidStream),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The daemon rejected the configuration tree with the new fragment in
    /// place; the fragment has been rolled back.
    #[error("proxy daemon rejected the generated configuration")]
    ConfigRejected,
}

/// Sequences every mutation as store-change -> daemon-test ->
/// commit-or-rollback -> reload.
///
/// The daemon and its configuration tree are one shared resource, so the
/// whole critical section runs under a single process-wide mutex; true
/// concurrent reconciliation has no well-defined outcome.
pub struct Reconciler {
    store: Arc<dyn StreamStore>,
    controller: Arc<dyn ProxyController>,
    lock: Arc<Mutex<()>>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn StreamStore>, controller: Arc<dyn ProxyController>) -> Self {
        Self {
            store,
            controller,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn list_streams(&self) -> StoreResult<Vec<StreamDefinition>> {
        self.store.list().await
    }

    /// Create flow: validate, persist, verify with the daemon, roll back
    /// if the daemon rejects the tree. On success the reload runs on a
    /// background task after the caller has been answered.
    ///
    /// Invariant: the on-disk configuration tree never remains in a state
    /// the daemon itself has rejected.
    pub async fn create_stream(&self, def: StreamDefinition) -> Result<(), CreateError> {
        def.validate()?;

        let guard = self.lock.lock().await;
        self.store.create(&def).await?;

        let verified = match self.controller.test().await {
            Ok(verified) => verified,
            Err(err) => {
                tracing::error!(stream = %def.name, "could not test proxy configuration: {err}");
                false
            }
        };

        if !verified {
            tracing::error!(stream = %def.name, "proxy rejected configuration, deleting stream");
            // Best effort: a failed rollback is logged, but the caller
            // still gets the verification failure, not the rollback error.
            if let Err(err) = self.store.delete(&def.name).await {
                tracing::error!(stream = %def.name, "rollback failed: {err}");
            }
            return Err(CreateError::ConfigRejected);
        }

        tracing::info!(
            stream = %def.name,
            "stream created: {} -> {}",
            def.listen,
            def.target
        );
        drop(guard);

        self.spawn_reload();
        Ok(())
    }

    /// Delete flow: remove the record, answer the caller, then test and
    /// reload in the background. A removal only shrinks the configuration,
    /// so there is nothing to roll back; if the tree still fails the test
    /// the daemon keeps running its last-reloaded configuration.
    pub async fn delete_stream(&self, name: &str) -> StoreResult<()> {
        let guard = self.lock.lock().await;
        self.store.delete(name).await?;
        tracing::info!(stream = %name, "stream deleted");
        drop(guard);

        self.spawn_verify_and_reload();
        Ok(())
    }

    /// Post-create reload. The tree was already verified inside the create
    /// critical section; a reload failure here is an operational anomaly,
    /// logged and never surfaced to the request that triggered it.
    fn spawn_reload(&self) {
        let controller = Arc::clone(&self.controller);
        let lock = Arc::clone(&self.lock);
        tokio::spawn(async move {
            let _guard = lock.lock().await;
            if let Err(err) = controller.reload().await {
                tracing::error!("proxy reload failed: {err}");
            }
        });
    }

    /// Post-delete propagation: reload if and only if the remaining tree
    /// passes the daemon's test.
    fn spawn_verify_and_reload(&self) {
        let controller = Arc::clone(&self.controller);
        let lock = Arc::clone(&self.lock);
        tokio::spawn(async move {
            let _guard = lock.lock().await;
            match controller.test().await {
                Ok(true) => {
                    if let Err(err) = controller.reload().await {
                        tracing::error!("proxy reload failed: {err}");
                    }
                }
                Ok(false) => {
                    tracing::warn!("configuration still invalid after delete, reload skipped");
                }
                Err(err) => {
                    tracing::error!("could not test proxy configuration: {err}");
                }
            }
        });
    }
}
