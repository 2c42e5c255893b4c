//! In-memory fakes for the two ports, letting orchestrator and router
//! tests script store failures and daemon verdicts without a filesystem
//! or an nginx binary.

use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Notify;

use crate::core::stream::StreamDefinition;
use crate::ports::proxy_controller::{ControllerError, ProxyController};
use crate::ports::stream_store::{StoreError, StoreResult, StreamStore};

#[derive(Default)]
pub(crate) struct MemoryStore {
    streams: Mutex<BTreeMap<String, StreamDefinition>>,
    fail_creates: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.streams.lock().unwrap().keys().cloned().collect()
    }

    pub(crate) fn fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl StreamStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<StreamDefinition>> {
        Ok(self.streams.lock().unwrap().values().cloned().collect())
    }

    async fn create(&self, def: &StreamDefinition) -> StoreResult<()> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(StoreError::Io(io::Error::other("scripted write failure")));
        }
        let mut streams = self.streams.lock().unwrap();
        if streams.contains_key(&def.name) {
            return Err(StoreError::Duplicate(def.name.clone()));
        }
        streams.insert(def.name.clone(), def.clone());
        Ok(())
    }

    async fn delete(&self, name: &str) -> StoreResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(io::Error::other("scripted unlink failure")));
        }
        match self.streams.lock().unwrap().remove(name) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(name.to_string())),
        }
    }
}

/// What the next `test()` call should report. Calls beyond the script
/// default to `Pass`.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ScriptedOutcome {
    Pass,
    Rejected,
    Unavailable,
}

#[derive(Default)]
pub(crate) struct ScriptedController {
    script: Mutex<VecDeque<ScriptedOutcome>>,
    tests: AtomicUsize,
    reloads: AtomicUsize,
    test_notify: Notify,
    reload_notify: Notify,
}

impl ScriptedController {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn script(&self, outcomes: impl IntoIterator<Item = ScriptedOutcome>) {
        self.script.lock().unwrap().extend(outcomes);
    }

    pub(crate) fn tests(&self) -> usize {
        self.tests.load(Ordering::SeqCst)
    }

    pub(crate) fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    /// Resolves once a `test()` call has happened (or already happened).
    pub(crate) async fn tested(&self) {
        self.test_notify.notified().await;
    }

    /// Resolves once a `reload()` call has happened (or already happened).
    pub(crate) async fn reloaded(&self) {
        self.reload_notify.notified().await;
    }
}

#[async_trait]
impl ProxyController for ScriptedController {
    async fn test(&self) -> Result<bool, ControllerError> {
        self.tests.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ScriptedOutcome::Pass);
        self.test_notify.notify_one();
        match outcome {
            ScriptedOutcome::Pass => Ok(true),
            ScriptedOutcome::Rejected => Ok(false),
            ScriptedOutcome::Unavailable => Err(ControllerError::Spawn(io::Error::new(
                io::ErrorKind::NotFound,
                "scripted: daemon binary missing",
            ))),
        }
    }

    async fn reload(&self) -> Result<(), ControllerError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        self.reload_notify.notify_one();
        Ok(())
    }
}
