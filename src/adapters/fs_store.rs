use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::core::renderer;
use crate::core::stream::{StreamDefinition, is_valid_name};
use crate::ports::stream_store::{StoreError, StoreResult, StreamStore};

/// A stream store backed by a directory of nginx config fragments, one
/// `<name>.conf` per stream. The directory is expected to be included by
/// the daemon's main configuration inside a `stream` block, so every
/// successful create/delete changes what the next config test sees.
pub struct FsStreamStore {
    dir: PathBuf,
}

impl FsStreamStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the fragment directory if it does not exist yet. Called once
    /// at startup, before the HTTP listener is bound.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    fn fragment_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.conf"))
    }

    fn temp_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!(".{name}.conf.tmp"))
    }
}

async fn remove_quietly(path: &Path) {
    if let Err(err) = fs::remove_file(path).await {
        if err.kind() != io::ErrorKind::NotFound {
            tracing::warn!("could not remove {}: {err}", path.display());
        }
    }
}

#[async_trait]
impl StreamStore for FsStreamStore {
    async fn list(&self) -> StoreResult<Vec<StreamDefinition>> {
        let mut streams = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("conf") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let fragment = fs::read_to_string(&path).await?;
            match renderer::parse(name, &fragment) {
                Some(def) => streams.push(def),
                None => {
                    tracing::warn!("skipping unparseable fragment {}", path.display());
                }
            }
        }
        streams.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(streams)
    }

    async fn create(&self, def: &StreamDefinition) -> StoreResult<()> {
        let path = self.fragment_path(&def.name);
        if fs::try_exists(&path).await? {
            return Err(StoreError::Duplicate(def.name.clone()));
        }

        // Write-to-temp then rename, so a failed write leaves no partial
        // fragment for the daemon's include to pick up.
        let temp = self.temp_path(&def.name);
        if let Err(err) = fs::write(&temp, renderer::render(def)).await {
            remove_quietly(&temp).await;
            return Err(StoreError::Io(err));
        }
        if let Err(err) = fs::rename(&temp, &path).await {
            remove_quietly(&temp).await;
            return Err(StoreError::Io(err));
        }
        Ok(())
    }

    async fn delete(&self, name: &str) -> StoreResult<()> {
        // Guard against path traversal: anything outside the stream name
        // charset cannot be one of our fragments.
        if !is_valid_name(name) {
            return Err(StoreError::NotFound(name.to_string()));
        }
        match fs::remove_file(self.fragment_path(name)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(err) => Err(StoreError::Io(err)),
        }
    }
}
