//! Artifact storage
//!
//! Artifacts are named text files living in a single flat directory.
//! The store is injected into the coordinator so tests can swap the
//! filesystem for an in-memory map.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::fs;

use crate::core::error::{MaquetteError, Result};

/// A named artifact and its full contents
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    /// Filename within the store (no directory components)
    pub name: String,
    /// Full text contents
    pub content: String,
}

impl Artifact {
    /// Create a new artifact
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Abstraction over where artifacts live
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Read every artifact in the store, sorted by name
    async fn read_all(&self) -> Result<Vec<Artifact>>;

    /// Write an artifact, replacing any existing one with the same name
    async fn write(&self, name: &str, content: &str) -> Result<()>;
}

/// Reject names that would escape the flat store directory
fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(MaquetteError::artifact("artifact name is empty"));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(MaquetteError::artifact(format!(
            "artifact name '{}' must not contain path components",
            name
        )));
    }
    Ok(())
}

/// Filesystem-backed artifact store over a single flat directory
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    /// Create a store rooted at the given directory
    ///
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory this store reads from and writes to
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn read_all(&self) -> Result<Vec<Artifact>> {
        // A store that has never been written to is just empty
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut artifacts = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };

            let content = fs::read_to_string(entry.path()).await?;
            artifacts.push(Artifact::new(name, content));
        }

        artifacts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(artifacts)
    }

    async fn write(&self, name: &str, content: &str) -> Result<()> {
        validate_name(name)?;

        fs::create_dir_all(&self.dir).await?;
        fs::write(self.dir.join(name), content).await?;

        Ok(())
    }
}

/// In-memory artifact store for tests and dry runs
#[derive(Default)]
pub struct MemoryArtifactStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryArtifactStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of artifacts currently held
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the store holds no artifacts
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn read_all(&self) -> Result<Vec<Artifact>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .map(|(name, content)| Artifact::new(name.clone(), content.clone()))
            .collect())
    }

    async fn write(&self, name: &str, content: &str) -> Result<()> {
        validate_name(name)?;
        self.entries
            .lock()
            .unwrap()
            .insert(name.to_string(), content.to_string());
        Ok(())
    }
}
