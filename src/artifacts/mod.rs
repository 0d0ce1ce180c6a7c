//! Artifact store and system prompt snapshot rendering

pub mod prompt;
pub mod store;

pub use prompt::{compose_system_prompt, render_artifact_block};
pub use store::{Artifact, ArtifactStore, FsArtifactStore, MemoryArtifactStore};
