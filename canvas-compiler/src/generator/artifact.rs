//! The pure-data output shape every generator in this module produces
//!: a relative path plus rendered contents. Writing artifacts
//! to disk is isolated to a single function (spec §4.6 phase 8,
//! "Infrastructure") so every generator itself stays side-effect free and
//! trivially testable.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub relative_path: PathBuf,
    pub contents: String,
}

impl GeneratedArtifact {
    pub fn new(relative_path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self { relative_path: relative_path.into(), contents: contents.into() }
    }
}

/// Writes every artifact under `output_dir`, creating parent directories
/// as needed. The only function in this module permitted to touch the
/// filesystem.
pub fn write_artifacts(output_dir: &Path, artifacts: &[GeneratedArtifact]) -> std::io::Result<()> {
    for artifact in artifacts {
        let target = output_dir.join(&artifact.relative_path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(target, &artifact.contents)?;
    }
    Ok(())
}
