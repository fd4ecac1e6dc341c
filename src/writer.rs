//! Artifact file writing
//!
//! Stale artifacts from an earlier generator run are deleted before the fresh
//! text is written, so old content can never linger and be silently appended
//! to. Generation is all-or-nothing and idempotent; callers needing atomicity
//! against mid-write kills should target a temporary path and rename.

use std::fs;
use std::path::Path;

use crate::emit::GeneratedArtifacts;
use crate::error::Result;

/// Replace both output artifacts with the freshly rendered texts.
pub fn write_artifacts(
    header_path: &Path,
    source_path: &Path,
    artifacts: &GeneratedArtifacts,
) -> Result<()> {
    remove_stale(header_path)?;
    remove_stale(source_path)?;

    fs::write(header_path, &artifacts.declaration)?;
    fs::write(source_path, &artifacts.definition)?;
    tracing::info!(
        header = %header_path.display(),
        source = %source_path.display(),
        "wrote operator definition artifacts"
    );
    Ok(())
}

fn remove_stale(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
        tracing::debug!(path = %path.display(), "removed stale artifact");
    }
    Ok(())
}
