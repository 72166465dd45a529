//! Filesystem infrastructure — implements `LocalFs` over `std::fs`.

use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

/// Production implementation of `LocalFs`.
pub struct StdFs;

impl crate::application::ports::LocalFs for StdFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        match std::fs::rename(from, to) {
            Ok(()) => Ok(()),
            // EXDEV and friends: the volume may live on another filesystem.
            Err(err) if err.kind() != ErrorKind::NotFound => {
                tracing::debug!(error = %err, "rename failed, falling back to copy");
                std::fs::copy(from, to).with_context(|| {
                    format!("copying {} to {}", from.display(), to.display())
                })?;
                std::fs::remove_file(from)
                    .with_context(|| format!("removing file {}", from.display()))
            }
            Err(err) => Err(err)
                .with_context(|| format!("moving {} to {}", from.display(), to.display())),
        }
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            other => other.with_context(|| format!("removing file {}", path.display())),
        }
    }
}
