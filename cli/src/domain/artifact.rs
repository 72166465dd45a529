//! The packaged plugin archive and how its name is read from `npm pack`.

use std::fmt;
use std::path::{Path, PathBuf};

/// The archive produced by the packaging step.
///
/// One value is created per run and threaded through transfer, install and
/// cleanup, so every step addresses the same file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    file_name: String,
}

impl Artifact {
    /// Parse the artifact name from packaging output: the last non-empty line.
    ///
    /// Returns `None` when the output has no non-empty line.
    #[must_use]
    pub fn from_pack_output(stdout: &str) -> Option<Self> {
        stdout
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .map(|line| Self {
                file_name: line.to_string(),
            })
    }

    /// The bare file name, e.g. `plugin-1.2.3.tgz`.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Path of the archive in the local working directory.
    #[must_use]
    pub fn local_path(&self) -> PathBuf {
        PathBuf::from(&self.file_name)
    }

    /// Join the file name onto a remote (always `/`-separated) directory.
    #[must_use]
    pub fn remote_path(&self, dir: &str) -> String {
        format!("{}/{}", dir.trim_end_matches('/'), self.file_name)
    }

    /// Join the file name onto a local directory.
    #[must_use]
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.file_name)
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name)
    }
}
