//! Entry lookups in package fragment roots backed by archives (JARs) or exploded directories.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use zip::ZipArchive;

#[derive(Clone, Debug)]
pub struct Archive {
    path: PathBuf,
}

impl Archive {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the archive itself is present on disk.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Whether a file entry `name` exists, without reading it.
    pub fn contains_file(&self, name: &str) -> anyhow::Result<bool> {
        if self.path.is_dir() {
            return Ok(self.path.join(name).is_file());
        }
        let zip = self.open_zip()?;
        Ok(zip.index_for_name(name).is_some())
    }

    /// Whether the archive holds anything under directory `dir` (`a/b`, or `""` for the top
    /// level).
    ///
    /// Zip files do not need explicit directory entries, so any entry below `dir/` counts.
    pub fn contains_dir(&self, dir: &str) -> anyhow::Result<bool> {
        let dir = dir.trim_matches('/');
        if self.path.is_dir() {
            return Ok(self.path.join(dir).is_dir());
        }
        let zip = self.open_zip()?;
        if dir.is_empty() {
            return Ok(true);
        }
        let prefix = format!("{dir}/");
        let found = zip.file_names().any(|name| name.starts_with(&prefix));
        Ok(found)
    }

    fn open_zip(&self) -> anyhow::Result<ZipArchive<File>> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed to open archive {}", self.path.display()))?;
        let zip = ZipArchive::new(file)
            .with_context(|| format!("failed to read zip {}", self.path.display()))?;
        tracing::trace!(
            target: "jem.archive",
            path = %self.path.display(),
            entries = zip.len(),
            "opened archive"
        );
        Ok(zip)
    }
}
