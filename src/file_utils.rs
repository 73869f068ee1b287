use log::debug;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::errors::OutputError;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

/// Content written to a temporary file next to its destination, not yet visible
///
/// Dropping a `StagedFile` without calling [`StagedFile::commit`] deletes the
/// temporary file and leaves the destination untouched.
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
    destination: PathBuf,
}

impl StagedFile {
    /// Path of the temporary file
    pub fn temp_path(&self) -> &Path {
        self.file.path()
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    // @replaces: Destination with the staged content in one rename
    pub fn commit(self) -> Result<PathBuf, OutputError> {
        let destination = self.destination;
        self.file.persist(&destination).map_err(|e| OutputError::Commit {
            path: destination.clone(),
            source: e.error,
        })?;
        debug!("Committed {:?}", destination);
        Ok(destination)
    }
}

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @stages: Content in a synced temporary file beside the destination
    pub fn stage<P: AsRef<Path>>(path: P, content: &str) -> Result<StagedFile, OutputError> {
        let destination = path.as_ref().to_path_buf();
        let stage_error = |source: io::Error| OutputError::Stage {
            path: destination.clone(),
            source,
        };

        // Same directory, so the final rename never crosses filesystems
        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::ensure_dir(&parent).map_err(stage_error)?;

        let mut file = tempfile::Builder::new()
            .prefix(".potrad-")
            .suffix(".tmp")
            .tempfile_in(&parent)
            .map_err(stage_error)?;

        file.write_all(content.as_bytes()).map_err(stage_error)?;
        file.flush().map_err(stage_error)?;
        file.as_file().sync_all().map_err(stage_error)?;

        debug!("Staged {} bytes for {:?} at {:?}", content.len(), destination, file.path());
        Ok(StagedFile { file, destination })
    }

    // @writes: Content atomically, readers see the old file or the new one
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<PathBuf, OutputError> {
        Self::stage(path, content)?.commit()
    }
}
