//! Filesystem access for the output folder.
//!
//! Listings translate host filenames into RISC OS names and types, so the
//! rest of the tool never sees a `,xxx` suffix. [`LocalDisc`] carries out the
//! changes requested by an update.

use crate::filename::{directory_name, split_file_name};
use crate::filetype::Filetype;
use crate::objectdb::DiscWriter;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Filename is not valid Unicode: {0}")]
    NonUnicodeName(PathBuf),
}

impl FilesError {
    fn from_io(err: std::io::Error, path: &Path) -> Self {
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            FilesError::PermissionDenied(path.to_path_buf())
        } else {
            FilesError::Io(err)
        }
    }
}

/// An object found on disc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscObjectInfo {
    /// The RISC OS name, used to match the object with the manual.
    pub name: String,
    /// The leaf name as it appears on disc.
    pub disc_name: String,
    pub size: u64,
    /// [`Filetype::DIRECTORY`] for directories.
    pub filetype: Filetype,
}

impl DiscObjectInfo {
    pub fn is_directory(&self) -> bool {
        self.filetype == Filetype::DIRECTORY
    }
}

/// Whether `path` exists and is a directory. A missing path is `Ok(None)`.
pub fn directory_exists(path: &Path) -> Result<Option<bool>, FilesError> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata.is_dir())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(FilesError::from_io(err, path)),
    }
}

/// List the immediate children of a directory, sorted by RISC OS name.
///
/// Symbolic links are followed. Anything that is neither a file nor a
/// directory, such as a socket, is skipped.
pub fn read_directory_contents(path: &Path) -> Result<Vec<DiscObjectInfo>, FilesError> {
    let read_dir = fs::read_dir(path).map_err(|e| FilesError::from_io(e, path))?;

    let mut entries = Vec::new();

    for entry in read_dir {
        let entry = entry.map_err(FilesError::Io)?;
        let entry_path = entry.path();

        let disc_name = entry
            .file_name()
            .into_string()
            .map_err(|_| FilesError::NonUnicodeName(entry_path.clone()))?;

        let metadata = fs::metadata(&entry_path).map_err(|e| FilesError::from_io(e, &entry_path))?;

        let info = if metadata.is_dir() {
            DiscObjectInfo {
                name: directory_name(&disc_name),
                disc_name,
                size: 0,
                filetype: Filetype::DIRECTORY,
            }
        } else if metadata.is_file() {
            let (name, filetype) = split_file_name(&disc_name);
            DiscObjectInfo {
                name,
                disc_name,
                size: metadata.len(),
                filetype,
            }
        } else {
            warn!("Skipping {}, which is not a file or directory", entry_path.display());
            continue;
        };

        debug!(
            "Found {} on disc as {} ({})",
            info.name, info.disc_name, info.filetype
        );
        entries.push(info);
    }

    entries.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.disc_name.cmp(&b.disc_name))
    });

    Ok(entries)
}

/// Writes to the local filesystem. Filetypes are carried by the filename
/// suffix, so setting one needs no further work.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalDisc;

impl DiscWriter for LocalDisc {
    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn make_directory(&mut self, path: &Path) -> std::io::Result<()> {
        fs::create_dir(path)
    }

    fn delete_directory(&mut self, path: &Path) -> std::io::Result<()> {
        fs::remove_dir(path)
    }

    fn write_file(&mut self, path: &Path, data: &[u8]) -> std::io::Result<()> {
        write_atomic(path, data)
    }

    fn delete_file(&mut self, path: &Path) -> std::io::Result<()> {
        fs::remove_file(path)
    }

    fn set_filetype(&mut self, _path: &Path, _filetype: Filetype) -> std::io::Result<()> {
        Ok(())
    }
}

/// Write `data` to a temporary file beside `path` and move it into place.
fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(data)?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| e.error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o644))?;
    }

    Ok(())
}
