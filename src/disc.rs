//! Reads the output folder into the disc side of the object database.

use crate::files::{self, FilesError, read_directory_contents};
use crate::objectdb::{NodeId, ObjectDb, ObjectDbError};
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum DiscError {
    #[error(transparent)]
    Files(#[from] FilesError),
    #[error("Object database error: {0}")]
    ObjectDb(#[from] ObjectDbError),
    #[error("Output folder {0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("Output folder {0} is not valid Unicode")]
    NonUnicodePath(PathBuf),
}

/// What was found in the output folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscScan {
    pub folder_exists: bool,
    pub directories: usize,
    pub files: usize,
}

/// Attach the output folder to the root of `db` and merge in everything
/// below it.
///
/// A folder that does not exist yet is still attached, so the manual's root
/// matches it and an update will create it.
pub fn read_disc_folder(db: &mut ObjectDb, folder: &Path) -> Result<DiscScan, DiscError> {
    let folder_name = folder
        .to_str()
        .ok_or_else(|| DiscError::NonUnicodePath(folder.to_path_buf()))?;
    let folder_name = trim_separators(folder_name);

    let root = db.add_disc_directory(None, "$", folder_name)?;

    let mut scan = DiscScan::default();

    match files::directory_exists(Path::new(folder_name))? {
        None => {
            info!("Output folder {folder_name} does not exist yet");
            return Ok(scan);
        }
        Some(false) => return Err(DiscError::NotADirectory(PathBuf::from(folder_name))),
        Some(true) => {}
    }

    scan.folder_exists = true;
    read_directory(db, root, &mut scan)?;

    info!(
        "Found {} directories and {} files in {folder_name}",
        scan.directories, scan.files
    );

    Ok(scan)
}

fn read_directory(db: &mut ObjectDb, dir: NodeId, scan: &mut DiscScan) -> Result<(), DiscError> {
    let path = db.disc_path(dir)?;

    for entry in read_directory_contents(&path)? {
        if entry.is_directory() {
            let child = db.add_disc_directory(Some(dir), &entry.name, &entry.disc_name)?;
            scan.directories += 1;
            read_directory(db, child, scan)?;
        } else {
            db.add_disc_file(
                Some(dir),
                &entry.name,
                &entry.disc_name,
                entry.size,
                entry.filetype,
            )?;
            scan.files += 1;
        }
    }

    Ok(())
}

/// Drop trailing separators, leaving a bare root alone.
fn trim_separators(folder: &str) -> &str {
    let trimmed = folder.trim_end_matches(MAIN_SEPARATOR);
    if trimmed.is_empty() { folder } else { trimmed }
}
