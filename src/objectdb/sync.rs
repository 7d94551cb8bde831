use super::report::REPORT_SEPARATOR;
use super::{DiscSide, NodeId, ObjectDb, ObjectDbError, Status, View};
use crate::filename::{is_valid_name, make_disc_name};
use crate::filetype::Filetype;
use std::path::{Path, PathBuf};
use tracing::info;

/// The filesystem operations needed to bring a disc folder in line with a
/// manual.
pub trait DiscWriter {
    fn is_directory(&self, path: &Path) -> bool;
    fn make_directory(&mut self, path: &Path) -> std::io::Result<()>;
    /// Delete an empty directory.
    fn delete_directory(&mut self, path: &Path) -> std::io::Result<()>;
    fn write_file(&mut self, path: &Path, data: &[u8]) -> std::io::Result<()>;
    fn delete_file(&mut self, path: &Path) -> std::io::Result<()>;
    fn set_filetype(&mut self, path: &Path, filetype: Filetype) -> std::io::Result<()>;
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Object database error: {0}")]
    ObjectDb(#[from] ObjectDbError),
    #[error("Failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Object {0} has not been compared")]
    Unchecked(String),
    #[error("Manual data for {0} lies outside the loaded manual")]
    MissingData(String),
    #[error("No output folder is attached to the manual")]
    NoDiscRoot,
    #[error("Object {0} cannot be written inside the output folder")]
    BadName(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    CreatedDirectory(PathBuf),
    DeletedDirectory(PathBuf),
    WroteFile { path: PathBuf, filetype: Filetype },
    DeletedFile(PathBuf),
}

#[derive(Debug, Default)]
pub struct SyncResult {
    /// Every operation performed, in order.
    pub actions: Vec<SyncAction>,
}

impl SyncResult {
    fn record(&mut self, action: SyncAction) {
        match &action {
            SyncAction::CreatedDirectory(path) => info!("Created directory {}", path.display()),
            SyncAction::DeletedDirectory(path) => info!("Deleted directory {}", path.display()),
            SyncAction::WroteFile { path, filetype } => {
                info!("Wrote {} (type {})", path.display(), filetype)
            }
            SyncAction::DeletedFile(path) => info!("Deleted {}", path.display()),
        }
        self.actions.push(action);
    }
}

fn io_error(operation: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> SyncError {
    let path = path.to_path_buf();
    move |source| SyncError::Io {
        operation,
        path,
        source,
    }
}

impl ObjectDb {
    /// Apply the manual's state to the disc folder, using the statuses set by
    /// [`ObjectDb::check_status`].
    ///
    /// The output folder is created first if missing. Within each directory,
    /// files are handled before subdirectories, and a deleted directory is
    /// only removed once everything below it has been.
    ///
    /// Changed files are deleted and written afresh under their new name.
    ///
    /// # Errors
    ///
    /// The first failing filesystem operation stops the update. Operations
    /// already performed are not undone.
    pub fn update(
        &mut self,
        manual: &[u8],
        writer: &mut impl DiscWriter,
    ) -> Result<SyncResult, SyncError> {
        let mut result = SyncResult::default();

        let Some(root) = self.root else {
            return Ok(result);
        };

        if self.node(root).disc.is_none() {
            return Err(SyncError::NoDiscRoot);
        }

        let root_path = self.disc_path(root)?;
        if !writer.is_directory(&root_path) {
            writer
                .make_directory(&root_path)
                .map_err(io_error("create directory", &root_path))?;
            result.record(SyncAction::CreatedDirectory(root_path));
        }

        self.update_directory(root, manual, writer, &mut result)?;

        Ok(result)
    }

    fn update_directory(
        &mut self,
        dir: NodeId,
        manual: &[u8],
        writer: &mut impl DiscWriter,
        result: &mut SyncResult,
    ) -> Result<(), SyncError> {
        let status = self.node(dir).status;

        match status {
            Status::Unknown => return Err(self.unchecked(dir)),
            Status::Added => {
                let node = self.node(dir);
                let name = node.view_name(View::StrongHelp).unwrap_or(&node.name);
                if !is_valid_name(name) {
                    return Err(self.bad_name(dir));
                }
                let disc_name = make_disc_name(name, Filetype::DIRECTORY);

                self.node_mut(dir).disc = Some(DiscSide {
                    name: disc_name,
                    size: 0,
                    filetype: Filetype::DIRECTORY,
                });

                let path = self.disc_path(dir)?;
                writer
                    .make_directory(&path)
                    .map_err(io_error("create directory", &path))?;
                result.record(SyncAction::CreatedDirectory(path));
                self.node_mut(dir).status = Status::Identical;
            }
            _ => {}
        }

        for file in self.node(dir).files.clone() {
            self.update_file(file, manual, writer, result)?;
        }

        for child in self.node(dir).directories.clone() {
            self.update_directory(child, manual, writer, result)?;
        }

        if status == Status::Deleted {
            let path = self.disc_path(dir)?;
            writer
                .delete_directory(&path)
                .map_err(io_error("delete directory", &path))?;
            result.record(SyncAction::DeletedDirectory(path));
        }

        Ok(())
    }

    fn update_file(
        &mut self,
        file: NodeId,
        manual: &[u8],
        writer: &mut impl DiscWriter,
        result: &mut SyncResult,
    ) -> Result<(), SyncError> {
        match self.node(file).status {
            Status::Identical => Ok(()),
            Status::Unknown => Err(self.unchecked(file)),
            Status::Added => self.write_manual_file(file, manual, writer, result),
            Status::Deleted => self.delete_disc_file(file, writer, result),
            Status::TypeChanged | Status::SizeChanged | Status::ContentChanged => {
                self.delete_disc_file(file, writer, result)?;
                self.write_manual_file(file, manual, writer, result)
            }
        }
    }

    fn delete_disc_file(
        &mut self,
        file: NodeId,
        writer: &mut impl DiscWriter,
        result: &mut SyncResult,
    ) -> Result<(), SyncError> {
        let path = self.disc_path(file)?;
        writer
            .delete_file(&path)
            .map_err(io_error("delete file", &path))?;
        result.record(SyncAction::DeletedFile(path));

        Ok(())
    }

    fn write_manual_file(
        &mut self,
        file: NodeId,
        manual: &[u8],
        writer: &mut impl DiscWriter,
        result: &mut SyncResult,
    ) -> Result<(), SyncError> {
        let node = self.node(file);
        let side = node
            .stronghelp
            .as_ref()
            .ok_or_else(|| ObjectDbError::MissingName {
                name: node.name.clone(),
                view: View::StrongHelp,
            })?;

        if !is_valid_name(&side.name) {
            return Err(self.bad_name(file));
        }

        let data = side
            .data
            .slice(manual)
            .ok_or_else(|| SyncError::MissingData(node.name.clone()))?;

        let disc_side = DiscSide {
            name: make_disc_name(&side.name, side.filetype),
            size: side.size,
            filetype: side.filetype,
        };
        let filetype = side.filetype;

        self.node_mut(file).disc = Some(disc_side);

        let path = self.disc_path(file)?;
        writer
            .write_file(&path, data)
            .map_err(io_error("write file", &path))?;
        writer
            .set_filetype(&path, filetype)
            .map_err(io_error("set the type of", &path))?;
        result.record(SyncAction::WroteFile { path, filetype });
        self.node_mut(file).status = Status::Identical;

        Ok(())
    }

    fn unchecked(&self, id: NodeId) -> SyncError {
        SyncError::Unchecked(self.report_path(id))
    }

    fn bad_name(&self, id: NodeId) -> SyncError {
        SyncError::BadName(self.report_path(id))
    }

    fn report_path(&self, id: NodeId) -> String {
        self.get_path(id, View::Agnostic, REPORT_SEPARATOR)
            .unwrap_or_else(|_| self.node(id).name.clone())
    }
}
