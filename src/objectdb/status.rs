use super::{NodeId, Node, ObjectDb, ObjectDbError, Status, StrongHelpSide};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("Object database error: {0}")]
    ObjectDb(#[from] ObjectDbError),
    #[error("Failed to read {path} for comparison: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Manual data for {0} lies outside the loaded manual")]
    MissingData(String),
}

impl ObjectDb {
    /// Classify every object in the tree.
    ///
    /// Directories are compared on presence only. Files are checked in
    /// priority order: presence, then filetype, then size, and finally a
    /// byte-for-byte comparison of the disc file against the manual.
    ///
    /// # Errors
    ///
    /// Fails if a disc file that needs its contents compared cannot be opened
    /// or is shorter than its recorded size.
    pub fn check_status(&mut self, manual: &[u8]) -> Result<(), StatusError> {
        match self.root {
            Some(root) => self.check_directory_status(root, manual),
            None => Ok(()),
        }
    }

    fn check_directory_status(&mut self, dir: NodeId, manual: &[u8]) -> Result<(), StatusError> {
        let status = presence_status(self.node(dir)).unwrap_or(Status::Identical);
        self.node_mut(dir).status = status;

        for file in self.node(dir).files.clone() {
            let status = self.file_status(file, manual)?;
            debug!("File {} is {:?}", self.node(file).name, status);
            self.node_mut(file).status = status;
        }

        for child in self.node(dir).directories.clone() {
            self.check_directory_status(child, manual)?;
        }

        Ok(())
    }

    fn file_status(&self, file: NodeId, manual: &[u8]) -> Result<Status, StatusError> {
        let node = self.node(file);

        if let Some(status) = presence_status(node) {
            return Ok(status);
        }

        let (Some(stronghelp), Some(disc)) = (&node.stronghelp, &node.disc) else {
            return Ok(Status::Unknown);
        };

        let status = if stronghelp.filetype != disc.filetype {
            Status::TypeChanged
        } else if stronghelp.size != disc.size {
            Status::SizeChanged
        } else if !self.compare_content(file, stronghelp, manual)? {
            Status::ContentChanged
        } else {
            Status::Identical
        };

        Ok(status)
    }

    /// Compare the manual's copy of a file against the one on disc, reading
    /// as many bytes as the manual holds.
    fn compare_content(
        &self,
        file: NodeId,
        stronghelp: &StrongHelpSide,
        manual: &[u8],
    ) -> Result<bool, StatusError> {
        let expected = stronghelp
            .data
            .slice(manual)
            .ok_or_else(|| StatusError::MissingData(self.node(file).name.clone()))?;

        let path = self.disc_path(file)?;

        let mut disc_file = match File::open(&path) {
            Ok(disc_file) => disc_file,
            Err(source) => return Err(StatusError::OpenFailed { path, source }),
        };

        let mut buffer = [0u8; 8192];

        for chunk in expected.chunks(buffer.len()) {
            let buffer = &mut buffer[..chunk.len()];

            if let Err(source) = disc_file.read_exact(buffer) {
                return Err(StatusError::OpenFailed { path, source });
            }

            if *buffer != *chunk {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

/// Status decided by which sides are present, or `None` when both are and
/// the contents still need comparing.
fn presence_status(node: &Node) -> Option<Status> {
    match (node.stronghelp.is_some(), node.disc.is_some()) {
        (false, true) => Some(Status::Deleted),
        (true, false) => Some(Status::Added),
        (true, true) => None,
        (false, false) => Some(Status::Unknown),
    }
}
