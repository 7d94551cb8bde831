use super::*;
use super::sync::SyncAction;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File contents laid end to end, standing in for a loaded manual.
#[derive(Default)]
struct Contents {
    bytes: Vec<u8>,
}

impl Contents {
    fn add(&mut self, data: &[u8]) -> DataRef {
        let offset = self.bytes.len();
        self.bytes.extend_from_slice(data);
        DataRef {
            offset,
            len: data.len(),
        }
    }
}

fn text() -> Filetype {
    Filetype::TEXT
}

fn manual_file(
    db: &mut ObjectDb,
    contents: &mut Contents,
    parent: NodeId,
    name: &str,
    data: &[u8],
) -> NodeId {
    let data_ref = contents.add(data);
    db.add_stronghelp_file(Some(parent), name, data.len() as u64, text(), data_ref)
        .unwrap()
}

fn folder_name(folder: &Path) -> &str {
    folder.to_str().unwrap()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Operation {
    MakeDirectory(PathBuf),
    DeleteDirectory(PathBuf),
    WriteFile(PathBuf, Vec<u8>),
    DeleteFile(PathBuf),
    SetFiletype(PathBuf, Filetype),
}

/// Records the operations asked of it, optionally failing the nth one.
#[derive(Default)]
struct RecordingWriter {
    existing_directories: Vec<PathBuf>,
    operations: Vec<Operation>,
    fail_at: Option<usize>,
}

impl RecordingWriter {
    fn perform(&mut self, operation: Operation) -> io::Result<()> {
        if self.fail_at == Some(self.operations.len()) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "refused"));
        }
        self.operations.push(operation);
        Ok(())
    }
}

impl DiscWriter for RecordingWriter {
    fn is_directory(&self, path: &Path) -> bool {
        self.existing_directories.iter().any(|dir| dir == path)
    }

    fn make_directory(&mut self, path: &Path) -> io::Result<()> {
        self.perform(Operation::MakeDirectory(path.to_path_buf()))
    }

    fn delete_directory(&mut self, path: &Path) -> io::Result<()> {
        self.perform(Operation::DeleteDirectory(path.to_path_buf()))
    }

    fn write_file(&mut self, path: &Path, data: &[u8]) -> io::Result<()> {
        self.perform(Operation::WriteFile(path.to_path_buf(), data.to_vec()))
    }

    fn delete_file(&mut self, path: &Path) -> io::Result<()> {
        self.perform(Operation::DeleteFile(path.to_path_buf()))
    }

    fn set_filetype(&mut self, path: &Path, filetype: Filetype) -> io::Result<()> {
        self.perform(Operation::SetFiletype(path.to_path_buf(), filetype))
    }
}
