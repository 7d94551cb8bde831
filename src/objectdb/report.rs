use super::{NodeId, ObjectDb, ObjectDbError, ObjectKind, Status, View};
use crate::util::hashing::hash_field;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Separator used for the RISC OS style paths shown in reports.
pub const REPORT_SEPARATOR: &str = ".";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Object database error: {0}")]
    ObjectDb(#[from] ObjectDbError),
    #[error("Object {0} has not been compared")]
    Unchecked(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Only include objects that differ between the manual and the disc
    Interesting,

    /// Include identical objects as well
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub kind: ObjectKind,
    pub path: String,
    pub status: Status,
}

/// Counts of differences. Type, size and content changes are all counted as
/// changed files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub directories_added: usize,
    pub directories_deleted: usize,
    pub files_added: usize,
    pub files_changed: usize,
    pub files_deleted: usize,
}

impl Summary {
    pub fn is_identical(&self) -> bool {
        *self == Summary::default()
    }

    fn record(&mut self, kind: ObjectKind, status: Status) {
        match (kind, status) {
            (ObjectKind::Directory, Status::Added) => self.directories_added += 1,
            (ObjectKind::Directory, Status::Deleted) => self.directories_deleted += 1,
            (ObjectKind::File, Status::Added) => self.files_added += 1,
            (ObjectKind::File, Status::Deleted) => self.files_deleted += 1,
            (ObjectKind::File, status) if status.is_changed() => self.files_changed += 1,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Objects in tree order: each directory, then its files, then its
    /// subdirectories.
    pub entries: Vec<ReportEntry>,
    pub summary: Summary,
    /// Identifies the set of differences. Identical objects do not contribute,
    /// so it is the same whichever [`ReportMode`] was used.
    pub fingerprint: String,
}

impl ObjectDb {
    /// Describe the status of every object, as set by
    /// [`ObjectDb::check_status`].
    pub fn output_report(&self, mode: ReportMode) -> Result<Report, ReportError> {
        let mut entries = Vec::new();
        let mut summary = Summary::default();

        if let Some(root) = self.root {
            self.report_directory(root, mode, &mut entries, &mut summary)?;
        }

        let fingerprint = compute_fingerprint(&entries);

        Ok(Report {
            entries,
            summary,
            fingerprint,
        })
    }

    fn report_directory(
        &self,
        dir: NodeId,
        mode: ReportMode,
        entries: &mut Vec<ReportEntry>,
        summary: &mut Summary,
    ) -> Result<(), ReportError> {
        self.report_object(dir, mode, entries, summary)?;

        for &file in &self.node(dir).files {
            self.report_object(file, mode, entries, summary)?;
        }

        for &child in &self.node(dir).directories {
            self.report_directory(child, mode, entries, summary)?;
        }

        Ok(())
    }

    fn report_object(
        &self,
        id: NodeId,
        mode: ReportMode,
        entries: &mut Vec<ReportEntry>,
        summary: &mut Summary,
    ) -> Result<(), ReportError> {
        let node = self.node(id);
        let path = self.get_path(id, View::Agnostic, REPORT_SEPARATOR)?;

        match node.status {
            Status::Unknown => return Err(ReportError::Unchecked(path)),
            Status::Identical if mode == ReportMode::Interesting => return Ok(()),
            _ => {}
        }

        summary.record(node.kind, node.status);
        entries.push(ReportEntry {
            kind: node.kind,
            path,
            status: node.status,
        });

        Ok(())
    }
}

fn compute_fingerprint(entries: &[ReportEntry]) -> String {
    let mut hasher = Sha256::new();

    for entry in entries {
        if entry.status == Status::Identical {
            continue;
        }

        hash_field(&mut hasher, entry.kind.label().as_bytes());
        hash_field(&mut hasher, entry.path.as_bytes());
        hash_field(&mut hasher, entry.status.code().as_bytes());
    }

    let hash_bytes = hasher.finalize();
    base64::engine::general_purpose::STANDARD.encode(hash_bytes)
}
