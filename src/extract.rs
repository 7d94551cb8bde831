//! The extraction pipeline.
//!
//! Opening an extraction loads the manual, reads the output folder into the
//! same object database and compares the two. The result can then be reported
//! on and, if wanted, used to update the folder.

use crate::disc::{DiscError, read_disc_folder};
use crate::objectdb::{
    DiscWriter, ObjectDb, Report, ReportError, ReportMode, StatusError, SyncError, SyncResult,
};
use crate::stronghelp::{ManualError, ManualInfo, parse_manual};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Failed to load {path}: {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Manual(#[from] ManualError),
    #[error(transparent)]
    Disc(#[from] DiscError),
    #[error(transparent)]
    Status(#[from] StatusError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error("Fingerprint mismatch: expected {expected}, but the current changes give {actual}")]
    FingerprintMismatch { expected: String, actual: String },
}

/// A manual and an output folder, compared.
#[derive(Debug)]
pub struct Extraction {
    manual: Vec<u8>,
    db: ObjectDb,
    info: ManualInfo,
}

impl Extraction {
    pub fn open(source: &Path, out: &Path) -> Result<Self, ExtractError> {
        info!("Extracting {} into {}", source.display(), out.display());

        let manual = fs::read(source).map_err(|e| ExtractError::LoadFailed {
            path: source.to_path_buf(),
            source: e,
        })?;

        info!("Manual is {} bytes", manual.len());

        Self::from_bytes(manual, out)
    }

    pub fn from_bytes(manual: Vec<u8>, out: &Path) -> Result<Self, ExtractError> {
        let mut db = ObjectDb::new();

        info!("Reading StrongHelp manual");
        let info = parse_manual(&manual, &mut db)?;
        info!(
            "Manual version {} holds {} objects",
            info.header.version, info.objects
        );

        info!("Reading disc folder");
        read_disc_folder(&mut db, out)?;

        info!("Comparing {} objects", db.len());
        db.check_status(&manual)?;

        Ok(Extraction { manual, db, info })
    }

    #[allow(dead_code)]
    pub fn db(&self) -> &ObjectDb {
        &self.db
    }

    /// The problem found walking the manual's free space, if any. The manual
    /// is still usable, but the run should end in failure.
    pub fn free_space_error(&self) -> Option<&ManualError> {
        self.info.free_space.as_ref().err()
    }

    pub fn report(&self, mode: ReportMode) -> Result<Report, ExtractError> {
        Ok(self.db.output_report(mode)?)
    }

    /// Bring the output folder in line with the manual.
    ///
    /// When `fingerprint` is given, nothing is touched unless it matches the
    /// fingerprint of the changes found when the extraction was opened.
    pub fn update(
        &mut self,
        writer: &mut impl DiscWriter,
        fingerprint: Option<&str>,
    ) -> Result<SyncResult, ExtractError> {
        if let Some(expected) = fingerprint {
            let actual = self.db.output_report(ReportMode::Interesting)?.fingerprint;
            if actual != expected {
                return Err(ExtractError::FingerprintMismatch {
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        info!("Updating disc folder");
        let result = self.db.update(&self.manual, writer)?;
        info!("Update complete, {} changes made", result.actions.len());

        Ok(result)
    }
}
