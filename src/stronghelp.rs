//! Parser for StrongHelp manuals.
//!
//! A manual is a small filing system in a single file. A `HELP` header at
//! offset 0 is followed by the entry for the root directory, and every entry
//! points at either a `DIR$` block holding further entries or a `DATA` block
//! holding a file. Space released by the editor is kept on a chain of `FREE`
//! blocks, which is walked for diagnostics only.
//!
//! All words are little-endian, and every offset read from the manual goes
//! through [`ByteRegion`] before it is used.

use crate::filename::is_valid_name;
use crate::filetype::Filetype;
use crate::objectdb::{DataRef, NodeId, ObjectDb, ObjectDbError};
use crate::region::{Block, ByteRegion, RegionError};
use std::collections::BTreeSet;
use tracing::debug;

const FILE_WORD: u32 = 0x504c4548;
const DIR_WORD: u32 = 0x24524944;
const DATA_WORD: u32 = 0x41544144;
const FREE_WORD: u32 = 0x45455246;

const ROOT_HEADER_SIZE: i64 = 16;
const ROOT_ENTRY_OFFSET: i64 = 16;
const DIR_ENTRY_SIZE: i64 = 24;
const DIR_BLOCK_SIZE: i64 = 12;
const DATA_BLOCK_SIZE: i64 = 8;
const FREE_BLOCK_SIZE: i64 = 12;

/// Deepest directory nesting the parser will follow.
pub const MAX_DIRECTORY_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManualError {
    #[error("Bad file magic word {0:#010x}, this is not a StrongHelp manual")]
    BadFileMagic(u32),
    #[error("Bad free space magic word {word:#010x} at offset {offset}")]
    BadFreeMagic { offset: i64, word: u32 },
    #[error("Free space chain returns to offset {0}")]
    FreeSpaceLoop(i64),
    #[error("Missing root directory entry: {0}")]
    MissingRoot(#[source] RegionError),
    #[error("Bad object magic word {word:#010x} at offset {offset}")]
    BadObjectMagic { offset: i64, word: u32 },
    #[error("Bad directory entry at offset {offset}: {source}")]
    BadDirEntry {
        offset: i64,
        #[source]
        source: RegionError,
    },
    #[error("Name of the entry at offset {0} runs off the end of the manual")]
    UnterminatedName(i64),
    #[error("Directory block at offset {0} is reached more than once")]
    DirectoryLoop(i64),
    #[error("Entry at offset {offset} has an unusable name {name:?}")]
    BadName { offset: i64, name: String },
    #[error("Directories are nested more than {0} deep")]
    TooDeep(usize),
    #[error(transparent)]
    Region(#[from] RegionError),
    #[error("Object database error: {0}")]
    ObjectDb(#[from] ObjectDbError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootHeader {
    pub magic: u32,
    pub size: i32,
    pub version: i32,
    pub free_offset: i32,
}

#[derive(Debug)]
pub struct ManualInfo {
    pub header: RootHeader,
    /// Total size of the free blocks. A broken chain is reported here but
    /// does not stop the manual being read.
    pub free_space: Result<u64, ManualError>,
    /// Number of files and directories added to the database.
    pub objects: usize,
}

/// Read a manual into the StrongHelp side of `db`.
///
/// The manual's root becomes the database root, so a database can only hold
/// one manual.
pub fn parse_manual(manual: &[u8], db: &mut ObjectDb) -> Result<ManualInfo, ManualError> {
    let region = ByteRegion::new(manual);

    let header = read_header(&region)?;

    debug!("Header magic word {:#010x}", header.magic);
    debug!("Manual version {}", header.version);
    debug!("Declared size {} bytes", header.size);
    debug!("Free space offset {}", header.free_offset);

    if header.magic != FILE_WORD {
        return Err(ManualError::BadFileMagic(header.magic));
    }

    let free_space = walk_free_space(&region, i64::from(header.free_offset));
    match &free_space {
        Ok(total) => debug!("Total free space {total} bytes"),
        Err(err) => debug!("Free space walk stopped: {err}"),
    }

    let root = region
        .resolve(ROOT_ENTRY_OFFSET, DIR_ENTRY_SIZE)
        .map_err(ManualError::MissingRoot)?;
    let (name, _) = entry_name(&root)?;

    let mut parser = Parser {
        region,
        db,
        visited: BTreeSet::new(),
        depth: 0,
        objects: 0,
    };
    parser.process_object(&root, &name, None)?;

    Ok(ManualInfo {
        header,
        free_space,
        objects: parser.objects,
    })
}

fn read_header(region: &ByteRegion<'_>) -> Result<RootHeader, ManualError> {
    let block = region.resolve(0, ROOT_HEADER_SIZE)?;

    Ok(RootHeader {
        magic: block.word(0),
        size: block.int(4),
        version: block.int(8),
        free_offset: block.int(12),
    })
}

/// Follow the free space chain until a negative offset, adding up the block
/// sizes.
fn walk_free_space(region: &ByteRegion<'_>, first: i64) -> Result<u64, ManualError> {
    let mut visited = BTreeSet::new();
    let mut total = 0u64;
    let mut offset = first;

    while offset >= 0 {
        if !visited.insert(offset) {
            return Err(ManualError::FreeSpaceLoop(offset));
        }

        let block = region.resolve(offset, FREE_BLOCK_SIZE)?;
        let magic = block.word(0);
        let size = block.int(4);
        let next = block.int(8);

        debug!("Free block at {offset}: magic {magic:#010x}, size {size}, next {next}");

        if magic != FREE_WORD {
            return Err(ManualError::BadFreeMagic {
                offset,
                word: magic,
            });
        }

        total = total.saturating_add(u64::try_from(size).unwrap_or(0));
        offset = i64::from(next);
    }

    Ok(total)
}

/// Decode the NUL-terminated name following an entry header, returning it
/// with its length in bytes. Names are Latin-1.
fn entry_name(entry: &Block<'_>) -> Result<(String, usize), ManualError> {
    let tail = entry.tail(DIR_ENTRY_SIZE as usize);
    let length = tail
        .iter()
        .position(|&byte| byte == 0)
        .ok_or(ManualError::UnterminatedName(entry.offset()))?;

    let name = tail[..length].iter().copied().map(char::from).collect();

    Ok((name, length))
}

struct Parser<'a, 'db> {
    region: ByteRegion<'a>,
    db: &'db mut ObjectDb,
    /// Every directory block read so far. Each block belongs to exactly one
    /// directory.
    visited: BTreeSet<i64>,
    depth: usize,
    objects: usize,
}

impl Parser<'_, '_> {
    fn process_object(
        &mut self,
        entry: &Block<'_>,
        name: &str,
        parent: Option<NodeId>,
    ) -> Result<(), ManualError> {
        if parent.is_some() && !is_valid_name(name) {
            return Err(ManualError::BadName {
                offset: entry.offset(),
                name: name.to_string(),
            });
        }

        let object_offset = i64::from(entry.int(0));
        let load_address = entry.word(4);
        let size = i64::from(entry.int(12));

        let block = self.region.resolve(object_offset, DATA_BLOCK_SIZE)?;
        let magic = block.word(0);

        match magic {
            FILE_WORD if object_offset == 0 => {
                let filetype = Filetype::from_load_address(load_address);
                debug!("Empty file {name} of type {filetype} has no data block");

                self.db
                    .add_stronghelp_file(parent, name, 0, filetype, DataRef::default())?;
            }
            DATA_WORD => {
                let filetype = Filetype::from_load_address(load_address);
                let payload = self
                    .region
                    .payload(object_offset + DATA_BLOCK_SIZE, size - DATA_BLOCK_SIZE)?;
                debug!(
                    "File {name} of type {filetype}, {} bytes at offset {}",
                    payload.len(),
                    payload.start
                );

                self.db.add_stronghelp_file(
                    parent,
                    name,
                    payload.len() as u64,
                    filetype,
                    payload.into(),
                )?;
            }
            DIR_WORD => {
                let block = self.region.resolve(object_offset, DIR_BLOCK_SIZE)?;
                let used = i64::from(block.int(8));
                debug!("Directory {name} at offset {object_offset}, {used} bytes used");

                let directory = self.db.add_stronghelp_directory(parent, name)?;
                self.objects += 1;

                return self.process_directory_entries(object_offset, used, directory);
            }
            word => {
                return Err(ManualError::BadObjectMagic {
                    offset: object_offset,
                    word,
                });
            }
        }

        self.objects += 1;
        Ok(())
    }

    fn process_directory_entries(
        &mut self,
        block_offset: i64,
        used: i64,
        directory: NodeId,
    ) -> Result<(), ManualError> {
        if !self.visited.insert(block_offset) {
            return Err(ManualError::DirectoryLoop(block_offset));
        }

        if self.depth >= MAX_DIRECTORY_DEPTH {
            return Err(ManualError::TooDeep(MAX_DIRECTORY_DEPTH));
        }

        let start = block_offset + DIR_BLOCK_SIZE;
        let entries = self.region.span(start, used - DIR_BLOCK_SIZE)?;
        let end = start + entries.len() as i64;

        self.depth += 1;

        let mut offset = start;
        while offset < end {
            let entry = self
                .region
                .resolve(offset, DIR_ENTRY_SIZE)
                .map_err(|source| ManualError::BadDirEntry { offset, source })?;
            let (name, length) = entry_name(&entry)?;

            self.process_object(&entry, &name, Some(directory))?;

            offset += align4(DIR_ENTRY_SIZE + length as i64 + 1);
        }

        self.depth -= 1;

        Ok(())
    }
}

fn align4(value: i64) -> i64 {
    (value + 3) & !3
}
