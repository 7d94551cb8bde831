//! Bounds-checked access to a StrongHelp manual held in memory.
//!
//! Every offset read out of a manual is untrusted, so the parser never
//! indexes the buffer directly: it asks the region for a block at an offset
//! with a minimum size, and the region checks the request against the loaded
//! length first.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegionError {
    #[error("No manual is loaded")]
    NoBuffer,
    #[error("Bad offset {0}")]
    BadOffset(i64),
    #[error("Bad size {0}")]
    BadSize(i64),
    #[error("Block of {size} bytes at offset {offset} runs beyond the manual length of {length}")]
    OffsetRange { offset: i64, size: i64, length: usize },
}

/// A view over the bytes of a loaded manual.
///
/// An empty buffer is treated as nothing loaded.
#[derive(Debug, Clone, Copy)]
pub struct ByteRegion<'a> {
    bytes: Option<&'a [u8]>,
}

/// The bytes of a manual from a resolved offset to the end of the buffer.
///
/// At least `min_size + 1` bytes are available, so fixed-size reads within
/// the size passed to [`ByteRegion::resolve`] cannot fail.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    offset: i64,
    bytes: &'a [u8],
}

impl<'a> ByteRegion<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        ByteRegion {
            bytes: (!bytes.is_empty()).then_some(bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.map_or(0, <[u8]>::len)
    }

    /// Resolve a block of at least `min_size` bytes at `offset`.
    ///
    /// The bound is exclusive: a block may not end exactly at the end of the
    /// buffer.
    pub fn resolve(&self, offset: i64, min_size: i64) -> Result<Block<'a>, RegionError> {
        let bytes = self.loaded()?;
        let range = self.check(offset, min_size, false)?;

        Ok(Block {
            offset,
            bytes: &bytes[range.start..],
        })
    }

    /// Validate a span of `length` bytes at `offset`, using the same exclusive
    /// bound as [`ByteRegion::resolve`].
    pub fn span(&self, offset: i64, length: i64) -> Result<Range<usize>, RegionError> {
        self.loaded()?;
        self.check(offset, length, false)
    }

    /// Validate the payload of a data block. Payloads may run up to the final
    /// byte of the buffer.
    pub fn payload(&self, offset: i64, length: i64) -> Result<Range<usize>, RegionError> {
        self.loaded()?;
        self.check(offset, length, true)
    }

    fn loaded(&self) -> Result<&'a [u8], RegionError> {
        self.bytes.ok_or(RegionError::NoBuffer)
    }

    fn check(
        &self,
        offset: i64,
        size: i64,
        allow_end: bool,
    ) -> Result<Range<usize>, RegionError> {
        if offset < 0 {
            return Err(RegionError::BadOffset(offset));
        }

        if size < 0 {
            return Err(RegionError::BadSize(size));
        }

        let length = self.len();
        let end = offset.saturating_add(size);
        let limit = i64::try_from(length).unwrap_or(i64::MAX);

        let outside = if allow_end { end > limit } else { end >= limit };
        if outside {
            return Err(RegionError::OffsetRange {
                offset,
                size,
                length,
            });
        }

        // Both values are non-negative and below the buffer length here.
        Ok(offset as usize..end as usize)
    }
}

impl<'a> Block<'a> {
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Read the little-endian word starting `at` bytes into the block.
    pub fn word(&self, at: usize) -> u32 {
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.bytes[at..at + 4]);
        u32::from_le_bytes(word)
    }

    /// Read the little-endian signed word starting `at` bytes into the block.
    pub fn int(&self, at: usize) -> i32 {
        self.word(at) as i32
    }

    /// Everything from `at` bytes into the block to the end of the buffer.
    pub fn tail(&self, at: usize) -> &'a [u8] {
        self.bytes.get(at..).unwrap_or(&[])
    }
}
