//! Canonical hashing helpers for stable fingerprints.

use sha2::{Digest, Sha256};

/// Hashes a byte field with an explicit length prefix.
///
/// The prefix keeps distinct field sequences, such as `a` + `bc` and
/// `ab` + `c`, from hashing to the same stream.
pub(crate) fn hash_field(hasher: &mut Sha256, bytes: &[u8]) {
    let len = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
    hasher.update(len.to_be_bytes());
    hasher.update(bytes);
}
