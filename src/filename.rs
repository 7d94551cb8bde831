//! Translation between RISC OS object names and host filenames.
//!
//! Hosts without typed files carry the RISC OS filetype as a `,xxx` suffix on
//! the filename. The directory separators also differ: RISC OS uses `.` where
//! hosts use `/`, so the two characters are swapped when moving a leaf name
//! from one convention to the other.

use crate::filetype::Filetype;
use std::path::MAIN_SEPARATOR;

/// Split a host filename into its RISC OS name and filetype.
///
/// A name ending in a comma and exactly three hex digits has that suffix
/// removed and used as the type. Anything else keeps its full name and is
/// given [`Filetype::DATA`].
pub fn split_file_name(disc_name: &str) -> (String, Filetype) {
    let (stem, filetype) = match parse_type_suffix(disc_name) {
        Some((stem, filetype)) => (stem, filetype),
        None => (disc_name, Filetype::DATA),
    };

    (to_riscos(stem), filetype)
}

/// Convert a host directory name into its RISC OS name.
pub fn directory_name(disc_name: &str) -> String {
    to_riscos(disc_name)
}

/// Build the host filename for a RISC OS object.
///
/// Directories, and any other object without a real type, get no suffix.
pub fn make_disc_name(name: &str, filetype: Filetype) -> String {
    let host = to_host(name);

    if filetype.is_real() {
        format!("{host},{:03x}", filetype.value())
    } else {
        host
    }
}

/// Whether a RISC OS leaf name can be written safely inside the output
/// folder.
///
/// The name must be non-empty, must not contain `.` or NUL, and its host
/// form must be neither `.` nor `..` nor contain a host separator.
pub fn is_valid_name(name: &str) -> bool {
    if name.is_empty() || name.contains(['.', '\0']) {
        return false;
    }

    let host = to_host(name);
    host != "." && host != ".." && !host.contains(MAIN_SEPARATOR)
}

fn parse_type_suffix(name: &str) -> Option<(&str, Filetype)> {
    let (stem, suffix) = name.rsplit_once(',')?;

    if stem.is_empty() || suffix.len() != 3 || !suffix.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let value = u32::from_str_radix(suffix, 16).ok()?;
    Some((stem, Filetype::new(value)?))
}

fn to_riscos(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '.' => '/',
            '/' => '.',
            other => other,
        })
        .collect()
}

fn to_host(name: &str) -> String {
    // The swap is its own inverse.
    to_riscos(name)
}
