use std::fmt;

/// A RISC OS filetype.
///
/// Real types occupy the 12-bit range `0x000..=0xfff`. Two sentinels outside
/// that range mark directories and objects whose type is not known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Filetype(u32);

impl Filetype {
    pub const DIRECTORY: Filetype = Filetype(0x1000);
    #[allow(dead_code)]
    pub const UNKNOWN: Filetype = Filetype(0xffff);

    /// Data, assumed for disc files that carry no type suffix.
    pub const DATA: Filetype = Filetype(0xffd);
    #[allow(dead_code)]
    pub const TEXT: Filetype = Filetype(0xfff);

    /// Build a filetype from a 12-bit value, or `None` if out of range.
    pub fn new(value: u32) -> Option<Self> {
        (value <= 0xfff).then_some(Filetype(value))
    }

    /// Extract the type from a RISC OS load address, where it sits in bits
    /// 8 to 19.
    pub fn from_load_address(load_address: u32) -> Self {
        Filetype((load_address >> 8) & 0xfff)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_real(self) -> bool {
        self.0 <= 0xfff
    }
}

impl fmt::Display for Filetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Filetype::DIRECTORY => f.write_str("directory"),
            Filetype::UNKNOWN => f.write_str("unknown"),
            Filetype(value) => write!(f, "&{value:03X}"),
        }
    }
}
