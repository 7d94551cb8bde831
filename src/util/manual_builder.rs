//! Builds small StrongHelp manuals in memory for tests.
//!
//! The layout follows the real format: a `HELP` header, the root entry at
//! offset 16, then each block appended after the directory that points to it,
//! with any free blocks linked together at the end.

const HELP_WORD: u32 = 0x504c4548;
const DIR_WORD: u32 = 0x24524944;
const DATA_WORD: u32 = 0x41544144;
const FREE_WORD: u32 = 0x45455246;

const VERSION: u32 = 275;
const DIRECTORY_FLAGS: u32 = 0x100;

pub const ROOT_ENTRY_OFFSET: usize = 16;
/// Where the root directory block lands: after the 24 byte entry header and
/// the word-aligned name `$`.
pub const ROOT_BLOCK_OFFSET: usize = 44;

pub enum Object {
    File {
        name: String,
        filetype: u32,
        data: Vec<u8>,
    },
    Dir {
        name: String,
        children: Vec<Object>,
    },
    /// An empty file stored with an object offset of zero and no data block.
    ZeroOffset { name: String, filetype: u32 },
}

pub fn file(name: &str, filetype: u32, data: &[u8]) -> Object {
    Object::File {
        name: name.to_string(),
        filetype,
        data: data.to_vec(),
    }
}

pub fn dir(name: &str, children: Vec<Object>) -> Object {
    Object::Dir {
        name: name.to_string(),
        children,
    }
}

pub struct Manual {
    pub bytes: Vec<u8>,
    /// Offsets of every directory entry, keyed by the object's name.
    pub entries: Vec<(String, usize)>,
    pub free_blocks: Vec<usize>,
}

impl Manual {
    /// Offset of the directory entry for the first object called `name`.
    pub fn entry(&self, name: &str) -> usize {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, offset)| *offset)
            .unwrap_or_else(|| panic!("no entry called {name}"))
    }

    pub fn word(&self, offset: usize) -> u32 {
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.bytes[offset..offset + 4]);
        u32::from_le_bytes(word)
    }

    pub fn set_word(&mut self, offset: usize, value: u32) {
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }
}

pub struct ManualBuilder {
    children: Vec<Object>,
    free_sizes: Vec<u32>,
}

impl ManualBuilder {
    pub fn new(children: Vec<Object>) -> Self {
        ManualBuilder {
            children,
            free_sizes: Vec::new(),
        }
    }

    /// Append a free block of `size` bytes, which must be at least 12.
    pub fn free_block(mut self, size: u32) -> Self {
        self.free_sizes.push(size.max(12));
        self
    }

    pub fn build(&self) -> Manual {
        let mut writer = Writer {
            bytes: Vec::new(),
            entries: Vec::new(),
        };

        writer.word(HELP_WORD);
        writer.word(0);
        writer.word(VERSION);
        writer.word(u32::MAX);

        let root_entry = writer.entry("$", 0, DIRECTORY_FLAGS);
        let (root_block, root_size) = writer.directory(&self.children);
        writer.set_word(root_entry, root_block as u32);
        writer.set_word(root_entry + 12, root_size as u32);

        let mut free_blocks = Vec::new();
        for &size in &self.free_sizes {
            let offset = writer.bytes.len();
            writer.word(FREE_WORD);
            writer.word(size);
            writer.word(u32::MAX);
            writer.bytes.resize(offset + size as usize, 0);
            writer.align();

            match free_blocks.last() {
                Some(&previous) => writer.set_word(previous + 8, offset as u32),
                None => writer.set_word(12, offset as u32),
            }
            free_blocks.push(offset);
        }

        writer.bytes.extend_from_slice(&[0; 4]);
        let length = writer.bytes.len() as u32;
        writer.set_word(4, length);

        Manual {
            bytes: writer.bytes,
            entries: writer.entries,
            free_blocks,
        }
    }
}

/// Build a manual with no free space.
pub fn build(children: Vec<Object>) -> Vec<u8> {
    ManualBuilder::new(children).build().bytes
}

struct Writer {
    bytes: Vec<u8>,
    entries: Vec<(String, usize)>,
}

impl Writer {
    fn word(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    fn set_word(&mut self, offset: usize, value: u32) {
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn align(&mut self) {
        while self.bytes.len() % 4 != 0 {
            self.bytes.push(0);
        }
    }

    /// Write a directory entry with a zero object offset and size, returning
    /// its offset.
    fn entry(&mut self, name: &str, load_address: u32, flags: u32) -> usize {
        let offset = self.bytes.len();
        self.word(0);
        self.word(load_address);
        self.word(0);
        self.word(0);
        self.word(flags);
        self.word(0);
        self.bytes.extend_from_slice(name.as_bytes());
        self.bytes.push(0);
        self.align();
        self.entries.push((name.to_string(), offset));
        offset
    }

    /// Write a directory block followed by the blocks of everything in it.
    /// Returns the block's offset and size.
    fn directory(&mut self, children: &[Object]) -> (usize, usize) {
        let start = self.bytes.len();
        self.word(DIR_WORD);
        self.word(0);
        self.word(0);

        let entries: Vec<usize> = children
            .iter()
            .map(|child| match child {
                Object::File { name, filetype, .. } | Object::ZeroOffset { name, filetype } => {
                    self.entry(name, load_address(*filetype), 0)
                }
                Object::Dir { name, .. } => self.entry(name, 0, DIRECTORY_FLAGS),
            })
            .collect();

        let used = self.bytes.len() - start;
        self.set_word(start + 4, used as u32);
        self.set_word(start + 8, used as u32);

        for (child, entry) in children.iter().zip(entries) {
            match child {
                Object::File { data, .. } => {
                    let block = self.bytes.len();
                    let size = 8 + data.len();
                    self.word(DATA_WORD);
                    self.word(size as u32);
                    self.bytes.extend_from_slice(data);
                    self.align();
                    self.set_word(entry, block as u32);
                    self.set_word(entry + 12, size as u32);
                }
                Object::Dir { children, .. } => {
                    let (block, size) = self.directory(children);
                    self.set_word(entry, block as u32);
                    self.set_word(entry + 12, size as u32);
                }
                Object::ZeroOffset { .. } => {}
            }
        }

        (start, used)
    }
}

fn load_address(filetype: u32) -> u32 {
    0xfff0_0000 | ((filetype & 0xfff) << 8)
}
