//! The object database: one tree holding both views of a manual.
//!
//! Every node is a file or directory identified by its RISC OS name. A node
//! may carry a record from the StrongHelp manual, a record from the disc
//! folder, or both. The two views are joined by looking the name up among the
//! existing siblings of the same kind whenever a record is added, so the
//! manual and the disc can be read independently into the same tree.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Sibling
//! lists are kept in ascending name order, which makes lookups a short linear
//! scan and keeps reports deterministic.

mod path;
mod report;
mod status;
mod sync;

#[cfg(test)]
mod tests;

use crate::filetype::Filetype;
use std::fmt;
use std::ops::Range;
use tracing::debug;

pub use report::{Report, ReportEntry, ReportError, ReportMode, Summary};
pub use status::StatusError;
pub use sync::{DiscWriter, SyncError, SyncResult};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectDbError {
    #[error("Too many root directories")]
    TooManyRoots,
    #[error("No root directory has been added")]
    NoRoot,
    #[error("No parent directory for object")]
    NoParent,
    #[error("Parent of {0} is not a directory")]
    NotADirectory(String),
    #[error("Duplicate {kind} {name} in the {view} view")]
    Duplicate {
        kind: ObjectKind,
        name: String,
        view: View,
    },
    #[error("Object {name} has no {view} name")]
    MissingName { name: String, view: View },
    #[error("Out of memory")]
    NoMemory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Directory,
    File,
}

impl ObjectKind {
    pub fn label(self) -> &'static str {
        match self {
            ObjectKind::Directory => "dir",
            ObjectKind::File => "file",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Directory => f.write_str("directory"),
            ObjectKind::File => f.write_str("file"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Not yet compared.
    Unknown,
    Identical,
    /// In the manual but not on disc.
    Added,
    /// On disc but not in the manual.
    Deleted,
    TypeChanged,
    SizeChanged,
    ContentChanged,
}

impl Status {
    /// Short code used in reports and fingerprints.
    pub fn code(self) -> &'static str {
        match self {
            Status::Unknown => "?",
            Status::Identical => ".",
            Status::Added => "A",
            Status::Deleted => "D",
            Status::TypeChanged => "T",
            Status::SizeChanged => "S",
            Status::ContentChanged => "C",
        }
    }

    pub fn is_changed(self) -> bool {
        matches!(
            self,
            Status::TypeChanged | Status::SizeChanged | Status::ContentChanged
        )
    }
}

/// Which name to use when building a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// The RISC OS name shared by both sides.
    Agnostic,
    StrongHelp,
    Disc,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Agnostic => f.write_str("agnostic"),
            View::StrongHelp => f.write_str("StrongHelp"),
            View::Disc => f.write_str("disc"),
        }
    }
}

/// The location of a file's contents within the loaded manual.
///
/// This is a plain range rather than a borrow, so it is only meaningful
/// alongside the buffer the manual was parsed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataRef {
    pub offset: usize,
    pub len: usize,
}

impl DataRef {
    pub fn slice<'a>(&self, manual: &'a [u8]) -> Option<&'a [u8]> {
        manual.get(self.offset..self.offset.checked_add(self.len)?)
    }
}

impl From<Range<usize>> for DataRef {
    fn from(range: Range<usize>) -> Self {
        DataRef {
            offset: range.start,
            len: range.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrongHelpSide {
    pub name: String,
    pub size: u64,
    pub filetype: Filetype,
    pub data: DataRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscSide {
    /// The leaf name on disc, including any type suffix.
    pub name: String,
    pub size: u64,
    pub filetype: Filetype,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: ObjectKind,
    pub stronghelp: Option<StrongHelpSide>,
    pub disc: Option<DiscSide>,
    pub status: Status,
    pub directories: Vec<NodeId>,
    pub files: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl Node {
    fn new(name: &str, kind: ObjectKind, parent: Option<NodeId>) -> Self {
        Node {
            name: name.to_string(),
            kind,
            stronghelp: None,
            disc: None,
            status: Status::Unknown,
            directories: Vec::new(),
            files: Vec::new(),
            parent,
        }
    }

    pub fn view_name(&self, view: View) -> Option<&str> {
        match view {
            View::Agnostic => Some(&self.name),
            View::StrongHelp => self.stronghelp.as_ref().map(|side| side.name.as_str()),
            View::Disc => self.disc.as_ref().map(|side| side.name.as_str()),
        }
    }

    fn children(&self, kind: ObjectKind) -> &[NodeId] {
        match kind {
            ObjectKind::Directory => &self.directories,
            ObjectKind::File => &self.files,
        }
    }
}

#[derive(Debug, Default)]
pub struct ObjectDb {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl ObjectDb {
    pub fn new() -> Self {
        ObjectDb::default()
    }

    #[allow(dead_code)]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Add a directory from the manual. A `None` parent creates the root,
    /// of which there can only be one.
    pub fn add_stronghelp_directory(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
    ) -> Result<NodeId, ObjectDbError> {
        let id = match parent {
            None => {
                if self.root.is_some() {
                    return Err(ObjectDbError::TooManyRoots);
                }
                let id = self.push(Node::new(name, ObjectKind::Directory, None))?;
                self.root = Some(id);
                id
            }
            Some(parent) => self.find_or_create(parent, ObjectKind::Directory, name)?,
        };

        self.attach_stronghelp(
            id,
            StrongHelpSide {
                name: name.to_string(),
                size: 0,
                filetype: Filetype::DIRECTORY,
                data: DataRef::default(),
            },
        )?;

        Ok(id)
    }

    pub fn add_stronghelp_file(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
        size: u64,
        filetype: Filetype,
        data: DataRef,
    ) -> Result<NodeId, ObjectDbError> {
        let parent = parent.ok_or(ObjectDbError::NoParent)?;
        let id = self.find_or_create(parent, ObjectKind::File, name)?;

        self.attach_stronghelp(
            id,
            StrongHelpSide {
                name: name.to_string(),
                size,
                filetype,
                data,
            },
        )?;

        Ok(id)
    }

    /// Add a directory found on disc. A `None` parent attaches the disc
    /// folder to the root created from the manual.
    pub fn add_disc_directory(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
        disc_name: &str,
    ) -> Result<NodeId, ObjectDbError> {
        let id = match parent {
            None => self.root.ok_or(ObjectDbError::NoRoot)?,
            Some(parent) => self.find_or_create(parent, ObjectKind::Directory, name)?,
        };

        self.attach_disc(
            id,
            DiscSide {
                name: disc_name.to_string(),
                size: 0,
                filetype: Filetype::DIRECTORY,
            },
        )?;

        Ok(id)
    }

    pub fn add_disc_file(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
        disc_name: &str,
        size: u64,
        filetype: Filetype,
    ) -> Result<NodeId, ObjectDbError> {
        let parent = parent.ok_or(ObjectDbError::NoParent)?;
        let id = self.find_or_create(parent, ObjectKind::File, name)?;

        self.attach_disc(
            id,
            DiscSide {
                name: disc_name.to_string(),
                size,
                filetype,
            },
        )?;

        Ok(id)
    }

    #[allow(dead_code)]
    pub fn find_directory(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.find(parent, ObjectKind::Directory, name)
    }

    #[allow(dead_code)]
    pub fn find_file(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.find(parent, ObjectKind::File, name)
    }

    fn find(&self, parent: NodeId, kind: ObjectKind, name: &str) -> Option<NodeId> {
        for &id in self.nodes.get(parent.0)?.children(kind) {
            match self.node(id).name.as_str().cmp(name) {
                std::cmp::Ordering::Less => continue,
                std::cmp::Ordering::Equal => return Some(id),
                std::cmp::Ordering::Greater => return None,
            }
        }

        None
    }

    fn find_or_create(
        &mut self,
        parent: NodeId,
        kind: ObjectKind,
        name: &str,
    ) -> Result<NodeId, ObjectDbError> {
        let parent_node = self.nodes.get(parent.0).ok_or(ObjectDbError::NoParent)?;
        if parent_node.kind != ObjectKind::Directory {
            return Err(ObjectDbError::NotADirectory(name.to_string()));
        }

        if let Some(id) = self.find(parent, kind, name) {
            debug!("Found existing {kind} {name}");
            return Ok(id);
        }

        debug!("No match for {kind} {name}, creating new");

        let id = self.push(Node::new(name, kind, Some(parent)))?;
        self.link(parent, id)?;

        Ok(id)
    }

    fn push(&mut self, node: Node) -> Result<NodeId, ObjectDbError> {
        self.nodes
            .try_reserve(1)
            .map_err(|_| ObjectDbError::NoMemory)?;

        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        Ok(id)
    }

    /// Insert `child` into its parent's list for its kind, after every
    /// sibling whose name sorts before it.
    fn link(&mut self, parent: NodeId, child: NodeId) -> Result<(), ObjectDbError> {
        let kind = self.node(child).kind;
        let name = self.node(child).name.as_str();

        let siblings = self.node(parent).children(kind);
        let position = siblings
            .iter()
            .position(|&id| self.node(id).name.as_str() > name)
            .unwrap_or(siblings.len());

        let parent = self.node_mut(parent);
        let list = match kind {
            ObjectKind::Directory => &mut parent.directories,
            ObjectKind::File => &mut parent.files,
        };
        list.try_reserve(1).map_err(|_| ObjectDbError::NoMemory)?;
        list.insert(position, child);

        Ok(())
    }

    fn attach_stronghelp(&mut self, id: NodeId, side: StrongHelpSide) -> Result<(), ObjectDbError> {
        let node = self.node_mut(id);
        if node.stronghelp.is_some() {
            return Err(ObjectDbError::Duplicate {
                kind: node.kind,
                name: node.name.clone(),
                view: View::StrongHelp,
            });
        }

        node.stronghelp = Some(side);
        Ok(())
    }

    fn attach_disc(&mut self, id: NodeId, side: DiscSide) -> Result<(), ObjectDbError> {
        let node = self.node_mut(id);
        if node.disc.is_some() {
            return Err(ObjectDbError::Duplicate {
                kind: node.kind,
                name: node.name.clone(),
                view: View::Disc,
            });
        }

        node.disc = Some(side);
        Ok(())
    }
}
