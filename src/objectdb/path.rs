use super::{NodeId, ObjectDb, ObjectDbError, View};
use std::path::PathBuf;

impl ObjectDb {
    /// Build the path to `id` from the root, using the names of the given
    /// view joined by `separator`.
    ///
    /// Fails if any object on the way lacks a name in that view, such as a
    /// manual-only object asked for its disc path before it has been written.
    pub fn get_path(
        &self,
        id: NodeId,
        view: View,
        separator: &str,
    ) -> Result<String, ObjectDbError> {
        let parts = self.path_parts(id, view)?;

        let length = parts.iter().map(|part| part.len()).sum::<usize>()
            + separator.len() * parts.len().saturating_sub(1);

        let mut path = String::new();
        path.try_reserve(length)
            .map_err(|_| ObjectDbError::NoMemory)?;

        for (index, part) in parts.iter().enumerate() {
            if index > 0 {
                path.push_str(separator);
            }
            path.push_str(part);
        }

        Ok(path)
    }

    /// The location of `id` on disc. The root's disc name is the output
    /// folder itself.
    pub fn disc_path(&self, id: NodeId) -> Result<PathBuf, ObjectDbError> {
        Ok(self.path_parts(id, View::Disc)?.into_iter().collect())
    }

    fn path_parts(&self, id: NodeId, view: View) -> Result<Vec<&str>, ObjectDbError> {
        let mut parts = Vec::new();
        let mut current = Some(id);

        while let Some(id) = current {
            let node = self.node(id);
            let part = node
                .view_name(view)
                .ok_or_else(|| ObjectDbError::MissingName {
                    name: node.name.clone(),
                    view,
                })?;
            parts.push(part);
            current = node.parent;
        }

        parts.reverse();
        Ok(parts)
    }
}
