//! Folder hierarchy reconstruction.
//!
//! The backend lists folders flat, each carrying its `parent_id`. The tree is
//! rebuilt from scratch on every request by grouping records per parent and
//! recursing from the root group downwards.
//!
//! There is no cycle detection as such. Records whose parent chain never
//! reaches a root are unreachable and left out of the forest. A chain that
//! is reachable from a root but loops back (possible only with duplicate ids)
//! is cut where a folder id would repeat on its own ancestor path.

use crate::models::{Folder, FolderNode};
use std::collections::HashMap;

/// Build the folder forest from a flat listing.
///
/// Roots are folders without a parent. Siblings are ordered by title
/// ascending, case-sensitively, with a missing title sorting as `""`. The sort
/// is stable, so equal titles keep their listing order.
#[must_use]
pub fn build_folder_tree(folders: &[Folder]) -> Vec<FolderNode> {
    let mut by_parent: HashMap<Option<&str>, Vec<&Folder>> = HashMap::new();
    for folder in folders {
        by_parent
            .entry(folder.parent_id.as_deref())
            .or_default()
            .push(folder);
    }

    build_children(&by_parent, None, &mut Vec::new())
}

fn build_children<'a>(
    by_parent: &HashMap<Option<&'a str>, Vec<&'a Folder>>,
    parent_id: Option<&'a str>,
    ancestors: &mut Vec<&'a str>,
) -> Vec<FolderNode> {
    let Some(group) = by_parent.get(&parent_id) else {
        return Vec::new();
    };

    let mut children = group.clone();
    children.sort_by(|a, b| sort_title(a).cmp(sort_title(b)));

    let mut nodes = Vec::with_capacity(children.len());
    for folder in children {
        let id = folder.id.as_str();
        if ancestors.contains(&id) {
            continue;
        }

        ancestors.push(id);
        let grandchildren = build_children(by_parent, Some(id), ancestors);
        ancestors.pop();

        nodes.push(FolderNode {
            id: folder.id.clone(),
            title: folder.title.clone(),
            children: grandchildren,
        });
    }
    nodes
}

fn sort_title(folder: &Folder) -> &str {
    folder.title.as_deref().unwrap_or("")
}
