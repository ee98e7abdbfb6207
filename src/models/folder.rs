//! Folder Index
//!
//! A disposable tree derived from the category paths of the loaded snippets.
//! It is rebuilt from scratch every time the collection changes and only
//! ever stores indices into that collection.

use crate::highlight::Markup;
use crate::models::Snippet;
use crate::models::snippet::UNCATEGORIZED;
use std::collections::BTreeMap;

/// A display-ready row for the sidebar
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarItem {
    Folder {
        name: String,
        path: String,
        depth: usize,
    },
    Snippet {
        title: Markup,
        category: String,
        depth: usize,
        /// Position of the snippet in the owning collection
        index: usize,
    },
}

impl SidebarItem {
    pub fn depth(&self) -> usize {
        match self {
            SidebarItem::Folder { depth, .. } | SidebarItem::Snippet { depth, .. } => *depth,
        }
    }

    pub fn snippet_index(&self) -> Option<usize> {
        match self {
            SidebarItem::Snippet { index, .. } => Some(*index),
            SidebarItem::Folder { .. } => None,
        }
    }

    fn snippet(snippet: &Snippet, index: usize, depth: usize) -> Self {
        SidebarItem::Snippet {
            title: Markup::plain(snippet.title.clone()),
            category: snippet.category.clone(),
            depth,
            index,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderNode {
    pub name: String,
    pub path: String,
    pub children: BTreeMap<String, FolderNode>,
    pub snippets: Vec<usize>,
}

impl FolderNode {
    fn child_entry(&mut self, name: &str) -> &mut FolderNode {
        let path = if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.path, name)
        };
        self.children
            .entry(name.to_string())
            .or_insert_with(|| FolderNode {
                name: name.to_string(),
                path,
                ..FolderNode::default()
            })
    }

    /// Own snippets ordered by title ignoring case, ties by collection order
    fn sorted_snippets(&self, snippets: &[Snippet]) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .snippets
            .iter()
            .copied()
            .filter(|&i| i < snippets.len())
            .collect();
        indices.sort_by_cached_key(|&i| (snippets[i].title.to_lowercase(), i));
        indices
    }
}

/// Non-empty, trimmed segments of a category path
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').map(str::trim).filter(|s| !s.is_empty())
}

/// Parent of a folder path; top-level folders and the root map to `""`
pub fn parent_path(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => path[..idx].to_string(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderTree {
    root: FolderNode,
}

impl FolderTree {
    pub fn build(snippets: &[Snippet]) -> Self {
        let mut root = FolderNode::default();

        for (index, snippet) in snippets.iter().enumerate() {
            let mut segments: Vec<&str> = path_segments(&snippet.category).collect();
            if segments.is_empty() {
                segments.push(UNCATEGORIZED);
            }

            let mut node = &mut root;
            for segment in segments {
                node = node.child_entry(segment);
            }
            node.snippets.push(index);
        }

        Self { root }
    }

    /// Resolves a folder path. `""` is the root.
    pub fn node(&self, path: &str) -> Option<&FolderNode> {
        path_segments(path).try_fold(&self.root, |node, segment| node.children.get(segment))
    }

    /// Immediate children of `path`: sub-folders by name, then snippets by
    /// title. Unknown paths have no children.
    pub fn children_of(&self, path: &str, snippets: &[Snippet]) -> Vec<SidebarItem> {
        let Some(node) = self.node(path) else {
            return Vec::new();
        };

        let folders = node.children.values().map(|child| SidebarItem::Folder {
            name: child.name.clone(),
            path: child.path.clone(),
            depth: 0,
        });
        let files = node
            .sorted_snippets(snippets)
            .into_iter()
            .map(|i| SidebarItem::snippet(&snippets[i], i, 0));

        folders.chain(files).collect()
    }

    /// Full depth-first listing: each folder, then its sub-folders, then its
    /// own snippets.
    pub fn flatten(&self, snippets: &[Snippet]) -> Vec<SidebarItem> {
        let mut items = Vec::new();
        Self::walk(&self.root, 0, snippets, &mut items);
        items
    }

    fn walk(node: &FolderNode, depth: usize, snippets: &[Snippet], out: &mut Vec<SidebarItem>) {
        let child_depth = if node.path.is_empty() {
            depth
        } else {
            out.push(SidebarItem::Folder {
                name: node.name.clone(),
                path: node.path.clone(),
                depth,
            });
            depth + 1
        };

        for child in node.children.values() {
            Self::walk(child, child_depth, snippets, out);
        }

        for i in node.sorted_snippets(snippets) {
            out.push(SidebarItem::snippet(&snippets[i], i, child_depth));
        }
    }
}
