pub mod folder;
pub mod snippet;
pub mod storage;

pub use folder::{FolderTree, SidebarItem};
pub use snippet::Snippet;
pub use storage::{FileStore, SnippetStore};
