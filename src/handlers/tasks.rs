//! One-shot background work
//!
//! Store writes, reloads and clipboard writes run on a spawned thread and
//! report back with exactly one [`TaskEvent`] through a flume channel that
//! the main loop drains between frames.

use crate::models::{Snippet, SnippetStore};
use anyhow::{Context, Result};
use flume::{Receiver, Sender};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;

/// Work requested by the application state
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Create(Snippet),
    Update(Snippet),
    Delete(Snippet),
    Reload,
    Copy(String),
    /// Open a file in the external editor. Runs on the main thread because
    /// the editor needs the terminal.
    Edit(PathBuf),
}

impl Task {
    /// Whether the task goes through the snippet store
    pub fn touches_store(&self) -> bool {
        matches!(
            self,
            Task::Create(_) | Task::Update(_) | Task::Delete(_) | Task::Reload | Task::Edit(_)
        )
    }
}

/// Completion signal delivered back into the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    Reloaded {
        snippets: Vec<Snippet>,
        message: String,
    },
    /// A store or reload failure; clears the pending store task
    Failed(String),
    Copied,
    /// Clipboard write failed. Unrelated to any pending store task.
    CopyFailed(String),
}

/// Write-only access to the system clipboard
pub trait Clipboard: Send {
    fn set(&mut self, contents: &str) -> Result<()>;
}

/// System clipboard backed by arboard, opened on first use and kept alive
/// so the contents survive on platforms where the owner serves them.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl Clipboard for SystemClipboard {
    fn set(&mut self, contents: &str) -> Result<()> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new().context("clipboard unavailable")?);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            anyhow::bail!("clipboard unavailable");
        };
        clipboard
            .set_text(contents.to_string())
            .context("failed to write clipboard")
    }
}

pub struct TaskRunner {
    store: Arc<dyn SnippetStore>,
    clipboard: Arc<Mutex<dyn Clipboard>>,
    sender: Sender<TaskEvent>,
    receiver: Receiver<TaskEvent>,
}

impl TaskRunner {
    pub fn new(store: Arc<dyn SnippetStore>, clipboard: Arc<Mutex<dyn Clipboard>>) -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            store,
            clipboard,
            sender,
            receiver,
        }
    }

    pub fn store(&self) -> &Arc<dyn SnippetStore> {
        &self.store
    }

    /// Runs a task on its own thread. Editor tasks are not accepted here.
    pub fn spawn(&self, task: Task) {
        let store = Arc::clone(&self.store);
        let clipboard = Arc::clone(&self.clipboard);
        let sender = self.sender.clone();
        tracing::debug!(?task, "dispatching task");

        thread::spawn(move || {
            let event = run(store.as_ref(), &clipboard, task);
            // receiver is gone once the loop has exited
            let _ = sender.send(event);
        });
    }

    pub fn try_recv(&self) -> Option<TaskEvent> {
        self.receiver.try_recv().ok()
    }

    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<TaskEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }
}

fn reload(store: &dyn SnippetStore, message: &str) -> TaskEvent {
    match store.load_all() {
        Ok(snippets) => TaskEvent::Reloaded {
            snippets,
            message: message.to_string(),
        },
        Err(e) => TaskEvent::Failed(format!("error: {}", e)),
    }
}

/// Executes a task synchronously and produces its completion event
pub fn run(store: &dyn SnippetStore, clipboard: &Mutex<dyn Clipboard>, task: Task) -> TaskEvent {
    let outcome = match task {
        Task::Create(snippet) => store.create(snippet).map(|_| "snippet created"),
        Task::Update(snippet) => store.update(snippet).map(|_| "snippet updated"),
        Task::Delete(snippet) => store.delete(&snippet).map(|_| "snippet deleted"),
        Task::Reload | Task::Edit(_) => Ok("reloaded"),
        Task::Copy(text) => {
            let result = match clipboard.lock() {
                Ok(mut clipboard) => clipboard.set(&text),
                Err(_) => Err(anyhow::anyhow!("clipboard lock poisoned")),
            };
            return match result {
                Ok(()) => TaskEvent::Copied,
                Err(e) => {
                    tracing::warn!(error = %e, "clipboard write failed");
                    TaskEvent::CopyFailed(format!("error: {:#}", e))
                }
            };
        }
    };

    match outcome {
        Ok(message) => reload(store, message),
        Err(e) => {
            tracing::warn!(error = %e, "store operation failed");
            TaskEvent::Failed(format!("error: {}", e))
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Clipboard that records what was written
    #[derive(Default)]
    pub struct MemoryClipboard {
        pub contents: Vec<String>,
        pub fail: bool,
    }

    impl Clipboard for MemoryClipboard {
        fn set(&mut self, contents: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("no display");
            }
            self.contents.push(contents.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MemoryClipboard;
    use super::*;
    use crate::models::FileStore;
    use std::time::Duration;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, FileStore, Mutex<MemoryClipboard>) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        (dir, store, Mutex::new(MemoryClipboard::default()))
    }

    fn sample() -> Snippet {
        Snippet::new("Fetch JSON".into(), "net".into(), "fetch(url)".into())
    }

    #[test]
    fn create_reloads_collection() {
        let (_dir, store, clipboard) = fixture();

        match run(&store, &clipboard, Task::Create(sample())) {
            TaskEvent::Reloaded { snippets, message } => {
                assert_eq!(snippets.len(), 1);
                assert_eq!(snippets[0].id, "fetch-json");
                assert_eq!(message, "snippet created");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn duplicate_create_fails_with_status() {
        let (_dir, store, clipboard) = fixture();
        run(&store, &clipboard, Task::Create(sample()));

        match run(&store, &clipboard, Task::Create(sample())) {
            TaskEvent::Failed(msg) => assert!(msg.starts_with("error: snippet exists")),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn delete_missing_fails() {
        let (_dir, store, clipboard) = fixture();
        let event = run(&store, &clipboard, Task::Delete(sample()));
        assert!(matches!(event, TaskEvent::Failed(_)));
    }

    #[test]
    fn copy_writes_clipboard() {
        let (_dir, store, clipboard) = fixture();
        let event = run(&store, &clipboard, Task::Copy("echo hi".into()));
        assert_eq!(event, TaskEvent::Copied);
        assert_eq!(clipboard.lock().unwrap().contents, vec!["echo hi".to_string()]);

        clipboard.lock().unwrap().fail = true;
        let event = run(&store, &clipboard, Task::Copy("again".into()));
        assert!(matches!(event, TaskEvent::CopyFailed(msg) if msg.contains("no display")));
    }

    #[test]
    fn spawned_task_reports_back() {
        let dir = TempDir::new().unwrap();
        let store: Arc<dyn SnippetStore> = Arc::new(FileStore::new(dir.path()));
        let clipboard: Arc<Mutex<dyn Clipboard>> = Arc::new(Mutex::new(MemoryClipboard::default()));
        let runner = TaskRunner::new(store, clipboard);

        runner.spawn(Task::Reload);
        let event = runner.recv_timeout(Duration::from_secs(5));
        assert_eq!(
            event,
            Some(TaskEvent::Reloaded {
                snippets: Vec::new(),
                message: "reloaded".into()
            })
        );
        assert!(runner.try_recv().is_none());
    }
}
