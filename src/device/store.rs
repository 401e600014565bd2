//! Read-only document stores.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};

use log::debug;
use tokio::fs::File;
use tokio::io::AsyncRead;

/// A named-resource store the server streams documents out of.
///
/// Names are absolute-looking paths such as `/thing.jsn`; a leading `/` is not
/// significant.
#[allow(async_fn_in_trait)]
pub trait FileStore {
    /// The byte stream handed out for an open document.
    type Reader: AsyncRead + Unpin;

    /// Open a document for reading, or `None` if it does not exist.
    async fn open(&self, name: &str) -> Option<Self::Reader>;
}

fn relative(name: &str) -> &str {
    name.trim_start_matches('/')
}

/// Documents served from a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileStore for DirStore {
    type Reader = File;

    async fn open(&self, name: &str) -> Option<File> {
        let name = Path::new(relative(name));
        // Only plain descendants of the root are reachable.
        if !name.components().all(|c| matches!(c, Component::Normal(_))) {
            debug!("refusing to open {}", name.display());
            return None;
        }

        let path = self.root.join(name);
        match File::open(&path).await {
            Ok(file) => Some(file),
            Err(e) => {
                debug!("cannot open {}: {e}", path.display());
                None
            }
        }
    }
}

/// Documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document.
    pub fn with_document(mut self, name: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(name, contents);
        self
    }

    pub fn insert(&mut self, name: &str, contents: impl Into<Vec<u8>>) {
        self.documents
            .insert(relative(name).to_string(), contents.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.documents.remove(relative(name))
    }
}

impl FileStore for MemoryStore {
    type Reader = Cursor<Vec<u8>>;

    async fn open(&self, name: &str) -> Option<Self::Reader> {
        self.documents
            .get(relative(name))
            .map(|contents| Cursor::new(contents.clone()))
    }
}
