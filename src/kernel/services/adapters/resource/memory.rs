//! 内存资源树
//!
//! 按路径字典序遍历。可以注入读取失败，便于测试引擎的容错行为。

use crate::kernel::services::ports::{
    Resource, ResourceError, ResourceResult, ResourceTree, VisitFlow,
};
use std::collections::BTreeMap;
use std::io::{self, BufRead, Cursor};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Clone)]
enum MemoryEntry {
    Bytes(Vec<u8>),
    Unreadable(io::ErrorKind),
}

pub struct MemoryResourceTree {
    root: PathBuf,
    entries: RwLock<BTreeMap<String, MemoryEntry>>,
}

impl MemoryResourceTree {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/"),
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.insert_bytes(path, content.as_bytes().to_vec());
        self
    }

    pub fn with_bytes(self, path: &str, content: &[u8]) -> Self {
        self.insert_bytes(path, content.to_vec());
        self
    }

    /// 可以列出、但打开时失败的资源
    pub fn with_unreadable(self, path: &str, kind: io::ErrorKind) -> Self {
        self.write_entries()
            .insert(path.to_string(), MemoryEntry::Unreadable(kind));
        self
    }

    pub fn insert(&self, path: &str, content: &str) {
        self.insert_bytes(path, content.as_bytes().to_vec());
    }

    pub fn remove(&self, path: &str) -> bool {
        self.write_entries().remove(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert_bytes(&self, path: &str, bytes: Vec<u8>) {
        self.write_entries()
            .insert(path.to_string(), MemoryEntry::Bytes(bytes));
    }

    fn write_entries(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, MemoryEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryResourceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceTree for MemoryResourceTree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn visit(&self, visitor: &mut dyn FnMut(Resource) -> VisitFlow) -> ResourceResult<()> {
        // 先拷贝出路径列表，回调期间不持有锁（回调里可能 remove）
        let paths: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();

        for path in paths {
            let resource = Resource::new(path.as_str(), self.root.join(&path));
            if visitor(resource) == VisitFlow::Stop {
                break;
            }
        }
        Ok(())
    }

    fn open(&self, resource: &Resource) -> ResourceResult<Box<dyn BufRead + Send>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        match entries.get(resource.id().as_str()) {
            Some(MemoryEntry::Bytes(bytes)) => Ok(Box::new(Cursor::new(bytes.clone()))),
            Some(MemoryEntry::Unreadable(kind)) => Err(ResourceError::from_io(
                resource.path(),
                io::Error::new(*kind, "injected failure"),
            )),
            None => Err(ResourceError::NotFound(resource.path().to_path_buf())),
        }
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/resource/memory.rs"]
mod tests;
