//! 本地文件系统资源树
//!
//! - 使用 ignore crate 遵守 .gitignore 规则、跳过隐藏文件
//! - 同级按文件名排序，保证每次遍历顺序一致
//! - 按 SearchConfig 过滤名称、扩展名、前缀和文件大小

use crate::kernel::services::ports::{
    Resource, ResourceError, ResourceResult, ResourceTree, SearchConfig, VisitFlow,
};
use ignore::WalkBuilder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct LocalResourceTree {
    root: PathBuf,
    config: Arc<SearchConfig>,
}

impl LocalResourceTree {
    pub fn new(root: impl Into<PathBuf>, config: &SearchConfig) -> ResourceResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ResourceError::NotFound(root));
        }
        Ok(Self {
            root,
            config: Arc::new(config.clone()),
        })
    }

    fn resource_for(&self, path: &Path) -> Resource {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        let id = rel.to_string_lossy().replace('\\', "/");
        Resource::new(id, path.to_path_buf())
    }
}

impl ResourceTree for LocalResourceTree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn visit(&self, visitor: &mut dyn FnMut(Resource) -> VisitFlow) -> ResourceResult<()> {
        let filter_config = self.config.clone();
        let walker = WalkBuilder::new(&self.root)
            .hidden(true)
            .git_ignore(self.config.respect_gitignore)
            .git_global(self.config.respect_gitignore)
            .git_exclude(self.config.respect_gitignore)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                entry.depth() == 0
                    || !filter_config.is_ignored_name(&entry.file_name().to_string_lossy())
            })
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "skip unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let path = entry.path();
            match entry.metadata() {
                Ok(meta) if meta.len() > self.config.max_file_size => {
                    tracing::debug!(path = %path.display(), size = meta.len(), "skip large file");
                    continue;
                }
                _ => {}
            }

            if visitor(self.resource_for(path)) == VisitFlow::Stop {
                break;
            }
        }

        Ok(())
    }

    fn open(&self, resource: &Resource) -> ResourceResult<Box<dyn BufRead + Send>> {
        let file = File::open(resource.path())
            .map_err(|e| ResourceError::from_io(resource.path(), e))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/resource/local.rs"]
mod tests;
