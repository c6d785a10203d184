//! 资源树契约
//!
//! 搜索引擎只依赖这里的 trait，不关心资源具体存放在哪里（本地磁盘、内存等）

use std::fmt;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, ResourceError>;

#[derive(Debug)]
pub enum ResourceError {
    Io(io::Error),
    NotFound(PathBuf),
    InvalidUtf8 { path: PathBuf, line: usize },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Io(e) => write!(f, "IO error: {}", e),
            ResourceError::NotFound(p) => write!(f, "Not found: {}", p.display()),
            ResourceError::InvalidUtf8 { path, line } => {
                write!(f, "Invalid UTF-8 in {} at line {}", path.display(), line)
            }
        }
    }
}

impl std::error::Error for ResourceError {}

impl From<io::Error> for ResourceError {
    fn from(e: io::Error) -> Self {
        ResourceError::Io(e)
    }
}

impl ResourceError {
    /// 把 io 错误归类，NotFound 单独拎出来（并发删除的常见情况）
    pub fn from_io(path: &Path, e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::NotFound {
            ResourceError::NotFound(path.to_path_buf())
        } else {
            ResourceError::Io(e)
        }
    }
}

/// 资源的稳定标识，克隆代价很低（大量 MatchRecord 会共享它）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(Arc<str>);

impl ResourceId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 一个可寻址的文本资源
#[derive(Debug, Clone)]
pub struct Resource {
    id: ResourceId,
    path: PathBuf,
    name: String,
}

impl Resource {
    pub fn new(id: impl Into<Arc<str>>, path: PathBuf) -> Self {
        let id = ResourceId::new(id);
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| id.as_str().to_string());

        Self { id, path, name }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    /// 完整路径（用于打开、tooltip）
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 短名称（文件名）
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Resource {}

impl std::hash::Hash for Resource {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitFlow {
    Continue,
    Stop,
}

/// 有序资源树
///
/// `visit` 必须以稳定、确定的顺序（深度优先）回调每个候选资源；
/// 回调返回 `VisitFlow::Stop` 时应尽快结束遍历。
pub trait ResourceTree: Send + Sync {
    fn root(&self) -> &Path;

    fn visit(&self, visitor: &mut dyn FnMut(Resource) -> VisitFlow) -> Result<()>;

    fn open(&self, resource: &Resource) -> Result<Box<dyn BufRead + Send>>;
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/resource.rs"]
mod tests;
