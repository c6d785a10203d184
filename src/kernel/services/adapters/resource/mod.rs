//! 资源树实现
//!
//! - LocalResourceTree: 本地目录
//! - MemoryResourceTree: 内存（测试、嵌入方）

mod local;
mod memory;

pub use local::LocalResourceTree;
pub use memory::MemoryResourceTree;
