//! quicksearch - 增量全文搜索库
//!
//! 模块结构：
//! - core: 核心抽象（Service）
//! - kernel: 搜索引擎、结果缓冲、响应式校验、会话
//! - kernel::services: ports（契约）+ adapters（文件系统、运行时实现）

pub mod core;
pub mod kernel;
