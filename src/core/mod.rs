//! 核心抽象
//!
//! - Service: 后台服务的统一标识

pub mod service;

pub use service::Service;
