//! 搜索服务模块
//!
//! - QueryModel: 不可变查询，大小写不敏感的字面量匹配
//! - SearchEngine: 可取消、可中途换查询的流式遍历
//! - ChannelSink: 把引擎回调转成 channel 消息

mod engine;
mod query;
mod sink;

pub use engine::{EngineState, SearchEngine};
pub use query::QueryModel;
pub use sink::ChannelSink;
