//! Service ports: traits + data contracts.

pub mod config;
pub mod resource;
pub mod search;

pub use config::SearchConfig;
pub use resource::{
    Resource, ResourceError, ResourceId, ResourceTree, Result as ResourceResult, VisitFlow,
};
pub use search::{MatchRecord, ResultSink, SearchMessage, TextRange, WalkStats};
