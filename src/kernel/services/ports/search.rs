use super::resource::{Resource, ResourceError, ResourceId};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 行内的一段匹配，`start`/`len` 都是 UTF-8 字节偏移
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub start: usize,
    pub len: usize,
}

impl TextRange {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn slice<'a>(&self, line: &'a str) -> Option<&'a str> {
        line.get(self.start..self.end())
    }
}

/// 一条匹配行
///
/// 相等性只看 `(resource id, line_number, line_text)`，`ranges` 不参与，
/// 这样 revoke 时不需要原始对象。
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub resource: Resource,
    pub line_number: usize,
    pub line_text: String,
    pub ranges: Vec<TextRange>,
}

impl MatchRecord {
    pub fn new(
        resource: Resource,
        line_number: usize,
        line_text: String,
        ranges: Vec<TextRange>,
    ) -> Self {
        Self {
            resource,
            line_number,
            line_text,
            ranges,
        }
    }

    pub fn resource_id(&self) -> &ResourceId {
        self.resource.id()
    }

    /// 行号列的文本
    pub fn line_label(&self) -> String {
        self.line_number.to_string()
    }
}

impl PartialEq for MatchRecord {
    fn eq(&self, other: &Self) -> bool {
        self.line_number == other.line_number
            && self.resource.id() == other.resource.id()
            && self.line_text == other.line_text
    }
}

impl Eq for MatchRecord {}

impl Hash for MatchRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resource.id().hash(state);
        self.line_number.hash(state);
        self.line_text.hash(state);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub resources_searched: usize,
    pub resources_failed: usize,
    pub matches: usize,
}

/// 搜索结果接收方
///
/// 所有回调都来自搜索 worker 线程，实现方需要自己把数据转交到 UI 线程。
pub trait ResultSink: Send + Sync {
    fn add(&self, record: MatchRecord);

    fn clear(&self);

    /// 撤回之前报告过的匹配。当前引擎只用 clear + add，保留给增量搜索。
    fn revoke(&self, record: &MatchRecord);

    fn failed(&self, _resource: &Resource, _error: &ResourceError) {}

    fn finished(&self, _stats: WalkStats) {}
}

impl<S: ResultSink + ?Sized> ResultSink for Arc<S> {
    fn add(&self, record: MatchRecord) {
        (**self).add(record)
    }

    fn clear(&self) {
        (**self).clear()
    }

    fn revoke(&self, record: &MatchRecord) {
        (**self).revoke(record)
    }

    fn failed(&self, resource: &Resource, error: &ResourceError) {
        (**self).failed(resource, error)
    }

    fn finished(&self, stats: WalkStats) {
        (**self).finished(stats)
    }
}

/// `ChannelSink` 发出的消息
#[derive(Debug, Clone)]
pub enum SearchMessage {
    Add(MatchRecord),
    Clear,
    Revoke(MatchRecord),
    Failed { resource: Resource, message: String },
    Finished(WalkStats),
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/search.rs"]
mod tests;
