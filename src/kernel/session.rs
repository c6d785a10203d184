//! 一次快速搜索会话
//!
//! 把输入框文本变成查询，持有引擎和结果缓冲，刷新时维护选中项。
//! 引擎写入缓冲后由 Debouncer 合并刷新，通过 channel 通知调用方。

use crate::core::Service;
use crate::kernel::search::ResultBuffer;
use crate::kernel::services::adapters::{QueryModel, SearchEngine};
use crate::kernel::services::ports::{MatchRecord, ResourceTree, SearchConfig, TextRange};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

/// 刷新之后的列表状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionView {
    pub count: usize,
    pub selection: Option<usize>,
}

pub struct QuickSearchSession {
    engine: SearchEngine,
    buffer: Arc<ResultBuffer>,
    tree: Arc<dyn ResourceTree>,
    started: bool,
    initial_pattern: Option<String>,
    selected: Option<MatchRecord>,
}

impl QuickSearchSession {
    /// 返回的 Receiver 在每次（合并后的）刷新时收到一个 `()`
    pub fn new(
        runtime: tokio::runtime::Handle,
        tree: Arc<dyn ResourceTree>,
        config: &SearchConfig,
    ) -> (Self, Receiver<()>) {
        let (tx, rx) = mpsc::sync_channel(1);
        let buffer = Arc::new(ResultBuffer::new(
            runtime.clone(),
            config.refresh_delay(),
            move || {
                // 已经有一个没处理的刷新就够了
                let _ = tx.try_send(());
            },
        ));
        let engine = SearchEngine::new(runtime, config);

        (
            Self {
                engine,
                buffer,
                tree,
                started: false,
                initial_pattern: None,
                selected: None,
            },
            rx,
        )
    }

    /// 输入框文本变化
    ///
    /// 第一个非空模式启动遍历，之后的变化都交给 `set_query`。
    /// 文本与当前查询相同时什么也不做。
    pub fn set_pattern(&mut self, text: &str) {
        let query = Arc::new(QueryModel::new(text));
        if self.engine.query().is_some_and(|current| *current == *query) {
            return;
        }

        if self.started {
            self.engine.set_query(query);
            return;
        }
        if query.is_trivial() {
            return;
        }

        tracing::debug!(pattern = text, "quick search started");
        self.engine.start(query, self.tree.clone(), self.buffer.clone());
        self.started = true;
    }

    pub fn set_initial_pattern(&mut self, text: &str) {
        self.initial_pattern = Some(text.to_string());
        self.set_pattern(text);
    }

    pub fn initial_pattern(&self) -> Option<&str> {
        self.initial_pattern.as_deref()
    }

    /// 重新读取缓冲：之前的选中项还在就保留，否则选中第一项
    pub fn refresh(&mut self) -> SessionView {
        let items = self.buffer.snapshot();
        let kept = self
            .selected
            .as_ref()
            .and_then(|selected| items.iter().position(|r| r == selected));

        let selection = match kept {
            Some(index) => Some(index),
            None if !items.is_empty() => Some(0),
            None => None,
        };
        self.selected = selection.and_then(|i| items.get(i).cloned());

        SessionView {
            count: items.len(),
            selection,
        }
    }

    pub fn select(&mut self, index: usize) -> bool {
        match self.buffer.at(index) {
            Some(record) => {
                self.selected = Some(record);
                true
            }
            None => false,
        }
    }

    pub fn selected(&self) -> Option<&MatchRecord> {
        self.selected.as_ref()
    }

    pub fn item(&self, index: usize) -> Option<MatchRecord> {
        self.buffer.at(index)
    }

    pub fn len(&self) -> usize {
        self.buffer.size()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn results(&self) -> Vec<MatchRecord> {
        self.buffer.snapshot()
    }

    /// 用当前查询重新计算高亮，结果可能来自更早的查询
    pub fn highlight(&self, record: &MatchRecord) -> Vec<TextRange> {
        self.engine
            .query()
            .map(|query| query.find_matches(&record.line_text))
            .unwrap_or_default()
    }

    pub fn query(&self) -> Option<Arc<QueryModel>> {
        self.engine.query()
    }

    pub fn is_busy(&self) -> bool {
        self.engine.is_busy()
    }

    /// 确认当前选中项，结束搜索
    pub fn confirm(&mut self) -> Option<MatchRecord> {
        let selected = self.selected.clone();
        if selected.is_some() {
            self.engine.cancel();
        }
        selected
    }

    pub fn cancel(&self) {
        self.engine.cancel();
    }
}

impl Service for QuickSearchSession {
    fn name(&self) -> &'static str {
        "QuickSearchSession"
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/session.rs"]
mod tests;
