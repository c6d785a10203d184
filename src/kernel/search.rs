//! 搜索结果缓冲
//!
//! 引擎 worker 往这里写，UI 线程在刷新时读取快照。
//! 每次变化都会请求一次刷新，由 Debouncer 合并成一次通知。

use crate::kernel::services::adapters::Debouncer;
use crate::kernel::services::ports::{MatchRecord, ResultSink};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub struct ResultBuffer {
    items: Mutex<Vec<MatchRecord>>,
    refresh: Debouncer<()>,
}

impl ResultBuffer {
    pub fn new(
        runtime: tokio::runtime::Handle,
        delay: Duration,
        on_refresh: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            refresh: Debouncer::new(runtime, delay, move |()| on_refresh()),
        }
    }

    fn lock_items(&self) -> MutexGuard<'_, Vec<MatchRecord>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, record: MatchRecord) {
        self.lock_items().push(record);
        self.schedule_refresh();
    }

    /// 删除第一个相等的记录
    pub fn remove(&self, record: &MatchRecord) -> bool {
        let removed = {
            let mut items = self.lock_items();
            match items.iter().position(|r| r == record) {
                Some(index) => {
                    items.remove(index);
                    true
                }
                None => false,
            }
        };
        if removed {
            self.schedule_refresh();
        }
        removed
    }

    pub fn reset(&self) {
        self.lock_items().clear();
        self.schedule_refresh();
    }

    pub fn size(&self) -> usize {
        self.lock_items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn at(&self, index: usize) -> Option<MatchRecord> {
        self.lock_items().get(index).cloned()
    }

    pub fn snapshot(&self) -> Vec<MatchRecord> {
        self.lock_items().clone()
    }

    pub fn schedule_refresh(&self) {
        self.refresh.schedule(());
    }

    pub fn refresh_pending(&self) -> bool {
        self.refresh.is_pending()
    }
}

impl ResultSink for ResultBuffer {
    fn add(&self, record: MatchRecord) {
        ResultBuffer::add(self, record);
    }

    fn clear(&self) {
        self.reset();
    }

    fn revoke(&self, record: &MatchRecord) {
        self.remove(record);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/search.rs"]
mod tests;
