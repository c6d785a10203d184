//! 基于 channel 的 ResultSink
//!
//! worker 线程只往 channel 里发消息，消费方在自己的线程里 drain，
//! 两边不共享任何可变结构。

use crate::kernel::services::ports::{
    MatchRecord, Resource, ResourceError, ResultSink, SearchMessage, WalkStats,
};
use std::sync::mpsc::{self, Receiver, SyncSender};

pub struct ChannelSink {
    tx: SyncSender<SearchMessage>,
}

impl ChannelSink {
    pub fn new(tx: SyncSender<SearchMessage>) -> Self {
        Self { tx }
    }

    pub fn channel(capacity: usize) -> (Self, Receiver<SearchMessage>) {
        let (tx, rx) = mpsc::sync_channel(capacity);
        (Self::new(tx), rx)
    }

    fn send(&self, msg: SearchMessage) {
        // 接收端已经关闭说明会话结束了，丢弃即可
        let _ = self.tx.send(msg);
    }
}

impl ResultSink for ChannelSink {
    fn add(&self, record: MatchRecord) {
        self.send(SearchMessage::Add(record));
    }

    fn clear(&self) {
        self.send(SearchMessage::Clear);
    }

    fn revoke(&self, record: &MatchRecord) {
        self.send(SearchMessage::Revoke(record.clone()));
    }

    fn failed(&self, resource: &Resource, error: &ResourceError) {
        self.send(SearchMessage::Failed {
            resource: resource.clone(),
            message: error.to_string(),
        });
    }

    fn finished(&self, stats: WalkStats) {
        self.send(SearchMessage::Finished(stats));
    }
}
