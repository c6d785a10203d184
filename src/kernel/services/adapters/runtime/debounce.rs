//! 单槽延迟任务
//!
//! 已经有计时器在等待时，新的请求只替换 payload，不会再起一个计时器；
//! 到点时交付的是最新的 payload。

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

struct PendingSlot<T> {
    payload: Option<T>,
    armed: bool,
}

pub struct Debouncer<T> {
    runtime: tokio::runtime::Handle,
    delay: Duration,
    slot: Arc<Mutex<PendingSlot<T>>>,
    action: Arc<dyn Fn(T) + Send + Sync>,
}

fn lock<T>(slot: &Mutex<PendingSlot<T>>) -> MutexGuard<'_, PendingSlot<T>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(
        runtime: tokio::runtime::Handle,
        delay: Duration,
        action: impl Fn(T) + Send + Sync + 'static,
    ) -> Self {
        Self {
            runtime,
            delay,
            slot: Arc::new(Mutex::new(PendingSlot {
                payload: None,
                armed: false,
            })),
            action: Arc::new(action),
        }
    }

    pub fn schedule(&self, payload: T) {
        let mut slot = lock(&self.slot);
        slot.payload = Some(payload);
        if slot.armed {
            return;
        }
        slot.armed = true;
        drop(slot);

        let slot = self.slot.clone();
        let action = self.action.clone();
        let delay = self.delay;
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let payload = {
                let mut slot = lock(&slot);
                slot.armed = false;
                slot.payload.take()
            };
            if let Some(payload) = payload {
                action(payload);
            }
        });
    }

    pub fn is_pending(&self) -> bool {
        let slot = lock(&self.slot);
        slot.armed && slot.payload.is_some()
    }

    /// 丢弃待交付的 payload，计时器到点后什么也不做
    pub fn cancel(&self) {
        lock(&self.slot).payload = None;
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime/debounce.rs"]
mod tests;
