//! 把校验结果延迟推送给 UI
//!
//! 短时间内连续变化只会推送一次，推送的是到点时的最新值，
//! 这样自我修正的中间状态不会闪现给用户。

use super::expression::Subscription;
use super::validator::{ValidationResult, Validator};
use crate::kernel::services::adapters::Debouncer;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

pub trait StatusSink: Send + Sync {
    fn update_status(&self, status: &ValidationResult);
}

pub struct StatusUpdater {
    validator: Validator,
    subscription: Option<Subscription>,
    debouncer: Rc<Debouncer<ValidationResult>>,
}

impl StatusUpdater {
    pub fn attach(
        runtime: tokio::runtime::Handle,
        delay: Duration,
        validator: &Validator,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        let debouncer = Rc::new(Debouncer::new(runtime, delay, move |status: ValidationResult| {
            sink.update_status(&status)
        }));

        let pending = debouncer.clone();
        let subscription = validator.subscribe(move |status: &ValidationResult| {
            pending.schedule(status.clone());
        });

        Self {
            validator: validator.clone(),
            subscription: Some(subscription),
            debouncer,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// 停止监听，丢弃尚未推送的状态
    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.validator.unsubscribe(subscription);
        }
        self.debouncer.cancel();
    }
}

impl Drop for StatusUpdater {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/livexp/status.rs"]
mod tests;
