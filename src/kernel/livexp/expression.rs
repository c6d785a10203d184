//! 响应式表达式
//!
//! - 缓存值 + stale 标记，`get()` 时按需重算
//! - 每个订阅者记住自己最后看到的值，只有值真的变了才通知
//! - 订阅时立即收到当前值
//! - 单线程（Rc/RefCell），不能跨线程共享

use slotmap::{new_key_type, SlotMap};
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

new_key_type! { pub struct Subscription; }

pub type Listener<T> = Rc<dyn Fn(&T)>;

struct ListenerEntry<T> {
    callback: Listener<T>,
    last_seen: Option<T>,
}

struct Inner<T> {
    value: RefCell<T>,
    stale: Cell<bool>,
    compute: RefCell<Option<Box<dyn FnMut() -> T>>>,
    listeners: RefCell<SlotMap<Subscription, ListenerEntry<T>>>,
}

impl<T: Clone + PartialEq + 'static> Inner<T> {
    fn recompute(&self) {
        // 取出闭包再调用，计算过程中允许读取其他表达式
        let Some(mut compute) = self.compute.borrow_mut().take() else {
            self.stale.set(false);
            return;
        };
        let value = compute();
        *self.compute.borrow_mut() = Some(compute);
        *self.value.borrow_mut() = value;
        self.stale.set(false);
    }

    fn current(&self) -> T {
        if self.stale.get() {
            self.recompute();
        }
        self.value.borrow().clone()
    }

    fn notify(&self, only: Option<Subscription>) {
        let value = self.current();
        let pending: Vec<Listener<T>> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners
                .iter_mut()
                .filter(|(key, _)| only.map_or(true, |k| k == *key))
                .filter_map(|(_, entry)| {
                    if entry.last_seen.as_ref() == Some(&value) {
                        return None;
                    }
                    entry.last_seen = Some(value.clone());
                    Some(entry.callback.clone())
                })
                .collect()
        };

        for callback in pending {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback(&value)));
            if outcome.is_err() {
                tracing::error!("live expression listener panicked, other listeners still notified");
            }
        }
    }

    fn invalidate(&self) {
        self.stale.set(true);
        if !self.listeners.borrow().is_empty() {
            self.notify(None);
        }
    }
}

pub struct LiveExpression<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for LiveExpression<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> LiveExpression<T> {
    fn with(value: T, compute: Option<Box<dyn FnMut() -> T>>) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                stale: Cell::new(false),
                compute: RefCell::new(compute),
                listeners: RefCell::new(SlotMap::with_key()),
            }),
        }
    }

    pub fn constant(value: T) -> Self {
        Self::with(value, None)
    }

    /// 由闭包计算的表达式，创建时先算一次
    pub fn computed(mut compute: impl FnMut() -> T + 'static) -> Self {
        let value = compute();
        Self::with(value, Some(Box::new(compute)))
    }

    pub fn get(&self) -> T {
        self.inner.current()
    }

    pub fn is_stale(&self) -> bool {
        self.inner.stale.get()
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let key = self.inner.listeners.borrow_mut().insert(ListenerEntry {
            callback: Rc::new(listener),
            last_seen: None,
        });
        self.inner.notify(Some(key));
        key
    }

    /// 取消订阅，返回被移除的监听器；重复取消返回 None
    pub fn unsubscribe(&self, subscription: Subscription) -> Option<Listener<T>> {
        self.inner
            .listeners
            .borrow_mut()
            .remove(subscription)
            .map(|entry| entry.callback)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// 重算并通知值有变化的订阅者
    pub fn refresh(&self) {
        self.inner.stale.set(true);
        self.inner.notify(None);
    }

    /// 标记为 stale；有订阅者时立即刷新，否则等下一次 get
    pub fn invalidate(&self) {
        self.inner.invalidate();
    }

    /// `source` 每次发布新值时本表达式都会失效
    pub fn depends_on<S: Clone + PartialEq + 'static>(
        &self,
        source: &LiveExpression<S>,
    ) -> Subscription {
        let target: Weak<Inner<T>> = Rc::downgrade(&self.inner);
        source.subscribe(move |_| {
            if let Some(target) = target.upgrade() {
                target.invalidate();
            }
        })
    }

    fn replace(&self, value: T) -> bool {
        let mut current = self.inner.value.borrow_mut();
        if *current == value {
            return false;
        }
        *current = value;
        true
    }
}

/// 可以直接赋值的表达式
pub struct LiveVariable<T> {
    expression: LiveExpression<T>,
}

impl<T: Clone + PartialEq + 'static> LiveVariable<T> {
    pub fn new(value: T) -> Self {
        Self {
            expression: LiveExpression::constant(value),
        }
    }

    pub fn set(&self, value: T) {
        if self.expression.replace(value) {
            self.expression.inner.notify(None);
        }
    }

    pub fn get(&self) -> T {
        self.expression.get()
    }

    pub fn expression(&self) -> LiveExpression<T> {
        self.expression.clone()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/livexp/expression.rs"]
mod tests;
