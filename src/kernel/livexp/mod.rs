//! 响应式校验
//!
//! - LiveExpression / LiveVariable: 带缓存、按值变化通知的表达式
//! - Validator / CompositeValidator: 取最严重结果的聚合
//! - StatusUpdater: 延迟推送到 UI

mod expression;
mod status;
mod validator;

pub use expression::{Listener, LiveExpression, LiveVariable, Subscription};
pub use status::{StatusSink, StatusUpdater};
pub use validator::{
    always_error, constant, validator_from, CompositeValidator, Severity, ValidationResult,
    Validator,
};
