use super::expression::{LiveExpression, Subscription};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// 严重程度，`Error > Warning > Ok`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    #[default]
    Ok,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    pub severity: Severity,
    pub message: String,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.severity == Severity::Ok
    }

    /// Error 级别会禁用确认按钮
    pub fn blocks_confirm(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Ok => write!(f, "OK"),
            Severity::Warning => write!(f, "WARNING: {}", self.message),
            Severity::Error => write!(f, "ERROR: {}", self.message),
        }
    }
}

pub type Validator = LiveExpression<ValidationResult>;

pub fn always_error(message: impl Into<String>) -> Validator {
    LiveExpression::constant(ValidationResult::error(message))
}

pub fn constant(result: ValidationResult) -> Validator {
    LiveExpression::constant(result)
}

/// 从任意表达式派生校验器，`source` 变化时重新校验
pub fn validator_from<S, F>(source: &LiveExpression<S>, check: F) -> Validator
where
    S: Clone + PartialEq + 'static,
    F: Fn(&S) -> ValidationResult + 'static,
{
    let input = source.clone();
    let validator = LiveExpression::computed(move || check(&input.get()));
    validator.depends_on(source);
    validator
}

fn worst_of(children: &[Validator]) -> ValidationResult {
    let mut worst: Option<ValidationResult> = None;
    for child in children {
        let result = child.get();
        // 严格大于：同级时先注册的胜出
        if worst.as_ref().map_or(true, |w| result.severity > w.severity) {
            worst = Some(result);
        }
    }
    worst.unwrap_or_default()
}

/// 子校验器中最严重的结果；没有子校验器时为 Ok
pub struct CompositeValidator {
    expression: Validator,
    children: Rc<RefCell<Vec<Validator>>>,
    links: RefCell<Vec<(Validator, Subscription)>>,
}

impl CompositeValidator {
    pub fn new() -> Self {
        let children: Rc<RefCell<Vec<Validator>>> = Rc::new(RefCell::new(Vec::new()));
        let snapshot = children.clone();
        let expression = LiveExpression::computed(move || {
            let children = snapshot.borrow().clone();
            worst_of(&children)
        });

        Self {
            expression,
            children,
            links: RefCell::new(Vec::new()),
        }
    }

    pub fn add_child(&self, child: &Validator) {
        self.children.borrow_mut().push(child.clone());
        let subscription = self.expression.depends_on(child);
        self.links.borrow_mut().push((child.clone(), subscription));
    }

    pub fn len(&self) -> usize {
        self.children.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self) -> ValidationResult {
        self.expression.get()
    }

    pub fn validator(&self) -> Validator {
        self.expression.clone()
    }

    /// 断开与所有子校验器的联系，之后子校验器的变化不再传播
    pub fn dispose(&self) {
        for (child, subscription) in self.links.borrow_mut().drain(..) {
            child.unsubscribe(subscription);
        }
    }
}

impl Default for CompositeValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/livexp/validator.rs"]
mod tests;
