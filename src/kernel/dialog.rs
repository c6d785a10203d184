//! 由多个 section 组成的对话框模型
//!
//! 只负责内容构建、校验聚合和确认按钮的可用性，不涉及渲染。
//! section 工厂只调用一次；失败时换成一个说明 section 加一个永远报错的校验器，
//! 用户看到的是明确的错误状态而不是一个半成品对话框。

use crate::kernel::livexp::{
    always_error, constant, CompositeValidator, Severity, StatusSink, StatusUpdater,
    ValidationResult, Validator,
};
use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub trait PageSection {
    fn validator(&self) -> Validator;

    /// 只读说明文字（没有则为 None）
    fn comment(&self) -> Option<&str> {
        None
    }

    fn dispose(&self) {}
}

pub struct CommentSection {
    text: String,
}

impl CommentSection {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl PageSection for CommentSection {
    fn validator(&self) -> Validator {
        constant(ValidationResult::ok())
    }

    fn comment(&self) -> Option<&str> {
        Some(self.text.as_str())
    }
}

pub struct ValidatorSection {
    validator: Validator,
}

impl ValidatorSection {
    pub fn new(validator: Validator) -> Self {
        Self { validator }
    }
}

impl PageSection for ValidatorSection {
    fn validator(&self) -> Validator {
        self.validator.clone()
    }
}

pub type Sections = Vec<Box<dyn PageSection>>;

pub enum DialogContent {
    Sections(Sections),
    ConstructionFailed { message: String },
}

impl DialogContent {
    pub fn resolve<E: fmt::Display>(factory: impl FnOnce() -> Result<Sections, E>) -> Self {
        match factory() {
            Ok(sections) => DialogContent::Sections(sections),
            Err(e) => {
                let message = e.to_string();
                tracing::error!(error = %message, "dialog sections could not be created");
                DialogContent::ConstructionFailed { message }
            }
        }
    }

    pub fn construction_error(&self) -> Option<&str> {
        match self {
            DialogContent::Sections(_) => None,
            DialogContent::ConstructionFailed { message } => Some(message),
        }
    }

    pub fn into_sections(self) -> Sections {
        match self {
            DialogContent::Sections(sections) => sections,
            DialogContent::ConstructionFailed { message } => {
                let comment = CommentSection::new(format!(
                    "Dialog couldn't be created because of an unexpected error:\n{}\n\nCheck the error log for details",
                    message
                ));
                let sections: Sections = vec![
                    Box::new(comment),
                    Box::new(ValidatorSection::new(always_error(message))),
                ];
                sections
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusView {
    message: String,
    severity: Severity,
    confirm_enabled: bool,
}

/// 对话框的消息栏和确认按钮状态
#[derive(Debug)]
pub struct DialogStatus {
    view: Mutex<StatusView>,
}

impl Default for DialogStatus {
    fn default() -> Self {
        Self {
            view: Mutex::new(StatusView {
                message: String::new(),
                severity: Severity::Ok,
                confirm_enabled: true,
            }),
        }
    }
}

impl DialogStatus {
    fn lock_view(&self) -> MutexGuard<'_, StatusView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn message(&self) -> String {
        self.lock_view().message.clone()
    }

    pub fn severity(&self) -> Severity {
        self.lock_view().severity
    }

    pub fn confirm_enabled(&self) -> bool {
        self.lock_view().confirm_enabled
    }
}

impl StatusSink for DialogStatus {
    fn update_status(&self, status: &ValidationResult) {
        let mut view = self.lock_view();
        view.message = if status.is_ok() {
            String::new()
        } else {
            status.message.clone()
        };
        view.severity = status.severity;
        view.confirm_enabled = !status.blocks_confirm();
    }
}

pub trait OkHandler {
    fn perform_ok(&self) -> Result<(), Box<dyn Error>>;
}

pub struct DialogWithSections {
    title: String,
    handler: Box<dyn OkHandler>,
    sections: Sections,
    construction_error: Option<String>,
    validator: CompositeValidator,
    status: Arc<DialogStatus>,
    updater: StatusUpdater,
    ok_error: Option<String>,
}

impl DialogWithSections {
    pub fn build<E: fmt::Display>(
        runtime: tokio::runtime::Handle,
        title: impl Into<String>,
        handler: Box<dyn OkHandler>,
        status_delay: Duration,
        factory: impl FnOnce() -> Result<Sections, E>,
    ) -> Self {
        let content = DialogContent::resolve(factory);
        let construction_error = content.construction_error().map(str::to_string);
        let sections = content.into_sections();

        let validator = CompositeValidator::new();
        for section in &sections {
            validator.add_child(&section.validator());
        }

        // 第一次状态同步设置，之后的变化走延迟推送
        let status = Arc::new(DialogStatus::default());
        status.update_status(&validator.get());
        let updater =
            StatusUpdater::attach(runtime, status_delay, &validator.validator(), status.clone());

        Self {
            title: title.into(),
            handler,
            sections,
            construction_error,
            validator,
            status,
            updater,
            ok_error: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn sections(&self) -> &[Box<dyn PageSection>] {
        &self.sections
    }

    pub fn construction_error(&self) -> Option<&str> {
        self.construction_error.as_deref()
    }

    /// 未经延迟的当前聚合结果
    pub fn validation(&self) -> ValidationResult {
        self.validator.get()
    }

    pub fn status(&self) -> &DialogStatus {
        &self.status
    }

    /// 模拟点击确认；按钮不可用时什么也不做并返回 false
    pub fn click_ok(&mut self) -> bool {
        if !self.status.confirm_enabled() {
            return false;
        }

        self.ok_error = match self.handler.perform_ok() {
            Ok(()) => None,
            Err(e) => {
                tracing::error!(title = %self.title, error = %e, "dialog confirm action failed");
                Some(e.to_string())
            }
        };
        true
    }

    /// 最近一次确认失败的错误信息
    pub fn ok_error(&self) -> Option<&str> {
        self.ok_error.as_deref()
    }

    pub fn dispose(&mut self) {
        self.updater.detach();
        self.validator.dispose();
        for section in &self.sections {
            section.dispose();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/dialog.rs"]
mod tests;
