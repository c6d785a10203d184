//! Headless search core (engine, buffering, validation).

pub mod dialog;
pub mod livexp;
pub mod search;
pub mod services;
pub mod session;

pub use dialog::{
    CommentSection, DialogContent, DialogStatus, DialogWithSections, OkHandler, PageSection,
    Sections, ValidatorSection,
};
pub use livexp::{
    CompositeValidator, LiveExpression, LiveVariable, Severity, StatusSink, StatusUpdater,
    Subscription, ValidationResult, Validator,
};
pub use search::ResultBuffer;
pub use session::{QuickSearchSession, SessionView};
