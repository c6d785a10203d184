use super::*;
use crate::kernel::livexp::LiveVariable;
use std::cell::Cell;
use std::rc::Rc;

fn create_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

struct CountingHandler {
    calls: Rc<Cell<usize>>,
    fail: bool,
}

impl OkHandler for CountingHandler {
    fn perform_ok(&self) -> Result<(), Box<dyn Error>> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err("disk full".into());
        }
        Ok(())
    }
}

fn handler(fail: bool) -> (Box<dyn OkHandler>, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    (
        Box::new(CountingHandler {
            calls: calls.clone(),
            fail,
        }),
        calls,
    )
}

fn wait_for(condition: impl Fn() -> bool) {
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(std::time::Instant::now() < deadline, "condition never held");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_construction_failure_uses_fallback_sections() {
    let rt = create_runtime();
    let (handler, calls) = handler(false);

    let mut dialog = DialogWithSections::build(
        rt.handle().clone(),
        "New Project",
        handler,
        Duration::from_millis(10),
        || Err::<Sections, _>("template missing"),
    );

    assert_eq!(dialog.construction_error(), Some("template missing"));
    assert_eq!(dialog.sections().len(), 2);
    let comment = dialog.sections()[0].comment().unwrap();
    assert!(comment.starts_with("Dialog couldn't be created because of an unexpected error:\n"));
    assert!(comment.contains("template missing"));
    assert!(comment.ends_with("Check the error log for details"));

    assert_eq!(dialog.validation(), ValidationResult::error("template missing"));
    assert!(!dialog.status().confirm_enabled());
    assert_eq!(dialog.status().message(), "template missing");

    assert!(!dialog.click_ok());
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_confirm_follows_validation() {
    let rt = create_runtime();
    let (handler, calls) = handler(false);
    let field = LiveVariable::new(ValidationResult::error("Name is required"));
    let validator = field.expression();

    let mut dialog = DialogWithSections::build(
        rt.handle().clone(),
        "Rename",
        handler,
        Duration::from_millis(10),
        move || {
            Ok::<_, String>(vec![
                Box::new(CommentSection::new("Choose a new name")) as Box<dyn PageSection>,
                Box::new(ValidatorSection::new(validator)),
            ])
        },
    );

    assert!(dialog.construction_error().is_none());
    assert_eq!(dialog.title(), "Rename");
    assert!(!dialog.click_ok());

    field.set(ValidationResult::warning("Name is unusual"));
    wait_for(|| dialog.status().confirm_enabled());
    assert_eq!(dialog.status().severity(), Severity::Warning);
    assert_eq!(dialog.status().message(), "Name is unusual");

    assert!(dialog.click_ok());
    assert_eq!(calls.get(), 1);
    assert!(dialog.ok_error().is_none());

    field.set(ValidationResult::ok());
    wait_for(|| dialog.status().severity() == Severity::Ok);
    assert_eq!(dialog.status().message(), "");
}

#[test]
fn test_failed_confirm_is_recorded() {
    let rt = create_runtime();
    let (handler, calls) = handler(true);

    let mut dialog = DialogWithSections::build(
        rt.handle().clone(),
        "Export",
        handler,
        Duration::from_millis(10),
        || {
            Ok::<Sections, String>(vec![
                Box::new(CommentSection::new("Ready")) as Box<dyn PageSection>
            ])
        },
    );

    assert!(dialog.click_ok());
    assert_eq!(calls.get(), 1);
    assert_eq!(dialog.ok_error(), Some("disk full"));
}

#[test]
fn test_dispose_detaches_sections() {
    let rt = create_runtime();
    let (handler, _calls) = handler(false);
    let field = LiveVariable::new(ValidationResult::ok());
    let validator = field.expression();

    let mut dialog = DialogWithSections::build(
        rt.handle().clone(),
        "Dispose",
        handler,
        Duration::from_millis(10),
        move || {
            Ok::<Sections, String>(vec![
                Box::new(ValidatorSection::new(validator)) as Box<dyn PageSection>
            ])
        },
    );
    assert_eq!(field.expression().listener_count(), 1);

    dialog.dispose();
    assert_eq!(field.expression().listener_count(), 0);
}
