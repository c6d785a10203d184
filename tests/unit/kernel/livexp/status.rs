use super::*;
use crate::kernel::livexp::LiveVariable;
use std::sync::{mpsc, Mutex};

fn create_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

struct ChannelStatus {
    tx: Mutex<mpsc::Sender<ValidationResult>>,
}

impl StatusSink for ChannelStatus {
    fn update_status(&self, status: &ValidationResult) {
        let _ = self.tx.lock().unwrap().send(status.clone());
    }
}

fn status_sink() -> (Arc<ChannelStatus>, mpsc::Receiver<ValidationResult>) {
    let (tx, rx) = mpsc::channel();
    (Arc::new(ChannelStatus { tx: Mutex::new(tx) }), rx)
}

#[test]
fn test_transient_states_are_coalesced() {
    let rt = create_runtime();
    let field = LiveVariable::new(ValidationResult::ok());
    let (sink, rx) = status_sink();

    let updater = StatusUpdater::attach(
        rt.handle().clone(),
        Duration::from_millis(100),
        &field.expression(),
        sink,
    );

    field.set(ValidationResult::error("half typed"));
    field.set(ValidationResult::warning("almost"));
    field.set(ValidationResult::ok());
    assert!(updater.is_pending());

    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        ValidationResult::ok()
    );
    assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
}

#[test]
fn test_separate_changes_are_delivered() {
    let rt = create_runtime();
    let field = LiveVariable::new(ValidationResult::ok());
    let (sink, rx) = status_sink();

    let _updater = StatusUpdater::attach(
        rt.handle().clone(),
        Duration::from_millis(20),
        &field.expression(),
        sink,
    );
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        ValidationResult::ok()
    );

    field.set(ValidationResult::error("bad"));
    assert_eq!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        ValidationResult::error("bad")
    );
}

#[test]
fn test_detach_drops_pending_update() {
    let rt = create_runtime();
    let field = LiveVariable::new(ValidationResult::ok());
    let (sink, rx) = status_sink();

    let mut updater = StatusUpdater::attach(
        rt.handle().clone(),
        Duration::from_millis(50),
        &field.expression(),
        sink,
    );
    field.set(ValidationResult::error("bad"));
    updater.detach();

    assert_eq!(field.expression().listener_count(), 0);
    assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
}
