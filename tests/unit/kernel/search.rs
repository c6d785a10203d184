use super::*;
use crate::kernel::services::ports::Resource;
use std::path::PathBuf;
use std::sync::mpsc;

fn create_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

fn record(id: &str, line: usize, text: &str) -> MatchRecord {
    MatchRecord::new(
        Resource::new(id, PathBuf::from("/").join(id)),
        line,
        text.to_string(),
        Vec::new(),
    )
}

fn buffer(rt: &tokio::runtime::Runtime, delay_ms: u64) -> (ResultBuffer, mpsc::Receiver<()>) {
    let (tx, rx) = mpsc::channel();
    let buffer = ResultBuffer::new(rt.handle().clone(), Duration::from_millis(delay_ms), move || {
        let _ = tx.send(());
    });
    (buffer, rx)
}

#[test]
fn test_add_and_access() {
    let rt = create_runtime();
    let (buffer, _rx) = buffer(&rt, 10);

    buffer.add(record("a.txt", 1, "one"));
    buffer.add(record("a.txt", 2, "two"));

    assert_eq!(buffer.size(), 2);
    assert_eq!(buffer.at(1).unwrap().line_text, "two");
    assert!(buffer.at(2).is_none());
    assert_eq!(buffer.snapshot().len(), 2);
}

#[test]
fn test_remove_first_equal_only() {
    let rt = create_runtime();
    let (buffer, _rx) = buffer(&rt, 10);

    buffer.add(record("a.txt", 1, "dup"));
    buffer.add(record("b.txt", 1, "other"));
    buffer.add(record("a.txt", 1, "dup"));

    assert!(buffer.remove(&record("a.txt", 1, "dup")));
    assert_eq!(buffer.size(), 2);
    assert_eq!(buffer.at(0).unwrap().resource_id().as_str(), "b.txt");

    assert!(!buffer.remove(&record("c.txt", 9, "missing")));
    assert_eq!(buffer.size(), 2);
}

#[test]
fn test_burst_of_changes_refreshes_once() {
    let rt = create_runtime();
    let (buffer, rx) = buffer(&rt, 50);

    for i in 0..100 {
        buffer.add(record("a.txt", i, "line"));
    }
    assert!(buffer.refresh_pending());

    rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    assert_eq!(buffer.size(), 100);
}

#[test]
fn test_spaced_changes_refresh_twice() {
    let rt = create_runtime();
    let (buffer, rx) = buffer(&rt, 20);

    buffer.add(record("a.txt", 1, "one"));
    rx.recv_timeout(Duration::from_secs(5)).unwrap();

    buffer.add(record("a.txt", 2, "two"));
    rx.recv_timeout(Duration::from_secs(5)).unwrap();
}

#[test]
fn test_sink_clear_and_revoke() {
    let rt = create_runtime();
    let (buffer, _rx) = buffer(&rt, 10);
    let sink: &dyn ResultSink = &buffer;

    sink.add(record("a.txt", 1, "one"));
    sink.add(record("a.txt", 2, "two"));
    sink.revoke(&record("a.txt", 1, "one"));
    assert_eq!(buffer.size(), 1);

    sink.clear();
    assert!(buffer.is_empty());
}
