use super::*;
use std::sync::mpsc;

fn create_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

#[test]
fn test_burst_delivers_latest_once() {
    let rt = create_runtime();
    let (tx, rx) = mpsc::channel();
    let debouncer = Debouncer::new(rt.handle().clone(), Duration::from_millis(50), move |v: u32| {
        let _ = tx.send(v);
    });

    for i in 0..10 {
        debouncer.schedule(i);
    }
    assert!(debouncer.is_pending());

    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 9);
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    assert!(!debouncer.is_pending());
}

#[test]
fn test_spaced_requests_fire_separately() {
    let rt = create_runtime();
    let (tx, rx) = mpsc::channel();
    let debouncer = Debouncer::new(rt.handle().clone(), Duration::from_millis(20), move |v: &'static str| {
        let _ = tx.send(v);
    });

    debouncer.schedule("first");
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "first");

    debouncer.schedule("second");
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "second");
}

#[test]
fn test_cancel_drops_pending_payload() {
    let rt = create_runtime();
    let (tx, rx) = mpsc::channel();
    let debouncer = Debouncer::new(rt.handle().clone(), Duration::from_millis(30), move |v: u32| {
        let _ = tx.send(v);
    });

    debouncer.schedule(1);
    debouncer.cancel();
    assert!(!debouncer.is_pending());
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());

    // 取消之后还能继续使用
    debouncer.schedule(2);
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 2);
}
