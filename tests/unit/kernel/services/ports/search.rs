use super::*;
use std::path::PathBuf;

fn resource(id: &str) -> Resource {
    Resource::new(id, PathBuf::from("/root").join(id))
}

#[test]
fn test_text_range_slice() {
    let line = "alpha beta";
    let range = TextRange::new(6, 4);
    assert_eq!(range.end(), 10);
    assert_eq!(range.slice(line), Some("beta"));
    assert_eq!(TextRange::new(8, 5).slice(line), None);
}

#[test]
fn test_match_record_equality_ignores_ranges() {
    let a = MatchRecord::new(resource("a.txt"), 2, "foo bar".into(), vec![TextRange::new(0, 3)]);
    let b = MatchRecord::new(resource("a.txt"), 2, "foo bar".into(), vec![TextRange::new(4, 3)]);
    assert_eq!(a, b);

    let other_line = MatchRecord::new(resource("a.txt"), 3, "foo bar".into(), Vec::new());
    let other_resource = MatchRecord::new(resource("b.txt"), 2, "foo bar".into(), Vec::new());
    assert_ne!(a, other_line);
    assert_ne!(a, other_resource);
}

#[test]
fn test_line_label() {
    let record = MatchRecord::new(resource("a.txt"), 42, "x".into(), Vec::new());
    assert_eq!(record.line_label(), "42");
    assert_eq!(record.resource_id().as_str(), "a.txt");
}

#[derive(Default)]
struct CountingSink {
    adds: std::sync::Mutex<usize>,
}

impl ResultSink for CountingSink {
    fn add(&self, _record: MatchRecord) {
        *self.adds.lock().unwrap() += 1;
    }

    fn clear(&self) {
        *self.adds.lock().unwrap() = 0;
    }

    fn revoke(&self, _record: &MatchRecord) {}
}

#[test]
fn test_arc_sink_forwards() {
    let sink = Arc::new(CountingSink::default());
    let shared: Arc<dyn ResultSink> = Arc::new(sink.clone());
    shared.add(MatchRecord::new(resource("a.txt"), 1, "x".into(), Vec::new()));
    shared.add(MatchRecord::new(resource("a.txt"), 2, "x".into(), Vec::new()));
    assert_eq!(*sink.adds.lock().unwrap(), 2);

    shared.clear();
    assert_eq!(*sink.adds.lock().unwrap(), 0);
}
