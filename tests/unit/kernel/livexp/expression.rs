use super::*;

fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl Fn(&T) + 'static) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    (seen, move |value: &T| sink.borrow_mut().push(value.clone()))
}

#[test]
fn test_subscribe_delivers_current_value() {
    let variable = LiveVariable::new(1);
    let (seen, listener) = recorder::<i32>();

    variable.expression().subscribe(listener);
    assert_eq!(*seen.borrow(), vec![1]);
}

#[test]
fn test_notifies_only_on_change() {
    let variable = LiveVariable::new("a".to_string());
    let (seen, listener) = recorder::<String>();
    variable.expression().subscribe(listener);

    variable.set("a".to_string());
    variable.set("b".to_string());
    variable.set("b".to_string());
    variable.set("a".to_string());

    assert_eq!(*seen.borrow(), vec!["a", "b", "a"]);
    assert_eq!(variable.get(), "a");
}

#[test]
fn test_unsubscribe_returns_listener_once() {
    let variable = LiveVariable::new(0);
    let expression = variable.expression();
    let (seen, listener) = recorder::<i32>();

    let subscription = expression.subscribe(listener);
    assert_eq!(expression.listener_count(), 1);

    assert!(expression.unsubscribe(subscription).is_some());
    assert!(expression.unsubscribe(subscription).is_none());

    variable.set(5);
    assert_eq!(*seen.borrow(), vec![0]);
}

#[test]
fn test_computed_is_lazy_without_listeners() {
    let variable = LiveVariable::new(2);
    let calls = Rc::new(Cell::new(0));

    let source = variable.expression();
    let counter = calls.clone();
    let doubled = LiveExpression::computed(move || {
        counter.set(counter.get() + 1);
        source.get() * 2
    });
    doubled.depends_on(&variable.expression());
    assert_eq!(calls.get(), 1);

    variable.set(3);
    variable.set(4);
    assert!(doubled.is_stale());
    assert_eq!(calls.get(), 1);

    assert_eq!(doubled.get(), 8);
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_dependent_refreshes_when_observed() {
    let variable = LiveVariable::new(1);
    let source = variable.expression();
    let parity = LiveExpression::computed(move || source.get() % 2 == 0);
    parity.depends_on(&variable.expression());

    let (seen, listener) = recorder::<bool>();
    parity.subscribe(listener);

    variable.set(3);
    variable.set(4);
    variable.set(6);
    variable.set(7);

    assert_eq!(*seen.borrow(), vec![false, true, false]);
}

#[test]
fn test_refresh_without_change_is_silent() {
    let expression = LiveExpression::constant(10);
    let (seen, listener) = recorder::<i32>();
    expression.subscribe(listener);

    expression.refresh();
    expression.invalidate();
    assert_eq!(*seen.borrow(), vec![10]);
}

#[test]
fn test_panicking_listener_is_isolated() {
    let variable = LiveVariable::new(0);
    let expression = variable.expression();

    expression.subscribe(|value: &i32| {
        if *value > 0 {
            panic!("listener failure");
        }
    });
    let (seen, listener) = recorder::<i32>();
    expression.subscribe(listener);

    variable.set(1);
    variable.set(2);

    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    assert_eq!(expression.get(), 2);
    assert_eq!(expression.listener_count(), 2);
}

#[test]
fn test_listener_may_unsubscribe_itself() {
    let variable = LiveVariable::new(0);
    let expression = variable.expression();
    let slot: Rc<Cell<Option<Subscription>>> = Rc::new(Cell::new(None));

    let target = expression.clone();
    let own = slot.clone();
    let subscription = expression.subscribe(move |value: &i32| {
        if *value == 1 {
            if let Some(key) = own.get() {
                target.unsubscribe(key);
            }
        }
    });
    slot.set(Some(subscription));

    variable.set(1);
    assert_eq!(expression.listener_count(), 0);
}
