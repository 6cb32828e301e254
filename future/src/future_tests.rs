use super::{AlreadySettled, Future, Reason};

#[test]
fn unresolved_future_is_not_done() {
    let f = Future::new("f1");
    let (done, reason) = f.result();
    assert!(!done);
    assert!(reason.is_none());
}

#[test]
fn complete_resolves_without_a_reason() {
    let f = Future::new("f1");
    f.complete().unwrap();
    let (done, reason) = f.result();
    assert!(done);
    assert!(reason.is_none());
}

#[test]
fn fail_resolves_with_a_reason() {
    let f = Future::new("f1");
    f.fail(Reason::new("boom")).unwrap();
    let (done, reason) = f.result();
    assert!(done);
    assert_eq!(reason.unwrap().to_string(), "boom");
}

#[test]
fn clones_share_state() {
    let f = Future::new("f1");
    let g = f.clone();
    g.complete().unwrap();
    assert!(f.result().0);
}

#[test]
fn reason_is_cheaply_shared_across_clones() {
    let reason = Reason::new("shared failure");
    let a = Future::new("a");
    let b = Future::new("b");
    a.fail(reason.clone()).unwrap();
    b.fail(reason.clone()).unwrap();
    assert_eq!(a.result().1, b.result().1);
}

#[test]
fn completing_twice_fails_with_already_settled() {
    let f = Future::new("f1");
    f.complete().unwrap();
    assert_eq!(f.complete(), Err(AlreadySettled));
}

#[test]
fn failing_an_already_completed_future_fails_with_already_settled() {
    let f = Future::new("f1");
    f.complete().unwrap();
    assert_eq!(f.fail(Reason::new("boom")), Err(AlreadySettled));
}
