//! Short-lived child stores wired to a long-lived parent.

use std::sync::Arc;

use relay::Request;

use crate::fixtures::{child_store, parent_store, CounterAction};

/// Per-session children must leave no subscription behind once detached.
#[test]
fn detached_sessions_do_not_leak_subscriptions() {
    let parent = parent_store();

    for session in 1..=8u32 {
        let (child, _interceptor) = child_store(&parent).unwrap();
        assert_eq!(parent.subscriber_count(), 1);

        child.dispatch(Request::local(CounterAction::Foo)).unwrap();
        assert_eq!(child.state().foos.count, session);

        assert_eq!(child.detach(), 1);
        assert_eq!(parent.subscriber_count(), 0);
    }

    assert_eq!(parent.state().foos.count, 8);
}

/// A child dropped without detaching is cleaned up on the next parent change.
#[test]
fn dropped_session_leaves_parent_usable() {
    let parent = parent_store();
    let (child, interceptor) = child_store(&parent).unwrap();
    drop(child);

    parent.dispatch(CounterAction::Foo).unwrap();
    assert_eq!(parent.state().foos.count, 1);
    assert_eq!(parent.subscriber_count(), 0);
    assert!(!interceptor.detach());
}

/// Nothing but the parent survives an abandoned session.
#[test]
fn abandoned_session_unsubscribes_itself() {
    let parent = parent_store();
    let (child, interceptor) = child_store(&parent).unwrap();
    drop(child);
    drop(interceptor);
    assert_eq!(parent.subscriber_count(), 1);

    parent.dispatch(CounterAction::Bar).unwrap();
    assert_eq!(parent.subscriber_count(), 0);
    assert_eq!(Arc::strong_count(&parent), 1);
}

/// Two independent children of the same parent both track it.
#[test]
fn sibling_children_mirror_independently() {
    let parent = parent_store();
    let (left, _left_wiring) = child_store(&parent).unwrap();
    let (right, _right_wiring) = child_store(&parent).unwrap();

    left.dispatch(Request::local(CounterAction::Foo)).unwrap();
    right.dispatch(Request::local(CounterAction::Bar)).unwrap();

    assert_eq!(left.state().foos.count, 1);
    assert_eq!(right.state().foos.count, 1);
    assert_eq!(right.state().bars.count, 1);
    assert_eq!(left.state().bars.count, 0);
    assert!(!Arc::ptr_eq(&left.state(), &right.state()));
}
