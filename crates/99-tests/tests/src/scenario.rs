//! Counter scenario: parent tracks `foos`, child forwards `Foo` upward.

use std::sync::Arc;

use parking_lot::Mutex;
use relay::Request;
use store::{Middleware, Next, Store, StoreResult};

use crate::fixtures::{
    child_store, parent_store, root_reducer, ChildStore, CounterAction, ParentStore, State,
};

struct Recorder(Arc<Mutex<Vec<CounterAction>>>);

impl Middleware<State, CounterAction> for Recorder {
    fn handle(
        &self,
        request: CounterAction,
        next: Next<'_, State, CounterAction>,
    ) -> StoreResult<Arc<State>> {
        self.0.lock().push(request);
        next.run(request)
    }
}

fn wired() -> (Arc<ParentStore>, Arc<ChildStore>) {
    let parent = parent_store();
    let (child, _interceptor) = child_store(&parent).unwrap();
    (parent, child)
}

#[test]
fn forwards_messages_to_parent() {
    let dispatched = Arc::new(Mutex::new(Vec::new()));
    let parent = Store::builder(root_reducer)
        .default_state()
        .middleware(Arc::new(Recorder(Arc::clone(&dispatched))))
        .build()
        .unwrap();
    let (child, _interceptor) = child_store(&parent).unwrap();

    child.dispatch(Request::local(CounterAction::Foo)).unwrap();
    child.dispatch(Request::local(CounterAction::Bar)).unwrap();

    assert_eq!(*dispatched.lock(), vec![CounterAction::Foo]);
}

#[test]
fn does_not_forward_other_messages() {
    let (parent, child) = wired();

    child.dispatch(Request::local(CounterAction::Bar)).unwrap();

    assert_eq!(parent.state().bars.count, 0);
    assert_eq!(child.state().bars.count, 1);
}

#[test]
fn copies_parent_value_to_child() {
    let (parent, child) = wired();

    parent.dispatch(CounterAction::Foo).unwrap();
    parent.dispatch(CounterAction::Foo).unwrap();

    assert_eq!(parent.state().foos.count, 2);
    assert_eq!(child.state().foos.count, 2);
}

#[test]
fn copies_parent_value_to_child_and_forwards() {
    let (parent, child) = wired();

    parent.dispatch(CounterAction::Foo).unwrap();
    child.dispatch(Request::local(CounterAction::Foo)).unwrap();
    parent.dispatch(CounterAction::Foo).unwrap();

    assert_eq!(child.state().foos.count, 3);
}

#[test]
fn does_not_cause_unnecessary_updates() {
    let (parent, child) = wired();
    parent.dispatch(CounterAction::Foo).unwrap();

    let original = child.state();
    parent.dispatch(CounterAction::Bar).unwrap();
    assert!(Arc::ptr_eq(&original, &child.state()));

    parent.dispatch(CounterAction::Foo).unwrap();
    assert!(!Arc::ptr_eq(&original, &child.state()));
}

/// The full walk-through: two parent foos, an untracked bar, then a
/// forwarded foo from the child.
#[test]
fn parent_child_walkthrough() {
    let (parent, child) = wired();
    assert_eq!(*parent.state(), State::default());

    parent.dispatch(CounterAction::Foo).unwrap();
    parent.dispatch(CounterAction::Foo).unwrap();
    assert_eq!(child.state().foos.count, 2);

    let before_bar = child.state();
    parent.dispatch(CounterAction::Bar).unwrap();
    assert!(Arc::ptr_eq(&before_bar, &child.state()));
    assert_eq!(parent.state().bars.count, 1);
    assert_eq!(child.state().bars.count, 0, "bars is not tracked");

    let after = child.dispatch(Request::local(CounterAction::Foo)).unwrap();
    assert_eq!(parent.state().foos.count, 3);
    assert_eq!(after.foos.count, 3);
    assert_eq!(child.state().foos.count, 3);
}
