use std::sync::Arc;

use anyhow::Result;
use relay::{reduce_mirrored, Action, ForwardingInterceptor, MirrorTarget, Request};
use store::Store;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Count {
    pub count: u32,
}

/// Counter state used by both sides of the wiring.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
    pub foos: Count,
    pub bars: Count,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CounterAction {
    Foo,
    Bar,
}

impl Action for CounterAction {
    type Kind = CounterAction;

    fn kind(&self) -> Self::Kind {
        *self
    }
}

/// Mirrored slice: only `foos` travels from parent to child.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Foos(pub Count);

pub fn foos(parent: &State) -> Foos {
    Foos(parent.foos)
}

impl MirrorTarget<Foos> for State {
    fn differs(&self, slice: &Foos) -> bool {
        self.foos != slice.0
    }

    fn merged(&self, slice: &Foos) -> Self {
        Self {
            foos: slice.0,
            ..self.clone()
        }
    }
}

pub fn root_reducer(state: &Arc<State>, action: &CounterAction) -> Arc<State> {
    let mut next = (**state).clone();
    match action {
        CounterAction::Foo => next.foos.count += 1,
        CounterAction::Bar => next.bars.count += 1,
    }
    Arc::new(next)
}

pub type ParentStore = Store<State, CounterAction>;
pub type ChildRequest = Request<CounterAction, Foos>;
pub type ChildStore = Store<State, ChildRequest>;
pub type Interceptor = ForwardingInterceptor<State, CounterAction, fn(&State) -> Foos>;

pub fn parent_store() -> Arc<ParentStore> {
    Store::with_default(root_reducer)
}

/// Builds a child that mirrors `foos` and forwards `Foo` to `parent`.
pub fn child_store(parent: &Arc<ParentStore>) -> Result<(Arc<ChildStore>, Arc<Interceptor>)> {
    let interceptor = ForwardingInterceptor::builder(Arc::clone(parent))
        .keys_to_copy(foos as fn(&State) -> Foos)
        .actions_to_forward([CounterAction::Foo])
        .build()?;
    let child = Store::builder(reduce_mirrored(root_reducer))
        .default_state()
        .middleware(Arc::clone(&interceptor))
        .build()?;
    Ok((child, interceptor))
}
