//! Middleware chain for store dispatch.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::{StoreError, StoreResult};
use crate::store::Store;

/// Intercepts requests on their way to a store's reducer.
pub trait Middleware<S, A>: Send + Sync {
    /// Called once when the middleware is installed into a store.
    fn attach(&self, store: StoreApi<S, A>) -> StoreResult<()> {
        let _ = store;
        Ok(())
    }

    /// Releases whatever [`Middleware::attach`] registered. Returns whether
    /// anything was released.
    fn detach(&self) -> bool {
        false
    }

    /// Handles a request, either consuming it or handing it to `next`.
    fn handle(&self, request: A, next: Next<'_, S, A>) -> StoreResult<Arc<S>>;
}

/// Cursor over the remaining middleware for one dispatch.
pub struct Next<'a, S, A> {
    store: &'a Store<S, A>,
    rest: &'a [Arc<dyn Middleware<S, A>>],
}

impl<'a, S, A> Next<'a, S, A> {
    pub(crate) fn new(store: &'a Store<S, A>, rest: &'a [Arc<dyn Middleware<S, A>>]) -> Self {
        Self { store, rest }
    }

    /// Passes the request to the next middleware, or to the reducer once the
    /// chain is exhausted.
    pub fn run(self, request: A) -> StoreResult<Arc<S>> {
        match self.rest.split_first() {
            Some((head, tail)) => head.handle(request, Next::new(self.store, tail)),
            None => self.store.reduce(request),
        }
    }

    /// Current snapshot of the store being dispatched into.
    pub fn state(&self) -> Arc<S> {
        self.store.state()
    }
}

/// Weak dispatch surface handed to middleware on attach.
pub struct StoreApi<S, A> {
    store: Weak<Store<S, A>>,
}

impl<S, A> StoreApi<S, A> {
    pub(crate) fn new(store: &Arc<Store<S, A>>) -> Self {
        Self {
            store: Arc::downgrade(store),
        }
    }

    /// Dispatches through the full middleware chain of the target store.
    pub fn dispatch(&self, request: A) -> StoreResult<Arc<S>> {
        self.upgrade()?.dispatch(request)
    }

    pub fn state(&self) -> StoreResult<Arc<S>> {
        Ok(self.upgrade()?.state())
    }

    pub fn is_live(&self) -> bool {
        self.store.strong_count() > 0
    }

    fn upgrade(&self) -> StoreResult<Arc<Store<S, A>>> {
        self.store.upgrade().ok_or(StoreError::StoreDropped)
    }
}

impl<S, A> Clone for StoreApi<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: Weak::clone(&self.store),
        }
    }
}

impl<S, A> fmt::Debug for StoreApi<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreApi")
            .field("live", &self.is_live())
            .finish()
    }
}
