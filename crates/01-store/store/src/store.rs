//! Snapshot state container and its builder.

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use arc_swap::ArcSwap;
use log::{debug, trace};
use parking_lot::ReentrantMutex;

use crate::error::{StoreError, StoreResult};
use crate::middleware::{Middleware, Next, StoreApi};
use crate::reducer::Reducer;
use crate::subscription::{Listeners, Subscription};

/// Holds an immutable snapshot that only changes through its reducer.
pub struct Store<S, A> {
    state: ArcSwap<S>,
    reducer: Box<dyn Reducer<S, A>>,
    middleware: Vec<Arc<dyn Middleware<S, A>>>,
    listeners: Listeners,
    // Set while the reducer runs. Re-entrant so the owning thread can observe
    // its own flag instead of deadlocking.
    reducing: ReentrantMutex<Cell<bool>>,
}

impl<S, A> Store<S, A> {
    /// Starts building a store around the given root reducer.
    pub fn builder<R>(reducer: R) -> StoreBuilder<S, A>
    where
        R: Reducer<S, A> + 'static,
    {
        StoreBuilder::new(Box::new(reducer))
    }

    /// Creates a store with no middleware, starting from `S::default()`.
    pub fn with_default<R>(reducer: R) -> Arc<Self>
    where
        R: Reducer<S, A> + 'static,
        S: Default,
    {
        Arc::new(Self::from_parts(S::default(), Box::new(reducer), Vec::new()))
    }

    fn from_parts(
        initial: S,
        reducer: Box<dyn Reducer<S, A>>,
        middleware: Vec<Arc<dyn Middleware<S, A>>>,
    ) -> Self {
        Self {
            state: ArcSwap::from_pointee(initial),
            reducer,
            middleware,
            listeners: Listeners::default(),
            reducing: ReentrantMutex::new(Cell::new(false)),
        }
    }

    /// Returns the current snapshot.
    pub fn state(&self) -> Arc<S> {
        self.state.load_full()
    }

    /// Runs a request through the middleware chain and the reducer.
    ///
    /// Returns the snapshot produced for this request. Listener failures are
    /// returned after the new snapshot has been published.
    pub fn dispatch(&self, request: A) -> StoreResult<Arc<S>> {
        trace!("store::dispatch middleware={}", self.middleware.len());
        Next::new(self, &self.middleware).run(request)
    }

    /// Registers a listener called after every snapshot replacement.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() -> StoreResult<()> + Send + Sync + 'static,
    {
        self.listeners.insert(Arc::new(listener))
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Detaches every installed middleware. Returns how many released
    /// something.
    pub fn detach(&self) -> usize {
        let released = self
            .middleware
            .iter()
            .filter(|middleware| middleware.detach())
            .count();
        debug!("store::detach released={released}");
        released
    }

    pub(crate) fn reduce(&self, request: A) -> StoreResult<Arc<S>> {
        let next = {
            let flag = self.reducing.lock();
            if flag.get() {
                return Err(StoreError::DispatchInReducer);
            }
            let _running = Running::enter(&flag);

            let prior = self.state.load_full();
            let next = self.reducer.reduce(&prior, &request);
            if Arc::ptr_eq(&prior, &next) {
                trace!("store::reduce: snapshot unchanged");
                return Ok(next);
            }
            self.state.store(Arc::clone(&next));
            next
        };

        trace!(
            "store::reduce: snapshot replaced, notifying listeners={}",
            self.listeners.len()
        );
        self.listeners.notify()?;
        Ok(next)
    }
}

impl<S, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("middleware", &self.middleware.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

struct Running<'a>(&'a Cell<bool>);

impl<'a> Running<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for Running<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Builder for assembling a [`Store`] from a reducer, an initial snapshot,
/// and middleware.
pub struct StoreBuilder<S, A> {
    reducer: Box<dyn Reducer<S, A>>,
    initial: Option<S>,
    middleware: Vec<Arc<dyn Middleware<S, A>>>,
}

impl<S, A> StoreBuilder<S, A> {
    fn new(reducer: Box<dyn Reducer<S, A>>) -> Self {
        Self {
            reducer,
            initial: None,
            middleware: Vec::new(),
        }
    }

    /// Sets the initial snapshot.
    pub fn initial_state(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Starts from `S::default()`.
    pub fn default_state(self) -> Self
    where
        S: Default,
    {
        self.initial_state(S::default())
    }

    /// Appends a middleware. Requests visit middleware in insertion order.
    pub fn middleware<M>(mut self, middleware: Arc<M>) -> Self
    where
        M: Middleware<S, A> + 'static,
    {
        self.middleware.push(middleware);
        self
    }

    /// Builds the store and attaches every middleware, returning an error if
    /// the initial snapshot is missing or any attach fails. Middleware that
    /// attached before a failure is detached again.
    pub fn build(self) -> Result<Arc<Store<S, A>>> {
        let initial = self
            .initial
            .ok_or_else(|| anyhow!("missing initial state"))?;
        let store = Arc::new(Store::from_parts(initial, self.reducer, self.middleware));

        let api = StoreApi::new(&store);
        for (idx, middleware) in store.middleware.iter().enumerate() {
            if let Err(err) = middleware.attach(api.clone()) {
                for attached in &store.middleware[..idx] {
                    attached.detach();
                }
                return Err(anyhow::Error::new(err).context(format!("attaching middleware #{idx}")));
            }
        }

        debug!("store::build middleware={}", store.middleware.len());
        Ok(store)
    }
}
