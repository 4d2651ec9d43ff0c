//! Child-store middleware that mirrors parent state down and forwards
//! selected requests up.

use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use log::{debug, trace, warn};
use parking_lot::Mutex;
use store::{Middleware, Next, Store, StoreApi, StoreError, StoreResult, Subscription};

use crate::projection::Projection;
use crate::request::{Action, Request, MIRROR_KIND};

/// Default bound on nested forwards before a cycle is reported.
pub const DEFAULT_MAX_FORWARD_DEPTH: usize = 16;

thread_local! {
    // In-flight forwards on this thread, keyed by interceptor address.
    static FORWARD_DEPTH: RefCell<HashMap<usize, usize>> = RefCell::new(HashMap::new());
}

type Slot = Arc<Mutex<Option<Subscription>>>;

/// Middleware for a child store wired to a parent store.
///
/// On [`Middleware::attach`] it subscribes to the parent; every parent
/// change is projected through `J` and dispatched into the child as
/// [`Request::Mirror`] before the parent's dispatch returns. Local requests
/// whose kind is in the forward set are dispatched verbatim to the parent
/// and never reach the child's reducer.
pub struct ForwardingInterceptor<P, A: Action, J = ()> {
    parent: Arc<Store<P, A>>,
    projection: Arc<J>,
    forward: HashSet<A::Kind>,
    max_forward_depth: usize,
    subscription: Slot,
}

impl<P, A: Action> ForwardingInterceptor<P, A, ()> {
    /// Starts configuring an interceptor for `parent`. Without further
    /// options nothing is mirrored and nothing is forwarded.
    pub fn builder(parent: Arc<Store<P, A>>) -> ForwardingInterceptorBuilder<P, A, ()> {
        ForwardingInterceptorBuilder {
            parent,
            projection: (),
            forward: HashSet::new(),
            max_forward_depth: DEFAULT_MAX_FORWARD_DEPTH,
        }
    }
}

impl<P, A: Action, J> ForwardingInterceptor<P, A, J> {
    pub fn forwards(&self, kind: &A::Kind) -> bool {
        self.forward.contains(kind)
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// Removes the parent subscription. Safe to call more than once.
    pub fn detach(&self) -> bool {
        release(&self.subscription)
    }

    fn forward_to_parent(&self, action: A) -> StoreResult<Arc<P>> {
        let key = self as *const Self as *const () as usize;
        let _depth = ForwardDepth::enter(key, self.max_forward_depth)?;
        trace!("relay::forward kind={:?}", action.kind());
        self.parent.dispatch(action)
    }
}

impl<P, C, A, J> Middleware<C, Request<A, J::Slice>> for ForwardingInterceptor<P, A, J>
where
    P: Send + Sync + 'static,
    C: Send + Sync + 'static,
    A: Action + 'static,
    J: Projection<P>,
{
    fn attach(&self, child: StoreApi<C, Request<A, J::Slice>>) -> StoreResult<()> {
        let mut slot = self.subscription.lock();
        if slot.is_some() {
            return Err(StoreError::InvalidConfig("interceptor is already attached"));
        }

        let parent = Arc::downgrade(&self.parent);
        let projection = Arc::clone(&self.projection);
        let own = Arc::clone(&self.subscription);
        let subscription = self.parent.subscribe(move || {
            let Some(parent) = parent.upgrade() else {
                return Ok(());
            };
            let slice = projection.project(&parent.state());
            trace!("relay::mirror dispatching {MIRROR_KIND}");
            match child.dispatch(Request::Mirror(slice)) {
                Ok(_) => Ok(()),
                Err(StoreError::StoreDropped) => {
                    // Child is gone without detaching; drop this listener.
                    release(&own);
                    Ok(())
                }
                Err(err) => Err(err),
            }
        });

        debug!(
            "relay::attach subscriber={:?} forwarding={}",
            subscription.id(),
            self.forward.len()
        );
        *slot = Some(subscription);
        Ok(())
    }

    fn detach(&self) -> bool {
        ForwardingInterceptor::detach(self)
    }

    fn handle(
        &self,
        request: Request<A, J::Slice>,
        next: Next<'_, C, Request<A, J::Slice>>,
    ) -> StoreResult<Arc<C>> {
        match request {
            Request::Local(action) if self.forwards(&action.kind()) => {
                self.forward_to_parent(action)?;
                Ok(next.state())
            }
            request => next.run(request),
        }
    }
}

impl<P, A: Action, J> fmt::Debug for ForwardingInterceptor<P, A, J> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardingInterceptor")
            .field("forward", &self.forward)
            .field("max_forward_depth", &self.max_forward_depth)
            .field("attached", &self.is_attached())
            .finish()
    }
}

fn release(slot: &Slot) -> bool {
    let Some(subscription) = slot.lock().take() else {
        return false;
    };
    let id = subscription.id();
    let removed = subscription.unsubscribe();
    debug!("relay::detach subscriber={id:?} removed={removed}");
    removed
}

/// Marks one in-flight forward on the current thread for the lifetime of
/// the guard.
struct ForwardDepth {
    key: usize,
}

impl ForwardDepth {
    fn enter(key: usize, max: usize) -> StoreResult<Self> {
        let current = FORWARD_DEPTH.with(|depths| {
            let mut depths = depths.borrow_mut();
            let depth = depths.entry(key).or_insert(0);
            *depth += 1;
            *depth
        });
        let guard = Self { key };
        if current > max {
            warn!("relay::forward refused at depth {current} (max {max})");
            return Err(StoreError::ForwardCycle { depth: current });
        }
        Ok(guard)
    }
}

impl Drop for ForwardDepth {
    fn drop(&mut self) {
        FORWARD_DEPTH.with(|depths| {
            if let Entry::Occupied(mut entry) = depths.borrow_mut().entry(self.key) {
                *entry.get_mut() -= 1;
                if *entry.get() == 0 {
                    entry.remove();
                }
            }
        });
    }
}

/// Builder for [`ForwardingInterceptor`].
pub struct ForwardingInterceptorBuilder<P, A: Action, J = ()> {
    parent: Arc<Store<P, A>>,
    projection: J,
    forward: HashSet<A::Kind>,
    max_forward_depth: usize,
}

impl<P, A: Action, J> ForwardingInterceptorBuilder<P, A, J> {
    /// Selects which parent state is mirrored into the child.
    pub fn keys_to_copy<K>(self, projection: K) -> ForwardingInterceptorBuilder<P, A, K>
    where
        K: Projection<P>,
    {
        ForwardingInterceptorBuilder {
            parent: self.parent,
            projection,
            forward: self.forward,
            max_forward_depth: self.max_forward_depth,
        }
    }

    /// Adds request kinds that are dispatched to the parent instead of the
    /// child.
    pub fn actions_to_forward<I>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = A::Kind>,
    {
        self.forward.extend(kinds);
        self
    }

    pub fn max_forward_depth(mut self, depth: usize) -> Self {
        self.max_forward_depth = depth;
        self
    }

    pub fn build(self) -> StoreResult<Arc<ForwardingInterceptor<P, A, J>>> {
        if self.max_forward_depth == 0 {
            return Err(StoreError::InvalidConfig(
                "max forward depth must be non-zero",
            ));
        }

        Ok(Arc::new(ForwardingInterceptor {
            parent: self.parent,
            projection: Arc::new(self.projection),
            forward: self.forward,
            max_forward_depth: self.max_forward_depth,
            subscription: Arc::default(),
        }))
    }
}
