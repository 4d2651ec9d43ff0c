//! Reducer wrapper that applies mirror slices to child state.

use std::sync::Arc;

use log::trace;
use store::Reducer;

use crate::projection::MirrorTarget;
use crate::request::{Request, MIRROR_KIND};

/// Root reducer for a child store.
///
/// Local requests go to the wrapped reducer untouched. Mirror requests never
/// reach it: the slice is merged into the current snapshot only when it
/// changes a tracked value, otherwise the prior `Arc` is returned as-is.
#[derive(Clone, Debug)]
pub struct MirrorReducer<R> {
    inner: R,
}

impl<R> MirrorReducer<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

/// Wraps an application reducer so it can serve as a child store's root.
pub fn reduce_mirrored<R>(reducer: R) -> MirrorReducer<R> {
    MirrorReducer::new(reducer)
}

impl<C, A, M, R> Reducer<C, Request<A, M>> for MirrorReducer<R>
where
    R: Reducer<C, A>,
    C: MirrorTarget<M>,
{
    fn reduce(&self, state: &Arc<C>, request: &Request<A, M>) -> Arc<C> {
        match request {
            Request::Local(action) => self.inner.reduce(state, action),
            Request::Mirror(slice) => {
                if C::differs(state, slice) {
                    trace!("mirror: {MIRROR_KIND} changed tracked values, merging");
                    Arc::new(C::merged(state, slice))
                } else {
                    Arc::clone(state)
                }
            }
        }
    }
}
