//! Pure reducer contract for store snapshots.

use std::sync::Arc;

/// Computes the next snapshot from the prior snapshot and a request.
///
/// Returning `Arc::clone(state)` signals that the request changed nothing;
/// the store then keeps the prior snapshot and skips notification.
pub trait Reducer<S, A>: Send + Sync {
    /// Reduces a request against the current snapshot.
    fn reduce(&self, state: &Arc<S>, request: &A) -> Arc<S>;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(&Arc<S>, &A) -> Arc<S> + Send + Sync,
{
    fn reduce(&self, state: &Arc<S>, request: &A) -> Arc<S> {
        self(state, request)
    }
}
