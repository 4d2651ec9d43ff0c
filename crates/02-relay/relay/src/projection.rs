//! Projections from parent state and merge targets in child state.

/// Reads the tracked slice out of a parent snapshot.
///
/// `()` is the empty projection. Any `Fn(&P) -> M` is a typed projection
/// whose slice type `M` holds exactly the mirrored fields.
pub trait Projection<P>: Send + Sync + 'static {
    /// Mirrored subset of `P` carried by a mirror request.
    type Slice: Send + 'static;

    fn project(&self, parent: &P) -> Self::Slice;
}

impl<P> Projection<P> for () {
    type Slice = ();

    fn project(&self, _parent: &P) -> Self::Slice {}
}

impl<P, M, F> Projection<P> for F
where
    F: Fn(&P) -> M + Send + Sync + 'static,
    M: Send + 'static,
{
    type Slice = M;

    fn project(&self, parent: &P) -> Self::Slice {
        self(parent)
    }
}

/// Child state that can absorb a mirrored slice.
///
/// Implementations must only touch the fields the slice carries; every other
/// field is owned by the child's own reducer.
pub trait MirrorTarget<M> {
    /// Whether any value carried by `slice` differs from the current value.
    fn differs(&self, slice: &M) -> bool;

    /// Copy of `self` with every value carried by `slice` written over it.
    fn merged(&self, slice: &M) -> Self
    where
        Self: Sized;
}

impl<C: Clone> MirrorTarget<()> for C {
    fn differs(&self, _slice: &()) -> bool {
        false
    }

    fn merged(&self, _slice: &()) -> Self {
        self.clone()
    }
}
