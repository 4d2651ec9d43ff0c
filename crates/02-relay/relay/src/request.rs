//! Request boundary between application requests and mirror slices.

use std::fmt::Debug;
use std::hash::Hash;

/// Label used when logging mirror requests. Mirror requests are a separate
/// [`Request`] variant, so this never competes with application kinds.
pub const MIRROR_KIND: &str = "TURTLES_ALL_THE_WAY_DOWN";

/// Application request with a stable kind used for forward-set membership.
pub trait Action {
    /// Identifier shared by every request of the same type.
    type Kind: Clone + Debug + Eq + Hash + Send + Sync + 'static;

    fn kind(&self) -> Self::Kind;
}

impl Action for &'static str {
    type Kind = &'static str;

    fn kind(&self) -> Self::Kind {
        *self
    }
}

impl Action for String {
    type Kind = String;

    fn kind(&self) -> Self::Kind {
        self.clone()
    }
}

/// Requests accepted by a child store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request<A, M> {
    /// Application request, handled by the child reducer unless forwarded.
    Local(A),
    /// Slice of parent state produced by the forwarding interceptor.
    Mirror(M),
}

impl<A, M> Request<A, M> {
    pub fn local(action: A) -> Self {
        Request::Local(action)
    }
}
