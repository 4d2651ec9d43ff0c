//! One-way state mirroring and request forwarding between a parent and a
//! child [`store::Store`].
//!
//! Two pieces cooperate:
//!
//! - [`ForwardingInterceptor`] is middleware for the child. It subscribes to
//!   the parent, pushes a projected slice of every new parent snapshot into
//!   the child as [`Request::Mirror`], and reroutes selected local request
//!   kinds to the parent instead of the child's reducer.
//! - [`MirrorReducer`] wraps the child's reducer. Mirror requests are merged
//!   only when they change a tracked value, so an unchanged slice keeps the
//!   child's snapshot identity.
//!
//! Tracked keys are described by a [`Projection`]. Typed states project with
//! a plain `Fn(&Parent) -> Slice` and implement [`MirrorTarget`] for the
//! slice; keyed records use [`KeySet`] over [`Record`].

/// Forwarding middleware and its builder.
pub mod interceptor;
/// Reducer wrapper that applies mirror slices.
pub mod mirror;
/// Projections from parent state and merge targets in child state.
pub mod projection;
/// Dynamic keyed records and key sets.
pub mod record;
/// Request boundary between application requests and mirror slices.
pub mod request;

pub use crate::interceptor::{
    ForwardingInterceptor, ForwardingInterceptorBuilder, DEFAULT_MAX_FORWARD_DEPTH,
};
pub use crate::mirror::{reduce_mirrored, MirrorReducer};
pub use crate::projection::{MirrorTarget, Projection};
pub use crate::record::{KeySet, Pairs, Record};
pub use crate::request::{Action, Request, MIRROR_KIND};
