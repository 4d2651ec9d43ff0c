//! Reducer-driven state containers with a synchronous middleware pipeline.
//!
//! A [`Store`] owns an immutable `Arc<S>` snapshot. Every request travels
//! through the installed [`Middleware`] chain before reaching the root
//! [`Reducer`]; when the reducer hands back a new snapshot the store publishes
//! it and notifies subscribers in registration order. Returning the prior
//! `Arc` from a reducer means "nothing changed" and suppresses notification.

/// Error type shared by stores, middleware, and listeners.
pub mod error;
/// Middleware trait, chain cursor, and the weak dispatch surface.
pub mod middleware;
/// Pure reducer trait.
pub mod reducer;
/// State container and its builder.
pub mod store;
/// Change listeners and subscription handles.
pub mod subscription;

pub use crate::error::{StoreError, StoreResult};
pub use crate::middleware::{Middleware, Next, StoreApi};
pub use crate::reducer::Reducer;
pub use crate::store::{Store, StoreBuilder};
pub use crate::subscription::{SubscriberId, Subscription};
