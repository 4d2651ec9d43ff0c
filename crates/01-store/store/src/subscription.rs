//! Change listeners registered on a store.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use smallvec::SmallVec;

use crate::error::StoreResult;

pub(crate) type Listener = dyn Fn() -> StoreResult<()> + Send + Sync;

/// Identifier handed out for each registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    entries: Vec<(SubscriberId, Arc<Listener>)>,
}

/// Ordered listener registry owned by a store.
#[derive(Default)]
pub(crate) struct Listeners {
    table: Arc<Mutex<ListenerTable>>,
}

impl Listeners {
    pub(crate) fn insert(&self, listener: Arc<Listener>) -> Subscription {
        let mut table = self.table.lock();
        let id = SubscriberId(table.next_id);
        table.next_id = table.next_id.wrapping_add(1);
        table.entries.push((id, listener));
        Subscription {
            id,
            table: Arc::downgrade(&self.table),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.table.lock().entries.len()
    }

    /// Calls every listener registered at the time of the call, in
    /// registration order. Stops at the first failure.
    pub(crate) fn notify(&self) -> StoreResult<()> {
        let snapshot: SmallVec<[Arc<Listener>; 4]> = self
            .table
            .lock()
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in snapshot {
            listener()?;
        }
        Ok(())
    }
}

/// Handle returned by [`crate::Store::subscribe`].
///
/// Dropping the handle leaves the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[must_use = "dropping a Subscription does not unsubscribe"]
pub struct Subscription {
    id: SubscriberId,
    table: Weak<Mutex<ListenerTable>>,
}

impl Subscription {
    /// Identifier of the listener this handle controls.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Removes the listener. Returns `false` if it was already gone or the
    /// store has been dropped.
    pub fn unsubscribe(self) -> bool {
        let Some(table) = self.table.upgrade() else {
            return false;
        };
        let mut table = table.lock();
        let before = table.entries.len();
        table.entries.retain(|(id, _)| *id != self.id);
        table.entries.len() != before
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
