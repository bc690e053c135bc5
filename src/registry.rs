//! # Registry: type-keyed subscriber storage.
//!
//! Maps each payload type (`TypeId`) to a homogeneous list of [`Record`]s
//! kept in registration order. The map is type-erased (`Box<dyn Any>`) so a
//! single registry serves every payload type; all access goes through the
//! typed methods below, which downcast back to `Vec<Record<E>>`.
//!
//! ## Locking
//! The mutex guards only the map itself. Dispatch works on a sorted snapshot
//! taken under the lock, so subscriber callbacks never run with the lock
//! held and may reentrantly subscribe/unsubscribe/publish on the same bus.

use std::any::{Any, TypeId};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::handler::{Dispatch, Event, Handler};

/// Predicate evaluated against the payload before a conditional record fires.
pub(crate) type Condition<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// One stored registration for an event type.
pub(crate) struct Record<E> {
    /// Registry-unique id; identifies the record when pruning fired one-time
    /// subscribers after dispatch.
    pub id: u64,
    pub handler: Handler<E>,
    /// Higher fires first; ties fire in registration order.
    pub priority: i32,
    pub dispatch: Dispatch,
    /// Remove after the first invocation that actually fires.
    pub once: bool,
    pub condition: Option<Condition<E>>,
}

impl<E> Clone for Record<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: self.handler.clone(),
            priority: self.priority,
            dispatch: self.dispatch,
            once: self.once,
            condition: self.condition.clone(),
        }
    }
}

type Erased = Box<dyn Any + Send>;

/// Type-erased subscriber registry shared by every clone of a bus.
#[derive(Default)]
pub(crate) struct Registry {
    entries: Mutex<HashMap<TypeId, Erased>>,
    next_id: AtomicU64,
}

impl Registry {
    /// Allocates a registry-unique record id.
    pub fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    // Callbacks never run under the lock, so a poisoned guard still holds a
    // consistent map.
    fn lock(&self) -> MutexGuard<'_, HashMap<TypeId, Erased>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a record to its type's list, creating the list on first use.
    pub fn insert<E: Event>(&self, record: Record<E>) {
        let mut map = self.lock();
        let entry = map
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Vec::<Record<E>>::new()));
        if let Some(list) = entry.downcast_mut::<Vec<Record<E>>>() {
            list.push(record);
        }
    }

    /// Removes every record holding the given callback object.
    /// Returns the number removed (0 when nothing matched).
    pub fn remove_handler<E: Event>(&self, handler: &Handler<E>) -> usize {
        let mut map = self.lock();
        let Some(list) = Self::list_mut::<E>(&mut map) else {
            return 0;
        };
        let before = list.len();
        list.retain(|record| !record.handler.same(handler));
        before - list.len()
    }

    /// Drops every record for the type. Returns the number removed.
    pub fn clear<E: Event>(&self) -> usize {
        self.lock()
            .remove(&TypeId::of::<E>())
            .and_then(|erased| erased.downcast::<Vec<Record<E>>>().ok())
            .map_or(0, |list| list.len())
    }

    /// True when the type has at least one live record.
    pub fn has<E: Event>(&self) -> bool {
        self.lock()
            .get(&TypeId::of::<E>())
            .and_then(|erased| erased.downcast_ref::<Vec<Record<E>>>())
            .is_some_and(|list| !list.is_empty())
    }

    /// Clones the type's records sorted for dispatch: priority descending,
    /// ties in registration order (stable sort). `None` when the type has no
    /// live records.
    pub fn snapshot<E: Event>(&self) -> Option<Vec<Record<E>>> {
        let mut snapshot = {
            let map = self.lock();
            let list = map
                .get(&TypeId::of::<E>())?
                .downcast_ref::<Vec<Record<E>>>()?;
            if list.is_empty() {
                return None;
            }
            list.clone()
        };
        snapshot.sort_by_key(|record| Reverse(record.priority));
        Some(snapshot)
    }

    /// Removes one-time records that fired during a dispatch, by id.
    /// Records removed by a reentrant unsubscribe in the meantime are simply
    /// absent; skipped one-time records are not listed and stay put.
    pub fn prune<E: Event>(&self, fired: &[u64]) {
        let mut map = self.lock();
        if let Some(list) = Self::list_mut::<E>(&mut map) {
            list.retain(|record| !(record.once && fired.contains(&record.id)));
        }
    }

    fn list_mut<'a, E: Event>(
        map: &'a mut HashMap<TypeId, Erased>,
    ) -> Option<&'a mut Vec<Record<E>>> {
        map.get_mut(&TypeId::of::<E>())?.downcast_mut()
    }
}
