//! Thread-safe listener registry with per-kind dispatch.
//!
//! Listeners are stored per gesture kind and dispatched synchronously in
//! registration order. Dispatch snapshots the list before invoking anyone,
//! so a listener may add or remove listeners (itself included) without
//! deadlocking; such changes take effect from the next event. A panicking
//! listener is isolated and logged, and never takes down the pipeline
//! thread.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::error;

use crate::event::{GestureEvent, GestureKind};

type Listener = Box<dyn Fn(&GestureEvent) + Send + Sync + 'static>;

/// Identifies one registered listener for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
  kind: GestureKind,
  id: u64,
}

impl Handle {
  pub fn kind(&self) -> GestureKind {
    self.kind
  }
}

struct Entry {
  id: u64,
  listener: Arc<Listener>,
}

struct Lists {
  entries: [Vec<Entry>; GestureKind::COUNT],
  next_id: u64,
}

pub(crate) struct ListenerRegistry {
  lists: Mutex<Lists>,
}

impl ListenerRegistry {
  pub(crate) fn new() -> Self {
    Self {
      lists: Mutex::new(Lists { entries: Default::default(), next_id: 0 }),
    }
  }

  fn lock(&self) -> MutexGuard<'_, Lists> {
    // A poisoned lock only means a panic elsewhere while holding it; the
    // list itself is never left half-updated.
    self.lists.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub(crate) fn add(&self, kind: GestureKind, listener: Listener) -> Handle {
    let mut lists = self.lock();
    let id = lists.next_id;
    lists.next_id += 1;
    lists.entries[kind.index()].push(Entry { id, listener: Arc::new(listener) });
    Handle { kind, id }
  }

  /// Remove a listener. Returns whether it was still registered.
  pub(crate) fn remove(&self, handle: Handle) -> bool {
    let mut lists = self.lock();
    let entries = &mut lists.entries[handle.kind.index()];
    let before = entries.len();
    entries.retain(|entry| entry.id != handle.id);
    entries.len() != before
  }

  /// Invoke every listener registered for the event's kind, in order.
  pub(crate) fn dispatch(&self, event: &GestureEvent) {
    let snapshot: Vec<_> = {
      let lists = self.lock();
      lists.entries[event.kind().index()].iter().map(|entry| entry.listener.clone()).collect()
    };
    for listener in snapshot {
      if panic::catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
        error!("{} listener panicked; continuing", event.kind().as_str());
      }
    }
  }

  /// Drop every listener of one kind.
  pub(crate) fn clear(&self, kind: GestureKind) {
    self.lock().entries[kind.index()].clear();
  }

  /// Drop all listeners of every kind.
  pub(crate) fn clear_all(&self) {
    for kind in GestureKind::ALL {
      self.clear(kind);
    }
  }
}
