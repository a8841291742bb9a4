//! Handle table: the single owner of handle-to-entry bindings.
//!
//! Three independent maps (files, listeners, connections) share one handle
//! allocator, so a handle is unique across the union of all three. Handles
//! are allocated monotonically and never reused within one table.

use std::collections::HashMap;

use crate::core::handle::{Handle, Kind};

/// First handle handed out. 0, 1 and 2 mirror the standard streams.
pub const FIRST_HANDLE: i64 = 3;

/// An entry tagged with the table it lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<F, L, C> {
    File(F),
    Listener(L),
    Connection(C),
}

impl<F, L, C> Slot<F, L, C> {
    pub fn kind(&self) -> Kind {
        match self {
            Slot::File(_) => Kind::File,
            Slot::Listener(_) => Kind::Listener,
            Slot::Connection(_) => Kind::Connection,
        }
    }
}

/// Maps live handles to their entries.
///
/// Generic over the entry types so the bookkeeping can be tested without any
/// platform resources. No operation blocks.
#[derive(Debug)]
pub struct HandleTable<F, L, C> {
    next: i64,
    files: HashMap<Handle, F>,
    listeners: HashMap<Handle, L>,
    connections: HashMap<Handle, C>,
}

impl<F, L, C> Default for HandleTable<F, L, C> {
    fn default() -> Self {
        Self {
            next: FIRST_HANDLE,
            files: HashMap::new(),
            listeners: HashMap::new(),
            connections: HashMap::new(),
        }
    }
}

impl<F, L, C> HandleTable<F, L, C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh handle and bind `slot` to it in the matching map.
    pub fn insert(&mut self, slot: Slot<F, L, C>) -> Handle {
        let handle = Handle::from_raw(self.next);
        self.next += 1;
        let fresh = match slot {
            Slot::File(entry) => self.files.insert(handle, entry).is_none(),
            Slot::Listener(entry) => self.listeners.insert(handle, entry).is_none(),
            Slot::Connection(entry) => self.connections.insert(handle, entry).is_none(),
        };
        debug_assert!(fresh, "handle {handle} allocated twice");
        handle
    }

    pub fn classify(&self, handle: Handle) -> Kind {
        if self.files.contains_key(&handle) {
            Kind::File
        } else if self.listeners.contains_key(&handle) {
            Kind::Listener
        } else if self.connections.contains_key(&handle) {
            Kind::Connection
        } else {
            Kind::Unknown
        }
    }

    /// Unbind `handle`, returning its entry. Absent handles yield `None`.
    pub fn remove(&mut self, handle: Handle) -> Option<Slot<F, L, C>> {
        if let Some(entry) = self.files.remove(&handle) {
            return Some(Slot::File(entry));
        }
        if let Some(entry) = self.listeners.remove(&handle) {
            return Some(Slot::Listener(entry));
        }
        self.connections.remove(&handle).map(Slot::Connection)
    }

    pub fn len(&self) -> usize {
        self.files.len() + self.listeners.len() + self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<F: Clone, L: Clone, C: Clone> HandleTable<F, L, C> {
    /// Clone the entry bound to `handle` out of the table.
    ///
    /// Entries are expected to be cheap shared references (`Arc`), so callers
    /// can run I/O on them after releasing whatever lock guards the table.
    pub fn get(&self, handle: Handle) -> Option<Slot<F, L, C>> {
        if let Some(entry) = self.files.get(&handle) {
            return Some(Slot::File(entry.clone()));
        }
        if let Some(entry) = self.listeners.get(&handle) {
            return Some(Slot::Listener(entry.clone()));
        }
        self.connections
            .get(&handle)
            .map(|entry| Slot::Connection(entry.clone()))
    }
}
