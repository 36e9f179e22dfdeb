// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Change notification

use std::sync::Arc;

/// Summary of what a committed transaction changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub added: bool,
    pub removed: bool,
}

/// Receives one [`ChangeEvent`] per commit that changed the store
pub trait ChangeListener: Send + Sync {
    fn sail_changed(&self, event: &ChangeEvent);
}

/// "Statements added" and "statements removed" flags for the current
/// transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeFlags {
    pub added: bool,
    pub removed: bool,
}

impl ChangeFlags {
    pub fn reset(&mut self) {
        *self = ChangeFlags::default();
    }

    /// The event to publish, if anything changed
    pub fn to_event(self) -> Option<ChangeEvent> {
        if self.added || self.removed {
            Some(ChangeEvent {
                added: self.added,
                removed: self.removed,
            })
        } else {
            None
        }
    }
}

/// Registered listeners, compared by identity
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<Arc<dyn ChangeListener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Returns false if the listener is already registered
    pub fn add(&mut self, listener: Arc<dyn ChangeListener>) -> bool {
        if self.position(&listener).is_some() {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Returns false if the listener was not registered
    pub fn remove(&mut self, listener: &Arc<dyn ChangeListener>) -> bool {
        match self.position(listener) {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn notify(&self, event: &ChangeEvent) {
        for listener in &self.listeners {
            listener.sail_changed(event);
        }
    }

    fn position(&self, listener: &Arc<dyn ChangeListener>) -> Option<usize> {
        self.listeners
            .iter()
            .position(|registered| Arc::ptr_eq(registered, listener))
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
