//! Z-ordered stack of open dialogs.
//!
//! # Invariants
//!
//! - No instance appears twice.
//! - Order is paint order: later entries are drawn on top.
//! - Entries can be removed from any position; removing an absent id is a
//!   no-op, since a settle and a force-close may race on the same instance.

use std::collections::HashSet;

use crate::instance::InstanceId;

/// Ordered set of open dialog instances.
///
/// Holds ids only. Instances are created and destroyed by the controller.
#[derive(Debug, Default, Clone)]
pub struct DialogStack {
    order: Vec<InstanceId>,
    members: HashSet<InstanceId>,
}

impl DialogStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put an instance on top. Returns false if it was already present.
    pub fn push(&mut self, id: InstanceId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Remove an instance wherever it is. Returns false if it was absent.
    pub fn remove(&mut self, id: InstanceId) -> bool {
        if !self.members.remove(&id) {
            return false;
        }
        if let Some(pos) = self.order.iter().rposition(|&i| i == id) {
            self.order.remove(pos);
        }
        true
    }

    /// The topmost instance.
    pub fn top(&self) -> Option<InstanceId> {
        self.order.last().copied()
    }

    /// Snapshot of all instances, topmost first.
    pub fn all(&self) -> Vec<InstanceId> {
        self.order.iter().rev().copied().collect()
    }

    /// Whether an instance is on the stack.
    pub fn contains(&self, id: InstanceId) -> bool {
        self.members.contains(&id)
    }

    /// Depth of an instance counted from the bottom (0 = lowest).
    pub fn position(&self, id: InstanceId) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        self.order.iter().position(|&i| i == id)
    }

    /// Number of instances on the stack.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
