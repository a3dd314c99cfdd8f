//! Dialog instance identity, lifecycle state, and bookkeeping.

use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::host::NodeHandle;
use crate::options::ResolvedOptions;
use crate::reason::CloseReason;

/// Unique identifier for a dialog instance.
///
/// Issued monotonically by the controller that opened the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Create an instance ID from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dialog#{}", self.0)
    }
}

/// Lifecycle state of a dialog instance.
///
/// `Pending -> Open -> Closing -> Closed`, or `Pending -> Closed` when the
/// mount fails. Nothing ever returns to `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    /// Created, not yet mounted.
    Pending,
    /// Mounted and on the stack.
    Open,
    /// Settlement accepted, teardown in progress.
    Closing,
    /// Unmounted and settled.
    Closed,
}

/// Snapshot of an open dialog, for inspection and routing.
///
/// Only stacked, `Open` instances are reported this way; use
/// [`DialogController::state`](crate::DialogController::state) for others.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogInfo {
    /// Instance ID.
    pub id: InstanceId,
    /// Name of the dialog kind.
    pub kind: Arc<str>,
    /// Merged options the dialog was opened with.
    pub options: Arc<ResolvedOptions>,
}

/// Shared single-use result sender.
///
/// Whoever takes the sender first settles the dialog; later takers find `None`.
pub(crate) type Slot<T> = Arc<Mutex<Option<oneshot::Sender<Result<T, CloseReason>>>>>;

pub(crate) fn slot<T>(tx: oneshot::Sender<Result<T, CloseReason>>) -> Slot<T> {
    Arc::new(Mutex::new(Some(tx)))
}

/// Deliver an outcome through a slot. Returns false if it was already used.
pub(crate) fn deliver<T>(slot: &Slot<T>, outcome: Result<T, CloseReason>) -> bool {
    let Some(tx) = slot.lock().unwrap_or_else(|e| e.into_inner()).take() else {
        return false;
    };
    if tx.send(outcome).is_err() {
        log::debug!("Dialog result receiver dropped before settlement");
    }
    true
}

/// Type-erased rejection of a dialog's result channel.
///
/// Lets the controller dismiss instances whose value types it does not know.
pub(crate) trait Rejecter: Send {
    fn reject(&self, reason: CloseReason) -> bool;
}

impl<T: Send> Rejecter for Slot<T> {
    fn reject(&self, reason: CloseReason) -> bool {
        deliver(self, Err(reason))
    }
}

/// Deferred completion of a close, run with the instance's rejecter.
pub(crate) type Finish = Box<dyn FnOnce(Box<dyn Rejecter>) + Send>;

/// Controller-side record of a live instance.
pub(crate) struct InstanceRecord {
    pub kind: Arc<str>,
    pub state: DialogState,
    pub options: Arc<ResolvedOptions>,
    /// Present iff `state == Open`.
    pub node: Option<NodeHandle>,
    pub rejecter: Box<dyn Rejecter>,
    /// Settlement requested while still `Pending`, applied once mounted.
    pub deferred: Option<Finish>,
}

impl InstanceRecord {
    pub fn info(&self, id: InstanceId) -> DialogInfo {
        DialogInfo {
            id,
            kind: Arc::clone(&self.kind),
            options: Arc::clone(&self.options),
        }
    }
}
