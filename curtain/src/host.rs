//! Mounting substrate interface and an in-memory reference host.
//!
//! The controller never renders anything itself. It hands a component's
//! built view to a [`Mount`] implementation and keeps the returned
//! [`NodeHandle`] until the dialog closes.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::MountError;
use crate::instance::InstanceId;
use crate::options::ResolvedOptions;

/// Opaque, host-specific view produced by a dialog component.
///
/// Hosts downcast it to whatever node type they know how to render.
pub type DialogView = Box<dyn Any + Send>;

/// Handle to a node attached by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(u64);

impl NodeHandle {
    /// Create a node handle from a raw value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw handle value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Everything the host needs to attach one dialog.
pub struct MountRequest {
    /// Instance being mounted.
    pub id: InstanceId,
    /// Name of the dialog kind.
    pub kind: Arc<str>,
    /// Merged options, for hosts that draw backdrops or close buttons.
    pub options: Arc<ResolvedOptions>,
    /// The component's view.
    pub view: DialogView,
}

/// The host application's mounting substrate.
///
/// Implementations must tolerate `unmount` being called for a handle that
/// is already gone.
pub trait Mount: Send + Sync {
    /// Attach a dialog to the live tree.
    fn mount(&self, request: MountRequest) -> Result<NodeHandle, MountError>;

    /// Detach a previously mounted node.
    fn unmount(&self, node: NodeHandle);
}

struct MountedNode {
    id: InstanceId,
    kind: Arc<str>,
    view: DialogView,
}

#[derive(Default)]
struct HostInner {
    next_handle: u64,
    nodes: HashMap<NodeHandle, MountedNode>,
    order: Vec<NodeHandle>,
    fail_next: Option<String>,
    mounts: usize,
    unmounts: usize,
}

/// In-process host that keeps mounted views in a map.
///
/// Useful for tests, headless runs, and as a starting point for a real
/// host. Mount order is preserved, so [`MemoryHost::mounted`] matches paint
/// order.
#[derive(Default)]
pub struct MemoryHost {
    inner: Mutex<HostInner>,
}

impl MemoryHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HostInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make the next `mount` call fail with `message`.
    pub fn fail_next_mount(&self, message: impl Into<String>) {
        self.lock().fail_next = Some(message.into());
    }

    /// Instances currently attached, bottom to top.
    pub fn mounted(&self) -> Vec<(InstanceId, Arc<str>)> {
        let inner = self.lock();
        inner
            .order
            .iter()
            .filter_map(|handle| inner.nodes.get(handle))
            .map(|node| (node.id, Arc::clone(&node.kind)))
            .collect()
    }

    /// Whether an instance is currently attached.
    pub fn is_mounted(&self, id: InstanceId) -> bool {
        self.lock().nodes.values().any(|node| node.id == id)
    }

    /// Borrow the view of a mounted instance as `V`.
    ///
    /// The host is locked while `f` runs; do not settle or dismiss dialogs
    /// from inside it. Clone what you need out instead.
    pub fn with_view<V: 'static, R>(&self, id: InstanceId, f: impl FnOnce(&V) -> R) -> Option<R> {
        let inner = self.lock();
        let node = inner.nodes.values().find(|node| node.id == id)?;
        node.view.downcast_ref::<V>().map(f)
    }

    /// Number of successful mounts so far.
    pub fn mount_count(&self) -> usize {
        self.lock().mounts
    }

    /// Number of nodes actually detached so far.
    pub fn unmount_count(&self) -> usize {
        self.lock().unmounts
    }
}

impl Mount for MemoryHost {
    fn mount(&self, request: MountRequest) -> Result<NodeHandle, MountError> {
        let mut inner = self.lock();
        if let Some(message) = inner.fail_next.take() {
            return Err(MountError::new(message));
        }

        inner.next_handle += 1;
        let handle = NodeHandle::new(inner.next_handle);
        inner.nodes.insert(
            handle,
            MountedNode {
                id: request.id,
                kind: request.kind,
                view: request.view,
            },
        );
        inner.order.push(handle);
        inner.mounts += 1;
        Ok(handle)
    }

    fn unmount(&self, node: NodeHandle) {
        let mut inner = self.lock();
        if inner.nodes.remove(&node).is_none() {
            log::debug!("MemoryHost: node {} already unmounted", node.raw());
            return;
        }
        inner.order.retain(|&h| h != node);
        inner.unmounts += 1;
    }
}
