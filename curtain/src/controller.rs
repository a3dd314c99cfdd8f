//! Dialog controller: opens, tracks, and tears down dialog instances.
//!
//! The controller owns every instance record. The stack only holds ids,
//! and every close, whatever triggered it, goes through [`Shared::close`]:
//!
//! 1. under the lock: `Open -> Closing`, take the node, remove from the stack
//! 2. unmount the node through the host
//! 3. under the lock: drop the record (`Closed`)
//! 4. settle the caller's result
//!
//! The lock is never held while calling the host or a component, so those
//! may call back into the controller. Step 1 is the settlement guard: a
//! second close of the same instance finds it no longer `Open` and does
//! nothing.
//!
//! A component may settle from inside `build`, before it is mounted. The
//! first such settlement is parked on the record and replayed right after
//! the instance becomes `Open`. If the mount fails, the mount error wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info, warn};
use tokio::sync::{oneshot, watch};

use crate::component::{DialogComponent, DialogContext};
use crate::config::ControllerConfig;
use crate::error::RegistryError;
use crate::host::{Mount, MountRequest, NodeHandle};
use crate::instance::{self, DialogInfo, DialogState, InstanceId, InstanceRecord, Rejecter};
use crate::options::DialogOptions;
use crate::reason::CloseReason;
use crate::registry::{DialogKind, DialogKindRegistry};
use crate::result::DialogResult;
use crate::stack::DialogStack;

#[derive(Default)]
struct Inner {
    /// Last issued instance id.
    last_id: u64,
    instances: HashMap<InstanceId, InstanceRecord>,
    stack: DialogStack,
}

/// State shared between the controller, dialog contexts, and results.
pub(crate) struct Shared {
    inner: Mutex<Inner>,
    host: Arc<dyn Mount>,
    config: ControllerConfig,
    revision: watch::Sender<u64>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    pub(crate) fn state(&self, id: InstanceId) -> Option<DialogState> {
        let inner = self.lock();
        if let Some(record) = inner.instances.get(&id) {
            return Some(record.state);
        }
        // Issued ids without a record have finished.
        (id.raw() >= 1 && id.raw() <= inner.last_id).then_some(DialogState::Closed)
    }

    /// Close an open instance, then hand its rejecter to `finish`.
    ///
    /// A `Pending` instance keeps the first `finish` and runs it as soon as
    /// it is mounted. Returns false, without calling `finish`, if the
    /// instance already has a settlement.
    pub(crate) fn close(
        &self,
        id: InstanceId,
        finish: impl FnOnce(Box<dyn Rejecter>) + Send + 'static,
    ) -> bool {
        let node = {
            let mut inner = self.lock();
            let Some(record) = inner.instances.get_mut(&id) else {
                return false;
            };
            if record.state == DialogState::Pending {
                if record.deferred.is_some() {
                    return false;
                }
                debug!("{} settled before mount, deferring", id);
                record.deferred = Some(Box::new(finish));
                return true;
            }
            if record.state != DialogState::Open {
                return false;
            }
            record.state = DialogState::Closing;
            let node = record.node.take();
            inner.stack.remove(id);
            node
        };
        self.bump();

        if let Some(node) = node {
            self.host.unmount(node);
        }

        let Some(record) = self.lock().instances.remove(&id) else {
            return true;
        };
        info!("Closed {} ({})", id, record.kind);
        finish(record.rejecter);
        true
    }

    pub(crate) fn dismiss(&self, id: InstanceId, reason: CloseReason) -> bool {
        debug!("Dismissing {}: {}", id, reason);
        self.close(id, move |rejecter| {
            rejecter.reject(reason);
        })
    }

    fn top_where(&self, allowed: impl Fn(&InstanceRecord) -> bool) -> Option<InstanceId> {
        let inner = self.lock();
        let top = inner.stack.top()?;
        let record = inner.instances.get(&top)?;
        allowed(record).then_some(top)
    }

    /// Dismiss whatever is topmost when the call runs.
    ///
    /// Stacked instances are always `Open`, so a failed dismiss means
    /// another caller just closed that top; retry with the new one.
    fn dismiss_top(
        &self,
        reason: CloseReason,
        allowed: impl Fn(&InstanceRecord) -> bool,
    ) -> Option<InstanceId> {
        loop {
            let top = self.top_where(&allowed)?;
            if self.dismiss(top, reason.clone()) {
                return Some(top);
            }
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let records: Vec<(InstanceId, InstanceRecord)> = {
            let inner = self.inner.get_mut().unwrap_or_else(|e| e.into_inner());
            inner.stack = DialogStack::new();
            inner.instances.drain().collect()
        };
        for (id, record) in records {
            debug!("Controller dropped, force-closing {}", id);
            if let Some(node) = record.node {
                self.host.unmount(node);
            }
            record.rejecter.reject(CloseReason::ForcedClose);
        }
    }
}

/// Opens dialogs and manages the stack of open ones.
///
/// Cheap to clone; clones share the same stack. Dropping the last clone
/// unmounts and force-closes whatever is still open.
#[derive(Clone)]
pub struct DialogController {
    shared: Arc<Shared>,
    registry: Arc<DialogKindRegistry>,
}

impl DialogController {
    /// Create a controller with default configuration.
    pub fn new(registry: Arc<DialogKindRegistry>, host: Arc<dyn Mount>) -> Self {
        Self::with_config(registry, host, ControllerConfig::default())
    }

    /// Create a controller with the given configuration.
    pub fn with_config(
        registry: Arc<DialogKindRegistry>,
        host: Arc<dyn Mount>,
        config: ControllerConfig,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner::default()),
                host,
                config,
                revision,
            }),
            registry,
        }
    }

    /// The registry used by [`DialogController::open_named`].
    pub fn registry(&self) -> &DialogKindRegistry {
        &self.registry
    }

    /// The controller's configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.shared.config
    }

    /// Open a dialog of `kind`.
    ///
    /// Returns immediately. The result settles exactly once: with the value
    /// the component settles with, or with the reason it was closed. Mount
    /// failures and the stack limit are reported the same way.
    pub fn open<C: DialogComponent>(
        &self,
        kind: &DialogKind<C>,
        options: DialogOptions,
    ) -> DialogResult<C::Output> {
        let (tx, rx) = oneshot::channel();
        let slot = instance::slot(tx);
        let resolved = Arc::new(
            kind.component()
                .defaults()
                .merge(options)
                .resolve(&self.shared.config),
        );

        let id = {
            let mut inner = self.shared.lock();
            inner.last_id += 1;
            let id = InstanceId::new(inner.last_id);

            if let Some(max) = self.shared.config.max_open {
                if inner.stack.len() >= max {
                    drop(inner);
                    warn!("Refusing to open {} ({}): {} dialogs open", id, kind.name(), max);
                    instance::deliver(&slot, Err(CloseReason::StackLimit { max }));
                    return DialogResult::new(id, rx, Arc::downgrade(&self.shared));
                }
            }

            inner.instances.insert(
                id,
                InstanceRecord {
                    kind: kind.name_arc(),
                    state: DialogState::Pending,
                    options: Arc::clone(&resolved),
                    node: None,
                    rejecter: Box::new(Arc::clone(&slot)),
                    deferred: None,
                },
            );
            id
        };

        let cx = DialogContext::new(id, Arc::clone(&slot), Arc::downgrade(&self.shared));
        let view = kind.component().build(&resolved, cx);
        let request = MountRequest {
            id,
            kind: kind.name_arc(),
            options: resolved,
            view,
        };

        match self.shared.host.mount(request) {
            Ok(node) => self.attach(id, node),
            Err(err) => {
                self.shared.lock().instances.remove(&id);
                warn!("Failed to mount {} ({}): {}", id, kind.name(), err);
                instance::deliver(&slot, Err(CloseReason::MountFailed(err)));
            }
        }

        DialogResult::new(id, rx, Arc::downgrade(&self.shared))
    }

    fn attach(&self, id: InstanceId, node: NodeHandle) {
        let attached = {
            let mut inner = self.shared.lock();
            match inner.instances.get_mut(&id) {
                Some(record) => {
                    record.state = DialogState::Open;
                    record.node = Some(node);
                    let deferred = record.deferred.take();
                    info!("Opened {} ({})", id, record.kind);
                    inner.stack.push(id);
                    Some(deferred)
                }
                None => None,
            }
        };
        match attached {
            Some(deferred) => {
                self.shared.bump();
                if let Some(finish) = deferred {
                    self.shared.close(id, finish);
                }
            }
            None => self.shared.host.unmount(node),
        }
    }

    /// Resolve `name` in the registry and open it.
    ///
    /// Registry errors are returned immediately; everything after that is
    /// reported through the result.
    pub fn open_named<C: DialogComponent>(
        &self,
        name: &str,
        options: DialogOptions,
    ) -> Result<DialogResult<C::Output>, RegistryError> {
        let kind = self.registry.resolve::<C>(name)?;
        Ok(self.open(&kind, options))
    }

    /// Dismiss the topmost dialog. No-op on an empty stack.
    ///
    /// If another caller closes the top first, the next one down is
    /// dismissed instead; `None` means the stack was empty.
    pub fn close_top(&self, reason: CloseReason) -> Option<InstanceId> {
        self.shared.dismiss_top(reason, |_| true)
    }

    /// Dismiss every open dialog, topmost first. Returns how many closed.
    pub fn close_all(&self, reason: CloseReason) -> usize {
        let snapshot = self.shared.lock().stack.all();
        snapshot
            .into_iter()
            .filter(|&id| self.shared.dismiss(id, reason.clone()))
            .count()
    }

    /// Force-close a specific dialog.
    pub fn cancel(&self, id: InstanceId) -> bool {
        self.shared.dismiss(id, CloseReason::ForcedClose)
    }

    /// Route an escape key press to the topmost dialog.
    ///
    /// Dismisses it unless its options disable escape.
    pub fn escape(&self) -> Option<InstanceId> {
        self.shared
            .dismiss_top(CloseReason::EscapeKey, |record| record.options.dismiss_on_escape)
    }

    /// Route a backdrop click to the topmost dialog.
    ///
    /// Dismisses it unless its options disable backdrop dismissal.
    pub fn backdrop_click(&self) -> Option<InstanceId> {
        self.shared.dismiss_top(CloseReason::BackdropDismissed, |record| {
            record.options.dismiss_on_backdrop
        })
    }

    /// The topmost open dialog.
    pub fn top(&self) -> Option<DialogInfo> {
        let inner = self.shared.lock();
        let top = inner.stack.top()?;
        inner.instances.get(&top).map(|record| record.info(top))
    }

    /// All open dialogs, topmost first.
    pub fn open_dialogs(&self) -> Vec<DialogInfo> {
        let inner = self.shared.lock();
        inner
            .stack
            .all()
            .into_iter()
            .filter_map(|id| inner.instances.get(&id).map(|record| record.info(id)))
            .collect()
    }

    /// Lifecycle state of an instance, or None if the id was never issued.
    pub fn state(&self, id: InstanceId) -> Option<DialogState> {
        self.shared.state(id)
    }

    /// Number of open dialogs.
    pub fn len(&self) -> usize {
        self.shared.lock().stack.len()
    }

    /// Whether no dialogs are open.
    pub fn is_empty(&self) -> bool {
        self.shared.lock().stack.is_empty()
    }

    /// Subscribe to stack changes.
    ///
    /// The value is a revision counter bumped whenever a dialog opens or
    /// starts closing. Hosts use it to schedule a redraw.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }
}
