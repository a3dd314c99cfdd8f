//! Dialog component contract and the context handed to components.
//!
//! A component is the pluggable part of a dialog: it knows how to build its
//! own view and decides when to settle. The controller treats it as opaque.

use std::sync::Weak;

use crate::controller::Shared;
use crate::host::DialogView;
use crate::instance::{DialogState, InstanceId, Slot, deliver};
use crate::options::{DialogOptions, ResolvedOptions};
use crate::reason::CloseReason;

/// A dialog variant that can be registered as a kind and opened.
///
/// # Example
///
/// ```ignore
/// struct Confirm;
///
/// impl DialogComponent for Confirm {
///     type Output = bool;
///
///     fn build(&self, options: &ResolvedOptions, cx: DialogContext<bool>) -> DialogView {
///         Box::new(ConfirmView::new(options.get_str("message"), cx))
///     }
/// }
/// ```
pub trait DialogComponent: Send + Sync + 'static {
    /// The value a successful dialog resolves with.
    type Output: Send + 'static;

    /// Options this component prefers, layered between the controller's
    /// config and the open-time options.
    fn defaults(&self) -> DialogOptions {
        DialogOptions::default()
    }

    /// Build the view for one instance.
    ///
    /// The view owns `cx` (or a clone of it) and calls
    /// [`DialogContext::settle`] or [`DialogContext::dismiss`] on user action.
    fn build(&self, options: &ResolvedOptions, cx: DialogContext<Self::Output>) -> DialogView;
}

/// Handle a mounted component uses to finish its dialog.
///
/// The first successful `settle` or `dismiss` wins. Every later call, from
/// any clone, is ignored and returns `false`. Calls made from inside
/// [`DialogComponent::build`] take effect once the dialog is mounted.
pub struct DialogContext<T> {
    id: InstanceId,
    slot: Slot<T>,
    shared: Weak<Shared>,
}

impl<T: Send + 'static> DialogContext<T> {
    pub(crate) fn new(id: InstanceId, slot: Slot<T>, shared: Weak<Shared>) -> Self {
        Self { id, slot, shared }
    }

    /// The instance this context belongs to.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Close the dialog and resolve the caller's result with `value`.
    ///
    /// Returns false if the dialog was already settled or dismissed.
    pub fn settle(&self, value: T) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            log::debug!("{}: settle after controller dropped", self.id);
            return false;
        };
        let slot = std::sync::Arc::clone(&self.slot);
        let settled = shared.close(self.id, move |_| {
            deliver(&slot, Ok(value));
        });
        if !settled {
            log::debug!("{}: ignoring settle, dialog already settled", self.id);
        }
        settled
    }

    /// Close the dialog and reject the caller's result with `reason`.
    ///
    /// Returns false if the dialog was already settled or dismissed.
    pub fn dismiss(&self, reason: CloseReason) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            log::debug!("{}: dismiss after controller dropped", self.id);
            return false;
        };
        let dismissed = shared.dismiss(self.id, reason);
        if !dismissed {
            log::debug!("{}: ignoring dismiss, dialog already settled", self.id);
        }
        dismissed
    }

    /// Shorthand for `dismiss(CloseReason::UserCancelled)`.
    pub fn cancel(&self) -> bool {
        self.dismiss(CloseReason::UserCancelled)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DialogState {
        self.shared
            .upgrade()
            .and_then(|shared| shared.state(self.id))
            .unwrap_or(DialogState::Closed)
    }

    /// Whether the dialog has left the open state.
    pub fn is_closed(&self) -> bool {
        matches!(self.state(), DialogState::Closing | DialogState::Closed)
    }
}

impl<T> Clone for DialogContext<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            slot: std::sync::Arc::clone(&self.slot),
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for DialogContext<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogContext").field("id", &self.id).finish()
    }
}
