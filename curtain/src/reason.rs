//! Reasons a dialog closed without producing a value.

use thiserror::Error;

use crate::error::MountError;

/// Why a dialog was closed without a value.
///
/// Delivered as the error side of a [`DialogResult`](crate::DialogResult).
/// Open-time failures (mounting, stack limit) arrive through the same
/// channel so callers handle a single outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CloseReason {
    /// The user cancelled from inside the dialog (cancel button, close affordance).
    #[error("cancelled by user")]
    UserCancelled,

    /// The user clicked outside the dialog.
    #[error("dismissed by backdrop click")]
    BackdropDismissed,

    /// The user pressed escape while the dialog was topmost.
    #[error("dismissed by escape key")]
    EscapeKey,

    /// The application closed the dialog programmatically.
    #[error("closed by the application")]
    ForcedClose,

    /// The host failed to mount the dialog.
    #[error(transparent)]
    MountFailed(#[from] MountError),

    /// Too many dialogs were already open.
    #[error("dialog stack limit ({max}) reached")]
    StackLimit {
        /// The configured maximum.
        max: usize,
    },
}

impl CloseReason {
    /// Whether the user, as opposed to the application or host, caused the close.
    pub fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            CloseReason::UserCancelled | CloseReason::BackdropDismissed | CloseReason::EscapeKey
        )
    }
}
