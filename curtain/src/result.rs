//! The awaitable returned by [`DialogController::open`](crate::DialogController::open).

use std::future::Future;
use std::pin::Pin;
use std::sync::Weak;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::controller::Shared;
use crate::instance::{DialogState, InstanceId};
use crate::reason::CloseReason;

/// Pending outcome of one dialog.
///
/// Resolves to `Ok(value)` when the dialog settles, or `Err(reason)` when it
/// is dismissed or fails to open. Dropping the result does not close the
/// dialog; use [`DialogResult::cancel`] for that.
///
/// The outcome is delivered once. After [`DialogResult::try_take`] has
/// returned it, further `try_take` calls return `None` and awaiting the
/// result never completes.
#[must_use = "a dialog result does nothing unless awaited or cancelled"]
pub struct DialogResult<T> {
    id: InstanceId,
    /// None once the outcome has been handed out.
    rx: Option<oneshot::Receiver<Result<T, CloseReason>>>,
    shared: Weak<Shared>,
}

impl<T> DialogResult<T> {
    pub(crate) fn new(
        id: InstanceId,
        rx: oneshot::Receiver<Result<T, CloseReason>>,
        shared: Weak<Shared>,
    ) -> Self {
        Self {
            id,
            rx: Some(rx),
            shared,
        }
    }

    /// The instance this result belongs to.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Current lifecycle state of the dialog.
    pub fn state(&self) -> DialogState {
        self.shared
            .upgrade()
            .and_then(|shared| shared.state(self.id))
            .unwrap_or(DialogState::Closed)
    }

    /// Force-close the dialog. The result rejects with `ForcedClose`.
    ///
    /// Returns false if the dialog was not open.
    pub fn cancel(&self) -> bool {
        match self.shared.upgrade() {
            Some(shared) => shared.dismiss(self.id, CloseReason::ForcedClose),
            None => false,
        }
    }

    /// Take the outcome if the dialog has already settled.
    ///
    /// Returns `None` while the dialog is open and after the outcome was
    /// already taken.
    pub fn try_take(&mut self) -> Option<Result<T, CloseReason>> {
        let outcome = match self.rx.as_mut()?.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => Err(CloseReason::ForcedClose),
        };
        self.rx = None;
        Some(outcome)
    }
}

impl<T> Future for DialogResult<T> {
    type Output = Result<T, CloseReason>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let Some(rx) = this.rx.as_mut() else {
            log::warn!("{} polled after its outcome was taken", this.id);
            return Poll::Pending;
        };
        let outcome = match Pin::new(rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => outcome,
            Poll::Ready(Err(_)) => {
                log::warn!("{} abandoned without a result", this.id);
                Err(CloseReason::ForcedClose)
            }
            Poll::Pending => return Poll::Pending,
        };
        this.rx = None;
        Poll::Ready(outcome)
    }
}

impl<T> std::fmt::Debug for DialogResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogResult").field("id", &self.id).finish()
    }
}
