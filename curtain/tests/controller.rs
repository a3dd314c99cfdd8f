//! Tests for the dialog controller lifecycle.

use std::sync::{Arc, Mutex};

use curtain::{
    CloseReason, ControllerConfig, DialogComponent, DialogContext, DialogController, DialogKind,
    DialogKindRegistry, DialogOptions, DialogState, DialogView, MemoryHost, Mount, MountError,
    MountRequest, NodeHandle, ResolvedOptions,
};

/// Component that hands out the contexts it was built with.
struct Recorder<T> {
    contexts: Arc<Mutex<Vec<DialogContext<T>>>>,
}

impl<T> Recorder<T> {
    fn new() -> Self {
        Self {
            contexts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn handle(&self) -> Arc<Mutex<Vec<DialogContext<T>>>> {
        Arc::clone(&self.contexts)
    }
}

struct RecorderView<T> {
    message: Option<String>,
    #[allow(dead_code)]
    cx: DialogContext<T>,
}

impl<T: Send + 'static> DialogComponent for Recorder<T> {
    type Output = T;

    fn build(&self, options: &ResolvedOptions, cx: DialogContext<T>) -> DialogView {
        self.contexts.lock().unwrap().push(cx.clone());
        Box::new(RecorderView {
            message: options.get_str("message").map(String::from),
            cx,
        })
    }
}

/// Component with its own option defaults.
struct Sticky;

impl DialogComponent for Sticky {
    type Output = ();

    fn defaults(&self) -> DialogOptions {
        DialogOptions::new()
            .dismiss_on_backdrop(false)
            .with("title", "Sticky")
            .with("width", 40)
    }

    fn build(&self, _options: &ResolvedOptions, cx: DialogContext<()>) -> DialogView {
        Box::new(cx)
    }
}

/// Component that settles while it is still being built.
struct Eager {
    accepted: Arc<Mutex<Vec<bool>>>,
}

impl DialogComponent for Eager {
    type Output = i32;

    fn build(&self, _options: &ResolvedOptions, cx: DialogContext<i32>) -> DialogView {
        let mut accepted = self.accepted.lock().unwrap();
        accepted.push(cx.settle(7));
        accepted.push(cx.dismiss(CloseReason::UserCancelled));
        Box::new(cx)
    }
}

fn setup() -> (DialogController, Arc<MemoryHost>) {
    let host = Arc::new(MemoryHost::new());
    let controller = DialogController::new(Arc::new(DialogKindRegistry::new()), host.clone());
    (controller, host)
}

fn ctx<T>(contexts: &Arc<Mutex<Vec<DialogContext<T>>>>, index: usize) -> DialogContext<T> {
    contexts.lock().unwrap()[index].clone()
}

#[tokio::test]
async fn test_settle_resolves_with_same_value() {
    let (controller, host) = setup();
    let recorder = Recorder::<Arc<String>>::new();
    let contexts = recorder.handle();
    let kind = DialogKind::new("Prompt", recorder);

    let result = controller.open(&kind, DialogOptions::new());
    assert_eq!(result.state(), DialogState::Open);
    assert_eq!(controller.len(), 1);
    assert!(host.is_mounted(result.id()));

    let value = Arc::new(String::from("hello"));
    assert!(ctx(&contexts, 0).settle(Arc::clone(&value)));

    let resolved = result.await.unwrap();
    assert!(Arc::ptr_eq(&resolved, &value));
    assert!(controller.is_empty());
    assert!(host.mounted().is_empty());
}

#[tokio::test]
async fn test_second_settle_is_ignored() {
    let (controller, _host) = setup();
    let recorder = Recorder::<i32>::new();
    let contexts = recorder.handle();
    let kind = DialogKind::new("Number", recorder);

    let result = controller.open(&kind, DialogOptions::new());
    let cx = ctx(&contexts, 0);
    assert!(cx.settle(1));
    assert!(!cx.settle(2));

    assert_eq!(result.await, Ok(1));
}

#[tokio::test]
async fn test_settle_then_dismiss_first_wins() {
    let (controller, host) = setup();
    let recorder = Recorder::<bool>::new();
    let contexts = recorder.handle();
    let kind = DialogKind::new("Confirm", recorder);

    let result = controller.open(&kind, DialogOptions::new());
    let cx = ctx(&contexts, 0);
    assert!(cx.settle(true));
    assert!(!cx.dismiss(CloseReason::BackdropDismissed));
    assert!(!controller.cancel(result.id()));

    assert_eq!(result.await, Ok(true));
    assert_eq!(host.unmount_count(), 1);
}

#[tokio::test]
async fn test_confirm_cancelled_by_user() {
    let host = Arc::new(MemoryHost::new());
    let recorder = Recorder::<bool>::new();
    let contexts = recorder.handle();
    let mut registry = DialogKindRegistry::new();
    registry.register("Confirm", recorder).unwrap();
    let controller = DialogController::new(Arc::new(registry), host.clone());

    let result = controller
        .open_named::<Recorder<bool>>("Confirm", DialogOptions::new().with("message", "Delete?"))
        .unwrap();

    let message = host.with_view(result.id(), |view: &RecorderView<bool>| view.message.clone());
    assert_eq!(message, Some(Some("Delete?".to_string())));

    assert!(ctx(&contexts, 0).dismiss(CloseReason::UserCancelled));
    assert_eq!(result.await, Err(CloseReason::UserCancelled));
    assert!(controller.is_empty());
    assert!(host.mounted().is_empty());
}

#[tokio::test]
async fn test_close_top_closes_only_topmost() {
    let (controller, _host) = setup();
    let kind = DialogKind::new("Layer", Recorder::<()>::new());

    let mut a = controller.open(&kind, DialogOptions::new());
    let mut b = controller.open(&kind, DialogOptions::new());
    let c = controller.open(&kind, DialogOptions::new());

    assert_eq!(controller.top().map(|info| info.id), Some(c.id()));
    assert_eq!(controller.close_top(CloseReason::ForcedClose), Some(c.id()));
    assert_eq!(c.await, Err(CloseReason::ForcedClose));

    assert!(a.try_take().is_none());
    assert!(b.try_take().is_none());
    assert_eq!(controller.top().map(|info| info.id), Some(b.id()));
    assert_eq!(controller.len(), 2);
}

#[tokio::test]
async fn test_close_top_on_empty_stack_is_noop() {
    let (controller, host) = setup();
    assert_eq!(controller.close_top(CloseReason::EscapeKey), None);
    assert_eq!(controller.escape(), None);
    assert_eq!(controller.backdrop_click(), None);
    assert_eq!(host.unmount_count(), 0);
}

#[tokio::test]
async fn test_close_all_settles_everything() {
    let (controller, host) = setup();
    let kind = DialogKind::new("Layer", Recorder::<()>::new());

    let results: Vec<_> = (0..3)
        .map(|_| controller.open(&kind, DialogOptions::new()))
        .collect();
    assert_eq!(controller.len(), 3);

    assert_eq!(controller.close_all(CloseReason::ForcedClose), 3);
    assert!(controller.is_empty());
    assert_eq!(host.unmount_count(), 3);

    for result in results {
        assert_eq!(result.await, Err(CloseReason::ForcedClose));
    }
}

#[tokio::test]
async fn test_stack_size_tracks_open_instances() {
    let (controller, _host) = setup();
    let recorder = Recorder::<u8>::new();
    let contexts = recorder.handle();
    let kind = DialogKind::new("Layer", recorder);

    let mut results = Vec::new();
    for i in 0..4 {
        results.push(controller.open(&kind, DialogOptions::new()));
        assert_eq!(controller.len(), i + 1);
    }

    ctx(&contexts, 1).settle(1);
    assert_eq!(controller.len(), 3);
    ctx(&contexts, 1).settle(9);
    assert_eq!(controller.len(), 3);

    let open = results
        .iter()
        .filter(|r| controller.state(r.id()) == Some(DialogState::Open))
        .count();
    assert_eq!(open, controller.len());
}

#[tokio::test]
async fn test_out_of_order_cancel_keeps_order() {
    let (controller, _host) = setup();
    let kind = DialogKind::new("Layer", Recorder::<()>::new());

    let a = controller.open(&kind, DialogOptions::new());
    let b = controller.open(&kind, DialogOptions::new());
    let c = controller.open(&kind, DialogOptions::new());

    assert!(a.cancel());
    assert!(!a.cancel());
    assert_eq!(a.await, Err(CloseReason::ForcedClose));

    let order: Vec<_> = controller.open_dialogs().iter().map(|info| info.id).collect();
    assert_eq!(order, vec![c.id(), b.id()]);
}

#[tokio::test]
async fn test_mount_failure_rejects() {
    let (controller, host) = setup();
    let recorder = Recorder::<()>::new();
    let contexts = recorder.handle();
    let kind = DialogKind::new("Broken", recorder);

    host.fail_next_mount("no root node");
    let result = controller.open(&kind, DialogOptions::new());
    let id = result.id();

    assert_eq!(
        result.await,
        Err(CloseReason::MountFailed(MountError::new("no root node")))
    );
    assert_eq!(controller.state(id), Some(DialogState::Closed));
    assert!(controller.is_empty());
    assert!(!ctx(&contexts, 0).settle(()));
    assert_eq!(host.mount_count(), 0);
}

#[tokio::test]
async fn test_stack_limit_rejects() {
    let host = Arc::new(MemoryHost::new());
    let controller = DialogController::with_config(
        Arc::new(DialogKindRegistry::new()),
        host.clone(),
        ControllerConfig::new().max_open(2),
    );
    let kind = DialogKind::new("Layer", Recorder::<()>::new());

    let _a = controller.open(&kind, DialogOptions::new());
    let _b = controller.open(&kind, DialogOptions::new());
    let c = controller.open(&kind, DialogOptions::new());

    assert_eq!(c.await, Err(CloseReason::StackLimit { max: 2 }));
    assert_eq!(controller.len(), 2);
    assert_eq!(host.mount_count(), 2);
}

#[tokio::test]
async fn test_escape_and_backdrop_respect_options() {
    let (controller, _host) = setup();
    let kind = DialogKind::new("Layer", Recorder::<()>::new());

    let a = controller.open(&kind, DialogOptions::new());
    let b = controller.open(&kind, DialogOptions::new().dismiss_on_escape(false));

    assert_eq!(controller.escape(), None);
    assert_eq!(controller.len(), 2);

    assert_eq!(controller.backdrop_click(), Some(b.id()));
    assert_eq!(b.await, Err(CloseReason::BackdropDismissed));

    assert_eq!(controller.escape(), Some(a.id()));
    assert_eq!(a.await, Err(CloseReason::EscapeKey));
}

#[tokio::test]
async fn test_options_layering() {
    let host = Arc::new(MemoryHost::new());
    let controller = DialogController::with_config(
        Arc::new(DialogKindRegistry::new()),
        host,
        ControllerConfig::new().dismiss_on_escape(false),
    );
    let kind = DialogKind::new("Sticky", Sticky);

    let _result = controller.open(&kind, DialogOptions::new().with("width", 60).show_close(false));
    let options = controller.top().unwrap().options;

    assert!(!options.dismiss_on_backdrop);
    assert!(!options.dismiss_on_escape);
    assert!(!options.show_close);
    assert_eq!(options.get_str("title"), Some("Sticky"));
    assert_eq!(options.get("width"), Some(&serde_json::json!(60)));
}

#[tokio::test]
async fn test_dropping_controller_force_closes() {
    let (controller, host) = setup();
    let recorder = Recorder::<()>::new();
    let contexts = recorder.handle();
    let kind = DialogKind::new("Layer", recorder);

    let result = controller.open(&kind, DialogOptions::new());
    drop(controller);

    assert_eq!(result.await, Err(CloseReason::ForcedClose));
    assert!(host.mounted().is_empty());
    assert!(!ctx(&contexts, 0).settle(()));
}

#[tokio::test]
async fn test_state_transitions() {
    let (controller, _host) = setup();
    let recorder = Recorder::<()>::new();
    let contexts = recorder.handle();
    let kind = DialogKind::new("Layer", recorder);

    let result = controller.open(&kind, DialogOptions::new());
    let id = result.id();
    let cx = ctx(&contexts, 0);
    assert_eq!(cx.state(), DialogState::Open);
    assert!(!cx.is_closed());

    cx.settle(());
    assert_eq!(controller.state(id), Some(DialogState::Closed));
    assert!(cx.is_closed());
    assert_eq!(controller.state(curtain::InstanceId::new(99)), None);
}

#[tokio::test]
async fn test_changes_revision_advances() {
    let (controller, _host) = setup();
    let kind = DialogKind::new("Layer", Recorder::<()>::new());
    let changes = controller.changes();
    let before = *changes.borrow();

    let result = controller.open(&kind, DialogOptions::new());
    let opened = *changes.borrow();
    assert!(opened > before);

    result.cancel();
    assert!(*changes.borrow() > opened);
}

/// Host that closes every remaining dialog whenever one is unmounted.
struct CascadingHost {
    inner: MemoryHost,
    controller: Mutex<Option<DialogController>>,
}

impl Mount for CascadingHost {
    fn mount(&self, request: MountRequest) -> Result<NodeHandle, MountError> {
        self.inner.mount(request)
    }

    fn unmount(&self, node: NodeHandle) {
        self.inner.unmount(node);
        let controller = self.controller.lock().unwrap().clone();
        if let Some(controller) = controller {
            controller.close_all(CloseReason::ForcedClose);
        }
    }
}

#[tokio::test]
async fn test_reentrant_close_all_from_unmount() {
    let host = Arc::new(CascadingHost {
        inner: MemoryHost::new(),
        controller: Mutex::new(None),
    });
    let controller = DialogController::new(Arc::new(DialogKindRegistry::new()), host.clone());
    *host.controller.lock().unwrap() = Some(controller.clone());

    let recorder = Recorder::<()>::new();
    let contexts = recorder.handle();
    let kind = DialogKind::new("Layer", recorder);

    let a = controller.open(&kind, DialogOptions::new());
    let b = controller.open(&kind, DialogOptions::new());
    let c = controller.open(&kind, DialogOptions::new());

    assert!(ctx(&contexts, 1).cancel());

    assert_eq!(b.await, Err(CloseReason::UserCancelled));
    assert_eq!(a.await, Err(CloseReason::ForcedClose));
    assert_eq!(c.await, Err(CloseReason::ForcedClose));
    assert!(controller.is_empty());
    assert!(host.inner.mounted().is_empty());

    host.controller.lock().unwrap().take();
}

#[tokio::test]
async fn test_try_take_hands_out_outcome_once() {
    let (controller, _host) = setup();
    let recorder = Recorder::<i32>::new();
    let contexts = recorder.handle();
    let kind = DialogKind::new("Number", recorder);

    let mut result = controller.open(&kind, DialogOptions::new());
    assert!(result.try_take().is_none());

    ctx(&contexts, 0).settle(1);
    assert_eq!(result.try_take(), Some(Ok(1)));
    assert_eq!(result.try_take(), None);
}

#[tokio::test]
async fn test_settle_during_build_applies_after_mount() {
    let (controller, host) = setup();
    let accepted = Arc::new(Mutex::new(Vec::new()));
    let kind = DialogKind::new(
        "Eager",
        Eager {
            accepted: Arc::clone(&accepted),
        },
    );

    let result = controller.open(&kind, DialogOptions::new());
    let id = result.id();

    assert_eq!(*accepted.lock().unwrap(), vec![true, false]);
    assert_eq!(result.await, Ok(7));
    assert_eq!(controller.state(id), Some(DialogState::Closed));
    assert!(controller.is_empty());
    assert_eq!(host.mount_count(), 1);
    assert_eq!(host.unmount_count(), 1);
}

#[tokio::test]
async fn test_settle_during_build_loses_to_mount_failure() {
    let (controller, host) = setup();
    let kind = DialogKind::new(
        "Eager",
        Eager {
            accepted: Arc::new(Mutex::new(Vec::new())),
        },
    );

    host.fail_next_mount("no root node");
    let result = controller.open(&kind, DialogOptions::new());

    assert_eq!(
        result.await,
        Err(CloseReason::MountFailed(MountError::new("no root node")))
    );
    assert!(controller.is_empty());
}

#[test]
fn test_concurrent_close_top_closes_one_each() {
    let (controller, _host) = setup();
    let kind = DialogKind::new("Layer", Recorder::<()>::new());
    let results: Vec<_> = (0..8)
        .map(|_| controller.open(&kind, DialogOptions::new()))
        .collect();

    let mut closed: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| controller.close_top(CloseReason::ForcedClose)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(closed.iter().all(Option::is_some));
    closed.sort();
    closed.dedup();
    assert_eq!(closed.len(), results.len());
    assert!(controller.is_empty());
}
