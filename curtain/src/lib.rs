//! Modal dialog orchestration core.
//!
//! Register dialog kinds, open them through a [`DialogController`], and await
//! a single [`DialogResult`] per instance. Rendering is left to a host that
//! implements [`Mount`].
//!
//! ```ignore
//! let mut registry = DialogKindRegistry::new();
//! let confirm = registry.register("Confirm", ConfirmDialog)?;
//!
//! let dialogs = DialogController::new(Arc::new(registry), host);
//! match dialogs.open(&confirm, DialogOptions::new().with("message", "Delete?")).await {
//!     Ok(true) => delete(),
//!     Ok(false) | Err(_) => {}
//! }
//! ```

pub mod component;
pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod instance;
pub mod options;
pub mod prelude;
pub mod reason;
pub mod registry;
pub mod result;
pub mod stack;

pub use component::{DialogComponent, DialogContext};
pub use config::ControllerConfig;
pub use controller::DialogController;
pub use error::{MountError, RegistryError};
pub use host::{DialogView, MemoryHost, Mount, MountRequest, NodeHandle};
pub use instance::{DialogInfo, DialogState, InstanceId};
pub use options::{DialogOptions, ResolvedOptions};
pub use reason::CloseReason;
pub use registry::{AnyKind, DialogKind, DialogKindRegistry, KindRegistration};
pub use result::DialogResult;
pub use stack::DialogStack;
