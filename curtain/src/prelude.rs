//! Prelude module for convenient imports.
//!
//! ```ignore
//! use curtain::prelude::*;
//! ```

pub use crate::component::{DialogComponent, DialogContext};
pub use crate::config::ControllerConfig;
pub use crate::controller::DialogController;
pub use crate::host::{DialogView, MemoryHost, Mount};
pub use crate::options::{DialogOptions, ResolvedOptions};
pub use crate::reason::CloseReason;
pub use crate::registry::{DialogKind, DialogKindRegistry, KindRegistration};
pub use crate::result::DialogResult;
