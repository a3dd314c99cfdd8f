//! Open-time dialog options and their resolution against defaults.

use serde_json::{Map, Value};

use crate::config::ControllerConfig;

/// Options supplied when opening a dialog, or as a component's defaults.
///
/// Unset flags fall through to the next layer. The payload is an arbitrary
/// JSON object handed to the component untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogOptions {
    dismiss_on_backdrop: Option<bool>,
    dismiss_on_escape: Option<bool>,
    show_close: Option<bool>,
    payload: Map<String, Value>,
}

impl DialogOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a payload entry.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Override whether backdrop clicks dismiss this dialog.
    pub fn dismiss_on_backdrop(mut self, enabled: bool) -> Self {
        self.dismiss_on_backdrop = Some(enabled);
        self
    }

    /// Override whether escape dismisses this dialog.
    pub fn dismiss_on_escape(mut self, enabled: bool) -> Self {
        self.dismiss_on_escape = Some(enabled);
        self
    }

    /// Override whether this dialog shows a close affordance.
    pub fn show_close(mut self, enabled: bool) -> Self {
        self.show_close = Some(enabled);
        self
    }

    /// The payload entries set so far.
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Layer `overrides` on top of `self`.
    ///
    /// Flags set in `overrides` win; payload keys in `overrides` replace
    /// keys of the same name.
    pub fn merge(mut self, overrides: DialogOptions) -> Self {
        self.dismiss_on_backdrop = overrides.dismiss_on_backdrop.or(self.dismiss_on_backdrop);
        self.dismiss_on_escape = overrides.dismiss_on_escape.or(self.dismiss_on_escape);
        self.show_close = overrides.show_close.or(self.show_close);
        self.payload.extend(overrides.payload);
        self
    }

    /// Fill every unset flag from the controller config.
    pub fn resolve(self, config: &ControllerConfig) -> ResolvedOptions {
        ResolvedOptions {
            dismiss_on_backdrop: self.dismiss_on_backdrop.unwrap_or(config.dismiss_on_backdrop),
            dismiss_on_escape: self.dismiss_on_escape.unwrap_or(config.dismiss_on_escape),
            show_close: self.show_close.unwrap_or(config.show_close),
            payload: self.payload,
        }
    }
}

impl From<Map<String, Value>> for DialogOptions {
    fn from(payload: Map<String, Value>) -> Self {
        Self {
            payload,
            ..Default::default()
        }
    }
}

/// Fully merged options for one dialog instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    /// Whether clicking the backdrop dismisses the dialog.
    pub dismiss_on_backdrop: bool,
    /// Whether escape dismisses the dialog while it is topmost.
    pub dismiss_on_escape: bool,
    /// Whether the dialog shows a close affordance.
    pub show_close: bool,
    /// Component-specific configuration.
    pub payload: Map<String, Value>,
}

impl ResolvedOptions {
    /// Look up a payload entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Look up a string payload entry.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}
