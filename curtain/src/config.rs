//! Controller configuration.

use serde::Deserialize;

/// Framework-level defaults applied to every dialog a controller opens.
///
/// Individual components and open calls may override the dismissal flags;
/// `max_open` is controller-wide.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Whether clicking the backdrop dismisses a dialog.
    pub dismiss_on_backdrop: bool,

    /// Whether the escape key dismisses the topmost dialog.
    pub dismiss_on_escape: bool,

    /// Whether dialogs show an explicit close affordance.
    pub show_close: bool,

    /// Maximum concurrently open dialogs (None = unlimited).
    pub max_open: Option<usize>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            dismiss_on_backdrop: true,
            dismiss_on_escape: true,
            show_close: true,
            max_open: None,
        }
    }
}

impl ControllerConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether backdrop clicks dismiss dialogs.
    pub fn dismiss_on_backdrop(mut self, enabled: bool) -> Self {
        self.dismiss_on_backdrop = enabled;
        self
    }

    /// Set whether escape dismisses the topmost dialog.
    pub fn dismiss_on_escape(mut self, enabled: bool) -> Self {
        self.dismiss_on_escape = enabled;
        self
    }

    /// Set whether dialogs show a close affordance.
    pub fn show_close(mut self, enabled: bool) -> Self {
        self.show_close = enabled;
        self
    }

    /// Limit the number of concurrently open dialogs.
    pub fn max_open(mut self, max: usize) -> Self {
        self.max_open = Some(max);
        self
    }
}
