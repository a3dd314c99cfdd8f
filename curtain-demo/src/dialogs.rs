//! Dialog variants used by the demo.

use curtain::prelude::*;

/// Yes/no confirmation. Resolves with `true` on yes.
#[derive(Default)]
pub struct ConfirmDialog;

/// Rendered state of a confirmation.
pub struct ConfirmView {
    /// Heading, from the `title` option.
    pub title: String,
    /// Question shown to the user, from the `message` option.
    pub message: String,
    /// Settles with the user's answer.
    pub cx: DialogContext<bool>,
}

impl DialogComponent for ConfirmDialog {
    type Output = bool;

    fn defaults(&self) -> DialogOptions {
        DialogOptions::new().with("title", "Confirm")
    }

    fn build(&self, options: &ResolvedOptions, cx: DialogContext<bool>) -> DialogView {
        Box::new(ConfirmView {
            title: options.get_str("title").unwrap_or_default().to_string(),
            message: options.get_str("message").unwrap_or_default().to_string(),
            cx,
        })
    }
}

impl ConfirmView {
    /// One-line text rendering for the terminal.
    pub fn render(&self) -> String {
        format!("[{}] {} (yes/no)", self.title, self.message)
    }
}

/// Single-line text prompt. Resolves with the entered text.
#[derive(Default)]
pub struct InputDialog;

/// Rendered state of a text prompt.
pub struct InputView {
    /// Heading, from the `title` option.
    pub title: String,
    /// Hint shown before anything is typed.
    pub placeholder: String,
    /// Whether blank input is accepted (`allowEmpty` option).
    pub allow_empty: bool,
    /// Settles with the entered text.
    pub cx: DialogContext<String>,
}

impl DialogComponent for InputDialog {
    type Output = String;

    fn defaults(&self) -> DialogOptions {
        DialogOptions::new()
            .dismiss_on_backdrop(false)
            .with("title", "Input")
            .with("allowEmpty", false)
    }

    fn build(&self, options: &ResolvedOptions, cx: DialogContext<String>) -> DialogView {
        Box::new(InputView {
            title: options.get_str("title").unwrap_or_default().to_string(),
            placeholder: options.get_str("placeholder").unwrap_or_default().to_string(),
            allow_empty: options
                .get("allowEmpty")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            cx,
        })
    }
}

impl InputView {
    /// One-line text rendering for the terminal.
    pub fn render(&self) -> String {
        format!("[{}] {} (type <text>)", self.title, self.placeholder)
    }

    /// Check the entered text before settling.
    pub fn validate(&self, text: &str) -> Result<(), &'static str> {
        if text.trim().is_empty() && !self.allow_empty {
            return Err("a value is required");
        }
        Ok(())
    }
}
