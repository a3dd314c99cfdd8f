//! Line-driven demo of the dialog controller.
//!
//! Commands: `confirm <message>`, `input <title>`, `yes`, `no`,
//! `type <text>`, `cancel`, `esc`, `click-out`, `close-all`, `list`, `quit`.

mod config;
mod dialogs;
mod error;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use curtain::prelude::*;
use curtain::DialogInfo;
use log::info;
use simplelog::{Config, WriteLogger};
use tokio::io::{AsyncBufReadExt, BufReader};

use config::DemoConfig;
use dialogs::{ConfirmDialog, ConfirmView, InputDialog, InputView};
use error::DemoError;

inventory::submit! {
    KindRegistration::new::<ConfirmDialog>("Confirm")
}

inventory::submit! {
    KindRegistration::new::<InputDialog>("Input")
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), DemoError> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = DemoConfig::load(config_path.as_deref())?;

    let log_file = File::create(&config.log_file)?;
    WriteLogger::init(config.level()?, Config::default(), log_file)?;

    let registry = DialogKindRegistry::from_inventory()?;
    info!("Dialog kinds: {:?}", registry.names());

    let host = Arc::new(MemoryHost::new());
    let dialogs = DialogController::with_config(Arc::new(registry), host.clone(), config.controller);

    let mut changes = dialogs.changes();
    let render_host = host.clone();
    tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            render(&render_host);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let (command, arg) = match line.trim().split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line.trim(), ""),
        };

        match command {
            "confirm" => {
                let options = DialogOptions::new().with("message", arg);
                let result = dialogs.open_named::<ConfirmDialog>("Confirm", options)?;
                report(result);
            }
            "input" => {
                let options = DialogOptions::new()
                    .with("title", arg)
                    .with("placeholder", "enter a value");
                let result = dialogs.open_named::<InputDialog>("Input", options)?;
                report(result);
            }
            "yes" | "no" => match top_view(&dialogs, &host, |view: &ConfirmView| view.cx.clone()) {
                Some(cx) => {
                    cx.settle(command == "yes");
                }
                None => println!("top dialog is not a confirmation"),
            },
            "type" => {
                let checked = top_view(&dialogs, &host, |view: &InputView| {
                    (view.validate(arg), view.cx.clone())
                });
                match checked {
                    Some((Ok(()), cx)) => {
                        cx.settle(arg.to_string());
                    }
                    Some((Err(problem), _)) => println!("invalid input: {}", problem),
                    None => println!("top dialog is not an input"),
                }
            }
            "cancel" => {
                if dialogs.close_top(CloseReason::UserCancelled).is_none() {
                    println!("no dialog open");
                }
            }
            "esc" => {
                if dialogs.escape().is_none() {
                    println!("escape ignored");
                }
            }
            "click-out" => {
                if dialogs.backdrop_click().is_none() {
                    println!("backdrop click ignored");
                }
            }
            "close-all" => {
                let closed = dialogs.close_all(CloseReason::ForcedClose);
                println!("closed {} dialogs", closed);
            }
            "list" => list(&dialogs),
            "quit" => break,
            "" => {}
            other => println!("unknown command: {}", other),
        }
    }

    dialogs.close_all(CloseReason::ForcedClose);
    Ok(())
}

/// Print each dialog's outcome once it settles.
fn report<T: std::fmt::Debug + Send + 'static>(result: DialogResult<T>) {
    let id = result.id();
    tokio::spawn(async move {
        match result.await {
            Ok(value) => println!("{} -> {:?}", id, value),
            Err(reason) => println!("{} closed: {}", id, reason),
        }
    });
}

/// Read from the topmost dialog's view, if it has type `V`.
fn top_view<V: 'static, R>(
    dialogs: &DialogController,
    host: &MemoryHost,
    f: impl FnOnce(&V) -> R,
) -> Option<R> {
    let top = dialogs.top()?;
    host.with_view(top.id, f)
}

fn render(host: &MemoryHost) {
    for (depth, (id, _)) in host.mounted().into_iter().enumerate() {
        let line = host
            .with_view(id, |view: &ConfirmView| view.render())
            .or_else(|| host.with_view(id, |view: &InputView| view.render()))
            .unwrap_or_default();
        println!("{}{} {}", "  ".repeat(depth), id, line);
    }
}

fn list(dialogs: &DialogController) {
    let open: Vec<DialogInfo> = dialogs.open_dialogs();
    if open.is_empty() {
        println!("no dialogs open");
    }
    for info in open {
        println!("{} {}", info.id, info.kind);
    }
}
