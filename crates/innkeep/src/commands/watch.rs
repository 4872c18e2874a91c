//! `innkeep watch`: follow the realtime relay and print every notification.

use std::io::{IsTerminal, Write};
use std::time::Duration;

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::broadcast::error::RecvError;

use innkeep_core::{Console, Notification};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

const SPINNER_TICK: Duration = Duration::from_millis(100);

fn spinner(global: &GlobalOpts) -> ProgressBar {
    if global.quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
    );
    bar.enable_steady_tick(SPINNER_TICK);
    bar
}

fn format_line(n: &Notification, json: bool, color: bool) -> String {
    if json {
        return serde_json::to_string(n).unwrap_or_default();
    }
    let at = n.at.with_timezone(&Local).format("%H:%M:%S");
    format!("{at} {}", output::format_notification(n, color))
}

/// Wait for the first successful handshake, showing relay errors as the
/// relay retries.
async fn wait_connected(console: &Console, bar: &ProgressBar) {
    bar.set_message("connecting to the realtime relay...");
    let mut ticker = tokio::time::interval(SPINNER_TICK);
    loop {
        ticker.tick().await;
        if console.is_connected().await {
            break;
        }
        if let Some(err) = console.connection_error().await {
            bar.set_message(format!("retrying: {err}"));
        }
    }
}

pub async fn handle(args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let resolved = config::resolve(global)?;
    let sessions = config::session_store(global, &resolved);
    let mut console_config = resolved.console;
    console_config.realtime_enabled = true;

    let console = Console::new(console_config, sessions)?;
    let mut notifications = console.notifications();
    let user = console.connect().await?;

    let bar = spinner(global);
    tokio::select! {
        () = wait_connected(&console, &bar) => {
            bar.finish_and_clear();
        }
        _ = tokio::signal::ctrl_c() => {
            bar.finish_and_clear();
            console.disconnect().await;
            return Ok(());
        }
    }

    if !global.quiet && !args.json {
        let who = user.email.as_deref().or(user.name.as_deref()).unwrap_or("operator");
        let scope = console
            .property()
            .map_or_else(|| "all properties".into(), |p| format!("property {p}"));
        eprintln!("Watching {scope} as {who}. Press Ctrl+C to stop.");
    }

    let color = !args.json && output::should_color(global.color);
    let mut stdout = std::io::stdout();
    loop {
        tokio::select! {
            received = notifications.recv() => match received {
                Ok(n) => {
                    let _ = writeln!(stdout, "{}", format_line(&n, args.json, color));
                    let _ = stdout.flush();
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "notification stream lagged");
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    console.disconnect().await;
    Ok(())
}
