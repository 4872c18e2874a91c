//! Command dispatch: bridges CLI args -> console operations -> output.

pub mod activities;
pub mod backgrounds;
pub mod config_cmd;
pub mod devices;
pub mod dining;
pub mod guests;
pub mod images;
pub mod info;
pub mod properties;
pub mod session;
pub mod settings;
pub mod stats;
pub mod streaming;
pub mod util;
pub mod watch;

use innkeep_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Authenticate, run one console-bound command, print its notifications.
pub async fn dispatch(cmd: Command, global: GlobalOpts) -> Result<(), CliError> {
    let resolved = config::resolve(&global)?;
    let sessions = config::session_store(&global, &resolved);

    tracing::debug!(command = ?cmd, profile = %resolved.profile_name, "dispatching command");

    let result = Console::oneshot(resolved.console, sessions, |console| async move {
        let mut notifications = console.notifications();
        let result = route(cmd, &console, &global).await;
        util::print_notifications(&mut notifications, &global);
        Ok(result)
    })
    .await?;
    result
}

async fn route(cmd: Command, console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Whoami => session::whoami(console, global),
        Command::Properties(args) => properties::handle(console, args, global).await,
        Command::Guests(args) => guests::handle(console, args, global).await,
        Command::Activities(args) => activities::handle(console, args, global).await,
        Command::Dining(args) => dining::handle(console, args, global).await,
        Command::Streaming(args) => streaming::handle(console, args, global).await,
        Command::Backgrounds(args) => backgrounds::handle(console, args, global).await,
        Command::Info(args) => info::handle(console, args, global).await,
        Command::Settings(args) => settings::handle(console, args, global).await,
        Command::Devices(args) => devices::handle(console, args, global).await,
        Command::Kiosk(args) => devices::handle_kiosk(console, args, global).await,
        Command::Alerts(args) => devices::handle_alerts(console, args, global).await,
        Command::Profiles => devices::profiles(console, global).await,
        Command::Stats(args) => stats::handle(console, args, global).await,
        Command::Images(args) => images::handle(console, args, global).await,
        // Handled before dispatch
        Command::Login(_)
        | Command::Logout
        | Command::Watch(_)
        | Command::Config(_)
        | Command::Completions(_) => unreachable!("handled in main"),
    }
}
