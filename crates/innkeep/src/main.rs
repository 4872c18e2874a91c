mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, StreamingCommand};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { global, command } = cli;

    match command {
        // Local commands: no backend involved
        Command::Config(args) => commands::config_cmd::handle(args, &global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "innkeep", &mut std::io::stdout());
            Ok(())
        }

        Command::Streaming(args) if matches!(args.command, StreamingCommand::Presets) => {
            commands::streaming::presets(&global);
            Ok(())
        }

        // Session commands manage their own console
        Command::Login(args) => commands::session::login(args, &global).await,
        Command::Logout => commands::session::logout(&global).await,
        Command::Watch(args) => commands::watch::handle(args, &global).await,

        // Everything else runs against an authenticated one-shot console
        cmd => commands::dispatch(cmd, global).await,
    }
}
