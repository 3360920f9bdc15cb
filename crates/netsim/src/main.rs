mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
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

/// Logs go to stderr so console transcripts on stdout stay clean.
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
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // No topology needed for these
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),
        Command::Validate(args) => commands::validate::handle(&args, &cli.global),
        Command::Commands(args) => commands::catalog::handle(&args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "netsim", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let lab = config::open_lab(&cli.global)?;
            tracing::debug!(
                command = ?cmd,
                lab = lab.name.as_deref().unwrap_or("-"),
                devices = lab.store.device_count(),
                "dispatching command"
            );
            commands::dispatch(cmd, &lab, &cli.global).await
        }
    }
}
