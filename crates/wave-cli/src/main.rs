//! wavectl entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use wave_cli::cli::{Cli, Commands};
use wave_cli::commands;
use wave_cli::context::load_context;
use wave_cli::repl::Repl;
use wave_dispatch::{DispatchConfig, Dispatcher};

fn main() {
    // Load .env.local if it exists (for WAVE_* overrides)
    let _ = dotenvy::from_filename(".env.local");

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> commands::Result<()> {
    let context = load_context(&cli.context)?;
    let config = DispatchConfig::from_env();
    let state_dir = cli.state_dir();

    match cli.command {
        Some(Commands::Repl) | None => {
            let dispatcher = Dispatcher::new(config)?;
            Repl::new(&state_dir, dispatcher, context)?.run()
        }
        Some(cmd) => commands::execute(cmd, &context, config),
    }
}
