use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "irbot", version, about = "IR Bot command gateway")]
struct Cli {
    /// Configuration file (TOML, or YAML by .yaml/.yml extension).
    /// Built-in defaults apply when omitted.
    #[arg(long, global = true, env = "IRBOT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP gateway (default).
    Serve {
        /// Listen address, overriding `service.bind`.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Load and validate the configuration, then print the role tables.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.cmd.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => commands::serve::run(config, bind).await,
        Command::Check => commands::check::run(&config),
    }
}
