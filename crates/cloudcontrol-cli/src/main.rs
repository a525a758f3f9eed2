use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cloudcontrol_cli::commands::{self, Context};
use cloudcontrol_cli::config;
use cloudcontrol_provisioner::StatePersistence;
use eyre::Result;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cloudcontrol")]
#[command(about = "Manage CloudControl network domains", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/cloudcontrol/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Refresh state and show pending changes
    Plan,
    /// Create, modify, replace and delete domains to match the config
    Apply,
    /// Re-read every managed domain and save the result
    Refresh,
    /// Print the local state file
    Show,
    /// Delete every managed domain
    Destroy,
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr; stdout carries command output.
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };
    let cfg = config::load_config(&config_path)?;

    if let Command::Show = cli.command {
        let persistence = StatePersistence::new(cfg.state_path(&config_path));
        return commands::show(&persistence).await;
    }

    let ctx = Context::from_config(cfg, &config_path)?;
    match cli.command {
        Command::Plan => commands::plan(&ctx).await,
        Command::Apply => commands::apply(&ctx).await,
        Command::Refresh => commands::refresh(&ctx).await,
        Command::Destroy => commands::destroy(&ctx).await,
        Command::Show => commands::show(&ctx.persistence).await,
    }
}
