//! Scriptsync CLI - command-line interface for scriptsync
//!
//! Serves a directory of Lua/Luau scripts over HTTP so a game-engine plugin
//! can pull the latest source, optionally keeping the checkout current with
//! its git remote.

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Overrides;

#[derive(Parser)]
#[command(name = "scriptsync")]
#[command(author = "Scriptsync Contributors")]
#[command(version)]
#[command(about = "Serve live script sources to game-engine plugins", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to .scriptsync/config.json when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config and create the watch directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Scan the watch directory once and report what would be served
    Scan {
        /// Print the scripts as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Watch scripts and serve them over HTTP
    Serve {
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Like serve, and also keep the git checkout pulled
    Sync {
        #[command(flatten)]
        server: ServerArgs,

        #[command(flatten)]
        git: GitArgs,
    },

    /// Check system health and environment
    #[command(hide = true)]
    CheckHealth,
}

#[derive(Args)]
struct ServerArgs {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Headless mode: bind to 0.0.0.0 for remote access (WSL/Docker/VM)
    #[arg(long)]
    headless: bool,

    /// Directory to watch for scripts
    #[arg(short, long)]
    watch_dir: Option<PathBuf>,

    /// Seconds between directory scans
    #[arg(short, long)]
    interval: Option<u64>,
}

#[derive(Args)]
struct GitArgs {
    /// Seconds between git fetches
    #[arg(long)]
    git_interval: Option<u64>,

    /// Git working copy (defaults to the parent of the watch directory)
    #[arg(long)]
    repo_dir: Option<PathBuf>,

    /// Remote to fetch and pull from
    #[arg(long)]
    remote: Option<String>,

    /// Branch to pull
    #[arg(long)]
    branch: Option<String>,
}

impl ServerArgs {
    fn into_overrides(self) -> Overrides {
        Overrides {
            port: self.port,
            headless: self.headless,
            watch_dir: self.watch_dir,
            file_poll_interval: self.interval,
            ..Overrides::default()
        }
    }
}

impl GitArgs {
    fn apply(self, overrides: Overrides) -> Overrides {
        Overrides {
            git_poll_interval: self.git_interval,
            repo_dir: self.repo_dir,
            remote: self.remote,
            branch: self.branch,
            ..overrides
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Init { force } => commands::init(config, force),
        Commands::Scan { json } => commands::scan(config, json),
        Commands::Serve { server } => {
            commands::serve(config, server.into_overrides(), false).await
        }
        Commands::Sync { server, git } => {
            commands::serve(config, git.apply(server.into_overrides()), true).await
        }
        Commands::CheckHealth => commands::check_health(config),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
