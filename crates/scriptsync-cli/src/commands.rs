//! CLI command implementations.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use scriptsync_core::{Config, ScriptStore, DEFAULT_CONFIG_PATH};
use scriptsync_git::{GitCli, RepoSync};
use scriptsync_server::{ScriptServer, ServerConfig, SCRIPTS_PATH};
use scriptsync_watcher::{scan_directory, FileWatcher};
use std::fs;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;
use tracing::error;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Command-line values layered over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub headless: bool,
    pub watch_dir: Option<PathBuf>,
    pub file_poll_interval: Option<u64>,
    pub git_poll_interval: Option<u64>,
    pub repo_dir: Option<PathBuf>,
    pub remote: Option<String>,
    pub branch: Option<String>,
}

impl Overrides {
    pub fn apply(self, mut config: Config) -> Config {
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.headless {
            config.host = "0.0.0.0".to_string();
        }
        if let Some(dir) = self.watch_dir {
            config.watch_dir = dir;
        }
        if let Some(secs) = self.file_poll_interval {
            config.file_poll_interval = secs;
        }
        if let Some(secs) = self.git_poll_interval {
            config.git_poll_interval = secs;
        }
        if self.repo_dir.is_some() {
            config.repo_dir = self.repo_dir;
        }
        if self.remote.is_some() {
            config.remote = self.remote;
        }
        if self.branch.is_some() {
            config.branch = self.branch;
        }
        config
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    Ok(Config::discover(path)?.validate()?)
}

/// Write a default config and create the watch directory.
pub fn init(config_path: Option<&Path>, force: bool) -> Result<()> {
    let path = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));

    let config = if path.exists() && !force {
        println!("{} Already initialized ({})", "✓".green(), path.display());
        Config::load(path)?.validate()?
    } else {
        let config = Config::default();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, config.to_json_pretty()?)?;
        println!("{} Wrote {}", "✓".green(), path.display());
        config
    };

    fs::create_dir_all(&config.watch_dir)?;
    println!(
        "{} Watch directory ready at {}",
        "✓".green(),
        config.watch_dir.display()
    );
    println!("  Run {} to start serving", "scriptsync serve".cyan());

    Ok(())
}

/// Scan once and report what would be served.
pub fn scan(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!("Scanning {}...", config.watch_dir.display()));

    let result = scan_directory(&config.watch_dir, &config.extensions);

    spinner.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&result.scripts)?);
        return Ok(());
    }

    println!(
        "{} Found {} scripts in {}ms",
        "✓".green(),
        result.scripts.len().to_string().cyan(),
        result.duration_ms
    );
    for path in result.scripts.keys() {
        println!("  {}", path);
    }

    if !result.errors.is_empty() {
        println!("\n{} files could not be read:", "⚠".yellow());
        for (file, error) in result.errors.iter().take(5) {
            println!("  {} - {}", file.red(), error);
        }
        if result.errors.len() > 5 {
            println!("  ... and {} more", result.errors.len() - 5);
        }
    }

    Ok(())
}

/// Watch, serve, and with `with_git` also keep the checkout pulled, until Ctrl+C.
pub async fn serve(config_path: Option<&Path>, overrides: Overrides, with_git: bool) -> Result<()> {
    serve_until(config_path, overrides, with_git, shutdown_signal()).await
}

/// [`serve`] stopping when `shutdown` resolves instead of on Ctrl+C.
pub async fn serve_until<F>(
    config_path: Option<&Path>,
    overrides: Overrides,
    with_git: bool,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let config = overrides
        .apply(Config::discover(config_path)?)
        .validate_for_serve()?;

    fs::create_dir_all(&config.watch_dir)?;
    print_banner(&config, with_git);

    let addr = SocketAddr::new(config.host.parse::<IpAddr>()?, config.port);
    let store = ScriptStore::new();
    let server = ScriptServer::new(store.clone(), ServerConfig { addr });
    let listener = server.bind().await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let watcher = FileWatcher::new(config.watch_config(), store);
    tokio::spawn(watcher.run(shutdown_rx.clone()));

    if with_git {
        let sync_config = config.sync_config();
        let repo_sync = RepoSync::new(GitCli::from_config(&sync_config), sync_config.interval);
        tokio::spawn(repo_sync.run(shutdown_rx));
    }

    server.serve(listener, shutdown).await?;

    // Background loops are not joined; they stop at their next wake-up or
    // with the runtime.
    let _ = shutdown_tx.send(true);
    println!("\n👋 Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

fn print_banner(config: &Config, with_git: bool) {
    let url = format!("http://{}:{}{}", config.host, config.port, SCRIPTS_PATH);

    println!("{}", "=".repeat(50));
    if with_git {
        println!("{}", "Scriptsync - Git Auto-Sync".cyan().bold());
    } else {
        println!("{}", "Scriptsync".cyan().bold());
    }
    println!("{}", "=".repeat(50));
    println!("📁 Watching files: {}", config.watch_dir.display());
    println!("⏱️  File poll interval: {}s", config.file_poll_interval);
    if with_git {
        println!(
            "🔄 Auto-pull interval: {}s ({})",
            config.git_poll_interval,
            config.repo_dir().display()
        );
    }
    println!("🌐 Server: {}", url);
    println!("Press {} to stop\n", "Ctrl+C".cyan());
}

/// Check system health and environment.
pub fn check_health(config_path: Option<&Path>) -> Result<()> {
    println!("{}", "🔍 Scriptsync Health Check".cyan().bold());
    println!("{}", "═".repeat(50));

    let mut all_ok = true;
    let config = load_config(config_path)?;

    // 1. Config file
    let config_file = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
    if config_file.is_file() {
        println!("{} Config loaded from {}", "✓".green(), config_file.display());
    } else {
        println!("{} No config file, using defaults", "•".blue());
    }

    // 2. Watch directory
    if config.watch_dir.is_dir() {
        let found = scan_directory(&config.watch_dir, &config.extensions);
        println!(
            "{} Watch directory {} ({} scripts)",
            "✓".green(),
            config.watch_dir.display(),
            found.scripts.len()
        );
    } else {
        println!(
            "{} Watch directory {} missing (created on serve)",
            "⚠".yellow(),
            config.watch_dir.display()
        );
    }

    // 3. Port
    match std::net::TcpListener::bind((config.host.as_str(), config.port)) {
        Ok(_) => println!("{} Port {} is available", "✓".green(), config.port),
        Err(_) => {
            println!(
                "{} Port {} is in use (scriptsync may be running)",
                "✗".red(),
                config.port
            );
            all_ok = false;
        }
    }

    // 4. Git
    let git_version = std::process::Command::new("git").arg("--version").output();
    match git_version {
        Ok(output) if output.status.success() => {
            println!(
                "{} {}",
                "✓".green(),
                String::from_utf8_lossy(&output.stdout).trim()
            );

            let repo_dir = config.repo_dir();
            let inside = std::process::Command::new("git")
                .arg("-C")
                .arg(&repo_dir)
                .args(["rev-parse", "--is-inside-work-tree"])
                .output()
                .map(|o| o.status.success())
                .unwrap_or(false);
            if inside {
                println!("{} {} is a git checkout", "✓".green(), repo_dir.display());
            } else {
                println!(
                    "{} {} is not a git checkout (sync will fail)",
                    "⚠".yellow(),
                    repo_dir.display()
                );
            }
        }
        _ => {
            println!("{} git not found on PATH (sync unavailable)", "⚠".yellow());
        }
    }

    println!("{}", "═".repeat(50));
    if all_ok {
        println!("{}", "Ready to serve.".green());
    } else {
        println!("{}", "Some checks failed.".red());
    }

    Ok(())
}
