use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sayonara_shred::drives::DriveClassifier;
use sayonara_shred::{
    SecureDeleter, ShredConfig, StartWipeRequest, WipeSessionManager, WipeStatus,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "shred")]
#[command(about = "Secure file/folder deletion (HDD: 3-pass overwrite, SSD: unlink + TRIM)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Quiet mode (minimal output, no confirmation prompt)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Securely delete a file or folder
    Delete {
        /// File or folder to securely delete
        path: PathBuf,

        /// Delete folder and all contents
        #[arg(short, long)]
        recursive: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the media kind detected for a path
    Detect {
        /// Any path on the drive to inspect
        path: PathBuf,
    },

    /// Run a wipe session and poll it until it completes
    Session {
        /// Files to wipe, in order
        files: Vec<String>,

        /// Simulated wipe-all mode (no data is touched)
        #[arg(long, conflicts_with = "files")]
        wipe_all: bool,

        /// Session identifier (random UUID by default)
        #[arg(long)]
        session_id: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.debug, cli.quiet);

    let config =
        ShredConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let success = match cli.command {
        Commands::Delete {
            path,
            recursive,
            yes,
        } => delete_path(path, recursive, yes || cli.quiet).await?,
        Commands::Detect { path } => detect(&path)?,
        Commands::Session {
            files,
            wipe_all,
            session_id,
            yes,
        } => run_session(config, files, wipe_all, session_id, yes || cli.quiet, cli.quiet).await?,
    };

    if !success {
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(debug: bool, quiet: bool) {
    let default_level = if debug {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("⚠️  {} Continue? (yes/no): ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "yes" | "y"))
}

async fn delete_path(path: PathBuf, recursive: bool, skip_confirm: bool) -> Result<bool> {
    if !skip_confirm && !confirm(&format!("This will PERMANENTLY delete '{}'.", path.display()))? {
        println!("Operation cancelled.");
        return Ok(true);
    }

    let started = Instant::now();
    let target = path.clone();
    let result = tokio::task::spawn_blocking(move || {
        SecureDeleter::new().secure_delete_path(&target, recursive)
    })
    .await
    .context("Deletion task failed")?;

    let elapsed = Duration::from_millis(started.elapsed().as_millis() as u64);
    match result {
        Ok(()) => {
            println!(
                "{} Securely deleted {} ({})",
                "✓".green(),
                path.display(),
                humantime::format_duration(elapsed)
            );
            Ok(true)
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            Ok(false)
        }
    }
}

fn detect(path: &Path) -> Result<bool> {
    let info = DriveClassifier::classify(path);
    println!("{}", serde_json::to_string_pretty(&info)?);
    println!("Erase method: {:?}", info.erase_method());
    Ok(true)
}

async fn run_session(
    config: ShredConfig,
    files: Vec<String>,
    wipe_all: bool,
    session_id: Option<String>,
    skip_confirm: bool,
    quiet: bool,
) -> Result<bool> {
    if !wipe_all
        && !skip_confirm
        && !confirm(&format!("This will PERMANENTLY delete {} file(s).", files.len()))?
    {
        println!("Operation cancelled.");
        return Ok(true);
    }

    let poll_interval = config.poll_interval();
    let manager = WipeSessionManager::new(config);
    let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());

    manager.start(StartWipeRequest {
        session_id: session_id.clone(),
        files,
        wipe_all,
    })?;

    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(3)
    };
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] pass {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let status: WipeStatus = loop {
        let status = manager.status(&session_id)?;
        bar.set_position(u64::from(status.pass_number));
        bar.set_message(status.current_file.clone());
        if status.complete {
            break status;
        }
        bar.tick();
        tokio::time::sleep(poll_interval).await;
    };
    bar.finish_and_clear();

    println!("{}", serde_json::to_string_pretty(&status)?);
    if status.success {
        println!("{} Session {} complete", "✓".green(), session_id);
    } else {
        eprintln!("{} Session {} failed", "✗".red(), session_id);
    }

    Ok(status.success)
}
