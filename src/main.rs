//! reception-guard command line.
//!
//! ```text
//! reception-guard verify photo.jpg          check a file's magic number
//! reception-guard extensions                list the signature table
//! reception-guard check-config guard.toml   validate a config file
//! reception-guard replay logins.csv         run a login log through the tracker
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::json;

use reception_guard::config::loader::load_config;
use reception_guard::config::GuardConfig;
use reception_guard::login::{spawn_sweeper, AttemptTracker};
use reception_guard::observability::logging::init_logging;
use reception_guard::upload::signatures::SIGNATURES;
use reception_guard::upload::{extension_of, Verifier};
use reception_guard::Shutdown;

#[derive(Parser)]
#[command(name = "reception-guard")]
#[command(about = "Upload signature checks and login attempt tracking", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a file's leading bytes against its extension
    Verify {
        file: PathBuf,
        /// Extension to check against (defaults to the file's own)
        #[arg(long)]
        ext: Option<String>,
    },
    /// List supported extensions
    Extensions,
    /// Load and validate a config file
    CheckConfig { path: PathBuf },
    /// Replay `username,address,user_agent` lines through the attempt tracker
    Replay {
        file: PathBuf,
        /// Attempts after which a login would be refused
        #[arg(long, default_value_t = 5)]
        threshold: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GuardConfig::default(),
    };
    init_logging(&config.observability.log_level);

    match cli.command {
        Commands::Verify { file, ext } => {
            let verifier = Verifier::from_config(&config.uploads);
            let valid = verifier.validate_path(&file, ext.as_deref())?;
            let extension = ext.or_else(|| {
                file.file_name()
                    .and_then(|name| name.to_str())
                    .and_then(extension_of)
                    .map(str::to_string)
            });
            print_json(&json!({
                "file": file.display().to_string(),
                "extension": extension,
                "valid": valid,
            }))?;
            if !valid {
                std::process::exit(1);
            }
        }
        Commands::Extensions => {
            let rows: Vec<_> = SIGNATURES
                .iter()
                .map(|(ext, entry)| {
                    json!({
                        "extension": ext,
                        "offset": entry.offset,
                        "signatures": entry.signatures.len(),
                    })
                })
                .collect();
            print_json(&json!(rows))?;
        }
        Commands::CheckConfig { path } => {
            let checked = load_config(&path)?;
            tracing::info!(path = %path.display(), "Configuration is valid");
            println!("{}", toml::to_string_pretty(&checked)?);
        }
        Commands::Replay { file, threshold } => {
            replay(&config, &file, threshold).await?;
        }
    }

    Ok(())
}

/// Feed a login log through a tracker the way the login handler would:
/// consult the count, then record the attempt.
async fn replay(config: &GuardConfig, file: &Path, threshold: u32) -> Result<(), Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file)?;
    let tracker = AttemptTracker::new(&config.login);

    let shutdown = Shutdown::new();
    let sweeper = if config.login.sweep_enabled {
        Some(spawn_sweeper(
            tracker.clone(),
            Duration::from_secs(config.login.sweep_interval_secs),
            shutdown.subscribe(),
        ))
    } else {
        None
    };

    let mut refused = 0u32;
    let mut skipped = 0u32;
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.splitn(3, ',').map(str::trim);
        let username = fields.next().unwrap_or_default();
        let address = fields.next().filter(|f| !f.is_empty());
        let user_agent = fields.next().filter(|f| !f.is_empty());

        if tracker.attempts(username, address) >= threshold {
            refused += 1;
            tracing::warn!(line = line_no + 1, username, "Login would be refused");
        }

        if let Err(e) = tracker.record_attempt(username, address, user_agent) {
            skipped += 1;
            tracing::warn!(line = line_no + 1, error = %e, "Skipping malformed login line");
        }
    }

    let mut records = tracker.snapshot();
    records.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));
    let over: Vec<_> = records
        .iter()
        .filter(|r| r.attempt >= threshold)
        .map(|r| r.key.to_string())
        .collect();

    print_json(&json!({
        "records": records,
        "refused": refused,
        "skipped": skipped,
        "over_threshold": over,
    }))?;

    shutdown.trigger();
    if let Some(handle) = sweeper {
        handle.await?;
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
