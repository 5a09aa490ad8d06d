//! Command-line progress tracker over a Waymark location pack.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line arguments
//! 2. Load configuration from `waymark.yaml` (defaults if absent)
//! 3. Initialize structured logging (tracing)
//! 4. Load the location pack and restore saved state
//! 5. Run the requested command, saving state if it changed anything

mod commands;
mod error;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use waymark_core::TrackerConfig;
use waymark_core::config::LoggingConfig;

use crate::commands::{Command, Session};
use crate::error::TrackerError;

#[derive(Debug, Parser)]
#[command(name = "waymark-tracker")]
#[command(about = "Track collected items across a location pack", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "waymark.yaml")]
    config: PathBuf,

    /// Pack directory, overriding the configuration
    #[arg(long, global = true)]
    pack_root: Option<PathBuf>,

    /// Save file, overriding the configuration
    #[arg(long, global = true)]
    save_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(root) = cli.pack_root {
        config.pack.root = root;
    }
    if let Some(save_file) = cli.save_file {
        config.state.save_file = Some(save_file);
    }

    init_logging(&config.logging);
    info!(
        pack_root = %config.pack.root.display(),
        documents = config.pack.locations.len(),
        save_file = ?config.state.save_file,
        "waymark-tracker starting"
    );

    let mut session = Session::open(&config)?;
    let mut stdout = std::io::stdout().lock();
    let changed = session.run(&cli.command, &mut stdout)?;
    info!(changed, "Command finished");
    Ok(())
}

/// Load `waymark.yaml`, falling back to defaults when it does not exist.
fn load_config(path: &Path) -> Result<TrackerConfig, TrackerError> {
    if path.exists() {
        Ok(TrackerConfig::from_file(path)?)
    } else {
        Ok(TrackerConfig::parse("")?)
    }
}

/// Install the global subscriber on stderr.
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_set_available_with_negative_count() {
        let cli = Cli::try_parse_from([
            "waymark-tracker",
            "set-available",
            "@Keep/Hall",
            "-2",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::SetAvailable {
                path: "@Keep/Hall".to_owned(),
                available: -2,
            }
        );
        assert_eq!(cli.config, PathBuf::from("waymark.yaml"));
    }

    #[test]
    fn global_overrides_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "waymark-tracker",
            "summary",
            "--json",
            "--save-file",
            "/tmp/save.json",
        ])
        .unwrap();
        assert_eq!(cli.command, Command::Summary { json: true });
        assert_eq!(cli.save_file, Some(PathBuf::from("/tmp/save.json")));
    }

    #[test]
    fn missing_config_file_means_defaults() {
        let config = load_config(Path::new("/nonexistent/waymark.yaml")).unwrap();
        assert_eq!(config.pack.locations, vec![PathBuf::from("locations.json")]);
    }
}
