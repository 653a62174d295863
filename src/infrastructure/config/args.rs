use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "spice-drawers",
    version,
    about = "A terminal spice inventory tracker synced live with Cloud Firestore",
    long_about = None
)]
/// Command line arguments; each one overrides the config file.
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Firebase project id.
    #[arg(long, env = "SPICE_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Firebase web API key.
    #[arg(long, env = "SPICE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Collection holding the spices.
    #[arg(long)]
    pub collection: Option<String>,

    /// Live watcher poll interval in milliseconds.
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Accent color (name or hex code).
    #[arg(long)]
    pub accent_color: Option<String>,

    /// Show emoji on status badges.
    #[arg(long)]
    pub show_emoji: Option<bool>,

    /// Keep spices in memory instead of Firestore.
    #[arg(long)]
    pub memory: bool,
}
