//! CLI argument definitions for accesswatch-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Accesswatch sensitive-resource access monitor.
///
/// Drives an external log-producing process, classifies sensitive
/// resource accesses (location, microphone, camera), attributes them
/// to packages, and emits rate-limited records and alerts.
#[derive(Parser, Debug)]
#[command(name = "accesswatch-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to accesswatch.toml configuration file.
    #[arg(short, long, default_value = "/etc/accesswatch/accesswatch.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration file and exit without starting the daemon.
    #[arg(long)]
    pub validate: bool,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    pub print_config: bool,
}
