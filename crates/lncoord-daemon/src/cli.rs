//! Command line interface.

use std::path::PathBuf;

use clap::Parser;

/// Mission control coordination daemon for Lightning Network nodes.
#[derive(Debug, Parser)]
#[command(name = "lncoordd", version, about)]
pub struct Cli {
    /// Path to the configuration file. Defaults to `lncoord.toml` in the
    /// application directory; a file with default settings is created there
    /// on first run.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base application directory, overriding the platform default.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Log at debug level regardless of the configured level.
    #[arg(short, long)]
    pub verbose: bool,
}
