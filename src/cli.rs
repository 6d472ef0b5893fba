//! CLI argument parsing for cloud-archive

use crate::config::Config;
use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cloud-archive - sync a directory into a cloud storage bucket
#[derive(Parser, Debug)]
#[command(name = "cloud-archive")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file path
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload new and resized files from a directory to a destination
    Sync(SyncArgs),

    /// Upload a single file to an exact destination key
    Upload(UploadArgs),

    /// List objects under a destination
    List(ListArgs),

    /// Show configuration
    Config(ConfigArgs),
}

/// Arguments for the sync command
#[derive(Parser, Debug)]
pub struct SyncArgs {
    /// Local directory to archive
    pub source: PathBuf,

    /// Destination URI (gs://bucket/prefix, s3://bucket/prefix or a local path)
    pub destination: String,

    /// Show what would be uploaded without uploading
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Show a progress bar
    #[arg(short = 'P', long)]
    pub progress: bool,
}

/// Arguments for the upload command
#[derive(Parser, Debug)]
pub struct UploadArgs {
    /// Local file to upload
    pub file: PathBuf,

    /// Destination URI including the object key (gs://bucket/path/to/file)
    pub destination: String,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Destination URI to list (gs://bucket/prefix)
    pub destination: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show the configuration file path
    #[arg(long)]
    pub path: bool,

    /// Create default configuration file
    #[arg(long)]
    pub init: bool,
}

impl Cli {
    /// Load the file config.
    ///
    /// A file passed with `-c` must exist and parse. A broken file at the
    /// default location is logged and replaced by defaults.
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Ok(Config::load().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring unreadable config file");
                Config::default()
            })),
        }
    }

    /// Config file this invocation reads and writes
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::default_config_path(),
        }
    }
}

impl SyncArgs {
    /// Merge CLI flags over the file config
    pub fn apply(&self, mut config: Config) -> Config {
        config.dry_run |= self.dry_run;
        config.progress |= self.progress;
        config
    }
}
