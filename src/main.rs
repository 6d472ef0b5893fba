//! cloud-archive - sync a directory into a cloud storage bucket

use clap::Parser;
use cloud_archive::cli::{Cli, Commands, ConfigArgs, ListArgs, SyncArgs, UploadArgs};
use cloud_archive::config::Config;
use cloud_archive::format::{format_duration, DryRunReport, SyncReport};
use cloud_archive::progress::{ProgressTracker, SyncEvent};
use cloud_archive::storage::{create_store, ObjectStore};
use cloud_archive::sync::SyncEngine;
use cloud_archive::uri::Location;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.json);

    if let Commands::Config(args) = &cli.command {
        return handle_config_command(args, cli.config_path()?);
    }

    let config = cli.load_config()?;

    match cli.command {
        Commands::Sync(args) => run_sync(args, config).await?,
        Commands::Upload(args) => run_upload(args, config).await?,
        Commands::List(args) => run_list(args, config).await?,
        Commands::Config(_) => {}
    }

    Ok(())
}

fn init_tracing(verbose: u8, json: bool) {
    let filter = match verbose {
        0 => EnvFilter::new("cloud_archive=warn"),
        1 => EnvFilter::new("cloud_archive=info"),
        2 => EnvFilter::new("cloud_archive=debug"),
        _ => EnvFilter::new("trace"),
    };

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run_sync(args: SyncArgs, config: Config) -> anyhow::Result<()> {
    let config = args.apply(config);
    let destination = Location::parse(&args.destination)?;
    let (store, prefix) = create_store(&destination, &config).await?;

    tracing::info!(
        source = %args.source.display(),
        destination = %destination,
        dry_run = config.dry_run,
        "Starting sync"
    );

    let engine = SyncEngine::new(&args.source, prefix, store);

    if config.dry_run {
        let plan = engine.plan_only().await?;
        DryRunReport {
            files_scanned: plan.files_scanned as u64,
            files_to_upload: plan.tasks.len() as u64,
            bytes_to_upload: plan.total_bytes,
            keys: plan.tasks.iter().map(|t| t.destination_key.clone()).collect(),
        }
        .print();
        return Ok(());
    }

    let start = Instant::now();
    let tracker = ProgressTracker::new(config.progress);
    let mut files_planned = 0u64;
    let mut bytes_uploaded = 0u64;
    let mut errors = 0u64;

    let result = engine
        .sync(|event| {
            match event {
                SyncEvent::Planned { total_files, .. } => files_planned = *total_files as u64,
                SyncEvent::UploadCompleted {
                    bytes_uploaded: bytes,
                    ..
                } => bytes_uploaded = *bytes,
                SyncEvent::UploadFailed { .. } => errors += 1,
                _ => {}
            }
            tracker.handle(event);
        })
        .await?;
    tracker.finish();

    tracing::info!(elapsed = %format_duration(start.elapsed()), "Finished");

    SyncReport {
        duration_secs: start.elapsed().as_secs_f64(),
        files_planned,
        files_uploaded: result.total_files_uploaded as u64,
        bytes_uploaded,
        errors,
    }
    .print();

    Ok(())
}

async fn run_upload(args: UploadArgs, config: Config) -> anyhow::Result<()> {
    let destination = Location::parse(&args.destination)?;
    let (store, prefix) = create_store(&destination, &config).await?;

    let key = if prefix.is_empty() {
        args.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow::anyhow!("{} has no file name", args.file.display()))?
    } else {
        prefix
    };

    store.upload(&args.file, &key).await?;
    println!("File {} uploaded to {}", args.file.display(), key);
    Ok(())
}

async fn run_list(args: ListArgs, config: Config) -> anyhow::Result<()> {
    let destination = Location::parse(&args.destination)?;
    let (store, prefix) = create_store(&destination, &config).await?;

    for entry in store.list(&prefix).await? {
        match entry.size {
            Some(size) => println!("{} {}", entry.key, size),
            None => println!("{} -", entry.key),
        }
    }
    Ok(())
}

fn handle_config_command(args: &ConfigArgs, path: PathBuf) -> anyhow::Result<()> {
    if args.path {
        println!("{}", path.display());
    } else if args.init {
        Config::default().save_to(&path)?;
        println!("Created default configuration at {}", path.display());
    } else {
        let config = if path.exists() {
            Config::load_from(&path)?
        } else {
            Config::default()
        };
        println!("{}", toml::to_string_pretty(&config)?);
    }
    Ok(())
}
