//! cloud-archive - incremental directory archiving to object storage
//!
//! Scans a local directory, compares it by path and size against what a
//! bucket already holds under a destination prefix, and uploads only the
//! missing or resized files, one at a time.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod progress;
pub mod storage;
pub mod sync;
pub mod types;
pub mod uri;

pub use config::Config;
pub use error::{Error, Result};
pub use format::display_file_size;
pub use progress::SyncEvent;
pub use storage::ObjectStore;
pub use sync::SyncEngine;
pub use types::*;
