pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod storage;
pub mod timefmt;

pub use crate::core::{SyncDecision, SyncEngine, SyncOptions, SyncReport, TreeDiff};
pub use error::SyncError;
pub use storage::{DriveStore, RemoteEntry, RemoteStore};
