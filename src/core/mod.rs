pub mod comparator;
pub mod conflict;
pub mod engine;
pub mod fingerprint;

pub use comparator::{diff_names, TreeDiff};
pub use conflict::{resolve, SyncDecision};
pub use engine::{SyncEngine, SyncOptions, SyncReport};
pub use fingerprint::{fingerprint, fingerprint_bytes};
