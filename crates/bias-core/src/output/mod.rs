//! Output: population snapshots, tension traces and run statistics.

pub mod snapshot;
pub mod stats;
pub mod trace;

pub use snapshot::{
    compute_metrics, generate_snapshot, write_current_state, write_snapshot, write_snapshot_to_dir,
};
pub use stats::RunStats;
pub use trace::TraceLogger;
