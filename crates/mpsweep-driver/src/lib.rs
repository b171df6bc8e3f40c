//! Tool-stage driver and sweep loop.
//!
//! For every combination of a [`ParameterSet`](mpsweep_core::ParameterSet) the
//! [`Sweep`] purges stale reports, emits the configuration artifact, runs the
//! four tool stages in order through a [`StageRunner`], extracts metrics from
//! whatever reports appeared, appends one result row and moves the reports
//! into the run's log directory.

pub mod config;
pub mod error;
pub mod janitor;
pub mod pipeline;
pub mod stage;
pub mod summary;

pub use config::{StageCommand, StageCommands, ToolchainConfig};
pub use error::{DriverError, Result};
pub use janitor::{Janitor, WELL_KNOWN_REPORTS};
pub use pipeline::{RunRecord, Sweep, SweepSummary};
pub use stage::{ProcessRunner, Stage, StageOutcome, StageRunner};
pub use summary::RunSummary;
