//! Sweep parameters for the multiported RAM synthesis runner.
//!
//! A sweep is described by six parameter lists (architecture, bypass, depth,
//! width, write ports, read ports). This crate turns the raw command-line
//! lists into a validated [`ParameterSet`], expands the set into its
//! [`Combination`]s in a fixed nesting order, and emits the per-combination
//! configuration artifact read by the synthesis tool.

pub mod combination;
pub mod emit;
pub mod error;
pub mod params;

pub use combination::{Combination, Combinations};
pub use emit::{render_config, write_config, CONFIG_SYMBOLS};
pub use error::{ParamError, Result};
pub use params::{split_list, Architecture, Bypass, NumericToken, ParameterSet, PARAMETER_NAMES};
