//! Generation of the per-combination configuration artifact.
//!
//! The artifact is a Verilog include file of `` `define`` lines. The synthesis
//! project must list it as a source so the parameters reach the design.

use std::fs;
use std::path::Path;

use crate::combination::Combination;
use crate::error::{ParamError, Result};

/// Symbols defined by the artifact, in emission order.
pub const CONFIG_SYMBOLS: [&str; 7] = ["ID", "TYPE", "BYP", "MD", "DW", "nWP", "nRP"];

/// Render the configuration artifact for one combination.
pub fn render_config(combination: &Combination) -> String {
    let run_name = combination.run_name();
    let values: [(String, &str); 7] = [
        (quoted(&run_name), "run name"),
        (quoted(combination.architecture.as_str()), "implementation type"),
        (quoted(combination.bypass.as_str()), "bypass type"),
        (combination.depth.to_string(), "memory depth"),
        (combination.width.to_string(), "data width"),
        (combination.write_ports.to_string(), "number of write ports"),
        (combination.read_ports.to_string(), "number of read ports"),
    ];
    let value_w = values.iter().map(|(v, _)| v.len()).max().unwrap_or(0);

    let mut out = format!("// Multiported RAM synthesis definitions for {run_name}\n");
    for (symbol, (value, comment)) in CONFIG_SYMBOLS.iter().zip(values.iter()) {
        out.push_str(&format!(
            "`define {symbol:<4} {value:<value_w$} // {comment}\n"
        ));
    }
    out
}

/// Overwrite `path` with the configuration artifact for `combination`.
pub fn write_config(path: &Path, combination: &Combination) -> Result<()> {
    fs::write(path, render_config(combination)).map_err(|source| ParamError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    })
}

fn quoted(s: &str) -> String {
    format!("\"{s}\"")
}
