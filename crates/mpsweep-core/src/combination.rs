//! Cartesian expansion of a [`ParameterSet`].
//!
//! Combinations are produced in nested order depth → width → write ports →
//! read ports → architecture → bypass, outermost first. Rows in the result
//! table follow this order.

use serde::Serialize;

use crate::params::{Architecture, Bypass, NumericToken, ParameterSet};

/// One concrete assignment of the six sweep parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Combination {
    pub architecture: Architecture,
    pub bypass: Bypass,
    pub depth: NumericToken,
    pub width: NumericToken,
    pub write_ports: NumericToken,
    pub read_ports: NumericToken,
    /// 1-based position within the sweep.
    pub counter: usize,
    /// Total number of combinations in the sweep.
    pub total: usize,
}

impl Combination {
    /// Run identity, e.g. `LVTBIN_1024x32-2W4R`.
    pub fn run_name(&self) -> String {
        format!(
            "{}_{}x{}-{}W{}R",
            self.architecture, self.depth, self.width, self.write_ports, self.read_ports
        )
    }

    /// Progress marker `<counter>/<total>`.
    pub fn progress(&self) -> String {
        format!("{}/{}", self.counter, self.total)
    }

    /// The six parameters as printed in the first cells of a result row.
    pub fn parameter_cells(&self) -> [String; 6] {
        [
            self.architecture.to_string(),
            self.bypass.to_string(),
            self.depth.to_string(),
            self.width.to_string(),
            self.write_ports.to_string(),
            self.read_ports.to_string(),
        ]
    }
}

/// Iterator over the combinations of a parameter set.
#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    set: &'a ParameterSet,
    next: usize,
    total: usize,
}

impl ParameterSet {
    /// Iterate all combinations in nesting order.
    pub fn combinations(&self) -> Combinations<'_> {
        Combinations {
            set: self,
            next: 0,
            total: self.total_combinations(),
        }
    }
}

impl<'a> Combinations<'a> {
    fn at(&self, flat: usize) -> Combination {
        let s = self.set;
        // Innermost list varies fastest.
        let mut rest = flat;
        let mut digit = |len: usize| {
            let d = rest % len;
            rest /= len;
            d
        };
        let bypass = digit(s.bypasses.len());
        let architecture = digit(s.architectures.len());
        let read_ports = digit(s.read_ports.len());
        let write_ports = digit(s.write_ports.len());
        let width = digit(s.widths.len());
        let depth = digit(s.depths.len());

        Combination {
            architecture: s.architectures[architecture],
            bypass: s.bypasses[bypass],
            depth: s.depths[depth].clone(),
            width: s.widths[width].clone(),
            write_ports: s.write_ports[write_ports].clone(),
            read_ports: s.read_ports[read_ports].clone(),
            counter: flat + 1,
            total: self.total,
        }
    }
}

impl Iterator for Combinations<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        if self.next >= self.total {
            return None;
        }
        let combination = self.at(self.next);
        self.next += 1;
        Some(combination)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Combinations<'_> {}
