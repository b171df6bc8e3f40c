//! Parameter lists: splitting, validation and the closed vocabularies.
//!
//! Each of the six sweep arguments is a list such as `4,8,16`, `(REG,XOR)` or
//! `[1,2]<3>`. Commas and any of the bracket characters `()[]{}<>` separate
//! tokens; brackets carry no grouping meaning.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParamError, Result};

/// Names of the six sweep parameters, in argument order.
pub const PARAMETER_NAMES: [&str; 6] = [
    "architecture",
    "bypass",
    "depth",
    "width",
    "write-ports",
    "read-ports",
];

const SEPARATORS: &[char] = &[',', '(', ')', '[', ']', '{', '}', '<', '>'];

/// Multiported RAM implementation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Architecture {
    /// Register-based.
    #[serde(rename = "REG")]
    Reg,
    /// XOR-based.
    #[serde(rename = "XOR")]
    Xor,
    /// Live-value table, register implementation.
    #[serde(rename = "LVTREG")]
    LvtReg,
    /// Live-value table, binary-coded.
    #[serde(rename = "LVTBIN")]
    LvtBin,
    /// Live-value table, one-hot-coded.
    #[serde(rename = "LVT1HT")]
    Lvt1Ht,
}

impl Architecture {
    /// Every architecture, in vocabulary order.
    pub const ALL: [Architecture; 5] = [
        Architecture::Reg,
        Architecture::Xor,
        Architecture::LvtReg,
        Architecture::LvtBin,
        Architecture::Lvt1Ht,
    ];

    /// The token used on the command line and in generated files.
    pub fn as_str(self) -> &'static str {
        match self {
            Architecture::Reg => "REG",
            Architecture::Xor => "XOR",
            Architecture::LvtReg => "LVTREG",
            Architecture::LvtBin => "LVTBIN",
            Architecture::Lvt1Ht => "LVT1HT",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self> {
        Architecture::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ParamError::UnknownToken {
                parameter: PARAMETER_NAMES[0],
                token: s.to_string(),
                allowed: vocabulary(Architecture::ALL.iter().map(|a| a.as_str())),
            })
    }
}

/// Read/write bypass mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bypass {
    /// No bypassing.
    #[serde(rename = "NON")]
    Non,
    /// Write-after-write.
    #[serde(rename = "WAW")]
    Waw,
    /// Read-after-write.
    #[serde(rename = "RAW")]
    Raw,
    /// Read-during-write.
    #[serde(rename = "RDW")]
    Rdw,
}

impl Bypass {
    /// Every bypass mode, in vocabulary order.
    pub const ALL: [Bypass; 4] = [Bypass::Non, Bypass::Waw, Bypass::Raw, Bypass::Rdw];

    /// The token used on the command line and in generated files.
    pub fn as_str(self) -> &'static str {
        match self {
            Bypass::Non => "NON",
            Bypass::Waw => "WAW",
            Bypass::Raw => "RAW",
            Bypass::Rdw => "RDW",
        }
    }
}

impl fmt::Display for Bypass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bypass {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self> {
        Bypass::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| ParamError::UnknownToken {
                parameter: PARAMETER_NAMES[1],
                token: s.to_string(),
                allowed: vocabulary(Bypass::ALL.iter().map(|b| b.as_str())),
            })
    }
}

/// A decimal-digit token, kept verbatim so it is echoed exactly as typed.
///
/// Any run of ASCII digits is accepted, including `0` and leading zeros.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumericToken(String);

impl NumericToken {
    /// Validate `token` as a numeric value of `parameter`.
    pub fn parse(parameter: &'static str, token: &str) -> Result<Self> {
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            Ok(NumericToken(token.to_string()))
        } else {
            Err(ParamError::NotAnInteger {
                parameter,
                token: token.to_string(),
            })
        }
    }

    /// The token as typed.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NumericToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The six validated parameter lists of one sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub architectures: Vec<Architecture>,
    pub bypasses: Vec<Bypass>,
    pub depths: Vec<NumericToken>,
    pub widths: Vec<NumericToken>,
    pub write_ports: Vec<NumericToken>,
    pub read_ports: Vec<NumericToken>,
}

impl ParameterSet {
    /// Build a parameter set from exactly six raw list arguments.
    ///
    /// Validation stops at the first offending token.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<S> = args.into_iter().collect();
        if args.len() != PARAMETER_NAMES.len() {
            return Err(ParamError::WrongArgumentCount {
                expected: PARAMETER_NAMES.len(),
                found: args.len(),
            });
        }

        let architectures = tokens(0, args[0].as_ref())?
            .into_iter()
            .map(Architecture::from_str)
            .collect::<Result<Vec<_>>>()?;
        let bypasses = tokens(1, args[1].as_ref())?
            .into_iter()
            .map(Bypass::from_str)
            .collect::<Result<Vec<_>>>()?;
        let depths = numeric(2, args[2].as_ref())?;
        let widths = numeric(3, args[3].as_ref())?;
        let write_ports = numeric(4, args[4].as_ref())?;
        let read_ports = numeric(5, args[5].as_ref())?;

        Ok(ParameterSet {
            architectures,
            bypasses,
            depths,
            widths,
            write_ports,
            read_ports,
        })
    }

    /// Number of combinations the sweep expands into.
    pub fn total_combinations(&self) -> usize {
        self.depths.len()
            * self.widths.len()
            * self.write_ports.len()
            * self.read_ports.len()
            * self.architectures.len()
            * self.bypasses.len()
    }
}

/// Split one list argument into its tokens.
///
/// Whitespace is treated like a separator so quoted lists such as
/// `"4, 8"` behave the same as `4,8`.
pub fn split_list(arg: &str) -> Vec<&str> {
    arg.split(|c: char| SEPARATORS.contains(&c) || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect()
}

fn tokens(position: usize, arg: &str) -> Result<Vec<&str>> {
    let tokens = split_list(arg);
    if tokens.is_empty() {
        return Err(ParamError::EmptyList {
            parameter: PARAMETER_NAMES[position],
        });
    }
    Ok(tokens)
}

fn numeric(position: usize, arg: &str) -> Result<Vec<NumericToken>> {
    tokens(position, arg)?
        .into_iter()
        .map(|t| NumericToken::parse(PARAMETER_NAMES[position], t))
        .collect()
}

fn vocabulary<'a>(words: impl Iterator<Item = &'a str>) -> String {
    words.collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_accepts_every_bracket_kind() {
        assert_eq!(split_list("1,2,3"), vec!["1", "2", "3"]);
        assert_eq!(split_list("(1,2)"), vec!["1", "2"]);
        assert_eq!(split_list("[1]{2}<3>"), vec!["1", "2", "3"]);
        assert_eq!(split_list(",,4,,"), vec!["4"]);
        assert_eq!(split_list("4, 8"), vec!["4", "8"]);
    }

    #[test]
    fn single_valid_combination_parses() {
        let set = ParameterSet::from_args(["REG", "NON", "4", "8", "1", "1"]).unwrap();
        assert_eq!(set.architectures, vec![Architecture::Reg]);
        assert_eq!(set.bypasses, vec![Bypass::Non]);
        assert_eq!(set.depths[0].as_str(), "4");
        assert_eq!(set.total_combinations(), 1);
    }

    #[test]
    fn multi_valued_lists_multiply() {
        let set = ParameterSet::from_args([
            "(REG,XOR,LVTBIN)",
            "[NON,RAW]",
            "{1024,2048}",
            "32",
            "<2,3>",
            "4",
        ])
        .unwrap();
        assert_eq!(set.total_combinations(), 3 * 2 * 2 * 1 * 2 * 1);
    }

    #[test]
    fn unknown_architecture_is_rejected() {
        let err = ParameterSet::from_args(["BADARCH", "NON", "4", "8", "1", "1"]).unwrap_err();
        match err {
            ParamError::UnknownToken {
                parameter, token, ..
            } => {
                assert_eq!(parameter, "architecture");
                assert_eq!(token, "BADARCH");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_bypass_is_rejected() {
        let err = ParameterSet::from_args(["REG", "NON,BAD", "4", "8", "1", "1"]).unwrap_err();
        assert!(matches!(
            err,
            ParamError::UnknownToken {
                parameter: "bypass",
                ..
            }
        ));
    }

    #[test]
    fn enum_tokens_are_case_sensitive() {
        assert!(ParameterSet::from_args(["reg", "NON", "4", "8", "1", "1"]).is_err());
    }

    #[test]
    fn non_integer_numeric_is_rejected() {
        for bad in ["4a", "-4", "4.0", "+4"] {
            let err = ParameterSet::from_args(["REG", "NON", bad, "8", "1", "1"]).unwrap_err();
            assert!(
                matches!(err, ParamError::NotAnInteger { parameter: "depth", .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn zero_is_accepted_leniently() {
        let set = ParameterSet::from_args(["REG", "NON", "0", "8", "1", "1"]).unwrap();
        assert_eq!(set.depths[0].as_str(), "0");
    }

    #[test]
    fn leading_zeros_are_kept_verbatim() {
        let set = ParameterSet::from_args(["REG", "NON", "004", "8", "1", "1"]).unwrap();
        assert_eq!(set.depths[0].to_string(), "004");
    }

    #[test]
    fn wrong_argument_count_is_rejected() {
        let err = ParameterSet::from_args(["REG", "NON", "4", "8", "1"]).unwrap_err();
        assert!(matches!(
            err,
            ParamError::WrongArgumentCount {
                expected: 6,
                found: 5
            }
        ));
        assert!(ParameterSet::from_args(Vec::<String>::new()).is_err());
    }

    #[test]
    fn empty_list_is_rejected() {
        let err = ParameterSet::from_args(["REG", "NON", "()", "8", "1", "1"]).unwrap_err();
        assert!(matches!(err, ParamError::EmptyList { parameter: "depth" }));
    }

    #[test]
    fn first_violation_is_reported() {
        let err = ParameterSet::from_args(["REG", "NON", "x", "y", "1", "1"]).unwrap_err();
        assert!(err.to_string().contains("'x'"));
    }
}
