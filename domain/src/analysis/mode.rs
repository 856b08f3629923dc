//! Report mode value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How several response sets are reported
///
/// A pure parameter of reporting; it never changes the metrics themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Pairwise agreement against a baseline plus per-source consensus
    #[default]
    Compare,
    /// One combined consensus per question across every set
    Aggregate,
}

impl ReportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportMode::Compare => "compare",
            ReportMode::Aggregate => "aggregate",
        }
    }
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compare" | "comparison" => Ok(ReportMode::Compare),
            "aggregate" | "combined" => Ok(ReportMode::Aggregate),
            _ => Err(format!(
                "Invalid report mode: {}. Valid options: compare, aggregate",
                s
            )),
        }
    }
}
