//! Respondent alignment across response sets
//!
//! Comparisons between sets need to know which respondent in set A stands
//! opposite which respondent in set B. Generators give no identity guarantee
//! across sources, so the default [`PositionalAlignment`] pairs respondents
//! by generation order. Callers that need meaningful cross-source agreement
//! must make sure that order is consistent, or switch to
//! [`RespondentIndexAlignment`] when respondent indices are shared (as they
//! are within a rerun campaign).

use super::set::{RespondentRecord, ResponseSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pairs up respondents across response sets
pub trait AlignmentStrategy: Send + Sync {
    /// Align two sets; unmatched respondents are dropped
    fn align_pair<'a>(
        &self,
        a: &'a ResponseSet,
        b: &'a ResponseSet,
    ) -> Vec<(&'a RespondentRecord, &'a RespondentRecord)> {
        self.align_many(&[a, b])
            .into_iter()
            .map(|row| (row[0], row[1]))
            .collect()
    }

    /// Align any number of sets; each row holds one record per set, in set order
    fn align_many<'a>(&self, sets: &[&'a ResponseSet]) -> Vec<Vec<&'a RespondentRecord>>;

    /// Identifier for logs and reports
    fn name(&self) -> &'static str;
}

/// Index-by-index alignment, truncated to the shortest set
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalAlignment;

impl AlignmentStrategy for PositionalAlignment {
    fn align_many<'a>(&self, sets: &[&'a ResponseSet]) -> Vec<Vec<&'a RespondentRecord>> {
        let Some(shortest) = sets.iter().map(|s| s.respondent_count()).min() else {
            return Vec::new();
        };
        (0..shortest)
            .map(|i| sets.iter().map(|s| &s.respondents()[i]).collect())
            .collect()
    }

    fn name(&self) -> &'static str {
        "positional"
    }
}

/// Joins respondents on `respondent_index`, in the order of the first set
#[derive(Debug, Clone, Copy, Default)]
pub struct RespondentIndexAlignment;

impl AlignmentStrategy for RespondentIndexAlignment {
    fn align_many<'a>(&self, sets: &[&'a ResponseSet]) -> Vec<Vec<&'a RespondentRecord>> {
        let Some((first, rest)) = sets.split_first() else {
            return Vec::new();
        };
        let indexes: Vec<HashMap<usize, &'a RespondentRecord>> = rest
            .iter()
            .map(|set| {
                let mut map = HashMap::new();
                for record in set.respondents() {
                    // first occurrence wins
                    map.entry(record.respondent_index).or_insert(record);
                }
                map
            })
            .collect();

        first
            .respondents()
            .iter()
            .filter_map(|record| {
                let mut row = Vec::with_capacity(sets.len());
                row.push(record);
                for index in &indexes {
                    row.push(*index.get(&record.respondent_index)?);
                }
                Some(row)
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "respondent_index"
    }
}

/// Configurable choice of [`AlignmentStrategy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentKind {
    #[default]
    Positional,
    RespondentIndex,
}

impl AlignmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentKind::Positional => "positional",
            AlignmentKind::RespondentIndex => "respondent_index",
        }
    }

    pub fn build(self) -> Box<dyn AlignmentStrategy> {
        match self {
            AlignmentKind::Positional => Box::new(PositionalAlignment),
            AlignmentKind::RespondentIndex => Box::new(RespondentIndexAlignment),
        }
    }
}

impl std::str::FromStr for AlignmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "positional" | "position" => Ok(AlignmentKind::Positional),
            "respondent_index" | "index" => Ok(AlignmentKind::RespondentIndex),
            _ => Err(format!(
                "Invalid alignment: {}. Valid options: positional, respondent_index",
                s
            )),
        }
    }
}
