//! Pairwise answer comparison
//!
//! Every metric decides "are these two answers the same response" through an
//! [`AnswerComparator`], so a stricter comparator can replace the lenient
//! default without touching callers.
//!
//! # Matching rules
//!
//! | Pair | [`ContainmentComparator`] | [`StrictComparator`] |
//! |------|---------------------------|----------------------|
//! | `Empty` vs anything | never | never |
//! | text vs text | `a == b`, `a ⊂ b` or `b ⊂ a` | `a == b` |
//! | multi vs multi | per [`MultiSelectPolicy`] | per [`MultiSelectPolicy`] |
//!
//! Text compared against a multi-select answer is treated as a one-element
//! multiset.

use super::normalize::NormalizedAnswer;
use serde::{Deserialize, Serialize};

/// How multi-select answers are matched
///
/// One policy is chosen per analysis run and applied to every metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum MultiSelectPolicy {
    /// Element-for-element multiset equality
    #[default]
    Exact,
    /// Jaccard overlap of the two multisets must reach `min_ratio` (0.0-1.0)
    Overlap { min_ratio: f64 },
}

impl MultiSelectPolicy {
    fn matches(&self, a: &[&str], b: &[&str]) -> bool {
        match self {
            MultiSelectPolicy::Exact => a == b,
            MultiSelectPolicy::Overlap { min_ratio } => overlap_ratio(a, b) >= *min_ratio,
        }
    }
}

/// Multiset Jaccard ratio of two sorted choice lists
pub fn overlap_ratio(a: &[&str], b: &[&str]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut intersection = 0usize;
    while i < a.len() && j < b.len() {
        match a[i].cmp(b[j]) {
            std::cmp::Ordering::Equal => {
                intersection += 1;
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Decides whether two normalized answers count as the same response
pub trait AnswerComparator: Send + Sync {
    fn same(&self, a: &NormalizedAnswer, b: &NormalizedAnswer) -> bool;

    /// Identifier for logs and reports
    fn name(&self) -> &'static str;
}

/// Lenient matcher: equal, or either text contains the other
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainmentComparator {
    pub multi_select: MultiSelectPolicy,
}

impl ContainmentComparator {
    pub fn new(multi_select: MultiSelectPolicy) -> Self {
        Self { multi_select }
    }
}

impl AnswerComparator for ContainmentComparator {
    fn same(&self, a: &NormalizedAnswer, b: &NormalizedAnswer) -> bool {
        match (a, b) {
            (NormalizedAnswer::Empty, _) | (_, NormalizedAnswer::Empty) => false,
            (NormalizedAnswer::Text(a), NormalizedAnswer::Text(b)) => {
                a == b || b.contains(a.as_str()) || a.contains(b.as_str())
            }
            _ => self.multi_select.matches(&a.as_choices(), &b.as_choices()),
        }
    }

    fn name(&self) -> &'static str {
        "containment"
    }
}

/// Exact matcher with no containment leniency
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictComparator {
    pub multi_select: MultiSelectPolicy,
}

impl StrictComparator {
    pub fn new(multi_select: MultiSelectPolicy) -> Self {
        Self { multi_select }
    }
}

impl AnswerComparator for StrictComparator {
    fn same(&self, a: &NormalizedAnswer, b: &NormalizedAnswer) -> bool {
        match (a, b) {
            (NormalizedAnswer::Empty, _) | (_, NormalizedAnswer::Empty) => false,
            (NormalizedAnswer::Text(a), NormalizedAnswer::Text(b)) => a == b,
            _ => self.multi_select.matches(&a.as_choices(), &b.as_choices()),
        }
    }

    fn name(&self) -> &'static str {
        "strict"
    }
}

/// Configurable choice of [`AnswerComparator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComparatorKind {
    #[default]
    Containment,
    Strict,
}

impl ComparatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparatorKind::Containment => "containment",
            ComparatorKind::Strict => "strict",
        }
    }

    pub fn build(self, multi_select: MultiSelectPolicy) -> Box<dyn AnswerComparator> {
        match self {
            ComparatorKind::Containment => Box::new(ContainmentComparator::new(multi_select)),
            ComparatorKind::Strict => Box::new(StrictComparator::new(multi_select)),
        }
    }
}

impl std::str::FromStr for ComparatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "containment" | "lenient" => Ok(ComparatorKind::Containment),
            "strict" | "exact" => Ok(ComparatorKind::Strict),
            _ => Err(format!(
                "Invalid comparator: {}. Valid options: containment, strict",
                s
            )),
        }
    }
}
