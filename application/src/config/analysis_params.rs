//! Analysis parameters: one matching policy per run.

use consensus_domain::{
    AlignmentKind, AnalysisEngine, ComparatorKind, InsightsParams, MultiSelectPolicy, ReportMode,
};
use serde::{Deserialize, Serialize};

/// Parameters shared by every analysis use case.
///
/// The comparator, multi-select policy and alignment are applied uniformly:
/// consensus, agreement, consistency and stability all see the same rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalysisParams {
    pub comparator: ComparatorKind,
    pub multi_select: MultiSelectPolicy,
    pub alignment: AlignmentKind,
    pub insights: InsightsParams,
    pub mode: ReportMode,
}

impl AnalysisParams {
    // ==================== Builder Methods ====================

    pub fn with_comparator(mut self, comparator: ComparatorKind) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn with_multi_select(mut self, policy: MultiSelectPolicy) -> Self {
        self.multi_select = policy;
        self
    }

    pub fn with_alignment(mut self, alignment: AlignmentKind) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_insights(mut self, insights: InsightsParams) -> Self {
        self.insights = insights;
        self
    }

    pub fn with_mode(mut self, mode: ReportMode) -> Self {
        self.mode = mode;
        self
    }

    /// Build the engine that applies these parameters
    pub fn engine(&self) -> AnalysisEngine {
        AnalysisEngine::from_kinds(self.comparator, self.multi_select, self.alignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = AnalysisParams::default();
        assert_eq!(params.comparator, ComparatorKind::Containment);
        assert_eq!(params.multi_select, MultiSelectPolicy::Exact);
        assert_eq!(params.alignment, AlignmentKind::Positional);
        assert_eq!(params.insights.consensus_window, 10);
        assert_eq!(params.mode, ReportMode::Compare);
    }

    #[test]
    fn test_engine_follows_params() {
        let params = AnalysisParams::default()
            .with_comparator(ComparatorKind::Strict)
            .with_alignment(AlignmentKind::RespondentIndex);
        let engine = params.engine();
        assert_eq!(engine.comparator().name(), "strict");
        assert_eq!(engine.alignment().name(), "respondent_index");
    }
}
