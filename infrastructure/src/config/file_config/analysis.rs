//! Analysis configuration from TOML (`[analysis]` section)

use consensus_application::AnalysisParams;
use consensus_domain::{
    AlignmentKind, ComparatorKind, ConfigIssue, ConfigIssueCode, InsightsParams,
    MultiSelectPolicy, ReportMode, Source,
};
use serde::{Deserialize, Serialize};

/// Raw analysis configuration from TOML
///
/// # Example
///
/// ```toml
/// [analysis]
/// comparator = "containment"   # "containment" or "strict"
/// multi_select = "overlap"     # "exact" or "overlap"
/// overlap_ratio = 0.5          # only read when multi_select = "overlap"
/// alignment = "positional"     # "positional" or "respondent_index"
/// consensus_window = 10
/// baseline = "gpt-4.1"         # source compared against; first set when unset
/// mode = "compare"             # "compare" or "aggregate"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnalysisConfig {
    pub comparator: String,
    pub multi_select: String,
    pub overlap_ratio: Option<f64>,
    pub alignment: String,
    pub consensus_window: usize,
    pub baseline: Option<String>,
    pub mode: String,
}

const DEFAULT_OVERLAP_RATIO: f64 = 0.5;

impl Default for FileAnalysisConfig {
    fn default() -> Self {
        Self {
            comparator: "containment".to_string(),
            multi_select: "exact".to_string(),
            overlap_ratio: None,
            alignment: "positional".to_string(),
            consensus_window: consensus_domain::analysis::DEFAULT_CONSENSUS_WINDOW,
            baseline: None,
            mode: "compare".to_string(),
        }
    }
}

impl FileAnalysisConfig {
    /// Parse comparator name, falling back to containment with a warning.
    pub fn parse_comparator(&self) -> (ComparatorKind, Vec<ConfigIssue>) {
        match self.comparator.parse::<ComparatorKind>() {
            Ok(kind) => (kind, vec![]),
            Err(_) => (
                ComparatorKind::default(),
                vec![ConfigIssue::warning(
                    ConfigIssueCode::UnknownComparator,
                    format!(
                        "analysis.comparator: unknown value '{}', falling back to 'containment'",
                        self.comparator
                    ),
                )],
            ),
        }
    }

    /// Parse alignment name
    ///
    /// Accepts: "positional", "respondent_index", "respondent-index", "index"
    pub fn parse_alignment(&self) -> (AlignmentKind, Vec<ConfigIssue>) {
        match self.alignment.parse::<AlignmentKind>() {
            Ok(kind) => (kind, vec![]),
            Err(_) => (
                AlignmentKind::default(),
                vec![ConfigIssue::warning(
                    ConfigIssueCode::UnknownAlignment,
                    format!(
                        "analysis.alignment: unknown value '{}', falling back to 'positional'",
                        self.alignment
                    ),
                )],
            ),
        }
    }

    /// Parse the multi-select policy together with its overlap ratio.
    ///
    /// An out-of-range ratio is an error: silently clamping it would change
    /// every multi-select match.
    pub fn parse_multi_select(&self) -> (MultiSelectPolicy, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let policy = match self.multi_select.trim().to_lowercase().as_str() {
            "exact" => {
                if self.overlap_ratio.is_some() {
                    issues.push(ConfigIssue::warning(
                        ConfigIssueCode::OverlapRatioIgnored,
                        "analysis.overlap_ratio: ignored while multi_select = 'exact'",
                    ));
                }
                MultiSelectPolicy::Exact
            }
            "overlap" | "jaccard" => {
                let ratio = self.overlap_ratio.unwrap_or(DEFAULT_OVERLAP_RATIO);
                if (0.0..=1.0).contains(&ratio) {
                    MultiSelectPolicy::Overlap { min_ratio: ratio }
                } else {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::OverlapRatioOutOfRange,
                        format!(
                            "analysis.overlap_ratio: {} is outside 0.0..=1.0",
                            ratio
                        ),
                    ));
                    MultiSelectPolicy::Overlap {
                        min_ratio: DEFAULT_OVERLAP_RATIO,
                    }
                }
            }
            _ => {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::UnknownMultiSelectPolicy,
                    format!(
                        "analysis.multi_select: unknown value '{}', falling back to 'exact'",
                        self.multi_select
                    ),
                ));
                MultiSelectPolicy::Exact
            }
        };
        (policy, issues)
    }

    pub fn parse_mode(&self) -> (ReportMode, Vec<ConfigIssue>) {
        match self.mode.parse::<ReportMode>() {
            Ok(mode) => (mode, vec![]),
            Err(_) => (
                ReportMode::default(),
                vec![ConfigIssue::warning(
                    ConfigIssueCode::UnknownReportMode,
                    format!(
                        "analysis.mode: unknown value '{}', falling back to 'compare'",
                        self.mode
                    ),
                )],
            ),
        }
    }

    /// Insight tuning; a zero window falls back to the default
    pub fn parse_insights(&self) -> (InsightsParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut params = InsightsParams::default();

        if self.consensus_window == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroConsensusWindow,
                format!(
                    "analysis.consensus_window: 0 analyzes nothing, falling back to {}",
                    params.consensus_window
                ),
            ));
        } else {
            params = params.with_window(self.consensus_window);
        }

        if let Some(baseline) = self.baseline.as_deref().map(str::trim)
            && !baseline.is_empty()
        {
            let Ok(source) = baseline.parse::<Source>();
            params = params.with_baseline(source);
        }

        (params, issues)
    }

    /// Convert to application parameters, collecting every issue.
    pub fn to_analysis_params(&self) -> (AnalysisParams, Vec<ConfigIssue>) {
        let (comparator, mut issues) = self.parse_comparator();
        let (multi_select, multi_issues) = self.parse_multi_select();
        let (alignment, alignment_issues) = self.parse_alignment();
        let (insights, insight_issues) = self.parse_insights();
        let (mode, mode_issues) = self.parse_mode();
        issues.extend(multi_issues);
        issues.extend(alignment_issues);
        issues.extend(insight_issues);
        issues.extend(mode_issues);

        let params = AnalysisParams::default()
            .with_comparator(comparator)
            .with_multi_select(multi_select)
            .with_alignment(alignment)
            .with_insights(insights)
            .with_mode(mode);
        (params, issues)
    }
}
