//! Structured configuration issues
//!
//! Validation never aborts on the first problem; it collects every issue so
//! the caller can print warnings and refuse to start only on errors.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: a default is used instead.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// Unknown comparator name; containment is used.
    UnknownComparator,
    /// Unknown alignment name; positional is used.
    UnknownAlignment,
    /// Unknown multi-select policy name; exact is used.
    UnknownMultiSelectPolicy,
    /// Unknown report mode; compare is used.
    UnknownReportMode,
    /// Overlap ratio outside 0.0..=1.0.
    OverlapRatioOutOfRange,
    /// Overlap ratio set while the policy is exact.
    OverlapRatioIgnored,
    /// A rerun campaign needs at least one rerun.
    ZeroRerunCount,
    /// Stability needs at least two reruns to compare.
    SingleRerun,
    /// Concurrency limit of zero would never schedule a generation.
    ZeroConcurrency,
    /// Consensus window of zero analyzes nothing.
    ZeroConsensusWindow,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        let err = ConfigIssue::error(ConfigIssueCode::ZeroRerunCount, "rerun_count must be > 0");
        assert!(err.is_error());
        assert_eq!(err.to_string(), "error: rerun_count must be > 0");

        let warn = ConfigIssue::warning(ConfigIssueCode::UnknownComparator, "fuzzy");
        assert!(!warn.is_error());
        assert_eq!(warn.severity, Severity::Warning);
    }
}
