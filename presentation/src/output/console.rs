//! Console output formatter for analysis reports

use crate::output::formatter::ReportFormatter;
use colored::{ColoredString, Colorize};
use consensus_application::{QuestionConsensus, RunStabilityCampaignOutput, SurveyReport};
use consensus_domain::core::string::truncate;
use consensus_domain::{
    CampaignStatus, ConsensusResult, PairwiseAgreement, QuestionCatalog, SourceScore,
    StabilityStatus, SurveyInsights,
};

const QUESTION_WIDTH: usize = 60;
const MAX_FLAGGED_SHOWN: usize = 20;

/// Formats reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn format_consensus(questions: &[QuestionConsensus]) -> String {
        let mut output = Self::header("Consensus");
        output.push('\n');

        for q in questions {
            output.push_str(&format!(
                "\n{} {} {}\n",
                format!("Q{}.", q.question_number).cyan().bold(),
                truncate(&q.text, QUESTION_WIDTH),
                format!("[{}]", q.question_type).dimmed()
            ));
            if let Some(combined) = &q.combined {
                output.push_str(&format!("  {}\n", Self::consensus_line(combined)));
                for entry in combined.distribution.iter().skip(1) {
                    output.push_str(&format!(
                        "    {} {}\n",
                        format!("{:>3}x", entry.count).dimmed(),
                        entry.answer
                    ));
                }
            }
            for source in &q.per_source {
                output.push_str(&format!(
                    "  {:<20} {}\n",
                    source.source.to_string().yellow(),
                    Self::consensus_line(&source.consensus)
                ));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn format_comparison(catalog: &QuestionCatalog, pair: &PairwiseAgreement) -> String {
        let mut output = Self::header(&format!("{} vs {}", pair.source_a, pair.source_b));
        output.push('\n');

        output.push_str(&format!(
            "\n{} {}\n",
            "Overall agreement:".cyan().bold(),
            Self::percent(pair.overall)
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Aligned respondents:".cyan().bold(),
            pair.aligned_respondents
        ));
        if pair.degraded {
            output.push_str(&format!(
                "{}\n",
                "Sets differ in respondents or questions; only the overlap was compared"
                    .yellow()
            ));
        }

        output.push_str(&Self::section_header("Per question"));
        for q in &pair.per_question {
            let text = catalog
                .get(q.question_number)
                .map(|question| truncate(&question.text, QUESTION_WIDTH))
                .unwrap_or_default();
            let variance = if q.variance > 0 {
                format!("{}% variance", q.variance).red()
            } else {
                "0% variance".dimmed()
            };
            output.push_str(&format!(
                "{:<6} {} agree  {}  {}  {}\n",
                format!("Q{}", q.question_number),
                Self::percent(q.agreement),
                variance,
                format!("({} pairs)", q.comparable).dimmed(),
                text
            ));
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn format_consistency(scores: &[SourceScore]) -> String {
        let mut output = Self::header("Internal consistency");
        output.push('\n');
        for score in scores {
            output.push_str(&format!(
                "  {:<24} {}\n",
                score.source.to_string().yellow(),
                Self::percent(score.score)
            ));
        }
        output.push_str(&Self::footer());
        output
    }

    pub fn format_stability(catalog: &QuestionCatalog, result: &RunStabilityCampaignOutput) -> String {
        let report = &result.report;
        let mut output = Self::header("Rerun stability");
        output.push('\n');

        let status = match report.status {
            CampaignStatus::Completed => report.status.as_str().green(),
            CampaignStatus::Failed => report.status.as_str().red(),
            _ => report.status.as_str().normal(),
        };
        output.push_str(&format!("\n{} {}\n", "Status:".cyan().bold(), status));
        output.push_str(&format!(
            "{} {} reruns x {} respondents ({} ms)\n",
            "Campaign:".cyan().bold(),
            report.rerun_count,
            report.respondents,
            result.elapsed().num_milliseconds()
        ));
        if !result.campaign.excluded_personas.is_empty() {
            let excluded: Vec<String> = result
                .campaign
                .excluded_personas
                .iter()
                .map(|p| p.to_string())
                .collect();
            output.push_str(&format!(
                "{} {}\n",
                "Excluded personas:".yellow().bold(),
                excluded.join(", ")
            ));
        }
        let overall = match report.overall {
            Some(score) => Self::percent(score),
            None => "No data".dimmed(),
        };
        output.push_str(&format!("{} {}\n", "Overall stability:".cyan().bold(), overall));

        output.push_str(&Self::section_header("Per question"));
        for q in &report.per_question {
            let text = catalog
                .get(q.question_number)
                .map(|question| truncate(&question.text, QUESTION_WIDTH))
                .unwrap_or_default();
            let label = match q.status {
                StabilityStatus::Scored { score, .. } => Self::percent(score),
                _ => q.label().dimmed(),
            };
            output.push_str(&format!(
                "{:<6} {:<16} {}\n",
                format!("Q{}", q.question_number),
                label,
                text
            ));
        }

        if report.flagged_count > 0 {
            output.push_str(&Self::section_header(&format!(
                "Unstable answers ({})",
                report.flagged_count
            )));
            for pair in report.flagged.iter().take(MAX_FLAGGED_SHOWN) {
                output.push_str(&format!(
                    "  respondent {} Q{}: {}\n",
                    pair.respondent_index,
                    pair.question_number,
                    pair.answers.join(" | ")
                ));
            }
            if report.flagged.len() > MAX_FLAGGED_SHOWN {
                output.push_str(&format!(
                    "  {}\n",
                    format!("... and {} more", report.flagged.len() - MAX_FLAGGED_SHOWN).dimmed()
                ));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn format_insights(insights: &SurveyInsights) -> String {
        let mut output = Self::section_header("Insights");
        let optional = |value: Option<u8>| match value {
            Some(score) => Self::percent(score),
            None => "n/a".dimmed(),
        };

        output.push_str(&format!("  Total responses:     {}\n", insights.total_responses));
        output.push_str(&format!("  Questions analyzed:  {}\n", insights.questions_analyzed));
        output.push_str(&format!(
            "  Consensus strength:  {}\n",
            optional(insights.consensus_strength)
        ));
        output.push_str(&format!(
            "  Diversity index:     {}\n",
            optional(insights.diversity_index)
        ));
        if let Some(best) = &insights.most_consistent {
            output.push_str(&format!(
                "  Most consistent:     {} ({})\n",
                best.source.to_string().yellow(),
                Self::percent(best.score)
            ));
        }
        if let Some(divergent) = &insights.most_divergent {
            let baseline = insights
                .baseline
                .as_ref()
                .map(|b| format!(" vs {}", b))
                .unwrap_or_default();
            output.push_str(&format!(
                "  Most divergent:      {} ({} similar{})\n",
                divergent.source.to_string().yellow(),
                Self::percent(divergent.score),
                baseline
            ));
        }
        output
    }

    pub fn format_report(report: &SurveyReport) -> String {
        let mut output = Self::format_consensus(&report.questions);
        for pair in &report.comparisons {
            output.push_str(&format!(
                "{} vs {}: {} overall agreement{}\n",
                pair.source_a.to_string().yellow(),
                pair.source_b.to_string().yellow(),
                Self::percent(pair.overall),
                if pair.degraded { " (partial overlap)" } else { "" }
            ));
        }
        if !report.consistency.is_empty() {
            output.push_str(&Self::section_header("Internal consistency"));
            for score in &report.consistency {
                output.push_str(&format!(
                    "  {:<24} {}\n",
                    score.source.to_string().yellow(),
                    Self::percent(score.score)
                ));
            }
        }
        output.push_str(&Self::format_insights(&report.insights));
        output.push_str(&Self::footer());
        output
    }

    fn consensus_line(result: &ConsensusResult) -> String {
        if !result.has_data() {
            return result.dominant_answer.dimmed().to_string();
        }
        format!(
            "{} {} {}",
            result.dominant_answer.bold(),
            Self::percent(result.confidence),
            format!("(n={})", result.total).dimmed()
        )
    }

    fn percent(value: u8) -> ColoredString {
        let text = format!("{}%", value);
        match value {
            80.. => text.green(),
            50..=79 => text.yellow(),
            _ => text.red(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn consensus(&self, questions: &[QuestionConsensus]) -> String {
        Self::format_consensus(questions)
    }

    fn comparison(&self, catalog: &QuestionCatalog, pair: &PairwiseAgreement) -> String {
        Self::format_comparison(catalog, pair)
    }

    fn consistency(&self, scores: &[SourceScore]) -> String {
        Self::format_consistency(scores)
    }

    fn stability(&self, catalog: &QuestionCatalog, output: &RunStabilityCampaignOutput) -> String {
        Self::format_stability(catalog, output)
    }

    fn report(&self, report: &SurveyReport) -> String {
        Self::format_report(report)
    }
}
