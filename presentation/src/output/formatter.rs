//! Report formatter trait

use super::console::ConsoleFormatter;
use consensus_application::{QuestionConsensus, RunStabilityCampaignOutput, SurveyReport};
use consensus_domain::{OutputFormat, PairwiseAgreement, QuestionCatalog, SourceScore};
use serde::Serialize;

/// Renders every report kind the CLI produces
pub trait ReportFormatter {
    fn consensus(&self, questions: &[QuestionConsensus]) -> String;

    fn comparison(&self, catalog: &QuestionCatalog, pair: &PairwiseAgreement) -> String;

    fn consistency(&self, scores: &[SourceScore]) -> String;

    fn stability(&self, catalog: &QuestionCatalog, output: &RunStabilityCampaignOutput) -> String;

    fn report(&self, report: &SurveyReport) -> String;
}

/// Pretty-printed JSON of the underlying values
pub struct JsonFormatter;

impl JsonFormatter {
    fn render<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl ReportFormatter for JsonFormatter {
    fn consensus(&self, questions: &[QuestionConsensus]) -> String {
        Self::render(questions)
    }

    fn comparison(&self, _catalog: &QuestionCatalog, pair: &PairwiseAgreement) -> String {
        Self::render(pair)
    }

    fn consistency(&self, scores: &[SourceScore]) -> String {
        Self::render(scores)
    }

    fn stability(&self, _catalog: &QuestionCatalog, output: &RunStabilityCampaignOutput) -> String {
        Self::render(&serde_json::json!({
            "run_id": output.campaign.run_id,
            "status": output.campaign.status,
            "excluded_personas": output.campaign.excluded_personas,
            "started_at": output.started_at,
            "finished_at": output.finished_at,
            "report": output.report,
        }))
    }

    fn report(&self, report: &SurveyReport) -> String {
        Self::render(report)
    }
}

pub fn formatter_for(format: OutputFormat) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
