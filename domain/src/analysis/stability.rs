//! Rerun stability scoring
//!
//! For each comparable question, a respondent is *stable* when every pair of
//! its non-empty rerun answers agrees, and *flagged* when any pair disagrees.
//! Respondents with fewer than two non-empty rerun answers are not compared.
//! Free-text questions are never scored.

use super::percent::{mean_percent, percent};
use crate::answer::{AnswerComparator, NormalizedAnswer};
use crate::campaign::{CampaignResult, CampaignStatus};
use crate::core::question::QuestionCatalog;
use crate::response::{AlignmentStrategy, RespondentRecord, ResponseSet};
use serde::{Deserialize, Serialize};

/// Label shown for questions excluded from stability scoring
pub const NOT_APPLICABLE_LABEL: &str = "N/A User Input";

/// Outcome for one question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StabilityStatus {
    Scored {
        score: u8,
        stable: usize,
        compared: usize,
        flagged: usize,
    },
    /// Free-text question; excluded from the overall score
    NotApplicable,
    /// No respondent had two non-empty rerun answers
    NoData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionStability {
    pub question_number: u32,
    #[serde(flatten)]
    pub status: StabilityStatus,
}

impl QuestionStability {
    pub fn score(&self) -> Option<u8> {
        match self.status {
            StabilityStatus::Scored { score, .. } => Some(score),
            _ => None,
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self.status, StabilityStatus::NotApplicable)
    }

    pub fn label(&self) -> String {
        match self.status {
            StabilityStatus::Scored { score, .. } => format!("{}%", score),
            StabilityStatus::NotApplicable => NOT_APPLICABLE_LABEL.to_string(),
            StabilityStatus::NoData => "No data".to_string(),
        }
    }
}

/// A respondent-question pair whose rerun answers disagree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedPair {
    pub respondent_index: usize,
    pub question_number: u32,
    /// Normalized rerun answers in rerun order, empty ones omitted
    pub answers: Vec<String>,
}

/// Stability of a rerun campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilityReport {
    pub status: CampaignStatus,
    /// Mean of scored questions; `None` when nothing could be scored
    pub overall: Option<u8>,
    pub per_question: Vec<QuestionStability>,
    pub flagged_count: usize,
    pub flagged: Vec<FlaggedPair>,
    pub rerun_count: usize,
    /// Respondents aligned across every rerun
    pub respondents: usize,
}

impl StabilityReport {
    /// Terminal failure: zero results, distinct from low stability
    pub fn failed(rerun_count: usize) -> Self {
        Self {
            status: CampaignStatus::Failed,
            overall: None,
            per_question: Vec::new(),
            flagged_count: 0,
            flagged: Vec::new(),
            rerun_count,
            respondents: 0,
        }
    }

    pub fn question(&self, question_number: u32) -> Option<&QuestionStability> {
        self.per_question
            .iter()
            .find(|q| q.question_number == question_number)
    }
}

/// Scores answer stability across reruns of the same personas
pub struct StabilityEvaluator<'a> {
    comparator: &'a dyn AnswerComparator,
    alignment: &'a dyn AlignmentStrategy,
}

impl<'a> StabilityEvaluator<'a> {
    pub fn new(comparator: &'a dyn AnswerComparator, alignment: &'a dyn AlignmentStrategy) -> Self {
        Self {
            comparator,
            alignment,
        }
    }

    /// Report for a finished campaign; failed campaigns yield [`StabilityReport::failed`]
    pub fn evaluate_campaign(&self, catalog: &QuestionCatalog, campaign: &CampaignResult) -> StabilityReport {
        if campaign.is_failed() {
            return StabilityReport::failed(campaign.rerun_count);
        }
        self.evaluate(catalog, &campaign.reruns)
    }

    pub fn evaluate(&self, catalog: &QuestionCatalog, reruns: &[ResponseSet]) -> StabilityReport {
        let sets: Vec<&ResponseSet> = reruns.iter().collect();
        let rows = self.alignment.align_many(&sets);

        let mut per_question = Vec::with_capacity(catalog.len());
        let mut flagged = Vec::new();
        for question in catalog.questions() {
            let status = if question.question_type.is_comparable() {
                self.score_question(question.question_number, &rows, &mut flagged)
            } else {
                StabilityStatus::NotApplicable
            };
            per_question.push(QuestionStability {
                question_number: question.question_number,
                status,
            });
        }

        let scores: Vec<u8> = per_question.iter().filter_map(QuestionStability::score).collect();
        StabilityReport {
            status: CampaignStatus::Completed,
            overall: mean_percent(&scores),
            per_question,
            flagged_count: flagged.len(),
            flagged,
            rerun_count: reruns.len(),
            respondents: rows.len(),
        }
    }

    fn score_question(
        &self,
        question_number: u32,
        rows: &[Vec<&RespondentRecord>],
        flagged: &mut Vec<FlaggedPair>,
    ) -> StabilityStatus {
        let mut stable = 0;
        let mut compared = 0;
        let mut disagreements = 0;
        for row in rows {
            let answers: Vec<NormalizedAnswer> = row
                .iter()
                .map(|r| r.answer(question_number))
                .filter(|a| !a.is_empty())
                .collect();
            if answers.len() < 2 {
                continue;
            }
            compared += 1;
            if self.all_agree(&answers) {
                stable += 1;
            } else {
                disagreements += 1;
                flagged.push(FlaggedPair {
                    respondent_index: row[0].respondent_index,
                    question_number,
                    answers: answers.iter().filter_map(NormalizedAnswer::key).collect(),
                });
            }
        }
        if compared == 0 {
            return StabilityStatus::NoData;
        }
        StabilityStatus::Scored {
            score: percent(stable, compared),
            stable,
            compared,
            flagged: disagreements,
        }
    }

    fn all_agree(&self, answers: &[NormalizedAnswer]) -> bool {
        answers.iter().enumerate().all(|(i, a)| {
            answers[i + 1..]
                .iter()
                .all(|b| self.comparator.same(a, b))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::{ContainmentComparator, RawAnswer};
    use crate::campaign::RunId;
    use crate::core::question::{Question, QuestionType};
    use crate::core::source::Source;
    use crate::response::{AnswerEntry, PositionalAlignment};

    fn catalog() -> QuestionCatalog {
        QuestionCatalog::new(vec![
            Question::new(1, "Colour", QuestionType::SingleSelect),
            Question::new(2, "Why", QuestionType::FreeText),
            Question::new(3, "Rate", QuestionType::RatingScale),
        ])
        .unwrap()
    }

    /// rerun n: one row per respondent of (q1, q2, q3) answers
    fn rerun(n: usize, rows: &[[&str; 3]]) -> ResponseSet {
        ResponseSet::new(
            Source::rerun(n),
            rows.iter()
                .enumerate()
                .map(|(i, row)| {
                    RespondentRecord::new(
                        i,
                        row.iter()
                            .enumerate()
                            .map(|(q, a)| AnswerEntry::new(q as u32 + 1, RawAnswer::text(*a)))
                            .collect(),
                    )
                })
                .collect(),
        )
    }

    fn evaluate(reruns: &[ResponseSet]) -> StabilityReport {
        let cmp = ContainmentComparator::default();
        let align = PositionalAlignment;
        StabilityEvaluator::new(&cmp, &align).evaluate(&catalog(), reruns)
    }

    #[test]
    fn test_disagreeing_rerun_is_flagged() {
        let report = evaluate(&[
            rerun(1, &[["Red", "because", "5"]]),
            rerun(2, &[["Red", "dunno", "5"]]),
            rerun(3, &[["Blue", "meh", "5"]]),
        ]);
        let q1 = report.question(1).unwrap();
        assert!(q1.score().unwrap() < 100);
        assert_eq!(report.flagged_count, 1);
        assert_eq!(report.flagged[0].question_number, 1);
        assert_eq!(report.flagged[0].answers, vec!["red", "red", "blue"]);
        assert_eq!(report.question(3).unwrap().score(), Some(100));
    }

    #[test]
    fn test_free_text_not_applicable() {
        let report = evaluate(&[
            rerun(1, &[["a", "x", "1"]]),
            rerun(2, &[["a", "y", "1"]]),
        ]);
        let q2 = report.question(2).unwrap();
        assert!(q2.is_not_applicable());
        assert_eq!(q2.label(), NOT_APPLICABLE_LABEL);
        // free text disagreement does not lower the overall score
        assert_eq!(report.overall, Some(100));
        assert_eq!(report.flagged_count, 0);
    }

    #[test]
    fn test_overall_is_mean_of_scored_questions() {
        let report = evaluate(&[
            rerun(1, &[["a", "", "1"], ["b", "", "2"]]),
            rerun(2, &[["a", "", "1"], ["c", "", "3"]]),
        ]);
        // q1: 1/2 = 50, q3: 1/2 = 50
        assert_eq!(report.question(1).unwrap().score(), Some(50));
        assert_eq!(report.overall, Some(50));
        assert_eq!(report.flagged_count, 2);
    }

    #[test]
    fn test_empty_answers_are_not_disagreement() {
        let report = evaluate(&[
            rerun(1, &[["a", "", ""], ["b", "", ""]]),
            rerun(2, &[["", "", ""], ["b", "", ""]]),
            rerun(3, &[["a", "", ""], ["", "", ""]]),
        ]);
        // respondent 0: a, a; respondent 1: b, b
        assert_eq!(report.question(1).unwrap().score(), Some(100));
        assert_eq!(report.question(3).unwrap().status, StabilityStatus::NoData);
        assert_eq!(report.overall, Some(100));
    }

    #[test]
    fn test_single_rerun_has_nothing_to_score() {
        let report = evaluate(&[rerun(1, &[["a", "b", "c"]])]);
        assert_eq!(report.overall, None);
        assert_eq!(report.question(1).unwrap().label(), "No data");
        assert_eq!(report.status, CampaignStatus::Completed);
    }

    #[test]
    fn test_failed_campaign_report_is_distinct() {
        let cmp = ContainmentComparator::default();
        let align = PositionalAlignment;
        let evaluator = StabilityEvaluator::new(&cmp, &align);
        let campaign = CampaignResult::failed(RunId::new(), 3, vec![0]);
        let report = evaluator.evaluate_campaign(&catalog(), &campaign);
        assert_eq!(report.status, CampaignStatus::Failed);
        assert!(report.per_question.is_empty());
        assert_eq!(report.overall, None);
    }

    #[test]
    fn test_serialized_status_tag() {
        let q = QuestionStability {
            question_number: 2,
            status: StabilityStatus::NotApplicable,
        };
        let json = serde_json::to_value(q).unwrap();
        assert_eq!(json["status"], "not_applicable");
        assert_eq!(json["question_number"], 2);
    }
}
