//! Run Stability Campaign use case
//!
//! Regenerates every persona `rerun_count` times through a
//! [`ResponseGenerator`], assembles one [`ResponseSet`] per rerun and scores
//! how stable each persona's answers are.
//!
//! A persona whose generation fails on any rerun is dropped from every rerun
//! set, so the sets stay aligned by persona. The campaign is `Completed` when
//! at least one persona survived and `Failed` otherwise.

use super::campaign_tracker::{CampaignTicket, CampaignTracker};
use crate::config::CampaignParams;
use crate::ports::analysis_logger::{AnalysisEvent, AnalysisLogger, NoAnalysisLogger};
use crate::ports::progress::{CampaignProgressNotifier, NoProgress};
use crate::ports::response_generator::{GenerationError, ResponseGenerator};
use chrono::{DateTime, Utc};
use consensus_domain::{
    AnalysisEngine, AnswerEntry, CampaignResult, CampaignStatus, DomainError, Persona,
    QuestionCatalog, RespondentRecord, ResponseSet, RunId, Source, StabilityReport,
};
use futures::future::join_all;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinSet};
use tracing::{debug, info, warn};

/// Errors that prevent a campaign from running at all
///
/// Generation failures are not errors: they exclude personas and may end the
/// campaign in [`CampaignStatus::Failed`].
#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Rerun count must be at least 1")]
    InvalidRerunCount,

    #[error("Duplicate persona index {0}")]
    DuplicatePersona(usize),

    #[error("Unknown campaign: {0}")]
    UnknownCampaign(RunId),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Input for the RunStabilityCampaign use case
#[derive(Debug, Clone)]
pub struct RunStabilityCampaignInput {
    pub catalog: QuestionCatalog,
    pub personas: Vec<Persona>,
    pub params: CampaignParams,
}

impl RunStabilityCampaignInput {
    pub fn new(catalog: QuestionCatalog, personas: Vec<Persona>) -> Self {
        Self {
            catalog,
            personas,
            params: CampaignParams::default(),
        }
    }

    pub fn with_params(mut self, params: CampaignParams) -> Self {
        self.params = params;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunStabilityCampaignOutput {
    pub campaign: CampaignResult,
    pub report: StabilityReport,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunStabilityCampaignOutput {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// One persona's outcome: answers per rerun, or the first failure
type PersonaOutcome = (Persona, Result<Vec<Vec<AnswerEntry>>, GenerationError>);

/// Use case for running a rerun stability campaign
pub struct RunStabilityCampaignUseCase<G: ResponseGenerator + 'static> {
    generator: Arc<G>,
    tracker: Arc<CampaignTracker>,
    engine: AnalysisEngine,
    logger: Arc<dyn AnalysisLogger>,
}

impl<G: ResponseGenerator + 'static> RunStabilityCampaignUseCase<G> {
    pub fn new(generator: Arc<G>, tracker: Arc<CampaignTracker>) -> Self {
        Self {
            generator,
            tracker,
            engine: AnalysisEngine::default(),
            logger: Arc::new(NoAnalysisLogger),
        }
    }

    pub fn with_engine(mut self, engine: AnalysisEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn AnalysisLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn tracker(&self) -> &Arc<CampaignTracker> {
        &self.tracker
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunStabilityCampaignInput,
    ) -> Result<RunStabilityCampaignOutput, CampaignError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Register and run in one step
    pub async fn execute_with_progress(
        &self,
        input: RunStabilityCampaignInput,
        progress: &dyn CampaignProgressNotifier,
    ) -> Result<RunStabilityCampaignOutput, CampaignError> {
        let ticket = self.start(&input)?;
        self.run(ticket, input, progress).await
    }

    /// Register the campaign so it can be polled before it runs
    pub fn start(&self, input: &RunStabilityCampaignInput) -> Result<CampaignTicket, CampaignError> {
        self.tracker.start(&input.personas, input.params.rerun_count)
    }

    /// Drive a registered campaign to a terminal status
    pub async fn run(
        &self,
        ticket: CampaignTicket,
        input: RunStabilityCampaignInput,
        notifier: &dyn CampaignProgressNotifier,
    ) -> Result<RunStabilityCampaignOutput, CampaignError> {
        let state = self
            .tracker
            .progress(ticket.run_id)
            .ok_or(CampaignError::UnknownCampaign(ticket.run_id))?;
        let rerun_count = ticket.rerun_count;
        let started_at = Utc::now();

        state.transition(CampaignStatus::Running)?;
        info!(
            "Starting campaign {}: {} personas x {} reruns via {}",
            ticket.run_id,
            input.personas.len(),
            rerun_count,
            self.generator.name()
        );
        notifier.on_campaign_start(&state.snapshot(), rerun_count);
        self.logger.log(AnalysisEvent::new(
            "campaign_started",
            serde_json::json!({
                "run_id": ticket.run_id,
                "personas": input.personas.len(),
                "rerun_count": rerun_count,
                "max_concurrency": input.params.max_concurrency,
            }),
        ));

        let catalog = Arc::new(input.catalog);
        let (mut join_set, mut pending) =
            self.spawn_personas(input.personas, &catalog, rerun_count, input.params.max_concurrency);

        let mut generated: BTreeMap<usize, (Persona, Vec<Vec<AnswerEntry>>)> = BTreeMap::new();
        let mut excluded = Vec::new();

        while let Some(joined) = join_set.join_next_with_id().await {
            match joined {
                Ok((id, (persona, Ok(answers)))) => {
                    pending.remove(&id);
                    state.record_persona();
                    debug!("Persona {} completed {} reruns", persona.index, answers.len());
                    notifier.on_persona_complete(&state.snapshot(), &persona, true);
                    generated.insert(persona.index, (persona, answers));
                }
                Ok((id, (persona, Err(e)))) => {
                    pending.remove(&id);
                    state.record_persona();
                    warn!("Persona {} excluded from campaign: {}", persona.index, e);
                    notifier.on_persona_complete(&state.snapshot(), &persona, false);
                    excluded.push(persona.index);
                }
                Err(e) => {
                    state.record_persona();
                    match pending.remove(&e.id()) {
                        Some(persona) => {
                            warn!("Persona {} excluded from campaign: task join error: {}", persona.index, e);
                            notifier.on_persona_complete(&state.snapshot(), &persona, false);
                            excluded.push(persona.index);
                        }
                        None => warn!("Task join error: {}", e),
                    }
                }
            }
        }
        excluded.sort_unstable();

        let campaign = if generated.is_empty() {
            state.transition(CampaignStatus::Failed)?;
            warn!("Campaign {} failed: no persona completed", ticket.run_id);
            CampaignResult::failed(ticket.run_id, rerun_count, excluded)
        } else {
            state.transition(CampaignStatus::Completed)?;
            CampaignResult {
                run_id: ticket.run_id,
                status: CampaignStatus::Completed,
                rerun_count,
                reruns: assemble_reruns(&generated, rerun_count),
                excluded_personas: excluded,
            }
        };
        notifier.on_campaign_complete(&state.snapshot());

        let report = self.engine.stability_report(&catalog, &campaign);
        let finished_at = Utc::now();
        info!(
            "Campaign {} {}: {} personas kept, {} excluded, overall stability {}",
            ticket.run_id,
            campaign.status,
            generated.len(),
            campaign.excluded_personas.len(),
            report
                .overall
                .map(|s| format!("{}%", s))
                .unwrap_or_else(|| "n/a".to_string())
        );
        self.logger.log(AnalysisEvent::new(
            "campaign_completed",
            serde_json::json!({
                "run_id": ticket.run_id,
                "status": campaign.status,
                "excluded_personas": campaign.excluded_personas,
                "overall": report.overall,
                "flagged_count": report.flagged_count,
                "elapsed_ms": (finished_at - started_at).num_milliseconds(),
            }),
        ));

        Ok(RunStabilityCampaignOutput {
            campaign,
            report,
            started_at,
            finished_at,
        })
    }

    /// One task per persona; every generation call holds a semaphore permit
    ///
    /// The returned map resolves a task id back to its persona when the task
    /// panics or is cancelled.
    fn spawn_personas(
        &self,
        personas: Vec<Persona>,
        catalog: &Arc<QuestionCatalog>,
        rerun_count: usize,
        max_concurrency: usize,
    ) -> (JoinSet<PersonaOutcome>, HashMap<Id, Persona>) {
        let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
        let mut join_set = JoinSet::new();
        let mut pending = HashMap::with_capacity(personas.len());

        for persona in personas {
            let generator = Arc::clone(&self.generator);
            let catalog = Arc::clone(catalog);
            let semaphore = Arc::clone(&semaphore);
            let tracked = persona.clone();

            let handle = join_set.spawn(async move {
                let runs = (1..=rerun_count).map(|rerun| {
                    let generator = &generator;
                    let catalog = &catalog;
                    let semaphore = &semaphore;
                    let persona = &persona;
                    async move {
                        let _permit = semaphore
                            .acquire()
                            .await
                            .map_err(|e| GenerationError::Other(e.to_string()))?;
                        generator.generate(persona, catalog, rerun).await
                    }
                });
                let results: Result<Vec<_>, _> = join_all(runs).await.into_iter().collect();
                (persona, results)
            });
            pending.insert(handle.id(), tracked);
        }

        (join_set, pending)
    }
}

/// One set per rerun, respondents in persona-index order
fn assemble_reruns(
    generated: &BTreeMap<usize, (Persona, Vec<Vec<AnswerEntry>>)>,
    rerun_count: usize,
) -> Vec<ResponseSet> {
    (0..rerun_count)
        .map(|r| {
            let respondents = generated
                .values()
                .map(|(persona, answers)| {
                    let record = RespondentRecord::new(persona.index, answers[r].clone());
                    match &persona.archetype {
                        Some(archetype) => record.with_archetype(archetype.clone()),
                        None => record,
                    }
                })
                .collect();
            ResponseSet::new(Source::rerun(r + 1), respondents)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use consensus_domain::{CampaignSnapshot, Question, QuestionType, RawAnswer};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // ==================== Test Mocks ====================

    type Script = Box<dyn Fn(&Persona, usize) -> Result<Vec<AnswerEntry>, GenerationError> + Send + Sync>;

    struct ScriptedGenerator {
        script: Script,
        calls: Mutex<Vec<(usize, usize)>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn new(
            script: impl Fn(&Persona, usize) -> Result<Vec<AnswerEntry>, GenerationError>
            + Send
            + Sync
            + 'static,
        ) -> Self {
            Self {
                script: Box::new(script),
                calls: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ResponseGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            persona: &Persona,
            _catalog: &QuestionCatalog,
            rerun: usize,
        ) -> Result<Vec<AnswerEntry>, GenerationError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.calls.lock().unwrap().push((persona.index, rerun));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            (self.script)(persona, rerun)
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        started: Mutex<Option<usize>>,
        completed: Mutex<Vec<(usize, bool, usize)>>,
        finished: Mutex<Option<CampaignSnapshot>>,
    }

    impl CampaignProgressNotifier for RecordingProgress {
        fn on_campaign_start(&self, _snapshot: &CampaignSnapshot, rerun_count: usize) {
            *self.started.lock().unwrap() = Some(rerun_count);
        }

        fn on_persona_complete(&self, snapshot: &CampaignSnapshot, persona: &Persona, success: bool) {
            self.completed
                .lock()
                .unwrap()
                .push((persona.index, success, snapshot.personas_completed));
        }

        fn on_campaign_complete(&self, snapshot: &CampaignSnapshot) {
            *self.finished.lock().unwrap() = Some(*snapshot);
        }
    }

    // ==================== Helpers ====================

    fn catalog() -> QuestionCatalog {
        QuestionCatalog::new(vec![
            Question::new(1, "Favourite colour", QuestionType::SingleSelect),
            Question::new(2, "Tell us more", QuestionType::FreeText),
        ])
        .unwrap()
    }

    fn personas(n: usize) -> Vec<Persona> {
        (0..n)
            .map(|i| Persona::new(i, format!("persona {}", i)).with_archetype("commuter"))
            .collect()
    }

    fn answers(colour: &str, rerun: usize) -> Vec<AnswerEntry> {
        vec![
            AnswerEntry::new(1, RawAnswer::text(colour)),
            AnswerEntry::new(2, RawAnswer::text(format!("free text {}", rerun))),
        ]
    }

    fn input(n: usize, reruns: usize) -> RunStabilityCampaignInput {
        RunStabilityCampaignInput::new(catalog(), personas(n))
            .with_params(CampaignParams::default().with_rerun_count(reruns))
    }

    fn use_case(generator: ScriptedGenerator) -> RunStabilityCampaignUseCase<ScriptedGenerator> {
        RunStabilityCampaignUseCase::new(Arc::new(generator), Arc::new(CampaignTracker::new()))
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_stable_campaign_completes() {
        let uc = use_case(ScriptedGenerator::new(|_, rerun| Ok(answers("Red", rerun))));
        let output = uc.execute(input(3, 2)).await.unwrap();

        assert_eq!(output.campaign.status, CampaignStatus::Completed);
        assert_eq!(output.campaign.reruns.len(), 2);
        assert_eq!(output.campaign.reruns[1].source(), &Source::rerun(2));
        assert_eq!(output.campaign.reruns[0].respondent_count(), 3);
        assert_eq!(
            output.campaign.reruns[0].respondents()[0].archetype.as_deref(),
            Some("commuter")
        );
        assert_eq!(output.report.overall, Some(100));
        assert!(output.report.question(2).unwrap().is_not_applicable());
        assert!(output.elapsed() >= chrono::Duration::zero());
    }

    #[tokio::test]
    async fn test_unstable_persona_is_flagged() {
        let uc = use_case(ScriptedGenerator::new(|persona, rerun| {
            let colour = if persona.index == 1 && rerun == 2 { "Blue" } else { "Red" };
            Ok(answers(colour, rerun))
        }));
        let output = uc.execute(input(2, 3)).await.unwrap();

        assert_eq!(output.report.question(1).unwrap().score(), Some(50));
        assert_eq!(output.report.flagged_count, 1);
        assert_eq!(output.report.flagged[0].respondent_index, 1);
    }

    #[tokio::test]
    async fn test_failed_persona_excluded_from_every_rerun() {
        let uc = use_case(ScriptedGenerator::new(|persona, rerun| {
            if persona.index == 1 && rerun == 2 {
                Err(GenerationError::Timeout)
            } else {
                Ok(answers("Red", rerun))
            }
        }));
        let output = uc.execute(input(3, 2)).await.unwrap();

        assert_eq!(output.campaign.status, CampaignStatus::Completed);
        assert_eq!(output.campaign.excluded_personas, vec![1]);
        for rerun in &output.campaign.reruns {
            let ids: Vec<usize> = rerun.respondents().iter().map(|r| r.respondent_index).collect();
            assert_eq!(ids, vec![0, 2]);
        }
    }

    #[tokio::test]
    async fn test_panicking_persona_is_excluded() {
        let uc = use_case(ScriptedGenerator::new(|persona, rerun| {
            if persona.index == 2 {
                panic!("generator crashed");
            }
            Ok(answers("Red", rerun))
        }));
        let progress = RecordingProgress::default();
        let ticket = uc.start(&input(3, 2)).unwrap();
        let output = uc.run(ticket, input(3, 2), &progress).await.unwrap();

        assert_eq!(output.campaign.status, CampaignStatus::Completed);
        assert_eq!(output.campaign.excluded_personas, vec![2]);
        let completed = progress.completed.lock().unwrap();
        assert_eq!(completed.len(), 3);
        assert!(completed.iter().any(|(index, success, _)| *index == 2 && !success));
        for rerun in &output.campaign.reruns {
            assert_eq!(rerun.respondent_count(), 2);
        }
    }

    #[tokio::test]
    async fn test_total_failure_is_failed_with_zero_results() {
        let uc = use_case(ScriptedGenerator::new(|_, _| {
            Err(GenerationError::Unavailable("offline".into()))
        }));
        let output = uc.execute(input(2, 2)).await.unwrap();

        assert_eq!(output.campaign.status, CampaignStatus::Failed);
        assert!(output.campaign.reruns.is_empty());
        assert_eq!(output.campaign.excluded_personas, vec![0, 1]);
        assert_eq!(output.report.status, CampaignStatus::Failed);
        assert_eq!(output.report.overall, None);
    }

    #[tokio::test]
    async fn test_no_personas_fails() {
        let uc = use_case(ScriptedGenerator::new(|_, rerun| Ok(answers("Red", rerun))));
        let output = uc.execute(input(0, 2)).await.unwrap();
        assert_eq!(output.campaign.status, CampaignStatus::Failed);
    }

    #[tokio::test]
    async fn test_zero_reruns_rejected() {
        let uc = use_case(ScriptedGenerator::new(|_, rerun| Ok(answers("Red", rerun))));
        let result = uc.execute(input(2, 0)).await;
        assert!(matches!(result, Err(CampaignError::InvalidRerunCount)));
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_pollable() {
        let uc = use_case(ScriptedGenerator::new(|_, rerun| Ok(answers("Red", rerun))));
        let input = input(4, 2);
        let ticket = uc.start(&input).unwrap();
        assert_eq!(uc.tracker().poll(ticket.run_id).unwrap().status, CampaignStatus::Pending);

        let progress = RecordingProgress::default();
        uc.run(ticket, input, &progress).await.unwrap();

        assert_eq!(*progress.started.lock().unwrap(), Some(2));
        let counts: Vec<usize> = progress.completed.lock().unwrap().iter().map(|c| c.2).collect();
        assert_eq!(counts, vec![1, 2, 3, 4]);
        let finished = (*progress.finished.lock().unwrap()).expect("campaign finished");
        assert_eq!(finished.status, CampaignStatus::Completed);

        let polled = uc.tracker().poll(ticket.run_id).unwrap();
        assert!(polled.is_done());
        assert_eq!(polled.status, CampaignStatus::Completed);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let generator = Arc::new(ScriptedGenerator::new(|_, rerun| Ok(answers("Red", rerun))));
        let uc = RunStabilityCampaignUseCase::new(Arc::clone(&generator), Arc::new(CampaignTracker::new()));
        let input = RunStabilityCampaignInput::new(catalog(), personas(4)).with_params(
            CampaignParams::default()
                .with_rerun_count(3)
                .with_max_concurrency(2),
        );
        uc.execute(input).await.unwrap();

        assert_eq!(generator.calls.lock().unwrap().len(), 12);
        let peak = generator.max_in_flight.load(Ordering::SeqCst);
        assert!((1..=2).contains(&peak), "peak in-flight was {}", peak);
    }

    #[tokio::test]
    async fn test_run_twice_is_rejected() {
        let uc = use_case(ScriptedGenerator::new(|_, rerun| Ok(answers("Red", rerun))));
        let input = input(1, 1);
        let ticket = uc.start(&input).unwrap();
        uc.run(ticket, input.clone(), &NoProgress).await.unwrap();
        let again = uc.run(ticket, input, &NoProgress).await;
        assert!(matches!(again, Err(CampaignError::Domain(e)) if e.is_transition_error()));
    }
}
