use async_trait::async_trait;
use consensus_application::{GenerationError, ResponseGenerator};
use consensus_domain::{AnswerEntry, Persona, QuestionCatalog, ResponseSet};
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Replays recorded rerun sets as if they were being generated
///
/// Rerun `n` (1-indexed) is served from the n-th set. Respondents are looked
/// up by `respondent_index`, which must equal the persona index.
pub struct ReplayResponseGenerator {
    reruns: Vec<HashMap<usize, Vec<AnswerEntry>>>,
    personas: Vec<Persona>,
}

impl ReplayResponseGenerator {
    pub fn new(sets: Vec<ResponseSet>) -> Self {
        let mut personas: BTreeMap<usize, Persona> = BTreeMap::new();
        let reruns = sets
            .iter()
            .map(|set| {
                set.respondents()
                    .iter()
                    .map(|record| {
                        personas.entry(record.respondent_index).or_insert_with(|| {
                            let persona = Persona::new(
                                record.respondent_index,
                                format!("respondent {}", record.respondent_index),
                            );
                            match &record.archetype {
                                Some(archetype) => persona.with_archetype(archetype.clone()),
                                None => persona,
                            }
                        });
                        (record.respondent_index, record.answers.clone())
                    })
                    .collect()
            })
            .collect();

        Self {
            reruns,
            personas: personas.into_values().collect(),
        }
    }

    /// Every respondent seen in any set, ordered by index
    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn rerun_count(&self) -> usize {
        self.reruns.len()
    }
}

#[async_trait]
impl ResponseGenerator for ReplayResponseGenerator {
    async fn generate(
        &self,
        persona: &Persona,
        _catalog: &QuestionCatalog,
        rerun: usize,
    ) -> Result<Vec<AnswerEntry>, GenerationError> {
        let missing = GenerationError::Missing {
            persona: persona.index,
            rerun,
        };
        let answers = rerun
            .checked_sub(1)
            .and_then(|i| self.reruns.get(i))
            .and_then(|set| set.get(&persona.index))
            .ok_or(missing)?;
        trace!(
            "Replaying {} answers for persona {} rerun {}",
            answers.len(),
            persona.index,
            rerun
        );
        Ok(answers.clone())
    }

    fn name(&self) -> &str {
        "replay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_domain::{Question, QuestionType, RespondentRecord, Source};

    fn catalog() -> QuestionCatalog {
        QuestionCatalog::new(vec![Question::new(1, "Own a car?", QuestionType::SingleSelect)])
            .unwrap()
    }

    fn set(rerun: usize, answers: &[(usize, &str)]) -> ResponseSet {
        ResponseSet::new(
            Source::rerun(rerun),
            answers
                .iter()
                .map(|(i, a)| {
                    RespondentRecord::new(*i, vec![AnswerEntry::new(1, *a)]).with_archetype("saver")
                })
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_replays_rerun_by_position() {
        let generator = ReplayResponseGenerator::new(vec![
            set(1, &[(0, "Yes"), (1, "No")]),
            set(2, &[(0, "No"), (1, "No")]),
        ]);
        assert_eq!(generator.rerun_count(), 2);
        assert_eq!(generator.name(), "replay");

        let persona = &generator.personas()[0];
        let first = generator.generate(persona, &catalog(), 1).await.unwrap();
        let second = generator.generate(persona, &catalog(), 2).await.unwrap();
        assert_eq!(first, vec![AnswerEntry::new(1, "Yes")]);
        assert_eq!(second, vec![AnswerEntry::new(1, "No")]);
    }

    #[tokio::test]
    async fn test_personas_union_keeps_archetype() {
        let generator =
            ReplayResponseGenerator::new(vec![set(1, &[(0, "Yes")]), set(2, &[(0, "Yes"), (4, "No")])]);
        let indices: Vec<_> = generator.personas().iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 4]);
        assert_eq!(generator.personas()[1].archetype.as_deref(), Some("saver"));
    }

    #[tokio::test]
    async fn test_missing_persona_or_rerun() {
        let generator =
            ReplayResponseGenerator::new(vec![set(1, &[(0, "Yes")]), set(2, &[(0, "Yes"), (4, "No")])]);
        let late = generator.personas()[1].clone();

        assert_eq!(
            generator.generate(&late, &catalog(), 1).await,
            Err(GenerationError::Missing { persona: 4, rerun: 1 })
        );
        assert_eq!(
            generator.generate(&late, &catalog(), 3).await,
            Err(GenerationError::Missing { persona: 4, rerun: 3 })
        );
        assert!(generator.generate(&late, &catalog(), 0).await.is_err());
    }
}
