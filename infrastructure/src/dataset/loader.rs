use consensus_domain::{DomainError, Persona, Question, QuestionCatalog, ResponseSet};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Accepts both the wrapped and the bare-array layout
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionsFile {
    Wrapped { questions: Vec<Question> },
    Bare(Vec<Question>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PersonasFile {
    Wrapped { personas: Vec<Persona> },
    Bare(Vec<Persona>),
}

/// Reads survey datasets from JSON files
pub struct DatasetLoader;

impl DatasetLoader {
    pub fn load_catalog(path: &Path) -> Result<QuestionCatalog, DatasetError> {
        let questions = match Self::read_json::<QuestionsFile>(path)? {
            QuestionsFile::Wrapped { questions } | QuestionsFile::Bare(questions) => questions,
        };
        debug!("Loaded {} questions from {}", questions.len(), path.display());
        Ok(QuestionCatalog::new(questions)?)
    }

    pub fn load_response_set(path: &Path) -> Result<ResponseSet, DatasetError> {
        let set: ResponseSet = Self::read_json(path)?;
        debug!(
            "Loaded {} respondents for {} from {}",
            set.respondent_count(),
            set.source(),
            path.display()
        );
        Ok(set)
    }

    /// Load several response sets, keeping argument order
    pub fn load_response_sets<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<ResponseSet>, DatasetError> {
        paths
            .iter()
            .map(|p| Self::load_response_set(p.as_ref()))
            .collect()
    }

    pub fn load_personas(path: &Path) -> Result<Vec<Persona>, DatasetError> {
        let personas = match Self::read_json::<PersonasFile>(path)? {
            PersonasFile::Wrapped { personas } | PersonasFile::Bare(personas) => personas,
        };
        Ok(personas)
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
        let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| DatasetError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
