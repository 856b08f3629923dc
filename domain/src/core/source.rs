//! Response source value object

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const RERUN_PREFIX: &str = "rerun-";

/// The generation source that produced a response set
///
/// Either a named generator (usually a model identifier such as
/// `"gpt-4.1"`) or one rerun of a persona-preserving campaign.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    Model(String),
    /// 1-indexed rerun number
    Rerun(usize),
}

impl Source {
    pub fn model(name: impl Into<String>) -> Self {
        Source::Model(name.into())
    }

    pub fn rerun(index: usize) -> Self {
        Source::Rerun(index)
    }

    pub fn is_rerun(&self) -> bool {
        matches!(self, Source::Rerun(_))
    }

    /// Short display name, e.g. `"claude-sonnet-4.5"` -> `"claude"`
    pub fn short_name(&self) -> String {
        match self {
            Source::Model(name) => name.split(['-', '_']).next().unwrap_or(name).to_string(),
            Source::Rerun(n) => format!("#{}", n),
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Model(name) => write!(f, "{}", name),
            Source::Rerun(n) => write!(f, "{}{}", RERUN_PREFIX, n),
        }
    }
}

impl std::str::FromStr for Source {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(n) = trimmed
            .strip_prefix(RERUN_PREFIX)
            .and_then(|rest| rest.parse::<usize>().ok())
        {
            return Ok(Source::Rerun(n));
        }
        Ok(Source::Model(trimmed.to_string()))
    }
}

impl Serialize for Source {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Source {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(source) = s.parse::<Source>();
        Ok(source)
    }
}
