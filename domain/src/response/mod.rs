//! Response sets and respondent alignment

pub mod alignment;
pub mod set;

pub use alignment::{AlignmentKind, AlignmentStrategy, PositionalAlignment, RespondentIndexAlignment};
pub use set::{AnswerEntry, RespondentRecord, ResponseSet};
