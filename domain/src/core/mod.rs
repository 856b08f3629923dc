//! Core domain concepts shared across all subdomains.
//!
//! - [`question::Question`] / [`question::QuestionCatalog`]: the survey questions under analysis
//! - [`source::Source`]: which generator (model or rerun) produced a response set
//! - [`error::DomainError`]: programmer errors; data-quality issues are values

pub mod error;
pub mod question;
pub mod source;
pub mod string;
