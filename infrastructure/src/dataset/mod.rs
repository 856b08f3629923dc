//! JSON dataset loading
//!
//! Three file kinds are read:
//!
//! - question catalog: `{"questions": [...]}` or a bare array
//! - response set: `{"source": "...", "respondents": [...]}`
//! - persona list: `{"personas": [...]}` or a bare array

mod loader;

pub use loader::{DatasetError, DatasetLoader};
