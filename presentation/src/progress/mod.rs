//! Campaign progress display

pub mod reporter;
