//! Result persistence and console summaries

pub mod reporter;

pub use reporter::ResultReporter;
