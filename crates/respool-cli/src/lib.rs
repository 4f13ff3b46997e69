//! # respool-cli
//!
//! Report presentation, number and duration formatting, and shell completion.

pub mod completion;
pub mod output;
pub mod presenter;

pub use presenter::ReportPresenter;
