//! respool library: application logic for the pool simulator binary.

pub mod app;
pub mod config;
pub mod errors;
pub mod version;
