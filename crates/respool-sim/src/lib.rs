//! # respool-sim
//!
//! A game-style consumer of `respool-core`: transient effects (projectiles,
//! particles, rope segments) are pooled, spawned per frame, and returned when
//! they expire. A stress runner hammers a shared pool from several threads.
#![warn(missing_docs)]

pub mod effect;
pub mod error;
pub mod frames;
pub mod io;
pub mod stress;

pub use effect::{effect_pool, Effect, EffectCounters, EffectKind, EffectLifecycle};
pub use error::SimError;
pub use frames::{run_frames, FrameReport, FrameScenario};
pub use io::{load_scenario, save_scenario, Scenario};
pub use stress::{run_stress, StressReport, StressScenario, WorkerReport};
