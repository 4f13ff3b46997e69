//! Frame-driven consumer: spawns effects each frame and returns them when
//! they expire, the way a game loop uses a pool.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use respool_core::{CancellationToken, PoolConfig, PoolSnapshot, PoolStats, Pooled};

use crate::effect::{effect_pool, Effect, EffectKind};
use crate::error::SimError;

/// Parameters of a frame-driven run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameScenario {
    /// Effect kind served by the pool.
    pub kind: EffectKind,
    /// Pool sizing.
    pub pool: PoolConfig,
    /// Frames to simulate.
    pub frames: u32,
    /// Effects requested every frame.
    pub spawn_per_frame: u32,
    /// Frames each effect lives.
    pub lifetime_frames: u32,
    /// Period of spawn bursts in frames (0 disables bursts).
    pub burst_every: u32,
    /// Extra effects requested on a burst frame.
    pub burst_size: u32,
    /// Frame on which the pool is cleared while effects are live.
    pub clear_at: Option<u32>,
}

impl Default for FrameScenario {
    fn default() -> Self {
        Self {
            kind: EffectKind::default(),
            pool: PoolConfig::default(),
            frames: 600,
            spawn_per_frame: 4,
            lifetime_frames: 20,
            burst_every: 60,
            burst_size: 32,
            clear_at: None,
        }
    }
}

impl FrameScenario {
    /// Check that the scenario can run.
    pub fn validate(&self) -> Result<(), SimError> {
        self.pool.validate()?;
        if self.lifetime_frames == 0 {
            return Err(SimError::Config("lifetime_frames must be at least 1".into()));
        }
        Ok(())
    }

    fn spawns_on(&self, frame: u32) -> u32 {
        let burst = if self.burst_every > 0 && frame % self.burst_every == 0 {
            self.burst_size
        } else {
            0
        };
        self.spawn_per_frame + burst
    }
}

/// Outcome of a frame-driven run.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    /// Effect kind served by the pool.
    pub kind: EffectKind,
    /// Frames simulated.
    pub frames: u32,
    /// Effects placed in the world.
    pub spawned: u64,
    /// Spawn requests refused because the pool was exhausted.
    pub dropped: u64,
    /// Frames on which at least one spawn was refused.
    pub exhausted_frames: u32,
    /// Largest number of simultaneously active effects.
    pub peak_active: usize,
    /// Effects created by the lifecycle over the run.
    pub created: u64,
    /// Effects destroyed by the lifecycle over the run, including pool drop.
    pub destroyed: u64,
    /// Pool counters after every effect was returned.
    pub snapshot: PoolSnapshot,
    /// Pool statistics.
    pub stats: PoolStats,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl FrameReport {
    /// Fraction of spawn requests that were served.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn service_ratio(&self) -> f64 {
        let requested = self.spawned + self.dropped;
        if requested == 0 {
            1.0
        } else {
            self.spawned as f64 / requested as f64
        }
    }

    /// Confirm the run ended with consistent accounting.
    pub fn verify(&self) -> Result<(), SimError> {
        if !self.snapshot.holds_invariants() {
            return Err(SimError::InvariantViolation(format!(
                "final counters inconsistent: {:?}",
                self.snapshot
            )));
        }
        if self.snapshot.active != 0 {
            return Err(SimError::InvariantViolation(format!(
                "{} effects still active after the run",
                self.snapshot.active
            )));
        }
        if self.destroyed > self.created {
            return Err(SimError::InvariantViolation(format!(
                "destroyed {} effects but only created {}",
                self.destroyed, self.created
            )));
        }
        Ok(())
    }
}

/// Run a frame-driven scenario.
///
/// Spawn requests that hit an exhausted pool are dropped for that frame,
/// which is how a game treats pool backpressure.
#[allow(clippy::cast_precision_loss)]
pub fn run_frames(
    scenario: &FrameScenario,
    cancel: &CancellationToken,
) -> Result<FrameReport, SimError> {
    scenario.validate()?;
    let start = Instant::now();
    let (mut pool, counters) = effect_pool(scenario.kind, scenario.pool)?;
    let mut live: Vec<Pooled<Effect>> = Vec::new();

    let mut spawned = 0u64;
    let mut dropped = 0u64;
    let mut exhausted_frames = 0u32;
    let mut peak_active = 0usize;

    for frame in 0..scenario.frames {
        cancel.check_cancelled()?;

        if scenario.clear_at == Some(frame) {
            let destroyed = pool.clear();
            debug!(frame, destroyed, live = live.len(), "Pool cleared mid-run");
        }

        let requested = scenario.spawns_on(frame);
        let mut refused = 0u32;
        for i in 0..requested {
            if let Some(mut effect) = pool.try_acquire()? {
                let angle = frame.wrapping_mul(31).wrapping_add(i) as f32 * 0.37;
                let (sin, cos) = angle.sin_cos();
                effect.spawn([0.0, 10.0], [cos, sin.abs() + 0.5], scenario.lifetime_frames);
                live.push(effect);
                spawned += 1;
            } else {
                refused += 1;
            }
        }
        if refused > 0 {
            dropped += u64::from(refused);
            exhausted_frames += 1;
        }
        peak_active = peak_active.max(live.len());

        let mut i = 0;
        while i < live.len() {
            if live[i].tick() {
                i += 1;
            } else {
                let effect = live.swap_remove(i);
                pool.release(effect).map_err(|r| r.into_parts().1)?;
            }
        }

        let snap = pool.snapshot();
        if !snap.holds_invariants() {
            return Err(SimError::InvariantViolation(format!(
                "frame {frame}: {snap:?}"
            )));
        }
    }

    for effect in live.drain(..) {
        pool.release(effect).map_err(|r| r.into_parts().1)?;
    }

    let snapshot = pool.snapshot();
    let stats = pool.stats();
    drop(pool);

    let report = FrameReport {
        kind: scenario.kind,
        frames: scenario.frames,
        spawned,
        dropped,
        exhausted_frames,
        peak_active,
        created: counters.created(),
        destroyed: counters.destroyed(),
        snapshot,
        stats,
        elapsed: start.elapsed(),
    };
    info!(
        kind = %report.kind,
        spawned,
        dropped,
        peak_active,
        "Frame scenario complete"
    );
    Ok(report)
}
