//! Pooled gameplay effects: projectiles, particles, and rope segments.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use respool_core::{HookError, Lifecycle, PoolConfig, PoolError, ResourcePool};

use crate::error::SimError;

/// Downward acceleration applied to particles, in units per frame squared.
const GRAVITY: f32 = 0.05;

/// Per-frame velocity damping for particles.
const DRAG: f32 = 0.98;

/// Kind of transient effect a pool serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// Travels in a straight line.
    Projectile,
    /// Falls under gravity with drag.
    #[default]
    Particle,
    /// Hangs still between two anchor points.
    Rope,
}

impl EffectKind {
    /// Lower-case name used in flags and scenario files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Projectile => "projectile",
            Self::Particle => "particle",
            Self::Rope => "rope",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "projectile" => Ok(Self::Projectile),
            "particle" => Ok(Self::Particle),
            "rope" => Ok(Self::Rope),
            other => Err(SimError::Config(format!("unknown effect kind: {other}"))),
        }
    }
}

/// A transient effect object, expensive enough to be worth pooling.
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    /// Identity assigned once at creation.
    pub serial: u64,
    /// What this effect simulates.
    pub kind: EffectKind,
    /// Current position.
    pub position: [f32; 2],
    /// Current velocity per frame.
    pub velocity: [f32; 2],
    /// Frames left before the effect expires.
    pub frames_left: u32,
    /// Whether the effect is live in the world.
    pub active: bool,
    /// How many times the pool has handed this object out.
    pub uses: u32,
}

impl Effect {
    fn new(serial: u64, kind: EffectKind) -> Self {
        Self {
            serial,
            kind,
            position: [0.0; 2],
            velocity: [0.0; 2],
            frames_left: 0,
            active: false,
            uses: 0,
        }
    }

    /// Place the effect in the world.
    pub fn spawn(&mut self, origin: [f32; 2], velocity: [f32; 2], lifetime: u32) {
        self.position = origin;
        self.velocity = match self.kind {
            EffectKind::Rope => [0.0; 2],
            _ => velocity,
        };
        self.frames_left = lifetime;
    }

    /// Advance one frame. Returns `false` once the effect has expired.
    pub fn tick(&mut self) -> bool {
        if self.frames_left == 0 {
            return false;
        }
        if self.kind == EffectKind::Particle {
            self.velocity[1] -= GRAVITY;
            self.velocity[0] *= DRAG;
            self.velocity[1] *= DRAG;
        }
        self.position[0] += self.velocity[0];
        self.position[1] += self.velocity[1];
        self.frames_left -= 1;
        self.frames_left > 0
    }
}

/// Counters shared between an effect lifecycle and its observers.
#[derive(Debug, Default)]
pub struct EffectCounters {
    next_serial: AtomicU64,
    destroyed: AtomicU64,
}

impl EffectCounters {
    /// Effects created so far.
    pub fn created(&self) -> u64 {
        self.next_serial.load(Ordering::Relaxed)
    }

    /// Effects destroyed so far.
    pub fn destroyed(&self) -> u64 {
        self.destroyed.load(Ordering::Relaxed)
    }
}

/// Lifecycle that builds, resets, parks, and disposes effects.
#[derive(Debug, Clone)]
pub struct EffectLifecycle {
    kind: EffectKind,
    counters: Arc<EffectCounters>,
}

impl EffectLifecycle {
    /// Create a lifecycle for the given effect kind.
    #[must_use]
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            counters: Arc::new(EffectCounters::default()),
        }
    }

    /// Shared creation/destruction counters.
    #[must_use]
    pub fn counters(&self) -> Arc<EffectCounters> {
        Arc::clone(&self.counters)
    }
}

impl Lifecycle<Effect> for EffectLifecycle {
    fn create(&mut self) -> Result<Effect, HookError> {
        let serial = self.counters.next_serial.fetch_add(1, Ordering::Relaxed) + 1;
        trace!(serial, kind = %self.kind, "Effect created");
        Ok(Effect::new(serial, self.kind))
    }

    fn on_acquire(&mut self, effect: &mut Effect) -> Result<(), HookError> {
        if effect.active {
            return Err(HookError::new(format!(
                "effect {} handed out while still active",
                effect.serial
            )));
        }
        effect.position = [0.0; 2];
        effect.velocity = [0.0; 2];
        effect.frames_left = 0;
        effect.active = true;
        effect.uses += 1;
        Ok(())
    }

    fn on_release(&mut self, effect: &mut Effect) -> Result<(), HookError> {
        effect.active = false;
        effect.velocity = [0.0; 2];
        effect.frames_left = 0;
        Ok(())
    }

    fn on_destroy(&mut self, effect: Effect) {
        self.counters.destroyed.fetch_add(1, Ordering::Relaxed);
        trace!(serial = effect.serial, uses = effect.uses, "Effect destroyed");
    }
}

/// Build a pool of effects of one kind.
pub fn effect_pool(
    kind: EffectKind,
    config: PoolConfig,
) -> Result<(ResourcePool<Effect, EffectLifecycle>, Arc<EffectCounters>), PoolError> {
    let lifecycle = EffectLifecycle::new(kind);
    let counters = lifecycle.counters();
    let pool = ResourcePool::with_lifecycle(lifecycle, config)?;
    Ok((pool, counters))
}
