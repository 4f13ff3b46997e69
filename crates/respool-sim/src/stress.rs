//! Multi-threaded stress runner over a [`SharedPool`].
//!
//! Worker threads repeatedly acquire an effect with a timeout, hold it for a
//! while, and release it. A shared in-use set catches any effect handed to two
//! holders at once.

use std::collections::HashSet;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::unbounded;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use respool_core::{CancellationToken, PoolConfig, PoolError, PoolSnapshot, PoolStats, SharedPool};

use crate::effect::{effect_pool, Effect, EffectKind, EffectLifecycle};
use crate::error::SimError;

/// Parameters of a stress run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressScenario {
    /// Effect kind served by the pool.
    pub kind: EffectKind,
    /// Pool sizing.
    pub pool: PoolConfig,
    /// Number of worker threads.
    pub workers: usize,
    /// Acquire attempts per worker.
    pub iterations: u32,
    /// How long a worker holds each effect, in microseconds.
    pub hold_us: u64,
    /// Blocking acquire timeout, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for StressScenario {
    fn default() -> Self {
        Self {
            kind: EffectKind::default(),
            pool: PoolConfig::default(),
            workers: 4,
            iterations: 1_000,
            hold_us: 1_000,
            timeout_ms: 100,
        }
    }
}

impl StressScenario {
    /// Check that the scenario can run.
    pub fn validate(&self) -> Result<(), SimError> {
        self.pool.validate()?;
        if self.workers == 0 {
            return Err(SimError::Config("workers must be at least 1".into()));
        }
        Ok(())
    }

    /// Time a worker holds each effect.
    #[must_use]
    pub fn hold(&self) -> Duration {
        Duration::from_micros(self.hold_us)
    }

    /// Blocking acquire timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// What one worker observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    /// Worker index.
    pub worker: usize,
    /// Successful acquires.
    pub acquired: u64,
    /// Acquires that gave up on timeout.
    pub timeouts: u64,
    /// Acquires or releases that failed for another reason.
    pub errors: u64,
    /// Effects received while another holder still had them.
    pub duplicates: u64,
    /// Most active resources seen right after an acquire.
    pub peak_active: usize,
}

/// Outcome of a stress run.
#[derive(Debug, Clone, Serialize)]
pub struct StressReport {
    /// Effect kind served by the pool.
    pub kind: EffectKind,
    /// Per-worker results, ordered by worker index.
    pub workers: Vec<WorkerReport>,
    /// Successful acquires across all workers.
    pub acquired: u64,
    /// Timed-out acquires across all workers.
    pub timeouts: u64,
    /// Other failures across all workers.
    pub errors: u64,
    /// Effects observed with two holders at once.
    pub duplicates: u64,
    /// Largest active count any worker observed.
    pub peak_active: usize,
    /// Pool counters after all workers finished.
    pub snapshot: PoolSnapshot,
    /// Pool statistics.
    pub stats: PoolStats,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl StressReport {
    /// Confirm the run never shared a resource and ended consistent.
    pub fn verify(&self) -> Result<(), SimError> {
        if self.duplicates > 0 {
            return Err(SimError::InvariantViolation(format!(
                "{} effects were handed to two holders at once",
                self.duplicates
            )));
        }
        if self.peak_active > self.snapshot.max_capacity {
            return Err(SimError::InvariantViolation(format!(
                "{} effects active with capacity {}",
                self.peak_active, self.snapshot.max_capacity
            )));
        }
        if !self.snapshot.holds_invariants() || self.snapshot.active != 0 {
            return Err(SimError::InvariantViolation(format!(
                "final counters inconsistent: {:?}",
                self.snapshot
            )));
        }
        Ok(())
    }

    /// Acquires completed per second.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.acquired as f64 / secs
        }
    }
}

fn run_worker(
    worker: usize,
    pool: &SharedPool<Effect, EffectLifecycle>,
    in_use: &Mutex<HashSet<u64>>,
    scenario: &StressScenario,
    cancel: &CancellationToken,
) -> WorkerReport {
    let mut report = WorkerReport {
        worker,
        ..WorkerReport::default()
    };
    let timeout = Some(scenario.timeout());
    let hold = scenario.hold();

    for i in 0..scenario.iterations {
        let mut effect = match pool.acquire_timeout(timeout, cancel) {
            Ok(effect) => effect,
            Err(PoolError::Timeout(_)) => {
                report.timeouts += 1;
                continue;
            }
            Err(PoolError::Cancelled) => break,
            Err(e) => {
                warn!(worker, error = %e, "Acquire failed");
                report.errors += 1;
                continue;
            }
        };
        report.acquired += 1;
        report.peak_active = report.peak_active.max(pool.count_active());

        let serial = effect.serial;
        if !in_use.lock().insert(serial) {
            report.duplicates += 1;
        }
        #[allow(clippy::cast_precision_loss)]
        effect.spawn([worker as f32, 0.0], [1.0, i as f32], 1);
        if !hold.is_zero() {
            thread::sleep(hold);
        }
        effect.tick();
        in_use.lock().remove(&serial);

        if let Err(rejected) = pool.release(effect) {
            warn!(worker, error = %rejected, "Release rejected");
            report.errors += 1;
        }
    }

    debug!(worker, acquired = report.acquired, timeouts = report.timeouts, "Worker done");
    report
}

/// Run a stress scenario across `scenario.workers` threads.
///
/// Returns `Cancelled` if the token fires before the workers finish.
pub fn run_stress(
    scenario: &StressScenario,
    cancel: &CancellationToken,
) -> Result<StressReport, SimError> {
    scenario.validate()?;
    let start = Instant::now();
    let (pool, _counters) = effect_pool(scenario.kind, scenario.pool)?;
    let pool = SharedPool::new(pool);
    let in_use = Mutex::new(HashSet::new());
    let (tx, rx) = unbounded();

    thread::scope(|s| {
        for worker in 0..scenario.workers {
            let tx = tx.clone();
            let pool = &pool;
            let in_use = &in_use;
            s.spawn(move || {
                let report = run_worker(worker, pool, in_use, scenario, cancel);
                tx.send(report).ok();
            });
        }
    });
    drop(tx);

    cancel.check_cancelled()?;

    let mut workers: Vec<WorkerReport> = rx.iter().collect();
    workers.sort_by_key(|w| w.worker);

    let report = StressReport {
        kind: scenario.kind,
        acquired: workers.iter().map(|w| w.acquired).sum(),
        timeouts: workers.iter().map(|w| w.timeouts).sum(),
        errors: workers.iter().map(|w| w.errors).sum(),
        duplicates: workers.iter().map(|w| w.duplicates).sum(),
        peak_active: workers.iter().map(|w| w.peak_active).max().unwrap_or(0),
        workers,
        snapshot: pool.snapshot(),
        stats: pool.stats(),
        elapsed: start.elapsed(),
    };
    info!(
        kind = %report.kind,
        acquired = report.acquired,
        timeouts = report.timeouts,
        "Stress scenario complete"
    );
    Ok(report)
}
