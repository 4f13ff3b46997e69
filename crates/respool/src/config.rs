//! Application configuration from CLI flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use respool_core::constants::{DEFAULT_INITIAL, DEFAULT_MAX_CAPACITY};
use respool_core::PoolConfig;
use respool_sim::{load_scenario, EffectKind, FrameScenario, Scenario, SimError, StressScenario};

/// Which simulation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Spawn and expire effects frame by frame.
    Frames,
    /// Hammer a shared pool from several threads.
    Stress,
}

/// respool: bounded resource pool simulator.
#[derive(Parser, Debug)]
#[command(name = "respool", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct AppConfig {
    /// Simulation to run.
    #[arg(long, value_enum, default_value = "frames", env = "RESPOOL_MODE")]
    pub mode: Mode,

    /// JSON scenario file; replaces the scenario flags below.
    #[arg(long, env = "RESPOOL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Resources created when the pool is built.
    #[arg(long, default_value_t = DEFAULT_INITIAL, env = "RESPOOL_INITIAL")]
    pub initial: usize,

    /// Maximum resident resources.
    #[arg(long, default_value_t = DEFAULT_MAX_CAPACITY, env = "RESPOOL_MAX")]
    pub max: usize,

    /// Frames to simulate.
    #[arg(long, default_value = "600")]
    pub frames: u32,

    /// Effects spawned per frame.
    #[arg(long, default_value = "4")]
    pub spawn: u32,

    /// Frames an effect lives.
    #[arg(long, default_value = "20")]
    pub lifetime: u32,

    /// Frames between spawn bursts (0 disables bursts).
    #[arg(long, default_value = "60")]
    pub burst_every: u32,

    /// Extra effects spawned on a burst frame.
    #[arg(long, default_value = "32")]
    pub burst_size: u32,

    /// Frame on which to clear the pool while effects are live.
    #[arg(long)]
    pub clear_at: Option<u32>,

    /// Effect kind: projectile, particle, or rope.
    #[arg(long, default_value = "particle")]
    pub kind: EffectKind,

    /// Stress worker threads.
    #[arg(long, default_value = "4")]
    pub workers: usize,

    /// Acquires per stress worker.
    #[arg(long, default_value = "1000")]
    pub iterations: u32,

    /// How long a stress worker holds a resource (e.g., "1ms", "250us").
    #[arg(long, default_value = "1ms", value_parser = parse_duration_arg)]
    pub hold: Duration,

    /// Blocking acquire timeout (e.g., "100ms", "2s").
    #[arg(long, default_value = "100ms", value_parser = parse_duration_arg)]
    pub timeout: Duration,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Quiet mode (one summary line).
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output and debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Pool sizing from the flags.
    #[must_use]
    pub fn pool(&self) -> PoolConfig {
        PoolConfig::new(self.initial, self.max)
    }

    /// The scenario to run: the `--config` file if given, else the flags.
    pub fn scenario(&self) -> Result<Scenario, SimError> {
        if let Some(path) = &self.config {
            return load_scenario(path);
        }

        let scenario = match self.mode {
            Mode::Frames => Scenario::Frames(FrameScenario {
                kind: self.kind,
                pool: self.pool(),
                frames: self.frames,
                spawn_per_frame: self.spawn,
                lifetime_frames: self.lifetime,
                burst_every: self.burst_every,
                burst_size: self.burst_size,
                clear_at: self.clear_at,
            }),
            Mode::Stress => Scenario::Stress(StressScenario {
                kind: self.kind,
                pool: self.pool(),
                workers: self.workers,
                iterations: self.iterations,
                hold_us: u64::try_from(self.hold.as_micros()).unwrap_or(u64::MAX),
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        };
        scenario.validate()?;
        Ok(scenario)
    }
}

fn parse_duration_arg(s: &str) -> Result<Duration, String> {
    parse_duration(s).ok_or_else(|| format!("invalid duration: {s:?}"))
}

/// Parse a duration string like "5m", "1h", "30s", "500ms", "250us".
///
/// A bare number is taken as seconds.
#[must_use]
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms.parse().ok()?;
        Some(Duration::from_millis(n))
    } else if let Some(us) = s.strip_suffix("us") {
        let n: u64 = us.parse().ok()?;
        Some(Duration::from_micros(n))
    } else if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(60)?))
    } else if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(3600)?))
    } else if let Some(secs) = s.strip_suffix('s') {
        let n: u64 = secs.parse().ok()?;
        Some(Duration::from_secs(n))
    } else {
        let n: u64 = s.parse().ok()?;
        Some(Duration::from_secs(n))
    }
}
