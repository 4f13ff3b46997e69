//! CLI report presenter.

use std::io::{self, Write};

use respool_core::{PoolSnapshot, PoolStats};
use respool_sim::{FrameReport, StressReport};

use crate::output::{format_duration, format_number, format_percent};

/// Renders simulation reports as text or JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportPresenter {
    verbose: bool,
    quiet: bool,
    json: bool,
}

impl ReportPresenter {
    /// Create a presenter. `json` takes precedence over `quiet` and `verbose`.
    #[must_use]
    pub fn new(verbose: bool, quiet: bool, json: bool) -> Self {
        Self {
            verbose,
            quiet,
            json,
        }
    }

    /// Present a frame-driven run.
    pub fn present_frames(&self, report: &FrameReport, out: &mut dyn Write) -> io::Result<()> {
        if self.json {
            return write_json(report, out);
        }
        if self.quiet {
            return writeln!(
                out,
                "spawned={} dropped={} peak={}",
                report.spawned, report.dropped, report.peak_active
            );
        }

        writeln!(out, "Mode: frames ({})", report.kind)?;
        writeln!(out, "Frames: {}", format_number(u64::from(report.frames)))?;
        writeln!(out, "Duration: {}", format_duration(report.elapsed))?;
        writeln!(
            out,
            "Spawned: {}  Dropped: {}  Served: {}",
            format_number(report.spawned),
            format_number(report.dropped),
            format_percent(report.service_ratio())
        )?;
        writeln!(
            out,
            "Peak active: {}  Exhausted frames: {}",
            report.peak_active, report.exhausted_frames
        )?;
        writeln!(
            out,
            "Effects created: {}  destroyed: {}",
            format_number(report.created),
            format_number(report.destroyed)
        )?;
        write_pool(&report.snapshot, &report.stats, self.verbose, out)
    }

    /// Present a stress run.
    pub fn present_stress(&self, report: &StressReport, out: &mut dyn Write) -> io::Result<()> {
        if self.json {
            return write_json(report, out);
        }
        if self.quiet {
            return writeln!(
                out,
                "acquired={} timeouts={} duplicates={}",
                report.acquired, report.timeouts, report.duplicates
            );
        }

        writeln!(out, "Mode: stress ({})", report.kind)?;
        writeln!(out, "Workers: {}", report.workers.len())?;
        writeln!(out, "Duration: {}", format_duration(report.elapsed))?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let throughput = report.throughput() as u64;
        writeln!(
            out,
            "Acquired: {}  Timeouts: {}  Errors: {}  ({}/s)",
            format_number(report.acquired),
            format_number(report.timeouts),
            format_number(report.errors),
            format_number(throughput)
        )?;
        writeln!(
            out,
            "Peak active: {}  Duplicates: {}",
            report.peak_active, report.duplicates
        )?;

        if self.verbose {
            writeln!(out, "\nPer worker:")?;
            writeln!(out, "{:-<60}", "")?;
            for w in &report.workers {
                writeln!(
                    out,
                    "  #{:<4} {:>10} acquired {:>8} timeouts {:>6} peak",
                    w.worker,
                    format_number(w.acquired),
                    format_number(w.timeouts),
                    w.peak_active
                )?;
            }
        }
        write_pool(&report.snapshot, &report.stats, self.verbose, out)
    }

    /// Present an error.
    pub fn present_error(&self, error: &str, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Error: {error}")
    }
}

fn write_json<T: serde::Serialize + ?Sized>(value: &T, out: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::other)?;
    writeln!(out)
}

fn write_pool(
    snapshot: &PoolSnapshot,
    stats: &PoolStats,
    verbose: bool,
    out: &mut dyn Write,
) -> io::Result<()> {
    writeln!(
        out,
        "Pool: all={} active={} inactive={} max={}",
        snapshot.all, snapshot.active, snapshot.inactive, snapshot.max_capacity
    )?;
    writeln!(out, "Reuse: {}", format_percent(stats.reuse_ratio()))?;
    if verbose {
        writeln!(
            out,
            "Stats: created={} reused={} kept={} evicted={} destroyed={} exhausted={} waited={} timed_out={}",
            stats.created,
            stats.reused,
            stats.kept,
            stats.evicted,
            stats.destroyed,
            stats.exhausted,
            stats.waited,
            stats.timed_out
        )?;
    }
    Ok(())
}
