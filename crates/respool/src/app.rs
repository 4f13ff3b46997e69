//! Application entry point and dispatch.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use respool_cli::completion::generate_completion;
use respool_cli::ReportPresenter;
use respool_core::{CancellationToken, PoolError};
use respool_sim::{run_frames, run_stress, FrameScenario, Scenario, StressScenario};

use crate::config::AppConfig;
use crate::version;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        generate_completion(&mut cmd, shell, &mut io::stdout());
        return Ok(());
    }

    debug!(version = %version::full_version(), "Starting");
    let scenario = config.scenario().context("invalid scenario")?;

    let cancel = CancellationToken::new();
    ctrlc_handler(cancel.clone());

    let presenter = ReportPresenter::new(config.verbose, config.quiet, config.json);
    let mut out = io::stdout().lock();
    match scenario {
        Scenario::Frames(s) => run_frame_mode(&s, &cancel, &presenter, &mut out),
        Scenario::Stress(s) => run_stress_mode(&s, &cancel, &presenter, &mut out),
    }
}

fn run_frame_mode(
    scenario: &FrameScenario,
    cancel: &CancellationToken,
    presenter: &ReportPresenter,
    out: &mut dyn Write,
) -> Result<()> {
    let report = run_frames(scenario, cancel)?;
    presenter.present_frames(&report, out)?;
    report.verify()?;
    Ok(())
}

fn run_stress_mode(
    scenario: &StressScenario,
    cancel: &CancellationToken,
    presenter: &ReportPresenter,
    out: &mut dyn Write,
) -> Result<()> {
    let report = run_stress(scenario, cancel)?;
    presenter.present_stress(&report, out)?;
    report.verify()?;

    if report.timeouts > 0 {
        return Err(PoolError::Timeout(Duration::from_millis(scenario.timeout_ms)))
            .with_context(|| format!("{} acquires timed out", report.timeouts));
    }
    Ok(())
}

fn ctrlc_handler(cancel: CancellationToken) {
    if let Err(e) = ctrlc::set_handler(move || {
        cancel.cancel();
    }) {
        warn!(error = %e, "Could not install Ctrl+C handler");
    }
}
