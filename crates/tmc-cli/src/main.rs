//! `tmc` — run the external micro-simulation engine through a fixed-horizon
//! incident scenario.
//!
//! No runtime flags: the engine installation comes from `MICROSIM_HOME`, the
//! incident schedule from an `incidents.csv` next to the scenario if present,
//! and the built-in default scenario otherwise.  Exit status is non-zero
//! only when the engine session cannot be established; a failure mid-run is
//! logged and the process still exits 0.

use std::path::Path;

use anyhow::{Context, Result};
use log::{error, info};

use tmc_core::{LaneId, Tick};
use tmc_incident::{load_incidents_csv, IncidentEvent, IncidentSchedule};
use tmc_link::{EngineConfig, EngineSession};
use tmc_sim::{ProgressLogger, RunBuilder, RunConfig};

// ── Constants ─────────────────────────────────────────────────────────────────

const HORIZON_TICKS:     u64 = 2_000;
const PROGRESS_INTERVAL: u64 = 100;

// Built-in default scenario, used when no incidents.csv is present.
const INCIDENT_EDGE:     &str = "386286298#3";
const INCIDENT_LANE:     u32  = 0;
const INCIDENT_START:    u64  = 500;
const INCIDENT_DURATION: u64  = 1_000;

/// Optional incident schedule in the working directory.
const INCIDENTS_FILE: &str = "incidents.csv";

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 1. Resolve the engine installation; fail fast before anything else.
    let engine_config = EngineConfig::from_env().context("cannot configure the engine")?;

    // 2. Assemble the incident schedule.
    let schedule = load_schedule()?;
    for event in schedule.events() {
        info!("scheduled {event}");
    }

    // 3. Launch and attach.  Connection failure is the fatal path.
    let session =
        EngineSession::connect(&engine_config).context("cannot establish engine session")?;

    // 4. Run to the horizon.
    let mut run = RunBuilder::new(
        RunConfig {
            total_ticks:             HORIZON_TICKS,
            progress_interval_ticks: PROGRESS_INTERVAL,
        },
        session,
    )
    .schedule(schedule)
    .build()?;

    match run.run(&mut ProgressLogger) {
        Ok(summary) => {
            info!(
                "run complete: {} ticks, {} incidents applied, {} cleared",
                summary.ticks_completed, summary.incidents_applied, summary.incidents_cleared
            );
        }
        Err(e) => {
            // The session is already closed.  A mid-run failure keeps exit
            // status 0; only connection establishment may change it.
            error!("simulation error: {e}");
        }
    }
    Ok(())
}

fn load_schedule() -> Result<IncidentSchedule> {
    let path = Path::new(INCIDENTS_FILE);
    if path.exists() {
        let schedule = load_incidents_csv(path)
            .with_context(|| format!("cannot load {INCIDENTS_FILE}"))?;
        info!("loaded {} incidents from {INCIDENTS_FILE}", schedule.len());
        return Ok(schedule);
    }

    let event = IncidentEvent::new(
        LaneId::new(INCIDENT_EDGE, INCIDENT_LANE),
        Tick(INCIDENT_START),
        INCIDENT_DURATION,
    );
    Ok(IncidentSchedule::single(event)?)
}
