//! Fluent builder for constructing a [`Run`].

use log::warn;

use tmc_core::Tick;
use tmc_incident::{IncidentController, IncidentSchedule};
use tmc_link::EngineLink;

use crate::{CancelToken, Run, RunConfig, RunError, RunResult};

/// Fluent builder for [`Run<L>`].
///
/// # Required inputs
///
/// - [`RunConfig`] — tick horizon, progress interval
/// - `L: EngineLink` — a connected engine session (or a scripted link)
///
/// # Optional inputs
///
/// | Method          | Default                     |
/// |-----------------|-----------------------------|
/// | `.schedule(s)`  | `IncidentSchedule::empty()` |
///
/// # Example
///
/// ```rust,ignore
/// let session = EngineSession::connect(&engine_config)?;
/// let mut run = RunBuilder::new(config, session)
///     .schedule(schedule)
///     .build()?;
/// let summary = run.run(&mut ProgressLogger)?;
/// ```
pub struct RunBuilder<L: EngineLink> {
    config:   RunConfig,
    link:     L,
    schedule: Option<IncidentSchedule>,
}

impl<L: EngineLink> RunBuilder<L> {
    /// Create a builder with all required inputs.
    pub fn new(config: RunConfig, link: L) -> Self {
        Self { config, link, schedule: None }
    }

    /// Supply the incident schedule.  Without one the run is a plain
    /// advance loop.
    pub fn schedule(mut self, schedule: IncidentSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Validate inputs and return a ready-to-run [`Run`].
    pub fn build(self) -> RunResult<Run<L>> {
        if self.config.total_ticks == 0 {
            return Err(RunError::Config("tick horizon must be at least 1".into()));
        }

        let schedule = self.schedule.unwrap_or_else(IncidentSchedule::empty);

        // Events the horizon cannot serve are legal but almost certainly a
        // configuration mistake; say so up front.
        let end = self.config.end_tick();
        for event in schedule.events() {
            if event.start >= end {
                warn!(
                    "{event} never activates within the {}-tick horizon",
                    self.config.total_ticks
                );
            } else if event.end() >= end {
                warn!(
                    "{event} is never cleared within the {}-tick horizon",
                    self.config.total_ticks
                );
            }
        }

        Ok(Run {
            config:     self.config,
            link:       self.link,
            controller: IncidentController::new(),
            schedule,
            tick:       Tick::ZERO,
            cancel:     CancelToken::new(),
        })
    }
}
