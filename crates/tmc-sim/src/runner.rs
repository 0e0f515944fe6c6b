//! The `Run` struct and its tick loop.

use log::info;

use tmc_core::Tick;
use tmc_incident::{ApplyOutcome, ClearOutcome, IncidentController, IncidentSchedule};
use tmc_link::EngineLink;

use crate::{CancelToken, RunObserver, RunResult};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Top-level run configuration.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Total ticks to simulate — a fixed horizon, never data-dependent.
    pub total_ticks: u64,

    /// Emit a progress notification every N ticks.  0 disables progress.
    pub progress_interval_ticks: u64,
}

impl RunConfig {
    /// The tick at which the run ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }
}

// ── Summary ───────────────────────────────────────────────────────────────────

/// What a completed run did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks fully processed (equals the horizon unless cancelled).
    pub ticks_completed: u64,
    /// Incidents actually applied (outcome `Applied`).
    pub incidents_applied: usize,
    /// Incidents actually cleared (outcome `Cleared`).
    pub incidents_cleared: usize,
    /// Whether the run stopped at a cancellation request.
    pub cancelled: bool,
}

// ── Run ───────────────────────────────────────────────────────────────────────

/// The step scheduler: drives the engine one tick at a time and dispatches
/// scheduled incidents to the controller.
///
/// Per tick, in order:
///
/// 1. Check the cancellation token.
/// 2. `advance()` — one engine step, strictly sequential.
/// 3. Apply incidents activating this tick.
/// 4. Clear incidents clearing this tick.
/// 5. Emit periodic progress.
/// 6. Increment the tick.
///
/// Create via [`RunBuilder`][crate::RunBuilder].
pub struct Run<L: EngineLink> {
    pub(crate) config:     RunConfig,
    pub(crate) link:       L,
    pub(crate) controller: IncidentController,
    pub(crate) schedule:   IncidentSchedule,
    pub(crate) tick:       Tick,
    pub(crate) cancel:     CancelToken,
}

impl<L: EngineLink> Run<L> {
    // ── Public API ────────────────────────────────────────────────────────

    /// A token that stops the loop at the next tick boundary.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Read-only view of the incident state machine.
    pub fn controller(&self) -> &IncidentController {
        &self.controller
    }

    /// Read-only view of the engine link.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Run from the current tick to the horizon.
    ///
    /// The engine session is closed exactly once before this returns, on
    /// every exit path — normal completion, cancellation, or an advance
    /// error propagating out of the loop.  Teardown failures are suppressed
    /// inside the link.
    pub fn run<O: RunObserver>(&mut self, observer: &mut O) -> RunResult<RunSummary> {
        let result = self.drive(observer);
        self.link.close();
        result
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    fn drive<O: RunObserver>(&mut self, observer: &mut O) -> RunResult<RunSummary> {
        let end = self.config.end_tick();
        let interval = self.config.progress_interval_ticks;
        let mut applied = 0usize;
        let mut cleared = 0usize;

        while self.tick < end {
            if self.cancel.is_cancelled() {
                info!("run cancelled at {}", self.tick);
                break;
            }
            let now = self.tick;
            observer.on_tick_start(now);

            // Explicit field borrows so the borrow checker sees disjoint
            // access: the schedule is read while link and controller mutate.
            let Self { link, controller, schedule, .. } = self;

            link.advance()?;

            for event in schedule.activating_at(now) {
                if controller.apply(link, event) == ApplyOutcome::Applied {
                    applied += 1;
                    observer.on_incident_applied(now, event);
                }
            }
            for event in schedule.clearing_at(now) {
                if controller.clear(link, event) == ClearOutcome::Cleared {
                    cleared += 1;
                    observer.on_incident_cleared(now, event);
                }
            }

            if interval > 0 && now.0.is_multiple_of(interval) {
                observer.on_progress(now);
            }

            self.tick = now + 1;
        }

        observer.on_run_end(self.tick);
        Ok(RunSummary {
            ticks_completed:    self.tick.0,
            incidents_applied:  applied,
            incidents_cleared:  cleared,
            cancelled:          self.cancel.is_cancelled(),
        })
    }
}
