//! Run observer trait for progress reporting.

use log::info;

use tmc_core::Tick;
use tmc_incident::IncidentEvent;

/// Callbacks invoked by [`Run::run`][crate::Run::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Observability only: nothing an
/// observer does feeds back into the control contract.
///
/// # Example — tick counter
///
/// ```rust,ignore
/// struct TickCounter(usize);
///
/// impl RunObserver for TickCounter {
///     fn on_tick_start(&mut self, _tick: Tick) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait RunObserver {
    /// Called at the start of each tick, before the engine advances.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called every `progress_interval_ticks` ticks.
    fn on_progress(&mut self, _tick: Tick) {}

    /// Called when an incident was actually applied this tick (no-op and
    /// failed activations do not fire this).
    fn on_incident_applied(&mut self, _tick: Tick, _event: &IncidentEvent) {}

    /// Called when an incident was actually cleared this tick.
    fn on_incident_cleared(&mut self, _tick: Tick, _event: &IncidentEvent) {}

    /// Called once after the loop exits, before teardown.
    fn on_run_end(&mut self, _final_tick: Tick) {}
}

/// A [`RunObserver`] that does nothing.
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// A [`RunObserver`] that narrates the run through the `log` crate — the
/// console output of the standalone binary.
pub struct ProgressLogger;

impl RunObserver for ProgressLogger {
    fn on_progress(&mut self, tick: Tick) {
        info!("simulation step {tick}");
    }

    fn on_incident_applied(&mut self, tick: Tick, event: &IncidentEvent) {
        info!("{event} initiated at {tick}");
    }

    fn on_incident_cleared(&mut self, tick: Tick, event: &IncidentEvent) {
        info!("{event} cleared at {tick}");
    }

    fn on_run_end(&mut self, final_tick: Tick) {
        info!("simulation ended at {final_tick}");
    }
}
