//! `tmc-incident` — scheduled lane-blocking incidents and the state machine
//! that applies them to the engine.
//!
//! # Crate layout
//!
//! | Module         | Contents                                             |
//! |----------------|------------------------------------------------------|
//! | [`event`]      | `IncidentEvent` value object                         |
//! | [`controller`] | `IncidentController`, `IncidentState`, outcomes      |
//! | [`schedule`]   | `IncidentSchedule` (per-tick activation/clearance)   |
//! | [`loader`]     | `load_incidents_csv`, `load_incidents_reader`        |
//! | [`error`]      | `IncidentError`, `IncidentResult<T>`                 |
//!
//! # State model (summary)
//!
//! Each lane is `Inactive` or `Active`.  Applying an event closes the lane
//! (speed 0, passenger class excluded), asks every routed vehicle to re-plan,
//! and marks the lane `Active`.  Clearing restores the engine defaults and
//! marks it `Inactive`.  Re-entrant calls are no-ops with distinct outcome
//! values, and no failure inside apply/clear ever propagates to the caller —
//! a blocked incident action must not take down the step loop.

pub mod controller;
pub mod error;
pub mod event;
pub mod loader;
pub mod schedule;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use controller::{ApplyOutcome, ClearOutcome, IncidentController, IncidentState};
pub use error::{IncidentError, IncidentResult};
pub use event::IncidentEvent;
pub use loader::{load_incidents_csv, load_incidents_reader};
pub use schedule::IncidentSchedule;
