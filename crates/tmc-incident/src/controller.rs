//! The incident state machine and its engine mutations.

use std::collections::HashSet;

use log::{debug, error, warn};

use tmc_core::{LaneId, VehicleClass};
use tmc_link::{EngineLink, LinkResult, RESTORE_SPEED};

use crate::IncidentEvent;

// ── State and outcomes ────────────────────────────────────────────────────────

/// Whether a lane currently carries an applied incident.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum IncidentState {
    #[default]
    Inactive,
    Active,
}

/// What one `apply` call did.
///
/// Only `Applied` transitions the lane; every other outcome leaves the state
/// machine untouched.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ApplyOutcome {
    /// Lane closed and vehicles asked to re-plan.
    Applied,
    /// The lane was already Active; duplicate activation ignored.
    AlreadyActive,
    /// The lane does not exist in the loaded network; nothing mutated.
    LaneMissing,
    /// An unexpected link failure interrupted the operation (logged).
    Failed,
}

/// What one `clear` call did.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ClearOutcome {
    /// Lane restored to engine defaults.
    Cleared,
    /// The lane was not Active; clearance ignored.
    AlreadyInactive,
    /// The lane does not exist in the loaded network; nothing mutated.
    LaneMissing,
    /// An unexpected link failure interrupted the operation (logged).
    Failed,
}

// ── Controller ────────────────────────────────────────────────────────────────

/// Enforces the Inactive/Active state machine per lane and performs the
/// associated engine mutations.
///
/// The controller does not own the link; the scheduler passes it in per call.
/// Neither `apply` nor `clear` ever returns an error — unexpected failures
/// are logged and reported through the outcome value, so an incident action
/// can never abort the outer step loop.
#[derive(Default)]
pub struct IncidentController {
    /// Lanes currently holding an applied incident.
    active: HashSet<LaneId>,
}

impl IncidentController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of `lane`.
    pub fn state(&self, lane: &LaneId) -> IncidentState {
        if self.active.contains(lane) {
            IncidentState::Active
        } else {
            IncidentState::Inactive
        }
    }

    /// Number of lanes currently Active.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    // ── apply ─────────────────────────────────────────────────────────────

    /// Close the event's lane and ask every routed vehicle to re-plan.
    pub fn apply<L: EngineLink>(&mut self, link: &mut L, event: &IncidentEvent) -> ApplyOutcome {
        match self.try_apply(link, event) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("failed to close lane {}: {e}", event.lane);
                ApplyOutcome::Failed
            }
        }
    }

    fn try_apply<L: EngineLink>(
        &mut self,
        link:  &mut L,
        event: &IncidentEvent,
    ) -> LinkResult<ApplyOutcome> {
        let lane = &event.lane;

        if self.active.contains(lane) {
            debug!("lane {lane} is already closed; ignoring duplicate activation");
            return Ok(ApplyOutcome::AlreadyActive);
        }
        if !link.lane_exists(lane)? {
            warn!("lane {lane} not found in network; skipping closure");
            return Ok(ApplyOutcome::LaneMissing);
        }

        // Full blockage: zero speed, and the class under study may not enter.
        link.set_lane_speed(lane, 0.0)?;
        link.set_lane_allowed(lane, &VehicleClass::all_except(VehicleClass::Passenger))?;

        // Every re-route request stands alone: one refusal must not keep the
        // remaining vehicles from being asked.
        let mut requested = 0usize;
        for vehicle in link.list_vehicles()? {
            match link.vehicle_route(&vehicle) {
                Ok(route) if route.is_assigned() => match link.request_reroute(&vehicle) {
                    Ok(()) => requested += 1,
                    Err(e) => warn!("could not reroute vehicle {vehicle}: {e}"),
                },
                Ok(_) => {} // unassigned; nothing to re-plan
                Err(e) => warn!("could not read route of vehicle {vehicle}: {e}"),
            }
        }

        self.active.insert(lane.clone());
        debug!("closed lane {lane}; asked {requested} vehicles to re-plan");
        Ok(ApplyOutcome::Applied)
    }

    // ── clear ─────────────────────────────────────────────────────────────

    /// Restore the event's lane to the engine defaults.
    pub fn clear<L: EngineLink>(&mut self, link: &mut L, event: &IncidentEvent) -> ClearOutcome {
        match self.try_clear(link, event) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("failed to restore lane {}: {e}", event.lane);
                ClearOutcome::Failed
            }
        }
    }

    fn try_clear<L: EngineLink>(
        &mut self,
        link:  &mut L,
        event: &IncidentEvent,
    ) -> LinkResult<ClearOutcome> {
        let lane = &event.lane;

        if !self.active.contains(lane) {
            debug!("lane {lane} is not closed; ignoring clearance");
            return Ok(ClearOutcome::AlreadyInactive);
        }
        if !link.lane_exists(lane)? {
            warn!("lane {lane} not found in network; cannot restore defaults");
            return Ok(ClearOutcome::LaneMissing);
        }

        // Defaults are engine-side constants, never captured prior state.
        link.set_lane_speed(lane, RESTORE_SPEED)?;
        link.set_lane_allowed(lane, VehicleClass::default_allowed())?;

        self.active.remove(lane);
        debug!("restored lane {lane} to scenario defaults");
        Ok(ClearOutcome::Cleared)
    }
}
