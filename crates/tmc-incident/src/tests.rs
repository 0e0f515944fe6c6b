//! Tests for the incident controller, schedule, and loader.

use std::collections::HashSet;

use tmc_core::{LaneId, RouteId, Tick, VehicleClass, VehicleId};
use tmc_link::{EngineLink, LinkError, LinkResult, RESTORE_SPEED};

use crate::{
    ApplyOutcome, ClearOutcome, IncidentController, IncidentError, IncidentEvent,
    IncidentSchedule, IncidentState,
};

// ── Recording mock link ───────────────────────────────────────────────────────

/// In-memory link that records every mutation the controller issues.
#[derive(Default)]
struct MockLink {
    lanes:              HashSet<String>,
    vehicles:           Vec<(VehicleId, RouteId)>,
    reject_reroute:     HashSet<String>,
    fail_vehicle_list:  bool,

    speed_log:   Vec<(String, f64)>,
    allowed_log: Vec<(String, Vec<VehicleClass>)>,
    reroute_log: Vec<String>,
    closes:      usize,
}

impl MockLink {
    fn with_lane(lane: &LaneId) -> Self {
        let mut link = Self::default();
        link.lanes.insert(lane.to_string());
        link
    }

    fn add_vehicle(&mut self, id: &str, route: &str) {
        self.vehicles.push((VehicleId::new(id), RouteId::new(route)));
    }

    fn mutation_count(&self) -> usize {
        self.speed_log.len() + self.allowed_log.len() + self.reroute_log.len()
    }
}

impl EngineLink for MockLink {
    fn advance(&mut self) -> LinkResult<()> {
        Ok(())
    }

    fn lane_exists(&mut self, lane: &LaneId) -> LinkResult<bool> {
        Ok(self.lanes.contains(&lane.to_string()))
    }

    fn list_vehicles(&mut self) -> LinkResult<Vec<VehicleId>> {
        if self.fail_vehicle_list {
            return Err(LinkError::Engine {
                command: "get-agent-list",
                message: "engine is wedged".into(),
            });
        }
        Ok(self.vehicles.iter().map(|(v, _)| v.clone()).collect())
    }

    fn vehicle_route(&mut self, vehicle: &VehicleId) -> LinkResult<RouteId> {
        self.vehicles
            .iter()
            .find(|(v, _)| v == vehicle)
            .map(|(_, r)| r.clone())
            .ok_or_else(|| LinkError::Engine {
                command: "get-agent-route",
                message: format!("unknown vehicle {vehicle}"),
            })
    }

    fn set_lane_speed(&mut self, lane: &LaneId, speed: f64) -> LinkResult<()> {
        self.speed_log.push((lane.to_string(), speed));
        Ok(())
    }

    fn set_lane_allowed(&mut self, lane: &LaneId, classes: &[VehicleClass]) -> LinkResult<()> {
        self.allowed_log.push((lane.to_string(), classes.to_vec()));
        Ok(())
    }

    fn request_reroute(&mut self, vehicle: &VehicleId) -> LinkResult<()> {
        self.reroute_log.push(vehicle.to_string());
        if self.reject_reroute.contains(vehicle.as_str()) {
            return Err(LinkError::Engine {
                command: "request-reroute",
                message: "no alternative route".into(),
            });
        }
        Ok(())
    }

    fn close(&mut self) {
        self.closes += 1;
    }
}

fn test_event() -> IncidentEvent {
    IncidentEvent::new(LaneId::new("386286298#3", 0), Tick(500), 1000)
}

// ── State machine ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod state_machine {
    use super::*;

    #[test]
    fn apply_then_clear_round_trip() {
        let event = test_event();
        let mut link = MockLink::with_lane(&event.lane);
        let mut controller = IncidentController::new();

        assert_eq!(controller.state(&event.lane), IncidentState::Inactive);

        assert_eq!(controller.apply(&mut link, &event), ApplyOutcome::Applied);
        assert_eq!(controller.state(&event.lane), IncidentState::Active);
        assert_eq!(controller.active_count(), 1);

        // Closure: zero speed, passenger excluded.
        assert_eq!(link.speed_log, vec![("386286298#3_0".to_string(), 0.0)]);
        let (_, mask) = &link.allowed_log[0];
        assert!(!mask.contains(&VehicleClass::Passenger));
        assert!(mask.contains(&VehicleClass::Bus));

        assert_eq!(controller.clear(&mut link, &event), ClearOutcome::Cleared);
        assert_eq!(controller.state(&event.lane), IncidentState::Inactive);
        assert_eq!(controller.active_count(), 0);

        // Restoration: sentinel speed, engine default class set.
        assert_eq!(link.speed_log[1], ("386286298#3_0".to_string(), RESTORE_SPEED));
        assert_eq!(link.allowed_log[1].1, VehicleClass::default_allowed().to_vec());
    }

    #[test]
    fn double_apply_is_a_no_op() {
        let event = test_event();
        let mut link = MockLink::with_lane(&event.lane);
        let mut controller = IncidentController::new();

        assert_eq!(controller.apply(&mut link, &event), ApplyOutcome::Applied);
        let mutations_after_first = link.mutation_count();

        assert_eq!(controller.apply(&mut link, &event), ApplyOutcome::AlreadyActive);
        assert_eq!(
            link.mutation_count(),
            mutations_after_first,
            "duplicate activation must not issue engine commands"
        );
        assert_eq!(controller.state(&event.lane), IncidentState::Active);
    }

    #[test]
    fn early_clear_is_a_no_op() {
        let event = test_event();
        let mut link = MockLink::with_lane(&event.lane);
        let mut controller = IncidentController::new();

        assert_eq!(controller.clear(&mut link, &event), ClearOutcome::AlreadyInactive);
        assert_eq!(link.mutation_count(), 0);
        assert_eq!(controller.state(&event.lane), IncidentState::Inactive);
    }

    #[test]
    fn clear_is_idempotent() {
        let event = test_event();
        let mut link = MockLink::with_lane(&event.lane);
        let mut controller = IncidentController::new();

        controller.apply(&mut link, &event);
        assert_eq!(controller.clear(&mut link, &event), ClearOutcome::Cleared);
        let mutations_after_clear = link.mutation_count();

        assert_eq!(controller.clear(&mut link, &event), ClearOutcome::AlreadyInactive);
        assert_eq!(link.mutation_count(), mutations_after_clear);
        assert_eq!(controller.state(&event.lane), IncidentState::Inactive);
    }

    #[test]
    fn lanes_are_independent() {
        let first = IncidentEvent::new(LaneId::new("a", 0), Tick(10), 5);
        let second = IncidentEvent::new(LaneId::new("b", 0), Tick(10), 5);
        let mut link = MockLink::with_lane(&first.lane);
        link.lanes.insert(second.lane.to_string());
        let mut controller = IncidentController::new();

        controller.apply(&mut link, &first);
        assert_eq!(controller.state(&first.lane), IncidentState::Active);
        assert_eq!(controller.state(&second.lane), IncidentState::Inactive);

        controller.apply(&mut link, &second);
        assert_eq!(controller.active_count(), 2);

        controller.clear(&mut link, &first);
        assert_eq!(controller.state(&first.lane), IncidentState::Inactive);
        assert_eq!(controller.state(&second.lane), IncidentState::Active);
    }
}

// ── Missing lane ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod missing_lane {
    use super::*;

    #[test]
    fn apply_on_unknown_lane_changes_nothing() {
        let event = test_event();
        let mut link = MockLink::default(); // no lanes at all
        link.add_vehicle("veh_0", "route_0");
        let mut controller = IncidentController::new();

        assert_eq!(controller.apply(&mut link, &event), ApplyOutcome::LaneMissing);
        assert_eq!(link.mutation_count(), 0, "no lane or vehicle may be touched");
        assert_eq!(controller.state(&event.lane), IncidentState::Inactive);
    }

    #[test]
    fn clear_on_lane_removed_mid_incident() {
        let event = test_event();
        let mut link = MockLink::with_lane(&event.lane);
        let mut controller = IncidentController::new();

        controller.apply(&mut link, &event);
        link.lanes.clear(); // network no longer knows the lane

        assert_eq!(controller.clear(&mut link, &event), ClearOutcome::LaneMissing);
        // The call was aborted; the state machine was not transitioned.
        assert_eq!(controller.state(&event.lane), IncidentState::Active);
    }
}

// ── Re-routing ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reroute {
    use super::*;

    #[test]
    fn only_routed_vehicles_are_asked() {
        let event = test_event();
        let mut link = MockLink::with_lane(&event.lane);
        link.add_vehicle("routed_0", "r0");
        link.add_vehicle("parked", "");
        link.add_vehicle("routed_1", "r1");
        let mut controller = IncidentController::new();

        assert_eq!(controller.apply(&mut link, &event), ApplyOutcome::Applied);
        assert_eq!(link.reroute_log, vec!["routed_0", "routed_1"]);
    }

    #[test]
    fn one_rejection_does_not_stop_the_rest() {
        // N = 5 vehicles, K = 3 routed, one of the K rejected: exactly K
        // attempts, and the rejection does not prevent the other K-1.
        let event = test_event();
        let mut link = MockLink::with_lane(&event.lane);
        link.add_vehicle("routed_0", "r0");
        link.add_vehicle("stubborn", "r1");
        link.add_vehicle("parked_0", "");
        link.add_vehicle("routed_1", "r2");
        link.add_vehicle("parked_1", "");
        link.reject_reroute.insert("stubborn".into());
        let mut controller = IncidentController::new();

        let outcome = controller.apply(&mut link, &event);

        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(link.reroute_log, vec!["routed_0", "stubborn", "routed_1"]);
        assert_eq!(controller.state(&event.lane), IncidentState::Active);
    }
}

// ── Contained failures ────────────────────────────────────────────────────────

#[cfg(test)]
mod contained_failures {
    use super::*;

    #[test]
    fn unexpected_link_error_is_swallowed() {
        let event = test_event();
        let mut link = MockLink::with_lane(&event.lane);
        link.fail_vehicle_list = true;
        let mut controller = IncidentController::new();

        // The roster query blows up mid-apply; the outcome reports it and
        // the state machine is left untransitioned.
        assert_eq!(controller.apply(&mut link, &event), ApplyOutcome::Failed);
        assert_eq!(controller.state(&event.lane), IncidentState::Inactive);
    }
}

// ── Schedule ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod schedule {
    use super::*;

    fn lane(edge: &str) -> LaneId {
        LaneId::new(edge, 0)
    }

    #[test]
    fn indexes_by_activation_and_clearance() {
        let schedule = IncidentSchedule::new(vec![
            IncidentEvent::new(lane("a"), Tick(500), 1000),
            IncidentEvent::new(lane("b"), Tick(500), 200),
        ])
        .unwrap();

        let starting: Vec<_> = schedule.activating_at(Tick(500)).collect();
        assert_eq!(starting.len(), 2);
        assert_eq!(schedule.activating_at(Tick(501)).count(), 0);

        let clearing: Vec<_> = schedule.clearing_at(Tick(1500)).collect();
        assert_eq!(clearing.len(), 1);
        assert_eq!(clearing[0].lane, lane("a"));
        assert_eq!(schedule.clearing_at(Tick(700)).count(), 1);

        assert_eq!(schedule.last_clearance(), Some(Tick(1500)));
        assert_eq!(schedule.len(), 2);
    }

    #[test]
    fn zero_duration_rejected() {
        let result = IncidentSchedule::single(IncidentEvent::new(lane("a"), Tick(10), 0));
        assert!(matches!(result, Err(IncidentError::ZeroDuration { .. })));
    }

    #[test]
    fn same_lane_overlap_rejected() {
        let result = IncidentSchedule::new(vec![
            IncidentEvent::new(lane("a"), Tick(100), 100),
            IncidentEvent::new(lane("a"), Tick(150), 100),
        ]);
        assert!(matches!(
            result,
            Err(IncidentError::OverlappingIncidents { .. })
        ));
    }

    #[test]
    fn same_lane_touching_windows_rejected() {
        // Clearance at T200 runs after that tick's activations, so a second
        // event starting at exactly T200 would find the lane still closed.
        let result = IncidentSchedule::new(vec![
            IncidentEvent::new(lane("a"), Tick(100), 100),
            IncidentEvent::new(lane("a"), Tick(200), 100),
        ]);
        assert!(matches!(
            result,
            Err(IncidentError::OverlappingIncidents { .. })
        ));
    }

    #[test]
    fn same_lane_disjoint_windows_accepted() {
        let schedule = IncidentSchedule::new(vec![
            IncidentEvent::new(lane("a"), Tick(100), 100),
            IncidentEvent::new(lane("a"), Tick(201), 100),
        ])
        .unwrap();
        assert_eq!(schedule.len(), 2);
    }

    #[test]
    fn different_lanes_may_overlap() {
        let schedule = IncidentSchedule::new(vec![
            IncidentEvent::new(lane("a"), Tick(100), 100),
            IncidentEvent::new(lane("b"), Tick(100), 100),
        ])
        .unwrap();
        assert_eq!(schedule.len(), 2);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;
    use std::io::Write as _;

    use super::*;
    use crate::{load_incidents_csv, load_incidents_reader};

    const CSV: &str = "\
edge,lane_index,start_tick,duration_ticks
386286298#3,0,500,1000
gneE12,1,2500,600
";

    #[test]
    fn loads_events_from_reader() {
        let schedule = load_incidents_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(schedule.len(), 2);
        assert_eq!(
            schedule.events()[0],
            IncidentEvent::new(LaneId::new("386286298#3", 0), Tick(500), 1000)
        );
        assert_eq!(schedule.events()[1].lane, LaneId::new("gneE12", 1));
    }

    #[test]
    fn loads_events_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("incidents.csv");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(CSV.as_bytes())
            .unwrap();

        let schedule = load_incidents_csv(&path).unwrap();
        assert_eq!(schedule.len(), 2);
    }

    #[test]
    fn malformed_rows_are_parse_errors() {
        let bad = "edge,lane_index,start_tick,duration_ticks\nabc,zero,500,1000\n";
        assert!(matches!(
            load_incidents_reader(Cursor::new(bad)),
            Err(IncidentError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_incidents_csv(std::path::Path::new("/nonexistent/incidents.csv")),
            Err(IncidentError::Io(_))
        ));
    }

    #[test]
    fn loaded_schedules_are_validated() {
        let overlapping = "\
edge,lane_index,start_tick,duration_ticks
a,0,100,100
a,0,150,100
";
        assert!(matches!(
            load_incidents_reader(Cursor::new(overlapping)),
            Err(IncidentError::OverlappingIncidents { .. })
        ));
    }
}
