//! The `EngineLink` trait — the seam between the control logic and the
//! engine session.

use tmc_core::{LaneId, RouteId, VehicleClass, VehicleId};

use crate::LinkResult;

/// Blocking operations against one live engine session.
///
/// [`EngineSession`][crate::EngineSession] is the production implementation;
/// tests drive the incident controller and the step scheduler with scripted
/// in-memory implementations.
///
/// # Contract
///
/// - `advance` computes exactly one discrete simulation step per call and
///   must be called strictly in order — steps are never skipped or batched.
/// - Queries and mutations are synchronous round-trips; an `Err` from one
///   call leaves the session usable for the next unless the error was I/O.
/// - `close` is best-effort, idempotent teardown and must be safe to call
///   after any prior failure.
pub trait EngineLink {
    /// Compute one simulation step.
    fn advance(&mut self) -> LinkResult<()>;

    /// Whether `lane` exists in the loaded scenario network.
    fn lane_exists(&mut self, lane: &LaneId) -> LinkResult<bool>;

    /// Ids of all vehicles currently in the simulation.
    fn list_vehicles(&mut self) -> LinkResult<Vec<VehicleId>>;

    /// The route currently assigned to `vehicle` (empty = unassigned).
    fn vehicle_route(&mut self, vehicle: &VehicleId) -> LinkResult<RouteId>;

    /// Set a lane's maximum speed.  [`RESTORE_SPEED`][crate::RESTORE_SPEED]
    /// restores the scenario default.
    fn set_lane_speed(&mut self, lane: &LaneId, speed: f64) -> LinkResult<()>;

    /// Replace a lane's allowed-class set.
    fn set_lane_allowed(&mut self, lane: &LaneId, classes: &[VehicleClass]) -> LinkResult<()>;

    /// Ask the engine to recompute `vehicle`'s route under current network
    /// conditions.
    fn request_reroute(&mut self, vehicle: &VehicleId) -> LinkResult<()>;

    /// Tear the session down.  Idempotent; never fails.
    fn close(&mut self);
}
