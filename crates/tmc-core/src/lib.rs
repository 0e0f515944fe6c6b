//! `tmc-core` — foundational types for the `rust_tmc` traffic management
//! controller.
//!
//! This crate is a dependency of every other `tmc-*` crate.  It intentionally
//! has no `tmc-*` dependencies and no external ones.
//!
//! # What lives here
//!
//! | Module     | Contents                                          |
//! |------------|---------------------------------------------------|
//! | [`lane`]   | `EdgeId`, `LaneId`, `VehicleId`, `RouteId`        |
//! | [`time`]   | `Tick`                                            |
//! | [`vclass`] | `VehicleClass` enum                               |

pub mod lane;
pub mod time;
pub mod vclass;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use lane::{EdgeId, LaneId, RouteId, VehicleId};
pub use time::Tick;
pub use vclass::VehicleClass;
