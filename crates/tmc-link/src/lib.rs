//! `tmc-link` — the session between the controller and the external
//! simulation engine.
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`config`]   | `EngineConfig` (launch options, env resolution)        |
//! | [`protocol`] | Wire request/response types, `RESTORE_SPEED` sentinel  |
//! | [`link`]     | The `EngineLink` trait seam                            |
//! | [`session`]  | `EngineSession` — child process + blocking TCP         |
//! | [`error`]    | `LinkError`, `LinkResult<T>`                           |
//!
//! # Design
//!
//! Everything above this crate talks to the engine through the [`EngineLink`]
//! trait, so the incident controller and the step scheduler can be driven by
//! a scripted in-memory link in tests.  [`EngineSession`] is the production
//! implementation: it launches (or attaches to) the engine process and issues
//! blocking line-delimited JSON round-trips over a localhost socket.  There
//! is deliberately no async runtime — the control loop is specified as
//! single-threaded and synchronous, and every engine call is one round-trip.

pub mod config;
pub mod error;
pub mod link;
pub mod protocol;
pub mod session;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{EngineConfig, ENGINE_HOME_VAR};
pub use error::{LinkError, LinkResult};
pub use link::EngineLink;
pub use protocol::RESTORE_SPEED;
pub use session::EngineSession;
