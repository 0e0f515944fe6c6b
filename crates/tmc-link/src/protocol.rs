//! Wire types for the engine control protocol.
//!
//! The transport is line-delimited JSON over a localhost TCP socket: one
//! request object per line, answered by exactly one response object.  The
//! session never pipelines — a request is written, then its response is read
//! before anything else happens.
//!
//! ```text
//! → {"id":7,"cmd":"set-lane-speed","lane":"386286298#3_0","speed":0.0}
//! ← {"id":7,"ok":true}
//! → {"id":8,"cmd":"get-agent-route","agent":"veh_12"}
//! ← {"id":8,"ok":true,"data":"route_3"}
//! → {"id":9,"cmd":"request-reroute","agent":"veh_99"}
//! ← {"id":9,"ok":false,"error":"vehicle is on an internal edge"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Speed value that restores a lane's scenario-configured maximum.
///
/// The engine treats negative speeds as "revert to default"; the default is
/// an engine-side constant, never a value captured by this controller.
pub const RESTORE_SPEED: f64 = -1.0;

// ── Requests ──────────────────────────────────────────────────────────────────

/// One command envelope, tagged with a session-local sequence id so a
/// response can be matched to the request that produced it.
#[derive(Serialize, Debug)]
pub struct Request {
    pub id: u64,
    #[serde(flatten)]
    pub command: Command,
}

/// Every command the controller issues.
///
/// Serialized with an internal `cmd` tag; the tag values are the engine's
/// command names.
#[derive(Serialize, Debug)]
#[serde(tag = "cmd", rename_all = "kebab-case")]
pub enum Command {
    Advance,
    GetLaneList,
    SetLaneSpeed { lane: String, speed: f64 },
    SetLaneAllowedClasses { lane: String, classes: Vec<&'static str> },
    GetAgentList,
    GetAgentRoute { agent: String },
    RequestReroute { agent: String },
}

impl Command {
    /// The wire name, for error reporting.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Advance                   => "advance",
            Command::GetLaneList               => "get-lane-list",
            Command::SetLaneSpeed { .. }       => "set-lane-speed",
            Command::SetLaneAllowedClasses { .. } => "set-lane-allowed-classes",
            Command::GetAgentList              => "get-agent-list",
            Command::GetAgentRoute { .. }      => "get-agent-route",
            Command::RequestReroute { .. }     => "request-reroute",
        }
    }
}

// ── Responses ─────────────────────────────────────────────────────────────────

/// The engine's answer to one [`Request`].
///
/// `ok == false` carries an engine-side exception in `error`; `data` is the
/// command-specific result payload (absent for pure mutations).
#[derive(Deserialize, Debug)]
pub struct Response {
    pub id: u64,
    pub ok: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub error: Option<String>,
}
