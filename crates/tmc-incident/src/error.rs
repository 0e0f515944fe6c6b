use thiserror::Error;

use tmc_core::{LaneId, Tick};

#[derive(Debug, Error)]
pub enum IncidentError {
    #[error("incident schedule parse error: {0}")]
    Parse(String),

    #[error("incident on lane {lane} at {start} has zero duration")]
    ZeroDuration { lane: LaneId, start: Tick },

    #[error("incidents on lane {lane} overlap; a lane holds at most one incident at a time")]
    OverlappingIncidents { lane: LaneId },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type IncidentResult<T> = Result<T, IncidentError>;
