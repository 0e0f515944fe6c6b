//! The `IncidentEvent` value object.

use std::fmt;

use tmc_core::{LaneId, Tick};

/// One scheduled, time-bounded capacity restriction on one lane.
///
/// Immutable once scheduled.  The activation runs at `start`; the clearance
/// runs at [`end`][IncidentEvent::end].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncidentEvent {
    /// The lane taken out of service.
    pub lane: LaneId,

    /// Tick at which the blockage is applied.
    pub start: Tick,

    /// How many ticks the blockage holds.
    pub duration_ticks: u64,
}

impl IncidentEvent {
    pub fn new(lane: LaneId, start: Tick, duration_ticks: u64) -> Self {
        Self { lane, start, duration_ticks }
    }

    /// Tick at which the blockage is cleared.
    #[inline]
    pub fn end(&self) -> Tick {
        self.start + self.duration_ticks
    }
}

impl fmt::Display for IncidentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "incident on lane {} ({}..{})",
            self.lane,
            self.start,
            self.end()
        )
    }
}
