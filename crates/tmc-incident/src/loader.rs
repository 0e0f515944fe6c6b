//! CSV incident loader.
//!
//! # CSV format
//!
//! One row per scheduled incident:
//!
//! ```csv
//! edge,lane_index,start_tick,duration_ticks
//! 386286298#3,0,500,1000
//! gneE12,1,2500,600
//! ```
//!
//! Rows are validated as a whole by [`IncidentSchedule::new`] after parsing,
//! so a file with overlapping same-lane incidents fails loudly at load time.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use tmc_core::{LaneId, Tick};

use crate::{IncidentError, IncidentEvent, IncidentResult, IncidentSchedule};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct IncidentRecord {
    edge:           String,
    lane_index:     u32,
    start_tick:     u64,
    duration_ticks: u64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a validated [`IncidentSchedule`] from a CSV file.
pub fn load_incidents_csv(path: &Path) -> IncidentResult<IncidentSchedule> {
    let file = std::fs::File::open(path).map_err(IncidentError::Io)?;
    load_incidents_reader(file)
}

/// Like [`load_incidents_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`).
pub fn load_incidents_reader<R: Read>(reader: R) -> IncidentResult<IncidentSchedule> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut events = Vec::new();

    for result in csv_reader.deserialize::<IncidentRecord>() {
        let row = result.map_err(|e| IncidentError::Parse(e.to_string()))?;
        events.push(IncidentEvent::new(
            LaneId::new(row.edge, row.lane_index),
            Tick(row.start_tick),
            row.duration_ticks,
        ));
    }

    IncidentSchedule::new(events)
}
