//! `IncidentSchedule` — a validated set of incidents with per-tick queues.
//!
//! # Why this exists
//!
//! The step loop must not scan every event every tick.  The schedule indexes
//! events by their activation and clearance ticks up front, so the per-tick
//! check is two map lookups that come back empty on almost every tick.
//!
//! # Validation
//!
//! Construction rejects zero-duration events and same-lane events whose
//! occupancy windows intersect.  The occupancy window is `[start, end]`
//! *inclusive* of the end tick: the clearance for an event runs at `end`
//! after that tick's activations, so a second event starting exactly at
//! another's end tick would find the lane still closed.  Rejecting these up
//! front is what makes "at most one incident holds a lane" a static
//! guarantee rather than a runtime surprise.

use std::collections::BTreeMap;

use tmc_core::Tick;

use crate::{IncidentError, IncidentEvent, IncidentResult};

/// All incidents of one run, indexed by activation and clearance tick.
pub struct IncidentSchedule {
    events:      Vec<IncidentEvent>,
    /// Tick → indexes into `events` whose activation is due.
    activations: BTreeMap<Tick, Vec<usize>>,
    /// Tick → indexes into `events` whose clearance is due.
    clearances:  BTreeMap<Tick, Vec<usize>>,
}

impl IncidentSchedule {
    /// Validate `events` and build the per-tick queues.
    pub fn new(events: Vec<IncidentEvent>) -> IncidentResult<Self> {
        for event in &events {
            if event.duration_ticks == 0 {
                return Err(IncidentError::ZeroDuration {
                    lane:  event.lane.clone(),
                    start: event.start,
                });
            }
        }
        for (i, a) in events.iter().enumerate() {
            for b in &events[i + 1..] {
                if a.lane == b.lane && a.start <= b.end() && b.start <= a.end() {
                    return Err(IncidentError::OverlappingIncidents { lane: a.lane.clone() });
                }
            }
        }

        let mut activations: BTreeMap<Tick, Vec<usize>> = BTreeMap::new();
        let mut clearances:  BTreeMap<Tick, Vec<usize>> = BTreeMap::new();
        for (i, event) in events.iter().enumerate() {
            activations.entry(event.start).or_default().push(i);
            clearances.entry(event.end()).or_default().push(i);
        }

        Ok(Self { events, activations, clearances })
    }

    /// Schedule holding exactly one incident.
    pub fn single(event: IncidentEvent) -> IncidentResult<Self> {
        Self::new(vec![event])
    }

    /// Schedule with no incidents; the run degenerates to a plain advance
    /// loop.
    pub fn empty() -> Self {
        Self {
            events:      Vec::new(),
            activations: BTreeMap::new(),
            clearances:  BTreeMap::new(),
        }
    }

    pub fn events(&self) -> &[IncidentEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events whose activation is due at exactly `tick`.
    pub fn activating_at(&self, tick: Tick) -> impl Iterator<Item = &IncidentEvent> {
        self.activations
            .get(&tick)
            .into_iter()
            .flatten()
            .map(|&i| &self.events[i])
    }

    /// Events whose clearance is due at exactly `tick`.
    pub fn clearing_at(&self, tick: Tick) -> impl Iterator<Item = &IncidentEvent> {
        self.clearances
            .get(&tick)
            .into_iter()
            .flatten()
            .map(|&i| &self.events[i])
    }

    /// The latest clearance tick across all events, or `None` when empty.
    pub fn last_clearance(&self) -> Option<Tick> {
        self.clearances.keys().next_back().copied()
    }
}
