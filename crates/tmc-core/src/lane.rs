//! Strongly typed wrappers around engine-owned string identifiers.
//!
//! Unlike an in-process simulation, where ids are indexes into our own
//! arrays, every identifier here is minted by the external engine and is an
//! opaque string from our side.  The wrappers exist so a vehicle id can never
//! be passed where a road segment id is expected, and so the wire rendering
//! of a lane key lives in exactly one place.

use std::fmt;

/// Generate a typed wrapper around an engine-owned string identifier.
macro_rules! string_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        $vis struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw engine-side identifier.
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id! {
    /// A directed road segment as named by the scenario network
    /// (e.g. `"386286298#3"` for the fourth piece of a split OSM way).
    pub struct EdgeId;
}

string_id! {
    /// A simulated vehicle.
    pub struct VehicleId;
}

string_id! {
    /// A vehicle's assigned route.  The engine uses the empty string for
    /// vehicles that have no route assignment.
    pub struct RouteId;
}

impl RouteId {
    /// `true` when the vehicle actually has a route to re-plan.
    #[inline]
    pub fn is_assigned(&self) -> bool {
        !self.0.is_empty()
    }
}

// ── LaneId ────────────────────────────────────────────────────────────────────

/// A single lane on a road segment: the composite key (edge, lane index).
///
/// The engine's native identifier form is `"{edge}_{index}"`; [`fmt::Display`]
/// produces exactly that, and is the only place the rendering is defined.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct LaneId {
    pub edge:  EdgeId,
    pub index: u32,
}

impl LaneId {
    pub fn new(edge: impl Into<EdgeId>, index: u32) -> Self {
        Self { edge: edge.into(), index }
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.edge, self.index)
    }
}
