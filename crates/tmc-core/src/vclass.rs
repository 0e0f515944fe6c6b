//! Vehicle class enum shared by the link and the incident controller.
//!
//! The variants mirror the classes the engine recognizes in lane permission
//! masks.  Only `Passenger` is manipulated by the incident logic today; the
//! remaining classes exist so a lane closure can express "everything except
//! the class under study".

/// An engine vehicle class, as used in lane allowed-class sets.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[non_exhaustive]
pub enum VehicleClass {
    /// Private passenger car — the class under study.
    Passenger,
    Bus,
    Truck,
    Delivery,
    Emergency,
    Bicycle,
}

impl VehicleClass {
    /// Every class the engine recognizes, in wire order.
    pub const ALL: &'static [VehicleClass] = &[
        VehicleClass::Passenger,
        VehicleClass::Bus,
        VehicleClass::Truck,
        VehicleClass::Delivery,
        VehicleClass::Emergency,
        VehicleClass::Bicycle,
    ];

    /// The engine-defined default allowed set for scenario lanes.
    ///
    /// This is an engine constant, not captured state: restoring a lane means
    /// writing this set, never a remembered prior value.
    pub const fn default_allowed() -> &'static [VehicleClass] {
        &[VehicleClass::Passenger]
    }

    /// All classes except `excluded` — the permission mask of a lane that is
    /// closed to one class but open to the rest.
    pub fn all_except(excluded: VehicleClass) -> Vec<VehicleClass> {
        Self::ALL.iter().copied().filter(|c| *c != excluded).collect()
    }

    /// Wire label, as the engine spells it in allowed-class lists.
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleClass::Passenger => "passenger",
            VehicleClass::Bus       => "bus",
            VehicleClass::Truck     => "truck",
            VehicleClass::Delivery  => "delivery",
            VehicleClass::Emergency => "emergency",
            VehicleClass::Bicycle   => "bicycle",
        }
    }
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
