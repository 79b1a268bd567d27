use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown vehicle class: {value}")]
pub struct UnknownVehicleClass {
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleClass {
    Car,
    Truck,
    Van,
    Motorbike,
}

impl VehicleClass {
    /// The spot class a vehicle of this class is nominally parked in.
    ///
    /// Cars may still overflow into large spots; that is lot policy and is
    /// not reflected here.
    pub fn spot_class(self) -> SpotClass {
        match self {
            Self::Car => SpotClass::Compact,
            Self::Truck | Self::Van => SpotClass::Large,
            Self::Motorbike => SpotClass::Motorbike,
        }
    }
}

impl FromStr for VehicleClass {
    type Err = UnknownVehicleClass;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(Self::Car),
            "truck" => Ok(Self::Truck),
            "van" => Ok(Self::Van),
            "motorbike" | "motorcycle" => Ok(Self::Motorbike),
            _ => Err(UnknownVehicleClass {
                value: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Car => "Car",
            Self::Truck => "Truck",
            Self::Van => "Van",
            Self::Motorbike => "Motorbike",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpotClass {
    Compact,
    Large,
    Motorbike,
}

impl SpotClass {
    pub const ALL: [SpotClass; 3] = [Self::Compact, Self::Large, Self::Motorbike];
}

impl fmt::Display for SpotClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Compact => "Compact",
            Self::Large => "Large",
            Self::Motorbike => "Motorbike",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum TicketStatus {
    Active,
    Paid,
    // Reserved, nothing issues it yet.
    Lost,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Active => "Active",
            Self::Paid => "Paid",
            Self::Lost => "Lost",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TicketId(pub u64);

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Money in whole currency units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Charge(pub u64);

impl Charge {
    pub const ZERO: Charge = Charge(0);

    pub fn times(self, hours: u64) -> Charge {
        Charge(self.0.saturating_mul(hours))
    }
}

impl fmt::Display for Charge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub mod action {
    use super::{TicketId, VehicleClass};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Action {
        Enter {
            vehicle_class: VehicleClass,
            plate: String,
        },
        Exit {
            ticket_id: TicketId,
        },
        Status {
            ticket_id: TicketId,
        },
        Availability,
    }
}
