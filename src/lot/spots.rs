use crate::config::Capacity;
use crate::types::{SpotClass, VehicleClass};
use indexmap::IndexMap;
use std::fmt;

/// Occupied spot counters, each bounded by the configured capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spots {
    capacity: Capacity,
    compact_used: u32,
    large_used: u32,
    motorbike_used: u32,
}

impl Spots {
    pub fn new(capacity: Capacity) -> Self {
        Self {
            capacity,
            compact_used: 0,
            large_used: 0,
            motorbike_used: 0,
        }
    }

    pub fn used(&self, spot_class: SpotClass) -> u32 {
        match spot_class {
            SpotClass::Compact => self.compact_used,
            SpotClass::Large => self.large_used,
            SpotClass::Motorbike => self.motorbike_used,
        }
    }

    pub fn max(&self, spot_class: SpotClass) -> u32 {
        match spot_class {
            SpotClass::Compact => self.capacity.compact,
            SpotClass::Large => self.capacity.large,
            SpotClass::Motorbike => self.capacity.motorbike,
        }
    }

    /// Whether another vehicle of this class would fit.
    ///
    /// Cars can spill over into large spots, so they only run out once compact
    /// and large are both exhausted.
    pub fn has_room_for(&self, vehicle_class: VehicleClass) -> bool {
        match vehicle_class {
            VehicleClass::Truck | VehicleClass::Van => self.large_used < self.capacity.large,
            VehicleClass::Motorbike => self.motorbike_used < self.capacity.motorbike,
            VehicleClass::Car => {
                let used = u64::from(self.compact_used) + u64::from(self.large_used);
                used < u64::from(self.capacity.compact) + u64::from(self.capacity.large)
            }
        }
    }

    /// Take a spot, returning the class actually consumed.
    ///
    /// Callers must check `has_room_for` first.
    pub fn occupy(&mut self, vehicle_class: VehicleClass) -> SpotClass {
        match vehicle_class {
            VehicleClass::Truck | VehicleClass::Van => {
                self.large_used += 1;
                SpotClass::Large
            }
            VehicleClass::Motorbike => {
                self.motorbike_used += 1;
                SpotClass::Motorbike
            }
            VehicleClass::Car if self.compact_used < self.capacity.compact => {
                self.compact_used += 1;
                SpotClass::Compact
            }
            VehicleClass::Car => {
                self.large_used += 1;
                SpotClass::Large
            }
        }
    }

    /// Give back a spot, returning the class released.
    ///
    /// Cars drain compact before large, mirroring the fill order of `occupy`.
    /// Every active car is counted in compact or large, so whichever one is
    /// decremented is non-zero.
    pub fn release(&mut self, vehicle_class: VehicleClass) -> SpotClass {
        match vehicle_class {
            VehicleClass::Truck | VehicleClass::Van => {
                self.large_used -= 1;
                SpotClass::Large
            }
            VehicleClass::Motorbike => {
                self.motorbike_used -= 1;
                SpotClass::Motorbike
            }
            VehicleClass::Car if self.compact_used > 0 => {
                self.compact_used -= 1;
                SpotClass::Compact
            }
            VehicleClass::Car => {
                self.large_used -= 1;
                SpotClass::Large
            }
        }
    }

    pub fn availability(&self) -> Availability {
        let free = SpotClass::ALL
            .into_iter()
            .map(|spot_class| {
                let free = self.max(spot_class).saturating_sub(self.used(spot_class));
                (spot_class, free)
            })
            .collect();
        Availability { free }
    }
}

/// Free spots per class, in Compact, Large, Motorbike order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    free: IndexMap<SpotClass, u32>,
}

impl Availability {
    pub fn free(&self, spot_class: SpotClass) -> u32 {
        self.free.get(&spot_class).copied().unwrap_or(0)
    }

    pub fn is_full(&self, spot_class: SpotClass) -> bool {
        self.free(spot_class) == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpotClass, u32)> + '_ {
        self.free.iter().map(|(spot_class, free)| (*spot_class, *free))
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (spot_class, free)) in self.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            if free > 0 {
                write!(f, "Free {spot_class}: {free}")?;
            } else {
                write!(f, "{spot_class} is Full.")?;
            }
        }
        Ok(())
    }
}
