use crate::rate::{self, RateSchedule};
use crate::types::{Charge, VehicleClass};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid {vehicle_class} rate schedule in config {path:?}: {source}")]
    InvalidSchedule {
        path: PathBuf,
        vehicle_class: VehicleClass,
        source: rate::Error,
    },
}

/// Maximum number of spots of each class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Capacity {
    pub compact: u32,
    pub large: u32,
    pub motorbike: u32,
}

/// One rate schedule per vehicle class.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rates {
    pub car: RateSchedule,
    pub truck: RateSchedule,
    pub van: RateSchedule,
    pub motorbike: RateSchedule,
}

impl Rates {
    pub fn for_class(&self, vehicle_class: VehicleClass) -> &RateSchedule {
        match vehicle_class {
            VehicleClass::Car => &self.car,
            VehicleClass::Truck => &self.truck,
            VehicleClass::Van => &self.van,
            VehicleClass::Motorbike => &self.motorbike,
        }
    }
}

/// Lot configuration, read once at startup.
///
/// ```json
/// {
///   "capacity": { "compact": 10, "large": 5, "motorbike": 5 },
///   "rates": {
///     "car": { "1": 3, "2": 5, "3": 7 },
///     "truck": { "1": 5, "2": 9, "3": 12 },
///     "van": { "1": 4, "2": 7, "3": 10 },
///     "motorbike": { "1": 1, "2": 2, "3": 3 }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub capacity: Capacity,
    pub rates: Rates,
}

impl Config {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(BufReader::new(file), path)
    }

    fn parse(reader: impl Read, path: &Path) -> Result<Self, Error> {
        let file: ConfigFile = serde_json::from_reader(reader).map_err(|source| Error::Parse {
            path: path.to_owned(),
            source,
        })?;
        file.validate(path)
    }
}

// The config as written on disk; schedules are checked after parsing so a bad
// one can be reported against its vehicle class.
#[derive(Deserialize)]
struct ConfigFile {
    capacity: Capacity,
    rates: RatesFile,
}

#[derive(Deserialize)]
struct RatesFile {
    car: BTreeMap<u64, Charge>,
    truck: BTreeMap<u64, Charge>,
    van: BTreeMap<u64, Charge>,
    motorbike: BTreeMap<u64, Charge>,
}

impl ConfigFile {
    fn validate(self, path: &Path) -> Result<Config, Error> {
        let check = |vehicle_class: VehicleClass, tiers: BTreeMap<u64, Charge>| {
            RateSchedule::try_from(tiers).map_err(|source| Error::InvalidSchedule {
                path: path.to_owned(),
                vehicle_class,
                source,
            })
        };
        let RatesFile {
            car,
            truck,
            van,
            motorbike,
        } = self.rates;
        Ok(Config {
            capacity: self.capacity,
            rates: Rates {
                car: check(VehicleClass::Car, car)?,
                truck: check(VehicleClass::Truck, truck)?,
                van: check(VehicleClass::Van, van)?,
                motorbike: check(VehicleClass::Motorbike, motorbike)?,
            },
        })
    }
}

// Built-in tiers are known to be valid, so this can't fail.
fn schedule(tiers: [u64; 3]) -> RateSchedule {
    RateSchedule::new((1..).zip(tiers.map(Charge)))
        .unwrap_or_else(|error| unreachable!("built-in rate schedule: {error}"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: Capacity {
                compact: 10,
                large: 5,
                motorbike: 5,
            },
            rates: Rates {
                car: schedule([3, 5, 7]),
                truck: schedule([5, 9, 12]),
                van: schedule([4, 7, 10]),
                motorbike: schedule([1, 2, 3]),
            },
        }
    }
}
