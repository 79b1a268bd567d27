use crate::types::Charge;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

const MILLIS_PER_HOUR: u64 = 60 * 60 * 1000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("rate schedule has no tiers")]
    Empty,
    #[error("rate tier must start at hour 1 or later, found hour {hours}")]
    ZeroHourTier { hours: u64 },
}

/// Anything that can price a parking session by its billable hours.
pub trait Tariff {
    fn charge_for(&self, elapsed_hours: u64) -> Charge;
}

/// Cumulative charges keyed by whole elapsed hours.
///
/// A stay that lands exactly on a tier pays that tier. Any other stay pays the
/// last tier's charge once per elapsed hour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<u64, Charge>")]
pub struct RateSchedule {
    tiers: BTreeMap<u64, Charge>,
}

impl RateSchedule {
    pub fn new(tiers: impl IntoIterator<Item = (u64, Charge)>) -> Result<Self, Error> {
        Self::try_from(tiers.into_iter().collect::<BTreeMap<_, _>>())
    }

    fn last_tier(&self) -> Charge {
        self.tiers
            .iter()
            .next_back()
            .map(|(_, charge)| *charge)
            .unwrap_or(Charge::ZERO)
    }
}

impl TryFrom<BTreeMap<u64, Charge>> for RateSchedule {
    type Error = Error;

    fn try_from(tiers: BTreeMap<u64, Charge>) -> Result<Self, Error> {
        match tiers.keys().next() {
            None => Err(Error::Empty),
            Some(0) => Err(Error::ZeroHourTier { hours: 0 }),
            Some(_) => Ok(Self { tiers }),
        }
    }
}

impl Tariff for RateSchedule {
    fn charge_for(&self, elapsed_hours: u64) -> Charge {
        match self.tiers.get(&elapsed_hours) {
            Some(charge) => *charge,
            None => self.last_tier().times(elapsed_hours),
        }
    }
}

/// Whole hours between entry and `now`, rounded up.
///
/// Any positive fraction of an hour counts as a full hour. No elapsed time at
/// all (or a clock that went backwards) is zero hours.
pub fn elapsed_hours(entry: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (now - entry).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis as u64 + MILLIS_PER_HOUR - 1) / MILLIS_PER_HOUR
}
