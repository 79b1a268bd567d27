use crate::clock::{Clock, SystemClock};
use crate::config::{Config, Rates};
use crate::types::{action, Charge, TicketId, VehicleClass};
use log::debug;
use std::collections::HashMap;

pub mod error;
pub mod spots;
pub mod vehicle;

use error::Error;
use spots::{Availability, Spots};
use vehicle::{VehicleRecord, VehicleSnapshot};

/// What a vehicle owes on the way out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    pub plate: String,
    pub charge: Charge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ticketed(TicketId),
    Exited(Exit),
    Status(VehicleSnapshot),
    Availability(Availability),
}

/// The lot manager. Owns the spot counters and every vehicle record, active
/// or historical; nothing else mutates them.
///
/// A ticket id lives in exactly one of `active` and `history` once issued.
#[derive(Debug)]
pub struct Lot<C = SystemClock> {
    rates: Rates,
    spots: Spots,
    active: HashMap<TicketId, VehicleRecord>,
    history: indexmap::IndexMap<TicketId, VehicleRecord>,
    last_ticket: u64,
    clock: C,
}

impl Lot<SystemClock> {
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Lot<C> {
    pub fn with_clock(config: Config, clock: C) -> Self {
        let Config { capacity, rates } = config;
        Self {
            rates,
            spots: Spots::new(capacity),
            active: HashMap::new(),
            history: indexmap::IndexMap::new(),
            last_ticket: 0,
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn spots(&self) -> &Spots {
        &self.spots
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Paid records, in the order they left.
    pub fn history(&self) -> impl Iterator<Item = &VehicleRecord> {
        self.history.values()
    }

    pub fn into_history(self) -> indexmap::IndexMap<TicketId, VehicleRecord> {
        self.history
    }

    pub fn apply(&mut self, action: action::Action) -> Result<Outcome, Error> {
        match action {
            action::Action::Enter {
                vehicle_class,
                plate,
            } => self
                .request_entry(vehicle_class, plate)
                .map(Outcome::Ticketed),
            action::Action::Exit { ticket_id } => self.request_exit(ticket_id).map(Outcome::Exited),
            action::Action::Status { ticket_id } => {
                self.query_vehicle_status(ticket_id).map(Outcome::Status)
            }
            action::Action::Availability => Ok(Outcome::Availability(self.query_availability())),
        }
    }

    /// Park a vehicle and hand back its ticket.
    pub fn request_entry(
        &mut self,
        vehicle_class: VehicleClass,
        plate: impl Into<String>,
    ) -> Result<TicketId, Error> {
        // Nothing may change before this check passes.
        if !self.spots.has_room_for(vehicle_class) {
            return Err(Error::CapacityExceeded { vehicle_class });
        }

        let mut record = VehicleRecord::new(vehicle_class, plate.into(), self.clock.now());
        let ticket_id = self.issue_ticket();
        record.assign_ticket(ticket_id);
        let spot_class = self.spots.occupy(vehicle_class);
        debug!(
            "Ticket {ticket_id}: {vehicle_class} {:?} parked in {spot_class}",
            record.plate()
        );
        self.active.insert(ticket_id, record);
        Ok(ticket_id)
    }

    /// Redeem a ticket: free the spot, bill the stay, and file the record.
    pub fn request_exit(&mut self, ticket_id: TicketId) -> Result<Exit, Error> {
        let mut record = self
            .active
            .remove(&ticket_id)
            .ok_or(Error::InvalidTicket { ticket_id })?;
        let spot_class = self.spots.release(record.vehicle_class());

        let now = self.clock.now();
        let charge = record.compute_charge(self.rates.for_class(record.vehicle_class()), now);
        record.checkout(now, charge);
        debug!("Ticket {ticket_id}: released {spot_class}, charged {charge}");

        let exit = Exit {
            plate: record.plate().to_owned(),
            charge,
        };
        self.history.insert(ticket_id, record);
        Ok(exit)
    }

    /// Look up a finished stay. Vehicles still parked are not reported.
    pub fn query_vehicle_status(&self, ticket_id: TicketId) -> Result<VehicleSnapshot, Error> {
        self.history
            .get(&ticket_id)
            .map(VehicleRecord::snapshot)
            .ok_or(Error::InvalidTicket { ticket_id })
    }

    pub fn query_availability(&self) -> Availability {
        self.spots.availability()
    }

    // Counter-based, so ids never repeat for the life of the lot.
    fn issue_ticket(&mut self) -> TicketId {
        self.last_ticket += 1;
        TicketId(self.last_ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Capacity;
    use crate::types::{SpotClass, TicketStatus};
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn lot(compact: u32, large: u32, motorbike: u32) -> (Lot<ManualClock>, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
        let config = Config {
            capacity: Capacity {
                compact,
                large,
                motorbike,
            },
            ..Config::default()
        };
        (Lot::with_clock(config, clock.clone()), clock)
    }

    fn used(lot: &Lot<ManualClock>) -> (u32, u32, u32) {
        let spots = lot.spots();
        (
            spots.used(SpotClass::Compact),
            spots.used(SpotClass::Large),
            spots.used(SpotClass::Motorbike),
        )
    }

    #[test]
    fn entries_within_capacity_always_succeed() {
        let (mut lot, _) = lot(3, 2, 4);
        for index in 0..4 {
            lot.request_entry(VehicleClass::Motorbike, format!("M{index}"))
                .unwrap();
        }
        lot.request_entry(VehicleClass::Truck, "T1").unwrap();
        lot.request_entry(VehicleClass::Van, "V1").unwrap();
        for index in 0..3 {
            lot.request_entry(VehicleClass::Car, format!("C{index}"))
                .unwrap();
        }
        assert_eq!(used(&lot), (3, 2, 4));
        assert_eq!(lot.active_count(), 9);
    }

    #[test]
    fn ticket_ids_are_unique() {
        let (mut lot, _) = lot(5, 0, 0);
        let first = lot.request_entry(VehicleClass::Car, "A").unwrap();
        let second = lot.request_entry(VehicleClass::Car, "B").unwrap();
        lot.request_exit(first).unwrap();
        let third = lot.request_entry(VehicleClass::Car, "C").unwrap();
        assert_ne!(first, second);
        assert_ne!(first, third);
        assert_ne!(second, third);
    }

    #[test]
    fn rejected_entry_changes_nothing() {
        let (mut lot, _) = lot(0, 1, 0);
        lot.request_entry(VehicleClass::Truck, "T1").unwrap();
        assert_eq!(
            lot.request_entry(VehicleClass::Van, "V1"),
            Err(Error::CapacityExceeded {
                vehicle_class: VehicleClass::Van
            })
        );
        assert_eq!(
            lot.request_entry(VehicleClass::Motorbike, "M1"),
            Err(Error::CapacityExceeded {
                vehicle_class: VehicleClass::Motorbike
            })
        );
        assert_eq!(used(&lot), (0, 1, 0));
        assert_eq!(lot.active_count(), 1);
    }

    #[test]
    fn car_overflow_scenario() {
        let (mut lot, _) = lot(1, 1, 0);
        let a = lot.request_entry(VehicleClass::Car, "A").unwrap();
        assert_eq!(used(&lot), (1, 0, 0));
        lot.request_entry(VehicleClass::Car, "B").unwrap();
        assert_eq!(used(&lot), (1, 1, 0));
        assert_eq!(
            lot.request_entry(VehicleClass::Car, "C"),
            Err(Error::CapacityExceeded {
                vehicle_class: VehicleClass::Car
            })
        );

        lot.request_exit(a).unwrap();
        assert_eq!(used(&lot), (0, 1, 0));
        lot.request_entry(VehicleClass::Car, "C").unwrap();
        assert_eq!(used(&lot), (1, 1, 0));
    }

    #[test]
    fn overflowed_car_exit_drains_compact_first() {
        let (mut lot, _) = lot(1, 1, 0);
        lot.request_entry(VehicleClass::Car, "A").unwrap();
        let b = lot.request_entry(VehicleClass::Car, "B").unwrap();
        // B physically sits in the large spot, but compact is released.
        lot.request_exit(b).unwrap();
        assert_eq!(used(&lot), (0, 1, 0));
    }

    #[test]
    fn exit_only_succeeds_once() {
        let (mut lot, clock) = lot(2, 0, 0);
        let ticket_id = lot.request_entry(VehicleClass::Car, "AB12 CDE").unwrap();
        lot.request_entry(VehicleClass::Car, "XY34 ZZZ").unwrap();
        clock.advance(Duration::minutes(45));

        assert_eq!(
            lot.request_exit(ticket_id),
            Ok(Exit {
                plate: "AB12 CDE".to_owned(),
                charge: Charge(3),
            })
        );
        assert_eq!(used(&lot), (1, 0, 0));
        assert_eq!(
            lot.request_exit(ticket_id),
            Err(Error::InvalidTicket { ticket_id })
        );
        assert_eq!(used(&lot), (1, 0, 0));
        assert_eq!(
            lot.request_exit(TicketId(999)),
            Err(Error::InvalidTicket {
                ticket_id: TicketId(999)
            })
        );
    }

    #[test]
    fn truck_is_billed_by_tier_then_multiplied() {
        let (mut lot, clock) = lot(0, 2, 0);
        let short = lot.request_entry(VehicleClass::Truck, "T1").unwrap();
        let long = lot.request_entry(VehicleClass::Truck, "T2").unwrap();

        clock.advance(Duration::hours(3));
        assert_eq!(lot.request_exit(short).unwrap().charge, Charge(12));
        clock.advance(Duration::hours(2));
        assert_eq!(lot.request_exit(long).unwrap().charge, Charge(60));
    }

    #[test]
    fn instant_exit_is_free() {
        let (mut lot, _) = lot(0, 0, 1);
        let ticket_id = lot.request_entry(VehicleClass::Motorbike, "M1").unwrap();
        assert_eq!(lot.request_exit(ticket_id).unwrap().charge, Charge::ZERO);
    }

    #[test]
    fn status_only_reports_exited_vehicles() {
        let (mut lot, clock) = lot(0, 1, 0);
        let entered_at = clock.now();
        let ticket_id = lot.request_entry(VehicleClass::Van, "VAN 1").unwrap();
        assert_eq!(
            lot.query_vehicle_status(ticket_id),
            Err(Error::InvalidTicket { ticket_id })
        );

        clock.advance(Duration::minutes(90));
        lot.request_exit(ticket_id).unwrap();
        assert_eq!(
            lot.query_vehicle_status(ticket_id),
            Ok(VehicleSnapshot {
                plate: "VAN 1".to_owned(),
                vehicle_class: VehicleClass::Van,
                spot_class: SpotClass::Large,
                ticket_id: Some(ticket_id),
                entered_at,
                exited_at: Some(entered_at + Duration::minutes(90)),
                charge: Charge(7),
                status: TicketStatus::Paid,
            })
        );
    }

    #[test]
    fn history_keeps_exit_order() {
        let (mut lot, _) = lot(3, 0, 0);
        let first = lot.request_entry(VehicleClass::Car, "first").unwrap();
        let second = lot.request_entry(VehicleClass::Car, "second").unwrap();
        lot.request_exit(second).unwrap();
        lot.request_exit(first).unwrap();
        let plates: Vec<&str> = lot.history().map(VehicleRecord::plate).collect();
        assert_eq!(plates, vec!["second", "first"]);
        assert_eq!(lot.active_count(), 0);
    }

    #[test]
    fn apply_dispatches_actions() {
        let (mut lot, _) = lot(1, 0, 0);
        let outcome = lot
            .apply(action::Action::Enter {
                vehicle_class: VehicleClass::Car,
                plate: "A".to_owned(),
            })
            .unwrap();
        assert_eq!(outcome, Outcome::Ticketed(TicketId(1)));

        match lot.apply(action::Action::Availability).unwrap() {
            Outcome::Availability(availability) => {
                assert!(availability.is_full(SpotClass::Compact))
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        assert_eq!(
            lot.apply(action::Action::Status {
                ticket_id: TicketId(1)
            }),
            Err(Error::InvalidTicket {
                ticket_id: TicketId(1)
            })
        );
        assert!(matches!(
            lot.apply(action::Action::Exit {
                ticket_id: TicketId(1)
            }),
            Ok(Outcome::Exited(_))
        ));
    }
}
