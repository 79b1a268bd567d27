use crate::rate::{elapsed_hours, Tariff};
use crate::types::{Charge, SpotClass, TicketId, TicketStatus, VehicleClass};
use chrono::{DateTime, Utc};

/// One parking session, from entry until it is paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleRecord {
    plate: String,
    vehicle_class: VehicleClass,
    spot_class: SpotClass,
    ticket_id: Option<TicketId>,
    entered_at: DateTime<Utc>,
    exited_at: Option<DateTime<Utc>>,
    charge: Charge,
    status: TicketStatus,
}

impl VehicleRecord {
    pub fn new(vehicle_class: VehicleClass, plate: String, entered_at: DateTime<Utc>) -> Self {
        Self {
            plate,
            vehicle_class,
            spot_class: vehicle_class.spot_class(),
            ticket_id: None,
            entered_at,
            exited_at: None,
            charge: Charge::ZERO,
            status: TicketStatus::Active,
        }
    }

    pub fn assign_ticket(&mut self, ticket_id: TicketId) {
        self.ticket_id = Some(ticket_id);
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn vehicle_class(&self) -> VehicleClass {
        self.vehicle_class
    }

    /// What this stay would cost if the vehicle left at `now`.
    pub fn compute_charge(&self, tariff: &impl Tariff, now: DateTime<Utc>) -> Charge {
        tariff.charge_for(elapsed_hours(self.entered_at, now))
    }

    /// Record the exit. Exit time, charge and status only ever change here,
    /// and only once.
    pub fn checkout(&mut self, exited_at: DateTime<Utc>, charge: Charge) {
        debug_assert_eq!(self.status, TicketStatus::Active);
        self.exited_at = Some(exited_at);
        self.charge = charge;
        self.status = TicketStatus::Paid;
    }

    pub fn snapshot(&self) -> VehicleSnapshot {
        VehicleSnapshot {
            plate: self.plate.clone(),
            vehicle_class: self.vehicle_class,
            spot_class: self.spot_class,
            ticket_id: self.ticket_id,
            entered_at: self.entered_at,
            exited_at: self.exited_at,
            charge: self.charge,
            status: self.status,
        }
    }
}

/// Read-only view of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleSnapshot {
    pub plate: String,
    pub vehicle_class: VehicleClass,
    pub spot_class: SpotClass,
    pub ticket_id: Option<TicketId>,
    pub entered_at: DateTime<Utc>,
    pub exited_at: Option<DateTime<Utc>>,
    pub charge: Charge,
    pub status: TicketStatus,
}
