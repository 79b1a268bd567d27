use crate::clock::ManualClock;
use crate::lot::{vehicle::VehicleSnapshot, Lot, Outcome};
use crate::types::{action, Charge, SpotClass, TicketId, TicketStatus, UnknownVehicleClass};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::io::Read;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("bad action kind: {kind}")]
    BadActionKind { kind: String },
    #[error("missing {field} for action {kind}")]
    MissingField { kind: String, field: &'static str },
    #[error(transparent)]
    BadVehicleClass(#[from] UnknownVehicleClass),
}

#[derive(Debug, Deserialize)]
pub struct InputRow {
    // type is a rust keyword, so rename here (better than r#... everywhere)
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: DateTime<Utc>,
    pub vehicle: Option<String>,
    pub plate: Option<String>,
    pub ticket: Option<u64>,
}

/// An action stamped with the time it happened at the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub at: DateTime<Utc>,
    pub action: action::Action,
}

impl TryFrom<InputRow> for Event {
    type Error = Error;
    fn try_from(other: InputRow) -> Result<Self, Error> {
        let InputRow {
            kind,
            timestamp,
            vehicle,
            plate,
            ticket,
        } = other;
        let missing = |field| Error::MissingField {
            kind: kind.clone(),
            field,
        };
        let action = match kind.as_str() {
            "enter" => action::Action::Enter {
                vehicle_class: vehicle.ok_or_else(|| missing("vehicle"))?.parse()?,
                plate: plate.ok_or_else(|| missing("plate"))?,
            },
            "exit" => action::Action::Exit {
                ticket_id: TicketId(ticket.ok_or_else(|| missing("ticket"))?),
            },
            "status" => action::Action::Status {
                ticket_id: TicketId(ticket.ok_or_else(|| missing("ticket"))?),
            },
            "availability" => action::Action::Availability,
            _ => return Err(Error::BadActionKind { kind }),
        };
        Ok(Self {
            at: timestamp,
            action,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct OutputRow {
    pub ticket: Option<TicketId>,
    pub plate: String,
    pub vehicle: String,
    pub spot: SpotClass,
    pub entered: DateTime<Utc>,
    pub exited: Option<DateTime<Utc>>,
    pub charge: Charge,
    pub status: TicketStatus,
}

impl From<VehicleSnapshot> for OutputRow {
    fn from(other: VehicleSnapshot) -> Self {
        Self {
            ticket: other.ticket_id,
            plate: other.plate,
            vehicle: other.vehicle_class.to_string(),
            spot: other.spot_class,
            entered: other.entered_at,
            exited: other.exited_at,
            charge: other.charge,
            status: other.status,
        }
    }
}

/// Apply every event in `input` to the lot, moving its clock to each event's
/// timestamp first.
///
/// Unreadable rows, invalid events and rejected actions are logged and
/// skipped. Only an I/O failure stops the replay.
pub fn replay(input: impl Read, lot: &mut Lot<ManualClock>) -> Result<(), ::csv::Error> {
    let mut csv_reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .from_reader(input);
    for (index, result) in csv_reader.deserialize::<InputRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(error) if error.is_io_error() => return Err(error),
            Err(error) => {
                warn!("Event {index} unreadable: {error}");
                continue;
            }
        };
        let event: Event = match row.try_into() {
            Ok(event) => event,
            Err(error) => {
                warn!("Event {index} invalid: {error}");
                continue;
            }
        };
        lot.clock().set(event.at);
        match lot.apply(event.action) {
            Ok(Outcome::Ticketed(ticket_id)) => info!("Event {index}: ticket {ticket_id} issued"),
            Ok(Outcome::Exited(exit)) => {
                info!("Event {index}: {} left, charged {}", exit.plate, exit.charge)
            }
            Ok(Outcome::Status(snapshot)) => info!("Event {index}: {snapshot:?}"),
            Ok(Outcome::Availability(availability)) => {
                info!("Event {index}: {}", availability.to_string().replace('\n', ", "))
            }
            Err(error) => warn!("Event {index} not applied: {error}"),
        }
    }
    Ok(())
}
