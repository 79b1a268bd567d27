use crate::types::{TicketId, VehicleClass};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("parking full: no space for {vehicle_class}")]
    CapacityExceeded { vehicle_class: VehicleClass },
    #[error("invalid ticket number: {ticket_id}")]
    InvalidTicket { ticket_id: TicketId },
}
