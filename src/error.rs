//! Error taxonomy for the garage core.
//!
//! Every variant is recoverable from the caller's point of view: the engine
//! reports the failure and remains usable for the next operation. Only
//! `Config` is treated as fatal, and only at startup.

use crate::model::{TicketCode, VehicleCategory};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GarageError {
    /// No free spot of the requested category. A normal, expected outcome
    /// when the pool is full; nothing is mutated.
    #[error("no free {category} spot available")]
    NoCapacity { category: VehicleCategory },

    /// The code does not match any active ticket. Checked before any state
    /// is touched.
    #[error("no active ticket with code '{code}'")]
    UnknownTicket { code: TicketCode },

    /// Empty or malformed plate input, rejected before the engine is ever
    /// invoked.
    #[error("invalid plate: {reason}")]
    InvalidPlate { reason: String },

    /// Startup-time configuration rejection.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GarageError>;
