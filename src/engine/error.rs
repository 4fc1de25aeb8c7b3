use ulid::Ulid;

use crate::model::{Money, Ms};

#[derive(Debug)]
pub enum EngineError {
    NotFound(Ulid),
    AlreadyExists(Ulid),
    InvalidRange(&'static str),
    /// The requested stay overlaps the confirmed booking with this id.
    Overlap(Ulid),
    InvalidPayment(&'static str),
    InvalidRate(Money),
    Forbidden(Ulid),
    NotConfirmed(Ulid),
    AlreadyCancelled(Ulid),
    WindowExpired {
        deadline: Ms,
    },
    HasActiveBookings(Ulid),
    LimitExceeded(&'static str),
    /// Ledger write failure. Retryable, unlike `Overlap`.
    Storage(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::AlreadyExists(id) => write!(f, "already exists: {id}"),
            EngineError::InvalidRange(msg) => write!(f, "invalid date range: {msg}"),
            EngineError::Overlap(id) => {
                write!(f, "dates overlap confirmed booking: {id}")
            }
            EngineError::InvalidPayment(msg) => write!(f, "invalid payment: {msg}"),
            EngineError::InvalidRate(rate) => write!(f, "invalid nightly rate: {rate}"),
            EngineError::Forbidden(id) => {
                write!(f, "booking {id} belongs to another guest")
            }
            EngineError::NotConfirmed(id) => write!(f, "booking {id} is not confirmed"),
            EngineError::AlreadyCancelled(id) => {
                write!(f, "booking {id} is already cancelled")
            }
            EngineError::WindowExpired { deadline } => {
                write!(f, "cancellation window closed at {deadline}")
            }
            EngineError::HasActiveBookings(id) => {
                write!(f, "cannot remove room {id}: has confirmed bookings")
            }
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::Storage(e) => write!(f, "storage error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
