use thiserror::Error;

use crate::model::{SlotId, TeacherId};

/// Errors surfaced by reservation and slot operations.
///
/// `AlreadyApplied`, `SlotFull`, `CapacityBelowApplied` and `CapacityTooLarge` are
/// business outcomes the caller should render as a message. `SlotNotFound` usually means the slot
/// was deleted while the caller was looking at it. `TransientStore` is an
/// infrastructure failure the caller may retry by hand; nothing is retried here.
///
/// A failed operation never leaves partial writes behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    #[error("teacher {teacher_id} has already applied to slot {slot_id}")]
    AlreadyApplied {
        slot_id: SlotId,
        teacher_id: TeacherId,
    },
    #[error("slot {slot_id} is full")]
    SlotFull { slot_id: SlotId },
    #[error("slot {slot_id} not found")]
    SlotNotFound { slot_id: SlotId },
    #[error("slot {slot_id} has {applied} applications, capacity {capacity} is too small")]
    CapacityBelowApplied {
        slot_id: SlotId,
        applied: u32,
        capacity: u32,
    },
    #[error("capacity {capacity} exceeds the largest supported slot capacity")]
    CapacityTooLarge { capacity: u64 },
    #[error("reservation store unavailable: {0}")]
    TransientStore(String),
}

impl ReservationError {
    /// Expected outcomes of a user action, as opposed to failures.
    pub fn is_business(&self) -> bool {
        matches!(
            self,
            Self::AlreadyApplied { .. }
                | Self::SlotFull { .. }
                | Self::CapacityBelowApplied { .. }
                | Self::CapacityTooLarge { .. }
        )
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientStore(_))
    }
}

/// Failure of the profile collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("profile lookup failed: {0}")]
    Lookup(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown reservation backend {0:?}, expected \"memory\" or \"database\"")]
    UnknownBackend(String),
    #[error("DATABASE_URL must be set for the database backend")]
    MissingDatabaseUrl,
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to connect to the reservation database: {0}")]
    Connect(#[from] sea_orm::DbErr),
}

pub type Result<T, E = ReservationError> = std::result::Result<T, E>;
