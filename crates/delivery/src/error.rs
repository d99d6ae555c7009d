//! Delivery errors.

use thiserror::Error;

use tracking_core::DomainError;

use crate::item::ItemId;
use crate::status::DeliveryStatus;

pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Why a delivery operation was rejected.
///
/// Each variant converts into one [`DomainError`] kind; see the `From` impl.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("illegal transition from {from} to {to}")]
    IllegalTransition {
        from: DeliveryStatus,
        to: DeliveryStatus,
    },

    #[error("cannot edit a delivery that is not in draft (current status: {status})")]
    NotEditable { status: DeliveryStatus },

    #[error("missing required fields")]
    MissingRequiredFields,

    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    #[error("preparation details are required")]
    MissingPreparationDetails,

    #[error("expected delivery time is out of range")]
    ExpectedDeliveryOutOfRange,

    #[error("total cost overflows")]
    TotalCostOverflow,

    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}

impl DeliveryError {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptSnapshot(msg.into())
    }
}

impl From<DeliveryError> for DomainError {
    fn from(err: DeliveryError) -> Self {
        let msg = err.to_string();
        match err {
            DeliveryError::IllegalTransition { .. }
            | DeliveryError::NotEditable { .. }
            | DeliveryError::MissingRequiredFields => DomainError::invalid_state(msg),
            DeliveryError::ItemNotFound(_) => DomainError::not_found(msg),
            DeliveryError::MissingPreparationDetails => DomainError::missing_input(msg),
            DeliveryError::ExpectedDeliveryOutOfRange
            | DeliveryError::TotalCostOverflow
            | DeliveryError::CorruptSnapshot(_) => DomainError::validation(msg),
        }
    }
}
