//! Delivery status lifecycle.

use serde::{Deserialize, Serialize};

/// Delivery status lifecycle.
///
/// Statuses form a single forward chain:
/// `DRAFT -> WAITING_FOR_COURIER -> IN_TRANSIT -> DELIVERED`.
/// Variant order follows the chain, so `Ord` compares lifecycle progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Draft,
    WaitingForCourier,
    InTransit,
    Delivered,
}

impl DeliveryStatus {
    pub const ALL: [DeliveryStatus; 4] = [
        DeliveryStatus::Draft,
        DeliveryStatus::WaitingForCourier,
        DeliveryStatus::InTransit,
        DeliveryStatus::Delivered,
    ];

    /// The only status this one may be entered from. `Draft` is initial only.
    pub const fn predecessor(self) -> Option<DeliveryStatus> {
        match self {
            DeliveryStatus::Draft => None,
            DeliveryStatus::WaitingForCourier => Some(DeliveryStatus::Draft),
            DeliveryStatus::InTransit => Some(DeliveryStatus::WaitingForCourier),
            DeliveryStatus::Delivered => Some(DeliveryStatus::InTransit),
        }
    }

    pub fn can_change_to(self, next: DeliveryStatus) -> bool {
        next.predecessor() == Some(self)
    }

    pub fn is_editable(self) -> bool {
        matches!(self, DeliveryStatus::Draft)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            DeliveryStatus::Draft => "DRAFT",
            DeliveryStatus::WaitingForCourier => "WAITING_FOR_COURIER",
            DeliveryStatus::InTransit => "IN_TRANSIT",
            DeliveryStatus::Delivered => "DELIVERED",
        }
    }
}

impl core::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
