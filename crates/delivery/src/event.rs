//! Events recorded by the delivery aggregate on lifecycle transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tracking_core::CourierId;
use tracking_events::Event;

use crate::delivery::DeliveryId;

/// Event: DeliveryPlaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPlaced {
    pub delivery_id: DeliveryId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DeliveryPickedUp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPickedUp {
    pub delivery_id: DeliveryId,
    pub courier_id: CourierId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DeliveryFulfilled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryFulfilled {
    pub delivery_id: DeliveryId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryEvent {
    Placed(DeliveryPlaced),
    PickedUp(DeliveryPickedUp),
    Fulfilled(DeliveryFulfilled),
}

impl DeliveryEvent {
    pub fn delivery_id(&self) -> DeliveryId {
        match self {
            DeliveryEvent::Placed(e) => e.delivery_id,
            DeliveryEvent::PickedUp(e) => e.delivery_id,
            DeliveryEvent::Fulfilled(e) => e.delivery_id,
        }
    }
}

impl Event for DeliveryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DeliveryEvent::Placed(_) => "delivery.placed",
            DeliveryEvent::PickedUp(_) => "delivery.picked_up",
            DeliveryEvent::Fulfilled(_) => "delivery.fulfilled",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DeliveryEvent::Placed(e) => e.occurred_at,
            DeliveryEvent::PickedUp(e) => e.occurred_at,
            DeliveryEvent::Fulfilled(e) => e.occurred_at,
        }
    }
}
