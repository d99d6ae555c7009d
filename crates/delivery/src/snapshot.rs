//! Persisted form of a delivery.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tracking_core::CourierId;

use crate::contact::ContactPoint;
use crate::delivery::DeliveryId;
use crate::error::{DeliveryError, DeliveryResult};
use crate::item::LineItem;
use crate::status::DeliveryStatus;

/// Full aggregate state as stored by a persistence layer.
///
/// Produced by [`Delivery::snapshot`](crate::Delivery::snapshot) and turned
/// back into an aggregate with [`Delivery::restore`](crate::Delivery::restore),
/// which rejects states the aggregate could never have reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySnapshot {
    pub id: DeliveryId,
    pub courier_id: Option<CourierId>,
    pub status: DeliveryStatus,
    pub placed_at: Option<DateTime<Utc>>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub expected_delivery_at: Option<DateTime<Utc>>,
    pub fulfilled_at: Option<DateTime<Utc>>,
    pub distance_fee: Decimal,
    pub courier_payout: Decimal,
    pub total_cost: Decimal,
    pub total_items: i64,
    pub sender: Option<ContactPoint>,
    pub recipient: Option<ContactPoint>,
    pub items: Vec<LineItem>,
    pub version: u64,
}

impl DeliverySnapshot {
    pub(crate) fn validate(&self) -> DeliveryResult<()> {
        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if !seen.insert(item.id_typed()) {
                return Err(DeliveryError::corrupt(format!(
                    "duplicate item id {}",
                    item.id_typed()
                )));
            }
        }

        let quantities: i64 = self.items.iter().map(|item| i64::from(item.quantity())).sum();
        if quantities != self.total_items {
            return Err(DeliveryError::corrupt(format!(
                "total_items is {} but item quantities sum to {quantities}",
                self.total_items
            )));
        }

        let expected_cost = self
            .distance_fee
            .checked_add(self.courier_payout)
            .ok_or(DeliveryError::TotalCostOverflow)?;
        if expected_cost != self.total_cost {
            return Err(DeliveryError::corrupt(format!(
                "total_cost is {} but distance_fee + courier_payout is {expected_cost}",
                self.total_cost
            )));
        }

        let prepared = self.recipient.is_some();
        if self.sender.is_some() != prepared || self.expected_delivery_at.is_some() != prepared {
            return Err(DeliveryError::corrupt(
                "sender, recipient and expected_delivery_at must be set together",
            ));
        }
        if self.status > DeliveryStatus::Draft && !prepared {
            return Err(DeliveryError::corrupt(format!(
                "{} delivery has no recipient",
                self.status
            )));
        }
        if !prepared
            && (!self.distance_fee.is_zero()
                || !self.courier_payout.is_zero()
                || !self.total_cost.is_zero())
        {
            return Err(DeliveryError::corrupt(
                "pricing must be zero until preparation details are set",
            ));
        }

        self.expect_from(self.placed_at.is_some(), DeliveryStatus::WaitingForCourier, "placed_at")?;
        self.expect_from(self.assigned_at.is_some(), DeliveryStatus::InTransit, "assigned_at")?;
        self.expect_from(self.courier_id.is_some(), DeliveryStatus::InTransit, "courier_id")?;
        self.expect_from(self.fulfilled_at.is_some(), DeliveryStatus::Delivered, "fulfilled_at")?;

        expect_ordered(self.placed_at, self.assigned_at, "placed_at", "assigned_at")?;
        expect_ordered(self.assigned_at, self.fulfilled_at, "assigned_at", "fulfilled_at")?;

        Ok(())
    }

    /// `field` must be set exactly when the status has reached `since`.
    fn expect_from(&self, present: bool, since: DeliveryStatus, field: &str) -> DeliveryResult<()> {
        let required = self.status >= since;
        if present != required {
            let state = if required { "missing" } else { "unexpected" };
            return Err(DeliveryError::corrupt(format!(
                "{field} {state} for {} delivery",
                self.status
            )));
        }
        Ok(())
    }
}

fn expect_ordered(
    earlier: Option<DateTime<Utc>>,
    later: Option<DateTime<Utc>>,
    earlier_field: &str,
    later_field: &str,
) -> DeliveryResult<()> {
    if let (Some(earlier), Some(later)) = (earlier, later) {
        if earlier > later {
            return Err(DeliveryError::corrupt(format!(
                "{earlier_field} ({earlier}) is after {later_field} ({later})"
            )));
        }
    }
    Ok(())
}
