use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tracking_core::{
    AggregateId, AggregateRoot, Clock, CourierId, EntityId, IdGenerator, SystemClock,
    UuidV7Generator,
};

use crate::contact::ContactPoint;
use crate::error::{DeliveryError, DeliveryResult};
use crate::event::{DeliveryEvent, DeliveryFulfilled, DeliveryPickedUp, DeliveryPlaced};
use crate::item::{ItemId, LineItem};
use crate::snapshot::DeliverySnapshot;
use crate::status::DeliveryStatus;

/// Delivery identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryId(pub AggregateId);

impl DeliveryId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Sender, recipient, pricing and expected duration, set together while drafting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparationDetails {
    pub sender: ContactPoint,
    pub recipient: ContactPoint,
    pub distance_fee: Decimal,
    pub courier_payout: Decimal,
    pub expected_delivery_time: Duration,
}

impl PreparationDetails {
    pub fn new(
        sender: ContactPoint,
        recipient: ContactPoint,
        distance_fee: Decimal,
        courier_payout: Decimal,
        expected_delivery_time: Duration,
    ) -> Self {
        Self {
            sender,
            recipient,
            distance_fee,
            courier_payout,
            expected_delivery_time,
        }
    }
}

/// Aggregate root: Delivery.
///
/// Equality and hashing consider the id only.
#[derive(Debug, Clone)]
pub struct Delivery {
    id: DeliveryId,
    courier_id: Option<CourierId>,
    status: DeliveryStatus,

    placed_at: Option<DateTime<Utc>>,
    assigned_at: Option<DateTime<Utc>>,
    expected_delivery_at: Option<DateTime<Utc>>,
    fulfilled_at: Option<DateTime<Utc>>,

    distance_fee: Decimal,
    courier_payout: Decimal,
    total_cost: Decimal,

    /// Always the sum of `items[..].quantity`.
    total_items: i64,

    sender: Option<ContactPoint>,
    recipient: Option<ContactPoint>,
    items: Vec<LineItem>,

    version: u64,
    pending_events: Vec<DeliveryEvent>,

    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl Delivery {
    /// Start a new, empty draft using the system clock and UUIDv7 ids.
    pub fn draft() -> Self {
        Self::draft_with(Arc::new(SystemClock), Arc::new(UuidV7Generator))
    }

    /// Start a new draft with injected collaborators.
    ///
    /// `ids` supplies the delivery id and every item id. If it repeats an id
    /// already held by an item, a fresh UUIDv7 is used for the new item.
    pub fn draft_with(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        let id = DeliveryId::new(AggregateId::from_uuid(ids.generate()));
        tracing::debug!(delivery_id = %id, "delivery drafted");

        Self {
            id,
            courier_id: None,
            status: DeliveryStatus::Draft,
            placed_at: None,
            assigned_at: None,
            expected_delivery_at: None,
            fulfilled_at: None,
            distance_fee: Decimal::ZERO,
            courier_payout: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            total_items: 0,
            sender: None,
            recipient: None,
            items: Vec::new(),
            version: 0,
            pending_events: Vec::new(),
            clock,
            ids,
        }
    }

    pub fn id_typed(&self) -> DeliveryId {
        self.id
    }

    pub fn courier_id(&self) -> Option<CourierId> {
        self.courier_id
    }

    pub fn status(&self) -> DeliveryStatus {
        self.status
    }

    pub fn placed_at(&self) -> Option<DateTime<Utc>> {
        self.placed_at
    }

    pub fn assigned_at(&self) -> Option<DateTime<Utc>> {
        self.assigned_at
    }

    pub fn expected_delivery_at(&self) -> Option<DateTime<Utc>> {
        self.expected_delivery_at
    }

    pub fn fulfilled_at(&self) -> Option<DateTime<Utc>> {
        self.fulfilled_at
    }

    pub fn distance_fee(&self) -> Decimal {
        self.distance_fee
    }

    pub fn courier_payout(&self) -> Decimal {
        self.courier_payout
    }

    pub fn total_cost(&self) -> Decimal {
        self.total_cost
    }

    pub fn total_items(&self) -> i64 {
        self.total_items
    }

    pub fn sender(&self) -> Option<&ContactPoint> {
        self.sender.as_ref()
    }

    pub fn recipient(&self) -> Option<&ContactPoint> {
        self.recipient.as_ref()
    }

    /// Line items in insertion order.
    ///
    /// The view is read-only; items change only through the delivery's own
    /// operations.
    ///
    /// ```compile_fail
    /// use tracking_delivery::Delivery;
    ///
    /// let mut delivery = Delivery::draft();
    /// delivery.add_item("Book", 1);
    /// delivery.items()[0].set_quantity(5);
    /// ```
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn item(&self, item_id: ItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id_typed() == item_id)
    }

    /// Events recorded since the last [`take_events`](Self::take_events).
    pub fn pending_events(&self) -> &[DeliveryEvent] {
        &self.pending_events
    }

    /// Drain recorded events for publishing.
    pub fn take_events(&mut self) -> Vec<DeliveryEvent> {
        core::mem::take(&mut self.pending_events)
    }

    /// Allowed in any status.
    pub fn add_item(&mut self, name: impl Into<String>, quantity: i32) -> ItemId {
        self.push_item(Some(name.into()), quantity)
    }

    /// Allowed in any status.
    pub fn add_unnamed_item(&mut self, quantity: i32) -> ItemId {
        self.push_item(None, quantity)
    }

    /// Allowed in any status. Unknown ids are ignored.
    pub fn remove_item(&mut self, item_id: ItemId) {
        let before = self.items.len();
        self.items.retain(|item| item.id_typed() != item_id);
        if self.items.len() != before {
            tracing::debug!(delivery_id = %self.id, item_id = %item_id, "item removed");
            self.recalculate_total_items();
            self.version += 1;
        }
    }

    /// Allowed in any status.
    pub fn remove_items(&mut self) {
        if self.items.is_empty() {
            return;
        }
        tracing::debug!(delivery_id = %self.id, count = self.items.len(), "items cleared");
        self.items.clear();
        self.recalculate_total_items();
        self.version += 1;
    }

    /// Draft only.
    pub fn change_item_quantity(&mut self, item_id: ItemId, quantity: i32) -> DeliveryResult<()> {
        self.ensure_editable()?;

        let item = self
            .items
            .iter_mut()
            .find(|item| item.id_typed() == item_id)
            .ok_or(DeliveryError::ItemNotFound(item_id))?;
        item.set_quantity(quantity);

        tracing::debug!(delivery_id = %self.id, item_id = %item_id, quantity, "item quantity changed");
        self.recalculate_total_items();
        self.version += 1;
        Ok(())
    }

    /// Set sender, recipient and pricing, and derive the total cost and the
    /// expected delivery time. Draft only; later calls overwrite earlier ones.
    ///
    /// Accepts either `PreparationDetails` or an `Option` of it, so callers
    /// relaying optional input get [`DeliveryError::MissingPreparationDetails`].
    pub fn edit_preparation_details(
        &mut self,
        details: impl Into<Option<PreparationDetails>>,
    ) -> DeliveryResult<()> {
        self.ensure_editable()?;
        let details = details
            .into()
            .ok_or(DeliveryError::MissingPreparationDetails)?;

        let total_cost = details
            .distance_fee
            .checked_add(details.courier_payout)
            .ok_or(DeliveryError::TotalCostOverflow)?;
        let expected_delivery_at = self
            .clock
            .now()
            .checked_add_signed(details.expected_delivery_time)
            .ok_or(DeliveryError::ExpectedDeliveryOutOfRange)?;

        self.sender = Some(details.sender);
        self.recipient = Some(details.recipient);
        self.distance_fee = details.distance_fee;
        self.courier_payout = details.courier_payout;
        self.total_cost = total_cost;
        self.expected_delivery_at = Some(expected_delivery_at);

        tracing::debug!(delivery_id = %self.id, total_cost = %self.total_cost, "preparation details edited");
        self.version += 1;
        Ok(())
    }

    /// Draft -> WaitingForCourier. Requires a recipient.
    pub fn place(&mut self) -> DeliveryResult<()> {
        if !self.is_filled() {
            tracing::warn!(delivery_id = %self.id, "cannot place delivery with missing fields");
            return Err(DeliveryError::MissingRequiredFields);
        }
        self.change_status_to(DeliveryStatus::WaitingForCourier)?;

        let now = self.clock.now();
        self.placed_at = Some(now);
        self.record(DeliveryEvent::Placed(DeliveryPlaced {
            delivery_id: self.id,
            occurred_at: now,
        }));
        Ok(())
    }

    /// WaitingForCourier -> InTransit.
    pub fn pick_up(&mut self, courier_id: CourierId) -> DeliveryResult<()> {
        self.change_status_to(DeliveryStatus::InTransit)?;

        let now = self.clock.now();
        self.courier_id = Some(courier_id);
        self.assigned_at = Some(now);
        self.record(DeliveryEvent::PickedUp(DeliveryPickedUp {
            delivery_id: self.id,
            courier_id,
            occurred_at: now,
        }));
        Ok(())
    }

    /// InTransit -> Delivered.
    pub fn mark_as_delivered(&mut self) -> DeliveryResult<()> {
        self.change_status_to(DeliveryStatus::Delivered)?;

        let now = self.clock.now();
        self.fulfilled_at = Some(now);
        self.record(DeliveryEvent::Fulfilled(DeliveryFulfilled {
            delivery_id: self.id,
            occurred_at: now,
        }));
        Ok(())
    }

    /// Capture the full state for persistence. Pending events are not included.
    pub fn snapshot(&self) -> DeliverySnapshot {
        DeliverySnapshot {
            id: self.id,
            courier_id: self.courier_id,
            status: self.status,
            placed_at: self.placed_at,
            assigned_at: self.assigned_at,
            expected_delivery_at: self.expected_delivery_at,
            fulfilled_at: self.fulfilled_at,
            distance_fee: self.distance_fee,
            courier_payout: self.courier_payout,
            total_cost: self.total_cost,
            total_items: self.total_items,
            sender: self.sender.clone(),
            recipient: self.recipient.clone(),
            items: self.items.clone(),
            version: self.version,
        }
    }

    /// Rebuild a delivery from persisted state, using the system clock and UUIDv7 ids.
    pub fn restore(snapshot: DeliverySnapshot) -> DeliveryResult<Self> {
        Self::restore_with(snapshot, Arc::new(SystemClock), Arc::new(UuidV7Generator))
    }

    pub fn restore_with(
        snapshot: DeliverySnapshot,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> DeliveryResult<Self> {
        snapshot.validate()?;

        Ok(Self {
            id: snapshot.id,
            courier_id: snapshot.courier_id,
            status: snapshot.status,
            placed_at: snapshot.placed_at,
            assigned_at: snapshot.assigned_at,
            expected_delivery_at: snapshot.expected_delivery_at,
            fulfilled_at: snapshot.fulfilled_at,
            distance_fee: snapshot.distance_fee,
            courier_payout: snapshot.courier_payout,
            total_cost: snapshot.total_cost,
            total_items: snapshot.total_items,
            sender: snapshot.sender,
            recipient: snapshot.recipient,
            items: snapshot.items,
            version: snapshot.version,
            pending_events: Vec::new(),
            clock,
            ids,
        })
    }
}

impl Delivery {
    fn push_item(&mut self, name: Option<String>, quantity: i32) -> ItemId {
        let mut item_id = ItemId::new(EntityId::from_uuid(self.ids.generate()));
        if self.item(item_id).is_some() {
            tracing::warn!(delivery_id = %self.id, item_id = %item_id, "id generator repeated an item id");
            item_id = ItemId::new(EntityId::from_uuid(UuidV7Generator.generate()));
        }
        self.items.push(LineItem::brand_new(item_id, name, quantity));

        tracing::debug!(delivery_id = %self.id, item_id = %item_id, quantity, "item added");
        self.recalculate_total_items();
        self.version += 1;
        item_id
    }

    fn recalculate_total_items(&mut self) {
        self.total_items = self.items.iter().map(|item| i64::from(item.quantity())).sum();
    }

    fn ensure_editable(&self) -> DeliveryResult<()> {
        if !self.status.is_editable() {
            return Err(DeliveryError::NotEditable {
                status: self.status,
            });
        }
        Ok(())
    }

    // Only the recipient is checked; the sender may still be unset.
    fn is_filled(&self) -> bool {
        self.recipient.is_some()
    }

    fn change_status_to(&mut self, next: DeliveryStatus) -> DeliveryResult<()> {
        if !self.status.can_change_to(next) {
            tracing::warn!(delivery_id = %self.id, from = %self.status, to = %next, "illegal status transition");
            return Err(DeliveryError::IllegalTransition {
                from: self.status,
                to: next,
            });
        }

        tracing::info!(delivery_id = %self.id, from = %self.status, to = %next, "delivery status changed");
        self.status = next;
        Ok(())
    }

    fn record(&mut self, event: DeliveryEvent) {
        self.pending_events.push(event);
        self.version += 1;
    }
}

impl AggregateRoot for Delivery {
    type Id = DeliveryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl PartialEq for Delivery {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Delivery {}

impl core::hash::Hash for Delivery {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
