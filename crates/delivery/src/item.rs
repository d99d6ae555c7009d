use serde::{Deserialize, Serialize};

use tracking_core::{Entity, EntityId};

/// Line item identifier, stable for the lifetime of the owning delivery.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub EntityId);

impl ItemId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One item and its quantity within a delivery.
///
/// Only the owning [`Delivery`](crate::Delivery) creates, changes or removes
/// line items. Quantities are signed and unbounded; names may be empty or absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    id: ItemId,
    name: Option<String>,
    quantity: i32,
}

impl LineItem {
    pub(crate) fn brand_new(id: ItemId, name: Option<String>, quantity: i32) -> Self {
        Self { id, name, quantity }
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub(crate) fn set_quantity(&mut self, quantity: i32) {
        self.quantity = quantity;
    }
}

impl Entity for LineItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl PartialEq for LineItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for LineItem {}
