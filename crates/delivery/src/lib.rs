//! Delivery domain module.
//!
//! A delivery starts as a draft, gets filled with line items and preparation
//! details, is placed for courier assignment, picked up and finally delivered.
//! All rules live on the [`Delivery`] aggregate; storage, transport and
//! locking belong to the callers.

pub mod contact;
pub mod delivery;
pub mod error;
pub mod event;
pub mod item;
pub mod snapshot;
pub mod status;

pub use contact::ContactPoint;
pub use delivery::{Delivery, DeliveryId, PreparationDetails};
pub use error::{DeliveryError, DeliveryResult};
pub use event::{DeliveryEvent, DeliveryFulfilled, DeliveryPickedUp, DeliveryPlaced};
pub use item::{ItemId, LineItem};
pub use snapshot::DeliverySnapshot;
pub use status::DeliveryStatus;
