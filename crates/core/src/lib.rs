//! `tracking-core` — domain foundation for the delivery tracking service.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the clock and id-generator collaborators, and the shared error
//! taxonomy.

pub mod aggregate;
pub mod clock;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::AggregateRoot;
pub use clock::{Clock, ManualClock, SystemClock};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AggregateId, CourierId, EntityId, IdGenerator, UuidV7Generator};
pub use value_object::ValueObject;
