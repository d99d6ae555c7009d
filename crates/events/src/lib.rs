//! Domain events raised by tracking aggregates.
//!
//! Aggregates record events as facts about successful operations; delivering
//! them to brokers or projections is left to the outer layers.

pub mod event;

pub use event::Event;
