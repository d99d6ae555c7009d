//! End-to-end behaviour of the delivery aggregate as a service layer sees it.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use tracking_core::{AggregateRoot, CourierId, DomainError, ManualClock, UuidV7Generator};
use tracking_delivery::{
    ContactPoint, Delivery, DeliveryError, DeliveryEvent, DeliverySnapshot, DeliveryStatus,
    PreparationDetails,
};
use tracking_events::Event;

fn sender() -> ContactPoint {
    ContactPoint::new("01234-567", "Rua A", "123", "Apto 1", "Joao Silva", "11999999999")
}

fn recipient() -> ContactPoint {
    ContactPoint::new("04567-890", "Rua B", "456", "Casa", "Maria Santos", "11888888888")
}

fn details() -> PreparationDetails {
    PreparationDetails::new(
        sender(),
        recipient(),
        Decimal::new(1000, 2),
        Decimal::new(1500, 2),
        Duration::hours(2),
    )
}

fn in_transit(clock: Arc<ManualClock>) -> Result<Delivery> {
    let mut delivery = Delivery::draft_with(clock.clone(), Arc::new(UuidV7Generator));
    delivery.add_item("Notebook", 2);
    delivery.edit_preparation_details(details())?;
    delivery.place()?;
    clock.advance(Duration::minutes(15));
    delivery.pick_up(CourierId::new())?;
    Ok(delivery)
}

#[test]
fn happy_path_reaches_delivered() -> Result<()> {
    tracking_observability::init_for_tests();

    let mut delivery = Delivery::draft();
    let courier_id = CourierId::new();
    let before = Utc::now();

    delivery.add_item("Notebook", 1);
    delivery.add_item("Charger", 2);
    delivery.edit_preparation_details(details())?;
    delivery.place()?;
    delivery.pick_up(courier_id)?;
    delivery.mark_as_delivered()?;

    assert_eq!(delivery.status(), DeliveryStatus::Delivered);
    assert_eq!(delivery.courier_id(), Some(courier_id));
    assert_eq!(delivery.total_items(), 3);

    let placed = delivery.placed_at().ok_or_else(|| anyhow::anyhow!("placed_at unset"))?;
    let assigned = delivery.assigned_at().ok_or_else(|| anyhow::anyhow!("assigned_at unset"))?;
    let fulfilled = delivery.fulfilled_at().ok_or_else(|| anyhow::anyhow!("fulfilled_at unset"))?;
    assert!(before <= placed);
    assert!(placed <= assigned);
    assert!(assigned <= fulfilled);
    Ok(())
}

#[test]
fn events_describe_the_lifecycle() -> Result<()> {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let mut delivery = in_transit(clock.clone())?;
    clock.advance(Duration::minutes(30));
    delivery.mark_as_delivered()?;

    let events = delivery.take_events();
    let types: Vec<_> = events.iter().map(Event::event_type).collect();
    assert_eq!(
        types,
        vec!["delivery.placed", "delivery.picked_up", "delivery.fulfilled"]
    );
    assert!(events.iter().all(|e| e.version() == 1));
    assert!(events.windows(2).all(|w| w[0].occurred_at() < w[1].occurred_at()));

    match events.last() {
        Some(DeliveryEvent::Fulfilled(e)) => assert_eq!(Some(e.occurred_at), delivery.fulfilled_at()),
        other => panic!("Expected Fulfilled event, got {other:?}"),
    }
    Ok(())
}

#[test]
fn rejections_map_to_domain_error_kinds() {
    let mut delivery = Delivery::draft();

    let err: DomainError = delivery.place().unwrap_err().into();
    assert!(matches!(err, DomainError::InvalidState(_)));

    let err: DomainError = delivery.pick_up(CourierId::new()).unwrap_err().into();
    assert_eq!(
        err,
        DomainError::InvalidState("illegal transition from DRAFT to IN_TRANSIT".to_string())
    );

    let item_id = delivery.add_item("Notebook", 1);
    delivery.remove_item(item_id);
    let err: DomainError = delivery.change_item_quantity(item_id, 3).unwrap_err().into();
    assert!(matches!(err, DomainError::NotFound(_)));

    let err: DomainError = delivery.edit_preparation_details(None).unwrap_err().into();
    assert!(matches!(err, DomainError::MissingInput(_)));
}

#[test]
fn snapshot_survives_json_round_trip() -> Result<()> {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let delivery = in_transit(clock.clone())?;

    let json = serde_json::to_string(&delivery.snapshot())?;
    let snapshot: DeliverySnapshot = serde_json::from_str(&json)?;
    let mut restored = Delivery::restore_with(snapshot, clock, Arc::new(UuidV7Generator))?;

    assert_eq!(restored, delivery);
    assert_eq!(restored.snapshot(), delivery.snapshot());
    assert_eq!(restored.total_cost().to_string(), "25.00");
    assert_eq!(restored.version(), delivery.version());
    assert!(restored.pending_events().is_empty());

    restored.mark_as_delivered()?;
    assert_eq!(restored.status(), DeliveryStatus::Delivered);
    Ok(())
}

#[test]
fn restore_rejects_inconsistent_totals() -> Result<()> {
    let mut delivery = Delivery::draft();
    delivery.add_item("Notebook", 2);
    delivery.edit_preparation_details(details())?;

    let mut snapshot = delivery.snapshot();
    snapshot.total_items = 7;
    assert!(matches!(
        Delivery::restore(snapshot),
        Err(DeliveryError::CorruptSnapshot(_))
    ));

    let mut snapshot = delivery.snapshot();
    snapshot.total_cost = Decimal::new(2499, 2);
    assert!(matches!(
        Delivery::restore(snapshot),
        Err(DeliveryError::CorruptSnapshot(_))
    ));
    Ok(())
}

#[test]
fn restore_rejects_pricing_on_unprepared_draft() {
    let mut snapshot = Delivery::draft().snapshot();
    snapshot.distance_fee = Decimal::new(500, 2);
    snapshot.courier_payout = Decimal::new(500, 2);
    snapshot.total_cost = Decimal::new(1000, 2);

    let err = Delivery::restore(snapshot).unwrap_err();
    match err {
        DeliveryError::CorruptSnapshot(msg) if msg.contains("pricing must be zero") => {}
        other => panic!("Expected CorruptSnapshot, got {other:?}"),
    }
}

#[test]
fn restore_rejects_timestamps_out_of_order() -> Result<()> {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let mut delivery = in_transit(clock.clone())?;

    let mut snapshot = delivery.snapshot();
    snapshot.placed_at = snapshot.assigned_at.map(|at| at + Duration::minutes(1));
    let err = Delivery::restore(snapshot).unwrap_err();
    match err {
        DeliveryError::CorruptSnapshot(msg) if msg.contains("placed_at") => {}
        other => panic!("Expected CorruptSnapshot, got {other:?}"),
    }

    clock.advance(Duration::minutes(30));
    delivery.mark_as_delivered()?;
    let mut snapshot = delivery.snapshot();
    snapshot.fulfilled_at = snapshot.assigned_at.map(|at| at - Duration::minutes(1));
    let err = Delivery::restore(snapshot).unwrap_err();
    match err {
        DeliveryError::CorruptSnapshot(msg) if msg.contains("assigned_at") => {}
        other => panic!("Expected CorruptSnapshot, got {other:?}"),
    }

    assert!(Delivery::restore(delivery.snapshot()).is_ok());
    Ok(())
}

#[test]
fn restore_rejects_duplicate_items() {
    let mut delivery = Delivery::draft();
    delivery.add_item("Notebook", 2);

    let mut snapshot = delivery.snapshot();
    let duplicate = snapshot.items[0].clone();
    snapshot.items.push(duplicate);
    snapshot.total_items = 4;

    let err = Delivery::restore(snapshot).unwrap_err();
    match err {
        DeliveryError::CorruptSnapshot(msg) if msg.contains("duplicate item id") => {}
        other => panic!("Expected CorruptSnapshot, got {other:?}"),
    }
}

#[test]
fn restore_rejects_status_without_its_timestamps() -> Result<()> {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let delivery = in_transit(clock)?;

    let mut snapshot = delivery.snapshot();
    snapshot.courier_id = None;
    assert!(Delivery::restore(snapshot).is_err());

    let mut snapshot = delivery.snapshot();
    snapshot.fulfilled_at = Some(Utc::now());
    assert!(Delivery::restore(snapshot).is_err());

    let mut snapshot = Delivery::draft().snapshot();
    snapshot.status = DeliveryStatus::WaitingForCourier;
    snapshot.placed_at = Some(Utc::now());
    let err = Delivery::restore(snapshot).unwrap_err();
    assert!(err.to_string().contains("no recipient"));
    Ok(())
}
