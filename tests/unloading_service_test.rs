mod common;

use assert_matches::assert_matches;
use common::{date, new_stage, new_unloading, TestService};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use unloading_api::{
    errors::ServiceError,
    events::Event,
    models::{unloading::UnloadingStatus, unloading_stage},
    services::unloading::{StockReadings, UnloadingEdit, UnloadingFilter},
};
use uuid::Uuid;

#[tokio::test]
async fn single_shot_unloading_is_complete_on_creation() {
    let mut harness = TestService::new().await;
    let mut input = new_unloading(dec!(20), None);
    input.readings.system_stock_before = Some(dec!(100));
    input.readings.system_stock_after = Some(dec!(85));
    input.refuel_during_unload = Some(dec!(5));

    let aggregate = harness.service.create(input).await.unwrap();

    assert_eq!(aggregate.event.discharged_volume, dec!(20));
    assert_eq!(aggregate.event.status, UnloadingStatus::Complete);
    assert_eq!(aggregate.event.system_difference, Some(dec!(-30)));
    assert_eq!(aggregate.event.gauge_difference, None);

    let events = harness.drain_events();
    assert!(events.contains(&Event::UnloadingCreated {
        unloading_id: aggregate.event.id,
        freight_id: aggregate.event.freight_id,
    }));
    assert!(events.contains(&Event::UnloadingCompleted(aggregate.event.id)));
}

#[tokio::test]
async fn staged_unloading_progresses_to_complete() {
    let mut harness = TestService::new().await;
    let created = harness
        .service
        .create(new_unloading(dec!(30000), Some(Decimal::ZERO)))
        .await
        .unwrap();
    let id = created.event.id;
    assert_eq!(created.event.status, UnloadingStatus::Pending);

    let mut first = new_stage(21, dec!(12000));
    first.readings = StockReadings {
        system_stock_before: Some(dec!(50000)),
        system_stock_after: Some(dec!(37500)),
        gauge_stock_before: None,
        gauge_stock_after: None,
    };
    first.refuel_during_stage = Some(Decimal::ZERO);

    let (aggregate, stage) = harness.service.add_stage(id, first).await.unwrap();
    assert_eq!(stage.system_difference, Some(dec!(-24500)));
    assert_eq!(stage.gauge_difference, None);
    assert_eq!(aggregate.event.discharged_volume, dec!(12000));
    assert_eq!(aggregate.event.status, UnloadingStatus::InProgress);

    let (aggregate, _) = harness
        .service
        .add_stage(id, new_stage(22, dec!(18000)))
        .await
        .unwrap();
    assert_eq!(aggregate.event.discharged_volume, dec!(30000));
    assert_eq!(aggregate.event.status, UnloadingStatus::Complete);

    let events = harness.drain_events();
    assert!(events.contains(&Event::UnloadingStatusChanged {
        unloading_id: id,
        old_status: UnloadingStatus::Pending,
        new_status: UnloadingStatus::InProgress,
    }));
    assert!(events.contains(&Event::UnloadingCompleted(id)));

    // Stored state matches what the service returned.
    let stored = harness.service.get(id).await.unwrap();
    assert_eq!(stored.event.discharged_volume, dec!(30000));
    assert_eq!(stored.stages.len(), 2);
}

#[tokio::test]
async fn stages_come_back_ordered_by_date() {
    let harness = TestService::new().await;
    let id = harness
        .service
        .create(new_unloading(dec!(100), Some(Decimal::ZERO)))
        .await
        .unwrap()
        .event
        .id;

    harness
        .service
        .add_stage(id, new_stage(23, dec!(10)))
        .await
        .unwrap();
    harness
        .service
        .add_stage(id, new_stage(22, dec!(15.5)))
        .await
        .unwrap();

    let aggregate = harness.service.get(id).await.unwrap();
    let dates: Vec<_> = aggregate.stages.iter().map(|s| s.stage_date).collect();
    assert_eq!(dates, vec![date(22), date(23)]);
    assert_eq!(aggregate.event.discharged_volume, dec!(25.5));
}

#[tokio::test]
async fn removing_and_editing_stages_keeps_the_event_consistent() {
    let harness = TestService::new().await;
    let id = harness
        .service
        .create(new_unloading(dec!(40), Some(Decimal::ZERO)))
        .await
        .unwrap()
        .event
        .id;

    let (_, first) = harness
        .service
        .add_stage(id, new_stage(21, dec!(20)))
        .await
        .unwrap();
    let (aggregate, second) = harness
        .service
        .add_stage(id, new_stage(22, dec!(20)))
        .await
        .unwrap();
    assert_eq!(aggregate.event.status, UnloadingStatus::Complete);

    let aggregate = harness.service.remove_stage(id, second.id).await.unwrap();
    assert_eq!(aggregate.event.discharged_volume, dec!(20));
    assert_eq!(aggregate.event.status, UnloadingStatus::InProgress);
    assert_eq!(aggregate.stages.len(), 1);

    let mut edit = new_stage(21, dec!(10));
    edit.readings.gauge_stock_before = Some(dec!(1000));
    edit.readings.gauge_stock_after = Some(dec!(1012.25));
    let (aggregate, updated) = harness
        .service
        .update_stage(id, first.id, edit)
        .await
        .unwrap();
    assert_eq!(updated.id, first.id);
    assert_eq!(updated.created_at, first.created_at);
    assert_eq!(updated.gauge_difference, Some(dec!(2.25)));
    assert_eq!(aggregate.event.discharged_volume, dec!(10));
    assert_eq!(aggregate.event.status, UnloadingStatus::InProgress);

    let missing = harness.service.remove_stage(id, Uuid::new_v4()).await;
    assert_matches!(missing, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn partial_survives_edits_until_recomputed() {
    let harness = TestService::new().await;
    let id = harness
        .service
        .create(new_unloading(dec!(40), Some(Decimal::ZERO)))
        .await
        .unwrap()
        .event
        .id;
    harness
        .service
        .add_stage(id, new_stage(21, dec!(20)))
        .await
        .unwrap();

    let aggregate = harness
        .service
        .set_status(id, UnloadingStatus::Partial)
        .await
        .unwrap();
    assert_eq!(aggregate.event.status, UnloadingStatus::Partial);

    let edit = UnloadingEdit {
        load_date: date(20),
        unload_date: date(21),
        readings: StockReadings {
            system_stock_before: Some(dec!(100)),
            system_stock_after: Some(dec!(85)),
            gauge_stock_before: None,
            gauge_stock_after: None,
        },
        refuel_during_unload: Some(dec!(25)),
        temperature: Some(dec!(25.5)),
        density: None,
        notes: Some("second truck pending".into()),
    };
    let aggregate = harness.service.update(id, edit).await.unwrap();
    assert_eq!(aggregate.event.status, UnloadingStatus::Partial);
    // (85 - 100) - 20 + 25
    assert_eq!(aggregate.event.system_difference, Some(dec!(-10)));
    assert_eq!(aggregate.event.temperature, Some(dec!(25.5)));

    let aggregate = harness.service.recompute(id).await.unwrap();
    assert_eq!(aggregate.event.status, UnloadingStatus::InProgress);
    assert_eq!(aggregate.event.system_difference, Some(dec!(-10)));
}

#[tokio::test]
async fn deleting_an_unloading_removes_its_stages() {
    let mut harness = TestService::new().await;
    let id = harness
        .service
        .create(new_unloading(dec!(40), Some(Decimal::ZERO)))
        .await
        .unwrap()
        .event
        .id;
    harness
        .service
        .add_stage(id, new_stage(21, dec!(10)))
        .await
        .unwrap();
    harness
        .service
        .add_stage(id, new_stage(22, dec!(10)))
        .await
        .unwrap();
    harness.drain_events();

    harness.service.delete(id).await.unwrap();

    let remaining = unloading_stage::Entity::find()
        .filter(unloading_stage::Column::UnloadingId.eq(id))
        .count(harness.pool.as_ref())
        .await
        .unwrap();
    assert_eq!(remaining, 0);
    assert_matches!(harness.service.get(id).await, Err(ServiceError::NotFound(_)));
    assert_eq!(
        harness.drain_events(),
        vec![Event::UnloadingDeleted {
            unloading_id: id,
            stages_removed: 2,
        }]
    );

    assert_matches!(harness.service.delete(id).await, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn one_unloading_per_freight() {
    let harness = TestService::new().await;
    let input = new_unloading(dec!(100), None);
    let duplicate = input.clone();

    harness.service.create(input).await.unwrap();
    let result = harness.service.create(duplicate).await;

    assert_matches!(result, Err(ServiceError::Conflict(_)));
}

#[tokio::test]
async fn over_delivery_is_flagged_not_rejected() {
    let mut harness = TestService::new().await;
    let id = harness
        .service
        .create(new_unloading(dec!(100), Some(Decimal::ZERO)))
        .await
        .unwrap()
        .event
        .id;

    harness
        .service
        .add_stage(id, new_stage(21, dec!(60)))
        .await
        .unwrap();
    let (aggregate, _) = harness
        .service
        .add_stage(id, new_stage(22, dec!(60)))
        .await
        .unwrap();

    assert_eq!(aggregate.event.status, UnloadingStatus::Complete);
    assert!(aggregate.is_over_delivered());

    let events = harness.drain_events();
    let flagged: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, Event::UnloadingOverDelivered { .. }))
        .collect();
    assert_eq!(
        flagged,
        vec![&Event::UnloadingOverDelivered {
            unloading_id: id,
            total_volume: dec!(100),
            discharged_volume: dec!(120),
        }]
    );

    let summary = harness.service.summary(id).await.unwrap();
    assert!(summary.ends_with("Over-delivery: 20 above declared volume"));
}

#[tokio::test]
async fn invalid_input_is_rejected_before_touching_the_database() {
    let harness = TestService::new().await;

    let mut input = new_unloading(Decimal::ZERO, None);
    assert_matches!(
        harness.service.create(input.clone()).await,
        Err(ServiceError::ValidationError(_))
    );

    input.total_volume = dec!(100);
    input.load_date = date(25);
    assert_matches!(
        harness.service.create(input).await,
        Err(ServiceError::ValidationError(_))
    );

    let id = harness
        .service
        .create(new_unloading(dec!(100), Some(Decimal::ZERO)))
        .await
        .unwrap()
        .event
        .id;
    let negative = new_stage(21, dec!(-1));
    assert_matches!(
        harness.service.add_stage(id, negative).await,
        Err(ServiceError::ValidationError(_))
    );

    assert_matches!(
        harness
            .service
            .add_stage(Uuid::new_v4(), new_stage(21, dec!(1)))
            .await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn list_filters_and_paginates() {
    let harness = TestService::new().await;
    for day in 21..=25 {
        let mut input = new_unloading(dec!(100), if day % 2 == 0 { Some(Decimal::ZERO) } else { None });
        input.unload_date = date(day);
        harness.service.create(input).await.unwrap();
    }

    let (items, total) = harness
        .service
        .list(UnloadingFilter::default(), 1, 2)
        .await
        .unwrap();
    assert_eq!(total, 5);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].unload_date, date(25));

    let (items, total) = harness
        .service
        .list(
            UnloadingFilter {
                status: Some(UnloadingStatus::Pending),
                ..Default::default()
            },
            1,
            10,
        )
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert!(items.iter().all(|i| i.status == UnloadingStatus::Pending));

    let (items, total) = harness
        .service
        .list(
            UnloadingFilter {
                date_from: Some(date(22)),
                date_to: Some(date(23)),
                ..Default::default()
            },
            1,
            10,
        )
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(items[0].unload_date, date(23));
    assert_eq!(items[1].unload_date, date(22));

    let (items, total) = harness
        .service
        .list(UnloadingFilter::default(), 3, 2)
        .await
        .unwrap();
    assert_eq!(total, 5);
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn figures_beyond_the_stored_range_are_rejected() {
    let harness = TestService::new().await;

    let mut input = new_unloading(dec!(100), None);
    input.readings.system_stock_before = Some(Decimal::ZERO);
    input.readings.system_stock_after = Some(Decimal::MAX);
    input.refuel_during_unload = Some(Decimal::MAX);
    assert_matches!(
        harness.service.create(input).await,
        Err(ServiceError::ValidationError(_))
    );

    let mut too_precise = new_unloading(dec!(100), None);
    too_precise.density = Some(dec!(0.74512));
    assert_matches!(
        harness.service.create(too_precise).await,
        Err(ServiceError::ValidationError(_))
    );

    let id = harness
        .service
        .create(new_unloading(dec!(9000000000), Some(Decimal::ZERO)))
        .await
        .unwrap()
        .event
        .id;

    let mut huge_stage = new_stage(21, dec!(1));
    huge_stage.readings.gauge_stock_after = Some(Decimal::MAX);
    huge_stage.refuel_during_stage = Some(Decimal::MAX);
    assert_matches!(
        harness.service.add_stage(id, huge_stage).await,
        Err(ServiceError::ValidationError(_))
    );

    // Each stage fits, but their sum would not.
    harness
        .service
        .add_stage(id, new_stage(21, dec!(6000000000)))
        .await
        .unwrap();
    assert_matches!(
        harness
            .service
            .add_stage(id, new_stage(22, dec!(6000000000)))
            .await,
        Err(ServiceError::ValidationError(_))
    );

    let stored = harness.service.get(id).await.unwrap();
    assert_eq!(stored.stages.len(), 1);
    assert_eq!(stored.event.discharged_volume, dec!(6000000000));
}
