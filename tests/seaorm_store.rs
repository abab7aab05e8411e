#![cfg(feature = "migration")]

mod common;

use std::sync::Arc;

use sea_orm::{EntityTrait, PaginatorTrait};
use sea_orm_migration::MigratorTrait;
use slot_reservation_store::entity::{application, slot, student};
use slot_reservation_store::migration::Migrator;
use slot_reservation_store::{
    connect, ReservationError, ReservationStore, SlotId, StoreConfig, TeacherId,
};

use common::{application as new_application, new_slot};

#[tokio::test]
async fn rows_use_composite_application_keys() {
    let store = common::sqlite_store().await;
    let slot = store.create_slot(new_slot("2026-02-16", 2, 1)).await.unwrap();
    store
        .apply(new_application(&slot.id, "teacher-1"))
        .await
        .unwrap();

    let row = application::Entity::find_by_id((slot.id.to_string(), "teacher-1".to_string()))
        .one(store.connection())
        .await
        .unwrap()
        .expect("application row");
    assert_eq!(row.id, format!("{}_teacher-1", slot.id));
    assert_eq!(row.slot_id, slot.id.to_string());
    assert_eq!(row.status, "applied");

    let slot_row = slot::Entity::find_by_id(slot.id.to_string())
        .one(store.connection())
        .await
        .unwrap()
        .expect("slot row");
    assert_eq!(slot_row.applied_count, 1);
    assert_eq!(slot_row.primary_capacity, 2);
    assert_eq!(slot_row.waitlist_capacity, 1);
}

#[tokio::test]
async fn failed_apply_leaves_no_rows_behind() {
    let store = common::sqlite_store().await;
    let slot = store.create_slot(new_slot("2026-02-16", 1, 0)).await.unwrap();
    store.apply(new_application(&slot.id, "a")).await.unwrap();

    let err = store.apply(new_application(&slot.id, "b")).await.unwrap_err();
    assert!(matches!(err, ReservationError::SlotFull { .. }));

    let applications = application::Entity::find()
        .count(store.connection())
        .await
        .unwrap();
    assert_eq!(applications, 1);
    let slot_row = slot::Entity::find_by_id(slot.id.to_string())
        .one(store.connection())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(slot_row.applied_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_connections_never_overshoot_capacity() {
    common::init_tracing();
    let store = Arc::new(common::shared_sqlite_store(4).await);
    let slot = store.create_slot(new_slot("2026-02-16", 2, 1)).await.unwrap();

    let mut handles = Vec::new();
    for n in 0..12 {
        let store = store.clone();
        let slot_id = slot.id.clone();
        handles.push(tokio::spawn(async move {
            store
                .apply(new_application(&slot_id, &format!("racer-{n}")))
                .await
        }));
    }

    let mut admitted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(ReservationError::SlotFull { .. }) => {}
            // Lock conflicts between connections surface as store errors.
            Err(ReservationError::TransientStore(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert!(admitted <= 3, "admitted {admitted} applicants into 3 seats");

    let slot_row = slot::Entity::find_by_id(slot.id.to_string())
        .one(store.connection())
        .await
        .unwrap()
        .unwrap();
    let rows = application::Entity::find()
        .count(store.connection())
        .await
        .unwrap();
    assert_eq!(slot_row.applied_count, admitted);
    assert_eq!(rows, admitted as u64);

    // Whatever the race left over, the slot still fills to exactly its capacity.
    for n in 0..4 {
        let _ = store
            .apply(new_application(&slot.id, &format!("late-{n}")))
            .await;
    }
    let slot_row = slot::Entity::find_by_id(slot.id.to_string())
        .one(store.connection())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(slot_row.applied_count, 3);
    assert_eq!(
        application::Entity::find()
            .count(store.connection())
            .await
            .unwrap(),
        3
    );
}

#[tokio::test]
async fn student_batch_rows_are_stored_in_order() {
    let store = common::sqlite_store().await;
    let slot = store.create_slot(new_slot("2026-02-16", 1, 0)).await.unwrap();
    let added = store
        .add_students(
            &slot.id,
            vec![
                common::student("Hong", "3", "2", "15"),
                common::student("Kim", "3", "2", "16"),
            ],
        )
        .await
        .unwrap();

    let rows = student::Entity::find()
        .all(store.connection())
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.slot_id == slot.id.to_string()));
    let listed = store.list_students(&slot.id).await.unwrap();
    assert_eq!(listed, added);
}

#[tokio::test]
async fn closed_pool_is_a_transient_error() {
    let store = common::sqlite_store().await;
    let slot = store.create_slot(new_slot("2026-02-16", 1, 0)).await.unwrap();

    store.connection().clone().close().await.unwrap();

    let err = store.apply(new_application(&slot.id, "a")).await.unwrap_err();
    assert!(err.is_transient(), "unexpected error: {err:?}");
    assert!(!err.is_business());

    let err = store
        .cancel(&slot.id, &TeacherId::from("a"))
        .await
        .unwrap_err();
    assert!(err.is_transient());

    let err = store.list_slots().await.unwrap_err();
    assert!(matches!(err, ReservationError::TransientStore(_)));
}

#[tokio::test]
async fn migrations_can_run_twice() {
    let conn = common::sqlite_connection().await;
    Migrator::up(&conn, None).await.unwrap();

    let pending = Migrator::get_pending_migrations(&conn).await.unwrap();
    assert!(pending.is_empty());
}

#[tokio::test]
async fn connect_builds_a_migrated_database_store() {
    let mut config = StoreConfig::database("sqlite::memory:");
    config.max_connections = 1;
    config.min_connections = 1;

    let store = connect(&config).await.unwrap();
    let slot = store.create_slot(new_slot("2026-02-16", 1, 0)).await.unwrap();
    store.apply(new_application(&slot.id, "a")).await.unwrap();

    let listed = store.list_slots().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].applied_count, 1);
    assert!(format!("{store:?}").starts_with("SeaOrmStore"));
}

#[tokio::test]
async fn connect_defaults_to_memory() {
    let store = connect(&StoreConfig::memory()).await.unwrap();
    assert!(store.list_slots().await.unwrap().is_empty());
    assert!(store
        .get_slot(&SlotId::from("anything"))
        .await
        .unwrap()
        .is_none());
    assert!(format!("{store:?}").starts_with("MemoryStore"));
}
