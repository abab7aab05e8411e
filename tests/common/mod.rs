#![allow(dead_code)]

use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use slot_reservation_store::entity::slot;
use slot_reservation_store::migration::Migrator;
use slot_reservation_store::model::current_timestamp;
use slot_reservation_store::{
    MemoryStore, NewApplication, NewSlot, NewStudent, ReservationStore, SeaOrmStore, Slot,
    SlotId, TeacherId,
};

/// In-memory SQLite with the reservation schema applied.
///
/// One pooled connection, so every test sees the same database.
pub async fn sqlite_connection() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let conn = Database::connect(opt)
        .await
        .expect("Failed to open sqlite memory database");
    Migrator::up(&conn, None)
        .await
        .expect("Failed to run migrations");
    conn
}

/// Named shared-cache SQLite database behind a pool of `connections` connections.
///
/// Unlike [`sqlite_connection`], transactions here really run side by side.
pub async fn shared_sqlite_store(connections: u32) -> SeaOrmStore {
    let name = uuid::Uuid::new_v4().simple().to_string();
    let mut opt = ConnectOptions::new(format!(
        "sqlite:file:race_{name}?mode=memory&cache=shared"
    ));
    opt.max_connections(connections)
        .min_connections(connections)
        .sqlx_logging(false);

    let conn = Database::connect(opt)
        .await
        .expect("Failed to open shared sqlite memory database");
    Migrator::up(&conn, None)
        .await
        .expect("Failed to run migrations");
    SeaOrmStore::new(conn)
}

pub async fn sqlite_store() -> SeaOrmStore {
    SeaOrmStore::new(sqlite_connection().await)
}

pub fn memory_backend() -> Arc<dyn ReservationStore> {
    Arc::new(MemoryStore::new())
}

pub async fn sqlite_backend() -> Arc<dyn ReservationStore> {
    Arc::new(sqlite_store().await)
}

/// Memory store starting from slots with fixed ids.
pub async fn memory_with_slots(slots: Vec<Slot>) -> Arc<dyn ReservationStore> {
    Arc::new(MemoryStore::with_slots(slots))
}

/// SQLite store with slot rows written directly, bypassing id generation.
pub async fn sqlite_with_slots(slots: Vec<Slot>) -> Arc<dyn ReservationStore> {
    let store = sqlite_store().await;
    for seeded in &slots {
        insert_slot_row(store.connection(), seeded).await;
    }
    Arc::new(store)
}

pub async fn insert_slot_row(conn: &DatabaseConnection, seeded: &Slot) {
    let now = chrono::Utc::now().fixed_offset();
    slot::ActiveModel {
        id: Set(seeded.id.to_string()),
        school: Set(seeded.school.clone()),
        region: Set(seeded.region.clone()),
        date: Set(seeded.date.clone()),
        time_window: Set(seeded.time_window.clone()),
        primary_capacity: Set(seeded.primary_capacity as i32),
        waitlist_capacity: Set(seeded.waitlist_capacity as i32),
        applied_count: Set(seeded.applied_count as i32),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .expect("Failed to seed slot row");
}

/// A slot with a caller-chosen id, e.g. one containing `_`.
pub fn seeded_slot(id: &str, primary: u32, waitlist: u32) -> Slot {
    Slot::from_new(
        SlotId::from(id),
        new_slot("2026-03-02", primary, waitlist),
        current_timestamp(),
    )
    .expect("seed capacities fit")
}

pub fn new_slot(date: &str, primary: u32, waitlist: u32) -> NewSlot {
    NewSlot {
        school: format!("School {date}"),
        region: "Seoul Gangnam".into(),
        date: date.into(),
        time_window: "09:00-12:00".into(),
        primary_capacity: primary,
        waitlist_capacity: waitlist,
    }
}

pub fn application(slot_id: &SlotId, teacher: &str) -> NewApplication {
    NewApplication {
        slot_id: slot_id.clone(),
        teacher_id: TeacherId::from(teacher),
        teacher_email: format!("{teacher}@example.org"),
        teacher_name: teacher.to_uppercase(),
    }
}

pub fn student(name: &str, grade: &str, class_num: &str, number: &str) -> NewStudent {
    NewStudent {
        grade: grade.into(),
        class_num: class_num.into(),
        number: number.into(),
        name: name.into(),
        gender: String::new(),
        notes: String::new(),
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
