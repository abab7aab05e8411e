//! Schema migrations for the reservation tables.
//!
//! Run them with [`Migrator::up`] before handing a connection to
//! [`crate::SeaOrmStore`], or let [`crate::connect`] do it when
//! [`crate::StoreConfig::run_migrations`] is set.

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_reservation_tables;
mod m20240215_000002_create_students_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    // Override the name of migration table to avoid conflicts
    fn migration_table_name() -> sea_orm::DynIden {
        Alias::new("slot_reservation_migrations").into_iden()
    }

    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_reservation_tables::Migration),
            Box::new(m20240215_000002_create_students_table::Migration),
        ]
    }
}
