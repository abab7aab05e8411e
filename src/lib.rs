//! # Slot Reservation Store
//!
//! Capacity-tracked applications to scheduled slots, with a primary band and a
//! waitlist band, persisted through [Sea-ORM](https://crates.io/crates/sea-orm) or
//! kept in memory.
//!
//! Teachers apply to school-visit slots; administrators create slots, manage capacity
//! and read rosters. This crate is the part that has to be right under concurrency:
//!
//! - at most one application per (slot, teacher),
//! - `0 <= applied_count <= primary_capacity + waitlist_capacity` between operations,
//! - apply and cancel change the ledger and the count together or not at all.
//!
//! ## Features
//!
//! - [`ReservationStore`] trait with a Sea-ORM backend ([`SeaOrmStore`]) and an
//!   in-memory backend ([`MemoryStore`])
//! - Derived slot status ([`SlotStatus`]) and per-band remaining seats
//! - Roster listing joined with live teacher profiles ([`ProfileDirectory`])
//! - Per-slot student rosters with batch add and counts ([`Student`])
//! - Backend selection from the environment ([`StoreConfig`], [`connect`])
//! - Bundled schema migrations (feature `migration`)
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use slot_reservation_store::{
//!     connect, MemoryProfiles, NewSlot, ReservationError, Reservations, StoreConfig, TeacherId,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // DATABASE_URL selects the database backend, otherwise memory is used
//! let store = connect(&StoreConfig::from_env()?).await?;
//! let reservations = Reservations::new(store, Arc::new(MemoryProfiles::new()));
//!
//! let slot = reservations
//!     .create_slot(NewSlot {
//!         school: "Haeundae Middle".into(),
//!         region: "Busan".into(),
//!         date: "2026-02-17".into(),
//!         time_window: "13:00-17:00".into(),
//!         primary_capacity: 2,
//!         waitlist_capacity: 1,
//!     })
//!     .await?;
//!
//! let teacher = TeacherId::from("teacher-7");
//! match reservations
//!     .apply(&slot.id, &teacher, "park@example.org", "Park")
//!     .await
//! {
//!     Ok(_) => println!("applied"),
//!     Err(e @ ReservationError::SlotFull { .. }) => println!("{e}"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Seat bands
//!
//! Whether an applicant sits in the primary or the waitlist band is not stored. It is
//! read off the current `applied_count`, so a cancellation can move the slot from
//! `waitlist-open` back to `in-progress` without touching any application.

pub mod config;
pub mod entity;
pub mod error;
#[cfg(feature = "migration")]
pub mod migration;
pub mod model;
pub mod profile;

mod memory_store;
mod seaorm_store;
mod service;
mod store;

pub use config::{connect, Backend, StoreConfig};
pub use error::{ConfigError, ProfileError, ReservationError};
pub use memory_store::MemoryStore;
pub use model::{
    summarize, Applicant, Application, ApplicationStatus, NewApplication, NewSlot, NewStudent,
    Slot, SlotId, SlotStatus, SlotSummary, SlotUpdate, Student, StudentId, TeacherId,
    MAX_CAPACITY,
};
pub use profile::{MemoryProfiles, ProfileDirectory, TeacherProfile};

/// The Sea-ORM store implementation.
///
/// See [`SeaOrmStore`] documentation for the transaction layout.
pub use seaorm_store::SeaOrmStore;

pub use service::Reservations;

/// Trait implemented by every storage backend.
pub use store::ReservationStore;
