//! Database entity models for slot-reservation-store.
//!
//! This module contains the Sea-ORM entity definitions used by [`crate::SeaOrmStore`].
//! They describe the three tables the reservation engine persists: `slots`,
//! `applications` and `students`. The bundled migrator (feature `migration`) creates
//! all of them.

/// Slot entity: one row per schedulable counseling session.
pub mod slot;

/// Application entity: one row per (slot, teacher) pair.
pub mod application;

/// Student entity: one row per student on a slot's roster.
pub mod student;
