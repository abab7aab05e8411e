//! Application entity model for Sea-ORM database interaction.

use sea_orm::entity::prelude::*;

/// Sea-ORM entity model representing a teacher's application to a slot.
///
/// The primary key is the `(slot_id, teacher_id)` pair, so the database itself
/// refuses a second application for the same pair. `id` carries the
/// `"{slot_id}_{teacher_id}"` label but is not unique on its own: ids containing
/// `_` can produce the same string for different pairs.
///
/// No foreign key to `slots` is declared. Deleting a slot removes its applications
/// in the same transaction; orphans written by anything else are filtered out when
/// listing.
///
/// # Database Schema
///
/// | Column        | Type               | Description                        |
/// |---------------|--------------------|------------------------------------|
/// | slot_id       | TEXT (Primary Key) | Referenced slot                    |
/// | teacher_id    | TEXT (Primary Key) | Applying teacher, indexed          |
/// | id            | TEXT               | `slot_id` + `_` + `teacher_id`     |
/// | teacher_email | TEXT               | Snapshot at apply time             |
/// | teacher_name  | TEXT               | Snapshot at apply time             |
/// | status        | TEXT               | Always `applied`                   |
/// | created_at    | TIMESTAMPTZ        | Apply time                         |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    /// Slot applied to. First half of the primary key.
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub slot_id: String,

    /// Applying teacher. Second half of the primary key.
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub teacher_id: String,

    /// Display label `"{slot_id}_{teacher_id}"`.
    #[sea_orm(column_type = "Text")]
    pub id: String,

    /// Teacher email as it was when the application was made.
    pub teacher_email: String,

    /// Teacher name as it was when the application was made.
    pub teacher_name: String,

    /// Application state; only `applied` is ever written.
    pub status: String,

    /// When the application was admitted.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::slot::Entity",
        from = "Column::SlotId",
        to = "super::slot::Column::Id"
    )]
    Slot,
}

impl Related<super::slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
