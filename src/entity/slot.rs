//! Slot entity model for Sea-ORM database interaction.

use sea_orm::entity::prelude::*;

/// Sea-ORM entity model representing a slot.
///
/// # Database Schema
///
/// | Column            | Type               | Description                              |
/// |-------------------|--------------------|------------------------------------------|
/// | id                | TEXT (Primary Key) | Opaque slot id                           |
/// | school            | TEXT               | School name                              |
/// | region            | TEXT               | Region label                             |
/// | date              | TEXT               | `YYYY-MM-DD`, used for ordering          |
/// | time_window       | TEXT               | Free-form time range                     |
/// | primary_capacity  | INTEGER            | Guaranteed seats                         |
/// | waitlist_capacity | INTEGER            | Overflow seats                           |
/// | applied_count     | INTEGER            | Active applications, only changed by apply/cancel |
/// | created_at        | TIMESTAMPTZ        | Creation time                            |
/// | updated_at        | TIMESTAMPTZ        | Last write                               |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "slots")]
pub struct Model {
    /// Unique identifier for the slot (primary key).
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,

    /// Name of the school being visited.
    pub school: String,

    /// Region label shown next to the school.
    pub region: String,

    /// Visit date as `YYYY-MM-DD`; sorts lexicographically.
    pub date: String,

    /// Time range of the visit, not validated.
    pub time_window: String,

    /// Seats in the primary band.
    pub primary_capacity: i32,

    /// Seats in the waitlist band.
    pub waitlist_capacity: i32,

    /// Number of rows in `applications` for this slot.
    pub applied_count: i32,

    /// When the slot was created.
    pub created_at: DateTimeWithTimeZone,

    /// Last administrator edit, apply or cancel.
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::application::Entity")]
    Application,
    #[sea_orm(has_many = "super::student::Entity")]
    Student,
}

impl Related<super::application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Application.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
