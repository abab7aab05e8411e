//! Student entity model for Sea-ORM database interaction.

use sea_orm::entity::prelude::*;

/// Sea-ORM entity model representing a student on a slot's counseling roster.
///
/// # Database Schema
///
/// | Column     | Type               | Description                    |
/// |------------|--------------------|--------------------------------|
/// | id         | TEXT (Primary Key) | Random student id              |
/// | slot_id    | TEXT (indexed)     | Slot the student is booked on  |
/// | grade      | TEXT               | School year                    |
/// | class_num  | TEXT               | Class within the year          |
/// | number     | TEXT               | Number within the class        |
/// | name       | TEXT               | Student name                   |
/// | gender     | TEXT               | As entered                     |
/// | notes      | TEXT               | Free-form remarks              |
/// | created_at | TIMESTAMPTZ        | Roster order                   |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Unique identifier for the student entry (primary key).
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,

    /// Slot the student is booked on.
    #[sea_orm(column_type = "Text")]
    pub slot_id: String,

    /// School year, kept as entered.
    pub grade: String,

    /// Class within the year.
    pub class_num: String,

    /// Number within the class.
    pub number: String,

    /// Student name.
    pub name: String,

    /// Gender, kept as entered.
    pub gender: String,

    /// Remarks for the counselor.
    pub notes: String,

    /// Listing order; batch entries are one microsecond apart.
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
