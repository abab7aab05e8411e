use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Slots::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Slots::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(Slots::School).text().not_null())
                    .col(ColumnDef::new(Slots::Region).text().not_null())
                    .col(ColumnDef::new(Slots::Date).text().not_null())
                    .col(ColumnDef::new(Slots::TimeWindow).text().not_null())
                    .col(
                        ColumnDef::new(Slots::PrimaryCapacity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Slots::WaitlistCapacity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Slots::AppliedCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Slots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Slots::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_slots_date")
                    .table(Slots::Table)
                    .col(Slots::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Applications::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Applications::SlotId).text().not_null())
                    .col(ColumnDef::new(Applications::TeacherId).text().not_null())
                    .col(ColumnDef::new(Applications::Id).text().not_null())
                    .col(ColumnDef::new(Applications::TeacherEmail).text().not_null())
                    .col(ColumnDef::new(Applications::TeacherName).text().not_null())
                    .col(
                        ColumnDef::new(Applications::Status)
                            .text()
                            .not_null()
                            .default("applied"),
                    )
                    .col(
                        ColumnDef::new(Applications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(Applications::SlotId)
                            .col(Applications::TeacherId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_applications_teacher_id")
                    .table(Applications::Table)
                    .col(Applications::TeacherId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Applications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Slots::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Slots {
    Table,
    Id,
    School,
    Region,
    Date,
    TimeWindow,
    PrimaryCapacity,
    WaitlistCapacity,
    AppliedCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Applications {
    Table,
    Id,
    SlotId,
    TeacherId,
    TeacherEmail,
    TeacherName,
    Status,
    CreatedAt,
}
