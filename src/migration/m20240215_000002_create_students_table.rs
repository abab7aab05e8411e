use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(Students::SlotId).text().not_null())
                    .col(ColumnDef::new(Students::Grade).text().not_null().default(""))
                    .col(ColumnDef::new(Students::ClassNum).text().not_null().default(""))
                    .col(ColumnDef::new(Students::Number).text().not_null().default(""))
                    .col(ColumnDef::new(Students::Name).text().not_null())
                    .col(ColumnDef::new(Students::Gender).text().not_null().default(""))
                    .col(ColumnDef::new(Students::Notes).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Students::CreatedAt)
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
                    .name("idx_students_slot_id")
                    .table(Students::Table)
                    .col(Students::SlotId)
                    .col(Students::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
    SlotId,
    Grade,
    ClassNum,
    Number,
    Name,
    Gender,
    Notes,
    CreatedAt,
}
