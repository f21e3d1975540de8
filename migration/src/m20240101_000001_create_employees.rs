use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    FirstName,
    LastName,
    HireDate,
    Address,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::FirstName).string_len(128).not_null())
                    .col(ColumnDef::new(Employees::LastName).string_len(128).not_null())
                    .col(ColumnDef::new(Employees::HireDate).date().not_null())
                    .col(ColumnDef::new(Employees::Address).string_len(512).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employees_first_name")
                    .table(Employees::Table)
                    .col(Employees::FirstName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employees_last_name")
                    .table(Employees::Table)
                    .col(Employees::LastName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await
    }
}
