use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Person::Table)
                    .col(pk_uuid(Person::Id))
                    .col(string_len(Person::FirstName, 64))
                    .col(string_len(Person::LastName, 64))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Place::Table)
                    .col(pk_uuid(Place::Id))
                    .col(string_len(Place::Name, 64))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuthGroup::Table)
                    .col(pk_uuid(AuthGroup::Id))
                    .col(string_len_uniq(AuthGroup::Name, 80))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuthGroup::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Place::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Person::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Person {
    Table,
    Id,
    FirstName,
    LastName,
}

#[derive(DeriveIden)]
pub enum Place {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub enum AuthGroup {
    Table,
    Id,
    Name,
}
