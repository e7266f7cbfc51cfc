use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubjectGroup::Table)
                    .col(pk_uuid(SubjectGroup::Id))
                    .col(string_len(SubjectGroup::Name, 64))
                    .col(string_len(SubjectGroup::Slug, 64))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subject::Table)
                    .col(pk_uuid(Subject::Id))
                    .col(string_len(Subject::MinistryCode, 4))
                    .col(string_len(Subject::Name, 64))
                    .col(string_len(Subject::Slug, 64))
                    .col(uuid(Subject::GroupId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subject_group_id")
                            .from(Subject::Table, Subject::GroupId)
                            .to(SubjectGroup::Table, SubjectGroup::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create index on group_id
        manager
            .create_index(
                Index::create()
                    .name("idx_subject_group_id")
                    .table(Subject::Table)
                    .col(Subject::GroupId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InstructionalYearLevel::Table)
                    .col(pk_uuid(InstructionalYearLevel::Id))
                    .col(string_len(InstructionalYearLevel::MinistryCode, 4))
                    .col(string_len(InstructionalYearLevel::Description, 32))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InstructionalYearLevel::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subject::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubjectGroup::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SubjectGroup {
    Table,
    Id,
    Name,
    Slug,
}

#[derive(DeriveIden)]
pub enum Subject {
    Table,
    Id,
    MinistryCode,
    Name,
    Slug,
    GroupId,
}

#[derive(DeriveIden)]
pub enum InstructionalYearLevel {
    Table,
    Id,
    MinistryCode,
    Description,
}
