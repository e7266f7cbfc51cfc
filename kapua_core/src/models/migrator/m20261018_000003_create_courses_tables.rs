use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Course::Table)
                    .col(pk_uuid(Course::Id))
                    .col(uuid_null(Course::SubjectId))
                    .col(uuid_null(Course::InstructionalYearLevelId))
                    .col(string_len(Course::Name, 64))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_subject_id")
                            .from(Course::Table, Course::SubjectId)
                            .to(Subject::Table, Subject::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_instructional_year_level_id")
                            .from(Course::Table, Course::InstructionalYearLevelId)
                            .to(InstructionalYearLevel::Table, InstructionalYearLevel::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Page::Table)
                    .col(pk_uuid(Page::Id))
                    .col(uuid(Page::CourseId))
                    .col(uuid_null(Page::ParentId))
                    .col(string_len(Page::Name, 64))
                    .col(text(Page::Content))
                    .col(string_len_null(Page::ContentKind, 16))
                    .col(uuid_null(Page::ContentId))
                    .col(text(Page::Path))
                    .col(integer(Page::Depth))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_page_course_id")
                            .from(Page::Table, Page::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_page_parent_id")
                            .from(Page::Table, Page::ParentId)
                            .to(Page::Table, Page::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_page_course_id")
                    .table(Page::Table)
                    .col(Page::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_page_parent_id")
                    .table(Page::Table)
                    .col(Page::ParentId)
                    .to_owned(),
            )
            .await?;

        // Subtree lookups are prefix scans on path
        manager
            .create_index(
                Index::create()
                    .name("idx_page_path")
                    .table(Page::Table)
                    .col(Page::Path)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Page::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Course::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Course {
    Table,
    Id,
    SubjectId,
    InstructionalYearLevelId,
    Name,
}

#[derive(DeriveIden)]
pub enum Page {
    Table,
    Id,
    CourseId,
    ParentId,
    Name,
    Content,
    ContentKind,
    ContentId,
    Path,
    Depth,
}

#[derive(DeriveIden)]
enum Subject {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum InstructionalYearLevel {
    Table,
    Id,
}
