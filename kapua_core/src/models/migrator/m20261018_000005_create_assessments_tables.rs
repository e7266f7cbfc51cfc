use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // content_kind/content_id is a polymorphic pointer, so no foreign key.
        manager
            .create_table(
                Table::create()
                    .table(Assessment::Table)
                    .col(pk_uuid(Assessment::Id))
                    .col(string_len_null(Assessment::Name, 32))
                    .col(string_len(Assessment::ContentKind, 16))
                    .col(uuid(Assessment::ContentId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_assessment_content")
                    .table(Assessment::Table)
                    .col(Assessment::ContentKind)
                    .col(Assessment::ContentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Grade::Table)
                    .col(pk_uuid(Grade::Id))
                    .col(uuid(Grade::AssessmentId))
                    .col(uuid(Grade::StudentId))
                    .col(decimal_len_null(Grade::Score, 10, 9))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grade_assessment_id")
                            .from(Grade::Table, Grade::AssessmentId)
                            .to(Assessment::Table, Assessment::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grade_student_id")
                            .from(Grade::Table, Grade::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One grade per student per assessment
        manager
            .create_index(
                Index::create()
                    .name("idx_grade_assessment_student")
                    .table(Grade::Table)
                    .col(Grade::AssessmentId)
                    .col(Grade::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Submission::Table)
                    .col(pk_uuid(Submission::Id))
                    .col(uuid(Submission::AssessmentId))
                    .col(uuid(Submission::StudentId))
                    .col(timestamp_with_time_zone(Submission::Created))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submission_assessment_id")
                            .from(Submission::Table, Submission::AssessmentId)
                            .to(Assessment::Table, Assessment::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_submission_student_id")
                            .from(Submission::Table, Submission::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_assessment_id")
                    .table(Submission::Table)
                    .col(Submission::AssessmentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Submission::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Grade::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assessment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Assessment {
    Table,
    Id,
    Name,
    ContentKind,
    ContentId,
}

#[derive(DeriveIden)]
pub enum Grade {
    Table,
    Id,
    AssessmentId,
    StudentId,
    Score,
}

#[derive(DeriveIden)]
pub enum Submission {
    Table,
    Id,
    AssessmentId,
    StudentId,
    Created,
}

#[derive(DeriveIden)]
enum Student {
    Table,
    Id,
}
