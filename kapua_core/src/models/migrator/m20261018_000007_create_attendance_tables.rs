use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AttendanceCode::Table)
                    .col(
                        ColumnDef::new(AttendanceCode::Code)
                            .char_len(1)
                            .not_null()
                            .primary_key(),
                    )
                    .col(boolean(AttendanceCode::InClass))
                    .col(string_len(AttendanceCode::Reason, 128))
                    .col(text(AttendanceCode::Explanation))
                    .col(char_len(AttendanceCode::AuditCode, 1))
                    .col(char_len(AttendanceCode::TruancyCode, 1))
                    .col(boolean(AttendanceCode::HalfDayCalc))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .col(pk_uuid(Attendance::Id))
                    .col(uuid(Attendance::ActivityId))
                    .col(uuid(Attendance::StudentId))
                    .col(char_len(Attendance::Code, 1))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_activity_id")
                            .from(Attendance::Table, Attendance::ActivityId)
                            .to(Activity::Table, Activity::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_student_id")
                            .from(Attendance::Table, Attendance::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_code")
                            .from(Attendance::Table, Attendance::Code)
                            .to(AttendanceCode::Table, AttendanceCode::Code)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A student has one mark per activity
        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_activity_student")
                    .table(Attendance::Table)
                    .col(Attendance::ActivityId)
                    .col(Attendance::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttendanceCode::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AttendanceCode {
    Table,
    Code,
    InClass,
    Reason,
    Explanation,
    AuditCode,
    TruancyCode,
    HalfDayCalc,
}

#[derive(DeriveIden)]
pub enum Attendance {
    Table,
    Id,
    ActivityId,
    StudentId,
    Code,
}

#[derive(DeriveIden)]
enum Activity {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Student {
    Table,
    Id,
}
