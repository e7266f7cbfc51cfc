use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Schedule::Table)
                    .col(pk_uuid(Schedule::Id))
                    .col(string_len(Schedule::Name, 32))
                    .col(uuid(Schedule::CourseId))
                    .col(timestamp_with_time_zone(Schedule::Created))
                    .col(timestamp_with_time_zone(Schedule::LastModified))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_course_id")
                            .from(Schedule::Table, Schedule::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Activity::Table)
                    .col(pk_uuid(Activity::Id))
                    .col(string_len(Activity::Subject, 64))
                    .col(boolean(Activity::TrackAttendance).default(true))
                    .col(timestamp_with_time_zone(Activity::Start))
                    .col(timestamp_with_time_zone(Activity::End))
                    .col(timestamp_with_time_zone(Activity::Created))
                    .col(timestamp_with_time_zone(Activity::LastModified))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ScheduleActivity::Table)
                    .col(uuid(ScheduleActivity::ScheduleId))
                    .col(uuid(ScheduleActivity::ActivityId))
                    .primary_key(
                        Index::create()
                            .col(ScheduleActivity::ScheduleId)
                            .col(ScheduleActivity::ActivityId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_activity_schedule_id")
                            .from(ScheduleActivity::Table, ScheduleActivity::ScheduleId)
                            .to(Schedule::Table, Schedule::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_schedule_activity_activity_id")
                            .from(ScheduleActivity::Table, ScheduleActivity::ActivityId)
                            .to(Activity::Table, Activity::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_schedule_activity_activity_id")
                    .table(ScheduleActivity::Table)
                    .col(ScheduleActivity::ActivityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Enrolment::Table)
                    .col(pk_uuid(Enrolment::Id))
                    .col(uuid(Enrolment::StudentId))
                    .col(uuid(Enrolment::ScheduleId))
                    .col(date(Enrolment::Start))
                    .col(date_null(Enrolment::End))
                    .check(
                        Expr::col(Enrolment::End)
                            .is_null()
                            .or(Expr::col(Enrolment::Start).lte(Expr::col(Enrolment::End))),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrolment_student_id")
                            .from(Enrolment::Table, Enrolment::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrolment_schedule_id")
                            .from(Enrolment::Table, Enrolment::ScheduleId)
                            .to(Schedule::Table, Schedule::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrolment_schedule_id")
                    .table(Enrolment::Table)
                    .col(Enrolment::ScheduleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrolment_student_id")
                    .table(Enrolment::Table)
                    .col(Enrolment::StudentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Enrolment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScheduleActivity::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Activity::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Schedule::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Schedule {
    Table,
    Id,
    Name,
    CourseId,
    Created,
    LastModified,
}

#[derive(DeriveIden)]
pub enum Activity {
    Table,
    Id,
    Subject,
    TrackAttendance,
    Start,
    End,
    Created,
    LastModified,
}

#[derive(DeriveIden)]
pub enum ScheduleActivity {
    Table,
    ScheduleId,
    ActivityId,
}

#[derive(DeriveIden)]
pub enum Enrolment {
    Table,
    Id,
    StudentId,
    ScheduleId,
    Start,
    End,
}

#[derive(DeriveIden)]
enum Course {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Student {
    Table,
    Id,
}
