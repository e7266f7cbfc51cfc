use sea_orm_migration::prelude::*;

mod m20261018_000001_create_people_tables;
mod m20261018_000002_create_subjects_tables;
mod m20261018_000003_create_courses_tables;
mod m20261018_000004_create_students_tables;
mod m20261018_000005_create_assessments_tables;
mod m20261018_000006_create_scheduling_tables;
mod m20261018_000007_create_attendance_tables;
mod m20261018_000008_create_events_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261018_000001_create_people_tables::Migration),
            Box::new(m20261018_000002_create_subjects_tables::Migration),
            Box::new(m20261018_000003_create_courses_tables::Migration),
            Box::new(m20261018_000004_create_students_tables::Migration),
            Box::new(m20261018_000005_create_assessments_tables::Migration),
            Box::new(m20261018_000006_create_scheduling_tables::Migration),
            Box::new(m20261018_000007_create_attendance_tables::Migration),
            Box::new(m20261018_000008_create_events_tables::Migration),
        ]
    }
}

#[cfg(test)]
use sea_orm::{Database, DbErr};

#[tokio::test]
async fn test_migrations_okay() -> Result<(), DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    let schema_manager = SchemaManager::new(&db);

    Migrator::refresh(&db).await?;

    for table in [
        "person",
        "place",
        "auth_group",
        "subject_group",
        "subject",
        "instructional_year_level",
        "course",
        "page",
        "school",
        "student_type",
        "zoning_status",
        "exchange_scheme",
        "eligibility_criteria",
        "leave_reason",
        "student",
        "school_enrolment",
        "assessment",
        "grade",
        "submission",
        "schedule",
        "activity",
        "schedule_activity",
        "enrolment",
        "attendance_code",
        "attendance",
        "event_type",
        "event",
        "event_group",
    ] {
        assert!(schema_manager.has_table(table).await?, "missing table {table}");
    }

    Ok(())
}

#[tokio::test]
async fn test_migrations_roll_back() -> Result<(), DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    let schema_manager = SchemaManager::new(&db);

    Migrator::up(&db, None).await?;
    Migrator::down(&db, None).await?;

    assert!(!schema_manager.has_table("student").await?);
    assert!(!schema_manager.has_table("page").await?);

    Ok(())
}
