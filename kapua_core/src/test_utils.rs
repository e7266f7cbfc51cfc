//! Shared fixtures for the service tests.
//!
//! Each call to [`setup_test_db`] hands out a fresh in-memory SQLite database
//! with every migration applied.

use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;

use crate::{
    entity::{course, person, student, student_type, zoning_status},
    ids::{CourseId, PersonId, StudentId, StudentTypeId, ZoningStatusId},
    models::migrator::Migrator,
};

pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub async fn create_course(db: &DatabaseConnection, name: &str) -> CourseId {
    let id = CourseId::new();
    course::ActiveModel {
        id: Set(id),
        subject_id: Set(None),
        instructional_year_level_id: Set(None),
        name: Set(name.to_owned()),
    }
    .insert(db)
    .await
    .expect("Failed to insert course");
    id
}

/// Insert a person and a student for them with the given National Student Number.
pub async fn create_student(
    db: &DatabaseConnection,
    first_name: &str,
    last_name: &str,
    ministry_id: i64,
) -> StudentId {
    let person_id = PersonId::new();
    person::ActiveModel {
        id: Set(person_id),
        first_name: Set(first_name.to_owned()),
        last_name: Set(last_name.to_owned()),
    }
    .insert(db)
    .await
    .expect("Failed to insert person");

    let student_type_id = StudentTypeId::new();
    student_type::ActiveModel {
        id: Set(student_type_id),
        ministry_code: Set("RE".to_owned()),
        description: Set("Regular student".to_owned()),
    }
    .insert(db)
    .await
    .expect("Failed to insert student type");

    let zoning_status_id = ZoningStatusId::new();
    zoning_status::ActiveModel {
        id: Set(zoning_status_id),
        ministry_code: Set("INZN".to_owned()),
        description: Set("In zone".to_owned()),
    }
    .insert(db)
    .await
    .expect("Failed to insert zoning status");

    let id = StudentId::new();
    student::ActiveModel {
        id: Set(id),
        person_id: Set(person_id),
        ministry_id: Set(ministry_id),
        orrs: Set(student::Orrs::NonOrrs),
        funding_year_level: Set(9),
        student_type_id: Set(student_type_id),
        zoning_status_id: Set(zoning_status_id),
        tuition_fee: Set(None),
        fulltime_equivalent: Set(None),
        exchange_scheme_id: Set(None),
        boarding_status: Set(false),
        eligibility_criteria_id: Set(None),
        year_level: Set(9),
    }
    .insert(db)
    .await
    .expect("Failed to insert student");

    id
}
