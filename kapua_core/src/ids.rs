//! Typed primary keys.
//!
//! Every table keyed by a generated id gets its own UUIDv7 newtype so ids of
//! different tables cannot be mixed up. v7 ids sort by creation time, which
//! the page tree relies on to keep siblings in creation order inside a
//! materialized path. `attendance_code` is the exception: its key is the
//! one character MoE code itself, so it has no id type here.

use sea_orm::{
    sea_query::{ArrayType, Nullable, ValueType, ValueTypeErr},
    DbErr, QueryResult, TryFromU64, TryGetError, TryGetable, Value,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A UUIDv7 newtype usable as a SeaORM column and serde value.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn into_uuid(self) -> Uuid {
                self.0
            }

            pub fn parse_str(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl TryFrom<String> for $name {
            type Error = uuid::Error;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Ok(Self(Uuid::parse_str(&s)?))
            }
        }

        impl<'a> TryFrom<&'a str> for $name {
            type Error = uuid::Error;

            fn try_from(s: &'a str) -> Result<Self, Self::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        // SeaORM trait implementations
        impl From<$name> for Value {
            fn from(id: $name) -> Self {
                Value::Uuid(Some(Box::new(id.0)))
            }
        }

        impl TryGetable for $name {
            fn try_get_by<I: sea_orm::ColIdx>(
                res: &QueryResult,
                idx: I,
            ) -> Result<Self, TryGetError> {
                let uuid: Uuid = res.try_get_by(idx).map_err(TryGetError::DbErr)?;
                Ok(Self(uuid))
            }
        }

        impl ValueType for $name {
            fn try_from(v: Value) -> Result<Self, ValueTypeErr> {
                match v {
                    Value::Uuid(Some(uuid)) => Ok(Self(*uuid)),
                    _ => Err(ValueTypeErr),
                }
            }

            fn type_name() -> String {
                stringify!($name).to_owned()
            }

            fn array_type() -> ArrayType {
                ArrayType::Uuid
            }

            fn column_type() -> sea_orm::ColumnType {
                sea_orm::ColumnType::Uuid
            }
        }

        impl Nullable for $name {
            fn null() -> Value {
                Value::Uuid(None)
            }
        }

        impl TryFromU64 for $name {
            fn try_from_u64(_: u64) -> Result<Self, DbErr> {
                Err(DbErr::ConvertFromU64(stringify!($name)))
            }
        }
    };
}

// People, places and groups
define_id!(PersonId);
define_id!(PlaceId);
define_id!(GroupId);

// Subjects and courses
define_id!(SubjectGroupId);
define_id!(SubjectId);
define_id!(InstructionalYearLevelId);
define_id!(CourseId);
define_id!(PageId);

// Assessments
define_id!(AssessmentId);
define_id!(GradeId);
define_id!(SubmissionId);

// Scheduling and attendance
define_id!(ScheduleId);
define_id!(ActivityId);
define_id!(EnrolmentId);
define_id!(AttendanceId);

// Events
define_id!(EventTypeId);
define_id!(EventId);

// Students and MoE reference tables
define_id!(SchoolId);
define_id!(StudentTypeId);
define_id!(ZoningStatusId);
define_id!(ExchangeSchemeId);
define_id!(EligibilityCriteriaId);
define_id!(LeaveReasonId);
define_id!(StudentId);
define_id!(SchoolEnrolmentId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_id_creation() {
        let id1 = StudentId::new();
        let id2 = StudentId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_id_conversion() {
        let uuid = Uuid::now_v7();
        let course_id = CourseId::from_uuid(uuid);
        assert_eq!(course_id.as_uuid(), &uuid);
        assert_eq!(course_id.into_uuid(), uuid);
    }

    #[test]
    fn test_id_string_conversion() {
        let id = PageId::new();
        let s = id.to_string();
        let parsed = PageId::parse_str(&s).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_id_serialization() {
        let id = ScheduleId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: ScheduleId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_ids_are_time_ordered() {
        let first = PageId::new();
        let second = PageId::new();
        assert!(first.to_string() < second.to_string());
    }
}
