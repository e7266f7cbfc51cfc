use crate::{
    error::ValidationError,
    ids::{EnrolmentId, ScheduleId, StudentId},
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A student enrolled in a course schedule for a length of time. Their
/// calendar collects the schedule's activities while the enrolment runs.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrolment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: EnrolmentId,
    pub student_id: StudentId,
    pub schedule_id: ScheduleId,
    pub start: Date,
    pub end: Option<Date>,
}

impl Model {
    /// Whether the enrolment covers `day`. An open-ended enrolment runs forever.
    pub fn is_active_on(&self, day: Date) -> bool {
        self.start <= day && self.end.map_or(true, |end| day <= end)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::schedule::Entity",
        from = "Column::ScheduleId",
        to = "super::schedule::Column::Id"
    )]
    Schedule,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let (Some(start), Some(Some(end))) =
            (super::current(&self.start), super::current(&self.end))
        {
            if start > end {
                return Err(DbErr::Custom(ValidationError::DateRange.to_string()));
            }
        }
        Ok(self)
    }
}
