use crate::{
    error::ValidationError,
    ids::{LeaveReasonId, SchoolEnrolmentId, SchoolId, StudentId},
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A student's time on a school's roll. `end` stays empty until they leave.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "school_enrolment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: SchoolEnrolmentId,
    pub student_id: StudentId,
    pub school_id: SchoolId,
    pub start: Date,
    pub end: Option<Date>,
    pub leave_reason_id: Option<LeaveReasonId>,
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
        belongs_to = "super::school::Entity",
        from = "Column::SchoolId",
        to = "super::school::Column::Id"
    )]
    School,
    #[sea_orm(
        belongs_to = "super::leave_reason::Entity",
        from = "Column::LeaveReasonId",
        to = "super::leave_reason::Column::Id"
    )]
    LeaveReason,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::school::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl Related<super::leave_reason::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveReason.def()
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
