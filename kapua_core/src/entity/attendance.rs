use crate::ids::{ActivityId, AttendanceId, StudentId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a student was at an activity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: AttendanceId,
    pub activity_id: ActivityId,
    pub student_id: StudentId,
    pub code: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::activity::Entity",
        from = "Column::ActivityId",
        to = "super::activity::Column::Id"
    )]
    Activity,
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::attendance_code::Entity",
        from = "Column::Code",
        to = "super::attendance_code::Column::Code"
    )]
    AttendanceCode,
}

impl Related<super::activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activity.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::attendance_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceCode.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
