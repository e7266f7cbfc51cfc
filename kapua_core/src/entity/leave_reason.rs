use crate::ids::LeaveReasonId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Why a student left a school.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leave_reason")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: LeaveReasonId,
    pub ministry_code: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::school_enrolment::Entity")]
    SchoolEnrolment,
}

impl Related<super::school_enrolment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SchoolEnrolment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
