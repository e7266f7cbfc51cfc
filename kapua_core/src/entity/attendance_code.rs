use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// MoE code used to categorise a student's absence.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance_code")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub in_class: bool,
    pub reason: String,
    #[sea_orm(column_type = "Text")]
    pub explanation: String,
    pub audit_code: String,
    pub truancy_code: String,
    pub half_day_calc: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
