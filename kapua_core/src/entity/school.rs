use crate::ids::SchoolId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "school")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: SchoolId,
    pub name: String,
    pub ministry_code: i32,
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
