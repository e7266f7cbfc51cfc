use crate::ids::ZoningStatusId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// [20] Zoning status.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "zoning_status")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: ZoningStatusId,
    pub ministry_code: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::student::Entity")]
    Student,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
