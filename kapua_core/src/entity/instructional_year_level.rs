use crate::ids::InstructionalYearLevelId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Level of a course for MoE returns.
///
/// [34] Instructional year level (for subjects 1-15)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "instructional_year_level")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: InstructionalYearLevelId,
    pub ministry_code: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::course::Entity")]
    Course,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
