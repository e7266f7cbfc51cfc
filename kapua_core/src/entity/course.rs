use crate::ids::{CourseId, InstructionalYearLevelId, SubjectId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A collection of activities, assessments and learning materials. Most
/// other tables hang off a course.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: CourseId,
    pub subject_id: Option<SubjectId>,
    pub instructional_year_level_id: Option<InstructionalYearLevelId>,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id"
    )]
    Subject,
    #[sea_orm(
        belongs_to = "super::instructional_year_level::Entity",
        from = "Column::InstructionalYearLevelId",
        to = "super::instructional_year_level::Column::Id"
    )]
    InstructionalYearLevel,
    #[sea_orm(has_many = "super::page::Entity")]
    Page,
    #[sea_orm(has_many = "super::schedule::Entity")]
    Schedule,
    #[sea_orm(has_many = "super::event::Entity")]
    Event,
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::instructional_year_level::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstructionalYearLevel.def()
    }
}

impl Related<super::page::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Page.def()
    }
}

impl Related<super::schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
