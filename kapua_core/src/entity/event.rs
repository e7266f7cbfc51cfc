use crate::ids::{CourseId, EventId, EventTypeId, PlaceId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: EventId,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub event_type_id: EventTypeId,
    pub course_id: CourseId,
    /// Where this event will occur.
    pub place_id: Option<PlaceId>,
    pub date: Date,
    pub start_time: Time,
    /// Minutes.
    pub duration: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event_type::Entity",
        from = "Column::EventTypeId",
        to = "super::event_type::Column::Id"
    )]
    EventType,
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::place::Entity",
        from = "Column::PlaceId",
        to = "super::place::Column::Id"
    )]
    Place,
    #[sea_orm(has_many = "super::event_group::Entity")]
    EventGroup,
}

impl Related<super::event_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventType.def()
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::place::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Place.def()
    }
}

impl Related<super::event_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventGroup.def()
    }
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        super::event_group::Relation::Group.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::event_group::Relation::Event.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
