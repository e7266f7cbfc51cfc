use crate::ids::GroupId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A named audience (staff, a form class, parents) that events are shown to.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "auth_group")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: GroupId,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::event_group::Entity")]
    EventGroup,
}

impl Related<super::event_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventGroup.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        super::event_group::Relation::Event.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::event_group::Relation::Group.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
