use crate::{
    content::{ContentKind, ContentRef},
    ids::AssessmentId,
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Something students submit work for. Attaches to a course, page, activity
/// or any other [`ContentKind`].
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assessment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: AssessmentId,
    pub name: Option<String>,
    pub content_kind: ContentKind,
    pub content_id: Uuid,
}

impl Model {
    pub fn content_ref(&self) -> ContentRef {
        ContentRef::new(self.content_kind, self.content_id)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::grade::Entity")]
    Grade,
    #[sea_orm(has_many = "super::submission::Entity")]
    Submission,
}

impl Related<super::grade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grade.def()
    }
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
