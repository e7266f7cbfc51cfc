use crate::{
    content::{ContentKind, ContentRef},
    ids::{CourseId, PageId},
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One node of a course outline, like a university 'paper' grouped with
/// other components to make up a course.
///
/// `path` and `depth` are maintained by the pages service, see [`crate::tree`].
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "page")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: PageId,
    pub course_id: CourseId,
    pub parent_id: Option<PageId>,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub content_kind: Option<ContentKind>,
    pub content_id: Option<Uuid>,
    pub path: String,
    pub depth: i32,
}

impl Model {
    /// The quiz, activity or other row embedded in this page, if any.
    pub fn content_ref(&self) -> Option<ContentRef> {
        ContentRef::from_columns(self.content_kind, self.content_id)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(belongs_to = "Entity", from = "Column::ParentId", to = "Column::Id")]
    Parent,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
