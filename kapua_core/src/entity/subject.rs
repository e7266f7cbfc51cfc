use crate::{
    ids::{SubjectGroupId, SubjectId},
    slug,
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Subject list. Provided by the MoE.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subject")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: SubjectId,
    pub ministry_code: String,
    pub name: String,
    pub slug: String,
    pub group_id: SubjectGroupId,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subject_group::Entity",
        from = "Column::GroupId",
        to = "super::subject_group::Column::Id"
    )]
    SubjectGroup,
    #[sea_orm(has_many = "super::course::Entity")]
    Course,
}

impl Related<super::subject_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectGroup.def()
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        slug::stamp(&self.name, &mut self.slug, insert)?;
        Ok(self)
    }
}
