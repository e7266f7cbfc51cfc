use crate::{ids::SubjectGroupId, slug};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A group of subjects. Provided by the MoE.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subject_group")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: SubjectGroupId,
    pub name: String,
    pub slug: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::subject::Entity")]
    Subject,
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
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
