use crate::ids::{CourseId, ScheduleId};
use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

/// A calendar of activities for a course.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedule")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: ScheduleId,
    pub name: String,
    pub course_id: CourseId,
    pub created: DateTimeUtc,
    pub last_modified: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::schedule_activity::Entity")]
    ScheduleActivity,
    #[sea_orm(has_many = "super::enrolment::Entity")]
    Enrolment,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::schedule_activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduleActivity.def()
    }
}

impl Related<super::enrolment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrolment.def()
    }
}

impl Related<super::activity::Entity> for Entity {
    fn to() -> RelationDef {
        super::schedule_activity::Relation::Activity.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::schedule_activity::Relation::Schedule.def().rev())
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        if insert && super::current(&self.created).is_none() {
            self.created = Set(now);
        }
        self.last_modified = Set(now);
        Ok(self)
    }
}
