use crate::{error::ValidationError, ids::ActivityId};
use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

/// A calendar entry on one or more schedules.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: ActivityId,
    pub subject: String,
    pub track_attendance: bool,
    pub start: DateTimeUtc,
    pub end: DateTimeUtc,
    pub created: DateTimeUtc,
    pub last_modified: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::schedule_activity::Entity")]
    ScheduleActivity,
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
}

impl Related<super::schedule_activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduleActivity.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl Related<super::schedule::Entity> for Entity {
    fn to() -> RelationDef {
        super::schedule_activity::Relation::Schedule.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::schedule_activity::Relation::Activity.def().rev())
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let (Some(start), Some(end)) =
            (super::current(&self.start), super::current(&self.end))
        {
            if start > end {
                return Err(DbErr::Custom(ValidationError::TimeRange.to_string()));
            }
        }

        let now = Utc::now();
        if insert && super::current(&self.created).is_none() {
            self.created = Set(now);
        }
        self.last_modified = Set(now);
        Ok(self)
    }
}
