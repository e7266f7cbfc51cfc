//! Polymorphic references.
//!
//! Assessments and pages can point at rows of several unrelated tables. The
//! pointer is stored as a `(content_kind, content_id)` column pair and turned
//! back into a row by [`resolve`], which dispatches on the kind. The pointer
//! does not own its target: deleting the target leaves the reference dangling
//! and it then resolves to `None`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    entity::{activity, assessment, course, event, page, schedule},
    ids::{ActivityId, AssessmentId, CourseId, EventId, PageId, ScheduleId},
};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    #[sea_orm(string_value = "course")]
    Course,
    #[sea_orm(string_value = "page")]
    Page,
    #[sea_orm(string_value = "activity")]
    Activity,
    #[sea_orm(string_value = "schedule")]
    Schedule,
    #[sea_orm(string_value = "event")]
    Event,
    #[sea_orm(string_value = "assessment")]
    Assessment,
}

/// A `(kind, id)` pointer to a row in one of the tables named by [`ContentKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentRef {
    pub kind: ContentKind,
    pub id: Uuid,
}

impl ContentRef {
    pub fn new(kind: ContentKind, id: Uuid) -> Self {
        Self { kind, id }
    }

    /// Rebuild a reference from a nullable column pair. Both halves must be present.
    pub fn from_columns(kind: Option<ContentKind>, id: Option<Uuid>) -> Option<Self> {
        match (kind, id) {
            (Some(kind), Some(id)) => Some(Self { kind, id }),
            _ => None,
        }
    }
}

macro_rules! content_ref_from {
    ($($id:ty => $kind:ident),* $(,)?) => {
        $(
            impl From<$id> for ContentRef {
                fn from(id: $id) -> Self {
                    ContentRef::new(ContentKind::$kind, id.into_uuid())
                }
            }
        )*
    };
}

content_ref_from! {
    CourseId => Course,
    PageId => Page,
    ActivityId => Activity,
    ScheduleId => Schedule,
    EventId => Event,
    AssessmentId => Assessment,
}

/// The row a [`ContentRef`] points at.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "object", rename_all = "snake_case")]
pub enum ContentObject {
    Course(course::Model),
    Page(page::Model),
    Activity(activity::Model),
    Schedule(schedule::Model),
    Event(event::Model),
    Assessment(assessment::Model),
}

impl ContentObject {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentObject::Course(_) => ContentKind::Course,
            ContentObject::Page(_) => ContentKind::Page,
            ContentObject::Activity(_) => ContentKind::Activity,
            ContentObject::Schedule(_) => ContentKind::Schedule,
            ContentObject::Event(_) => ContentKind::Event,
            ContentObject::Assessment(_) => ContentKind::Assessment,
        }
    }

    /// Human readable label of the target.
    pub fn label(&self) -> String {
        match self {
            ContentObject::Course(course) => course.name.clone(),
            ContentObject::Page(page) => page.name.clone(),
            ContentObject::Activity(activity) => activity.subject.clone(),
            ContentObject::Schedule(schedule) => schedule.name.clone(),
            ContentObject::Event(event) => event.title.clone(),
            ContentObject::Assessment(assessment) => assessment.name.clone().unwrap_or_default(),
        }
    }
}

/// Load the row behind `reference`, or `None` if it no longer exists.
pub async fn resolve<C>(db: &C, reference: ContentRef) -> Result<Option<ContentObject>, DbErr>
where
    C: ConnectionTrait,
{
    let id = reference.id;

    let object = match reference.kind {
        ContentKind::Course => course::Entity::find_by_id(CourseId::from(id))
            .one(db)
            .await?
            .map(ContentObject::Course),
        ContentKind::Page => page::Entity::find_by_id(PageId::from(id))
            .one(db)
            .await?
            .map(ContentObject::Page),
        ContentKind::Activity => activity::Entity::find_by_id(ActivityId::from(id))
            .one(db)
            .await?
            .map(ContentObject::Activity),
        ContentKind::Schedule => schedule::Entity::find_by_id(ScheduleId::from(id))
            .one(db)
            .await?
            .map(ContentObject::Schedule),
        ContentKind::Event => event::Entity::find_by_id(EventId::from(id))
            .one(db)
            .await?
            .map(ContentObject::Event),
        ContentKind::Assessment => assessment::Entity::find_by_id(AssessmentId::from(id))
            .one(db)
            .await?
            .map(ContentObject::Assessment),
    };

    Ok(object)
}
