use chrono::{NaiveDate, NaiveTime};
use sea_orm::{DatabaseConnection, TransactionTrait};
use thiserror::Error;
use zel_core::prelude::*;

use crate::{
    entity::prelude::*,
    error::{check_len, check_non_negative, check_required, ValidationError},
    ids::{CourseId, EventId, EventTypeId, GroupId, PlaceId},
};

#[derive(Debug, Error)]
pub enum EventsServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("event not found")]
    EventNotFound,

    #[error("event type not found")]
    EventTypeNotFound,

    #[error("course not found")]
    CourseNotFound,

    #[error("place not found")]
    PlaceNotFound,

    #[error("group not found")]
    GroupNotFound,

    #[error("a group with this name already exists")]
    DuplicateGroup,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<EventsServiceError> for ResourceError {
    fn from(error: EventsServiceError) -> Self {
        match error {
            EventsServiceError::DbError(error) => ResourceError::infra(error),
            EventsServiceError::EventNotFound => ResourceError::app(error),
            EventsServiceError::EventTypeNotFound => ResourceError::app(error),
            EventsServiceError::CourseNotFound => ResourceError::app(error),
            EventsServiceError::PlaceNotFound => ResourceError::app(error),
            EventsServiceError::GroupNotFound => ResourceError::app(error),
            EventsServiceError::DuplicateGroup => ResourceError::app(error),
            EventsServiceError::Validation(_) => ResourceError::app(error),
        }
    }
}

/// Events start at nine unless told otherwise.
pub fn default_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

/// The title, or the event type's name for untitled events.
pub fn display_name(event: &EventModel, event_type: &EventTypeModel) -> String {
    if event.title.is_empty() {
        event_type.name.clone()
    } else {
        event.title.clone()
    }
}

/// Parameters for a new event.
#[derive(Clone, Debug)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub event_type_id: EventTypeId,
    pub course_id: CourseId,
    pub place_id: Option<PlaceId>,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub duration: Option<i32>,
}

#[derive(Clone)]
pub struct EventsService {
    db: DatabaseConnection,
}

impl EventsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn _create_event_type(
        &self,
        name: String,
    ) -> Result<EventTypeModel, EventsServiceError> {
        check_required("name", &name, 32)?;

        let event_type = EventTypeActiveModel {
            id: Set(EventTypeId::new()),
            name: Set(name),
        };
        Ok(EventType::insert(event_type)
            .exec_with_returning(&self.db)
            .await?)
    }

    pub async fn _list_event_types(&self) -> Result<Vec<EventTypeModel>, EventsServiceError> {
        Ok(EventType::find()
            .order_by_asc(EventTypeColumn::Name)
            .all(&self.db)
            .await?)
    }

    pub async fn _create_place(&self, name: String) -> Result<PlaceModel, EventsServiceError> {
        check_required("name", &name, 64)?;

        let place = PlaceActiveModel {
            id: Set(PlaceId::new()),
            name: Set(name),
        };
        Ok(Place::insert(place).exec_with_returning(&self.db).await?)
    }

    pub async fn _list_places(&self) -> Result<Vec<PlaceModel>, EventsServiceError> {
        Ok(Place::find()
            .order_by_asc(PlaceColumn::Name)
            .all(&self.db)
            .await?)
    }

    pub async fn _create_group(&self, name: String) -> Result<GroupModel, EventsServiceError> {
        check_required("name", &name, 80)?;

        let group = GroupActiveModel {
            id: Set(GroupId::new()),
            name: Set(name),
        };

        match Group::insert(group).exec_with_returning(&self.db).await {
            Ok(group) => Ok(group),
            Err(error) if matches!(error.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(EventsServiceError::DuplicateGroup)
            }
            Err(error) => Err(error.into()),
        }
    }

    pub async fn _list_groups(&self) -> Result<Vec<GroupModel>, EventsServiceError> {
        Ok(Group::find()
            .order_by_asc(GroupColumn::Name)
            .all(&self.db)
            .await?)
    }

    pub async fn _create_event(&self, event: NewEvent) -> Result<EventModel, EventsServiceError> {
        check_len("title", &event.title, 128)?;
        if let Some(duration) = event.duration {
            check_non_negative("duration", duration)?;
        }

        EventType::find_by_id(event.event_type_id)
            .one(&self.db)
            .await?
            .ok_or(EventsServiceError::EventTypeNotFound)?;
        Course::find_by_id(event.course_id)
            .one(&self.db)
            .await?
            .ok_or(EventsServiceError::CourseNotFound)?;
        if let Some(place_id) = event.place_id {
            Place::find_by_id(place_id)
                .one(&self.db)
                .await?
                .ok_or(EventsServiceError::PlaceNotFound)?;
        }

        let model = EventActiveModel {
            id: Set(EventId::new()),
            title: Set(event.title),
            description: Set(event.description),
            event_type_id: Set(event.event_type_id),
            course_id: Set(event.course_id),
            place_id: Set(event.place_id),
            date: Set(event.date),
            start_time: Set(event.start_time.unwrap_or_else(default_start_time)),
            duration: Set(event.duration),
        };

        let created = Event::insert(model).exec_with_returning(&self.db).await?;

        tracing::info!(id = %created.id, course = %created.course_id, date = %created.date, "created event");
        Ok(created)
    }

    pub async fn _get_event(&self, event_id: EventId) -> Result<EventModel, EventsServiceError> {
        Event::find_by_id(event_id)
            .one(&self.db)
            .await?
            .ok_or(EventsServiceError::EventNotFound)
    }

    pub async fn _delete_event(&self, event_id: EventId) -> Result<(), EventsServiceError> {
        let result = Event::delete_by_id(event_id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(EventsServiceError::EventNotFound);
        }
        tracing::info!(id = %event_id, "deleted event");
        Ok(())
    }

    /// Events of a course ordered by date, then start time.
    pub async fn _list_events_for_course(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<EventModel>, EventsServiceError> {
        Ok(Event::find()
            .filter(EventColumn::CourseId.eq(course_id))
            .order_by_asc(EventColumn::Date)
            .order_by_asc(EventColumn::StartTime)
            .all(&self.db)
            .await?)
    }

    /// Replace the groups an event is shown to.
    pub async fn _set_event_groups(
        &self,
        event_id: EventId,
        group_ids: &[GroupId],
    ) -> Result<(), EventsServiceError> {
        self._get_event(event_id).await?;

        let txn = self.db.begin().await?;

        for group_id in group_ids {
            Group::find_by_id(*group_id)
                .one(&txn)
                .await?
                .ok_or(EventsServiceError::GroupNotFound)?;
        }

        EventGroup::delete_many()
            .filter(EventGroupColumn::EventId.eq(event_id))
            .exec(&txn)
            .await?;

        let mut group_ids = group_ids.to_vec();
        group_ids.sort_by_key(|id| id.into_uuid());
        group_ids.dedup();

        for group_id in group_ids {
            let link = EventGroupActiveModel {
                event_id: Set(event_id),
                group_id: Set(group_id),
            };
            EventGroup::insert(link).exec(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    pub async fn _list_groups_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<GroupModel>, EventsServiceError> {
        let event = self._get_event(event_id).await?;
        Ok(event
            .find_related(Group)
            .order_by_asc(GroupColumn::Name)
            .all(&self.db)
            .await?)
    }

    /// Events shown to a group, ordered by date then start time.
    pub async fn _list_events_for_group(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<EventModel>, EventsServiceError> {
        let group = Group::find_by_id(group_id)
            .one(&self.db)
            .await?
            .ok_or(EventsServiceError::GroupNotFound)?;

        Ok(group
            .find_related(Event)
            .order_by_asc(EventColumn::Date)
            .order_by_asc(EventColumn::StartTime)
            .all(&self.db)
            .await?)
    }

    pub async fn _display_name(&self, event_id: EventId) -> Result<String, EventsServiceError> {
        let (event, event_type) = Event::find_by_id(event_id)
            .find_also_related(EventType)
            .one(&self.db)
            .await?
            .ok_or(EventsServiceError::EventNotFound)?;
        let event_type = event_type.ok_or(EventsServiceError::EventTypeNotFound)?;

        Ok(display_name(&event, &event_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_course, date, setup_test_db};

    struct Fixture {
        service: EventsService,
        course_id: CourseId,
        trip: EventTypeModel,
    }

    async fn setup_test_service() -> Fixture {
        let db = setup_test_db().await;
        let course_id = create_course(&db, "Year 13 Geography").await;
        let service = EventsService::new(db);
        let trip = service._create_event_type("Field trip".to_string()).await.unwrap();
        Fixture {
            service,
            course_id,
            trip,
        }
    }

    fn event(fixture: &Fixture, title: &str, date: NaiveDate, start_time: Option<NaiveTime>) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            description: String::new(),
            event_type_id: fixture.trip.id,
            course_id: fixture.course_id,
            place_id: None,
            date,
            start_time,
            duration: Some(90),
        }
    }

    #[tokio::test]
    async fn test_start_time_defaults_to_nine() {
        let fixture = setup_test_service().await;

        let created = fixture
            .service
            ._create_event(event(&fixture, "River study", date(2026, 11, 4), None))
            .await
            .expect("Failed to create event");

        assert_eq!(created.start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(fixture.service._get_event(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_course_events_ordered_by_date_then_time() {
        let fixture = setup_test_service().await;
        let afternoon = NaiveTime::from_hms_opt(13, 30, 0);
        let morning = NaiveTime::from_hms_opt(8, 15, 0);

        for (title, day, time) in [
            ("Third", date(2026, 11, 5), None),
            ("Second", date(2026, 11, 4), afternoon),
            ("First", date(2026, 11, 4), morning),
        ] {
            fixture.service._create_event(event(&fixture, title, day, time)).await.unwrap();
        }

        let events = fixture.service._list_events_for_course(fixture.course_id).await.unwrap();
        let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_display_name_falls_back_to_type() {
        let fixture = setup_test_service().await;
        let titled = fixture
            .service
            ._create_event(event(&fixture, "Glacier visit", date(2026, 11, 4), None))
            .await
            .unwrap();
        let untitled = fixture
            .service
            ._create_event(event(&fixture, "", date(2026, 11, 5), None))
            .await
            .unwrap();

        assert_eq!(fixture.service._display_name(titled.id).await.unwrap(), "Glacier visit");
        assert_eq!(fixture.service._display_name(untitled.id).await.unwrap(), "Field trip");
    }

    #[tokio::test]
    async fn test_groups_see_their_events() {
        let fixture = setup_test_service().await;
        let staff = fixture.service._create_group("Staff".to_string()).await.unwrap();
        let parents = fixture.service._create_group("Parents".to_string()).await.unwrap();

        let camp = fixture
            .service
            ._create_event(event(&fixture, "Camp", date(2026, 12, 1), None))
            .await
            .unwrap();
        let meeting = fixture
            .service
            ._create_event(event(&fixture, "Meeting", date(2026, 11, 20), None))
            .await
            .unwrap();

        fixture.service._set_event_groups(camp.id, &[staff.id, parents.id]).await.unwrap();
        fixture.service._set_event_groups(meeting.id, &[staff.id, staff.id]).await.unwrap();

        let for_staff = fixture.service._list_events_for_group(staff.id).await.unwrap();
        let titles: Vec<_> = for_staff.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Meeting", "Camp"]);

        // Replacing drops the old links
        fixture.service._set_event_groups(camp.id, &[parents.id]).await.unwrap();
        let groups = fixture.service._list_groups_for_event(camp.id).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, parents.id);
        assert_eq!(fixture.service._list_events_for_group(staff.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_group_name_rejected() {
        let fixture = setup_test_service().await;
        fixture.service._create_group("Board".to_string()).await.unwrap();

        let result = fixture.service._create_group("Board".to_string()).await;
        assert!(matches!(result, Err(EventsServiceError::DuplicateGroup)));
    }

    #[tokio::test]
    async fn test_deleting_place_keeps_event() {
        let fixture = setup_test_service().await;
        let place = fixture.service._create_place("Museum".to_string()).await.unwrap();

        let mut new_event = event(&fixture, "Exhibit", date(2026, 11, 10), None);
        new_event.place_id = Some(place.id);
        let created = fixture.service._create_event(new_event).await.unwrap();
        assert_eq!(created.place_id, Some(place.id));

        Place::delete_by_id(place.id).exec(&fixture.service.db).await.unwrap();

        let event = fixture.service._get_event(created.id).await.unwrap();
        assert_eq!(event.place_id, None);
    }

    #[tokio::test]
    async fn test_negative_duration_rejected() {
        let fixture = setup_test_service().await;

        let mut backwards = event(&fixture, "Time travel", date(2026, 11, 4), None);
        backwards.duration = Some(-30);
        let result = fixture.service._create_event(backwards).await;
        assert!(matches!(
            result,
            Err(EventsServiceError::Validation(ValidationError::Negative { field: "duration" }))
        ));
        assert!(fixture
            .service
            ._list_events_for_course(fixture.course_id)
            .await
            .unwrap()
            .is_empty());

        let mut open_ended = event(&fixture, "Open day", date(2026, 11, 4), None);
        open_ended.duration = None;
        fixture.service._create_event(open_ended).await.unwrap();
    }

    #[tokio::test]
    async fn test_places_listed_by_name() {
        let fixture = setup_test_service().await;
        fixture.service._create_place("Museum".to_string()).await.unwrap();
        fixture.service._create_place("Botanic Gardens".to_string()).await.unwrap();

        let places = fixture.service._list_places().await.unwrap();
        let names: Vec<_> = places.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Botanic Gardens", "Museum"]);
    }

    #[tokio::test]
    async fn test_delete_event() {
        let fixture = setup_test_service().await;
        let created = fixture
            .service
            ._create_event(event(&fixture, "Cancelled", date(2026, 11, 4), None))
            .await
            .unwrap();

        fixture.service._delete_event(created.id).await.unwrap();
        assert!(matches!(
            fixture.service._get_event(created.id).await,
            Err(EventsServiceError::EventNotFound)
        ));
    }
}
