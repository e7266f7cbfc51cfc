use sea_orm::DatabaseConnection;
use thiserror::Error;
use zel_core::prelude::*;

use crate::{
    entity::prelude::*,
    error::{check_required, ValidationError},
    ids::{CourseId, InstructionalYearLevelId, SubjectId},
    service::pages::{PagesService, PagesServiceError},
};

#[derive(Debug, Error)]
pub enum CoursesServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("course not found")]
    CourseNotFound,

    #[error("subject not found")]
    SubjectNotFound,

    #[error("instructional year level not found")]
    YearLevelNotFound,

    #[error(transparent)]
    Pages(#[from] PagesServiceError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<CoursesServiceError> for ResourceError {
    fn from(error: CoursesServiceError) -> Self {
        match error {
            CoursesServiceError::DbError(error) => ResourceError::infra(error),
            CoursesServiceError::Pages(error) => error.into(),
            CoursesServiceError::CourseNotFound => ResourceError::app(error),
            CoursesServiceError::SubjectNotFound => ResourceError::app(error),
            CoursesServiceError::YearLevelNotFound => ResourceError::app(error),
            CoursesServiceError::Validation(_) => ResourceError::app(error),
        }
    }
}

#[derive(Clone)]
pub struct CoursesService {
    db: DatabaseConnection,
    pages: PagesService,
}

impl CoursesService {
    pub fn new(db: DatabaseConnection) -> Self {
        let pages = PagesService::new(db.clone());
        Self { db, pages }
    }

    pub fn pages(&self) -> &PagesService {
        &self.pages
    }

    pub async fn _create_course(
        &self,
        name: String,
        subject_id: Option<SubjectId>,
        instructional_year_level_id: Option<InstructionalYearLevelId>,
    ) -> Result<CourseModel, CoursesServiceError> {
        check_required("name", &name, 64)?;

        if let Some(subject_id) = subject_id {
            Subject::find_by_id(subject_id)
                .one(&self.db)
                .await?
                .ok_or(CoursesServiceError::SubjectNotFound)?;
        }
        if let Some(level_id) = instructional_year_level_id {
            InstructionalYearLevel::find_by_id(level_id)
                .one(&self.db)
                .await?
                .ok_or(CoursesServiceError::YearLevelNotFound)?;
        }

        let course = CourseActiveModel {
            id: Set(CourseId::new()),
            subject_id: Set(subject_id),
            instructional_year_level_id: Set(instructional_year_level_id),
            name: Set(name),
        };

        let course = Course::insert(course).exec_with_returning(&self.db).await?;

        tracing::info!(id = %course.id, name = %course.name, "created course");
        Ok(course)
    }

    pub async fn _get_course(&self, course_id: CourseId) -> Result<CourseModel, CoursesServiceError> {
        Course::find_by_id(course_id)
            .one(&self.db)
            .await?
            .ok_or(CoursesServiceError::CourseNotFound)
    }

    pub async fn _list_courses(&self) -> Result<Vec<CourseModel>, CoursesServiceError> {
        let courses = Course::find()
            .order_by_asc(CourseColumn::Name)
            .all(&self.db)
            .await?;
        Ok(courses)
    }

    pub async fn _list_courses_for_subject(
        &self,
        subject_id: SubjectId,
    ) -> Result<Vec<CourseModel>, CoursesServiceError> {
        let courses = Course::find()
            .filter(CourseColumn::SubjectId.eq(subject_id))
            .order_by_asc(CourseColumn::Name)
            .all(&self.db)
            .await?;
        Ok(courses)
    }

    pub async fn _rename_course(
        &self,
        course_id: CourseId,
        name: String,
    ) -> Result<CourseModel, CoursesServiceError> {
        check_required("name", &name, 64)?;

        let mut course: CourseActiveModel = self._get_course(course_id).await?.into();
        course.name = Set(name);
        let course = course.update(&self.db).await?;

        tracing::info!(id = %course.id, "renamed course");
        Ok(course)
    }

    /// Delete a course along with its pages, schedules and events.
    pub async fn _delete_course(&self, course_id: CourseId) -> Result<(), CoursesServiceError> {
        let result = Course::delete_by_id(course_id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(CoursesServiceError::CourseNotFound);
        }
        tracing::info!(id = %course_id, "deleted course");
        Ok(())
    }

    /// Every page of the course in outline order.
    pub async fn _course_outline(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<PageModel>, CoursesServiceError> {
        self._get_course(course_id).await?;
        Ok(self.pages._course_outline(course_id).await?)
    }
}

#[zel_service(name = "courses")]
trait Courses {
    #[doc = "Get every page of a course in outline order"]
    #[method(name = "course_outline")]
    async fn course_outline(&self, course_id: CourseId) -> Result<Vec<PageModel>, ResourceError>;

    #[doc = "List all courses by name"]
    #[method(name = "list_courses")]
    async fn list_courses(&self) -> Result<Vec<CourseModel>, ResourceError>;
}

#[async_trait]
impl CoursesServer for CoursesService {
    async fn course_outline(
        &self,
        _ctx: RequestContext,
        course_id: CourseId,
    ) -> Result<Vec<PageModel>, ResourceError> {
        Ok(self._course_outline(course_id).await?)
    }

    async fn list_courses(&self, _ctx: RequestContext) -> Result<Vec<CourseModel>, ResourceError> {
        Ok(self._list_courses().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entity::{event, event_type, schedule},
        ids::{EventTypeId, EventId, ScheduleId},
        service::subjects::SubjectsService,
        test_utils::{date, setup_test_db},
    };

    async fn setup_test_service() -> CoursesService {
        CoursesService::new(setup_test_db().await)
    }

    #[tokio::test]
    async fn test_create_and_get_course() {
        let service = setup_test_service().await;

        let course = service
            ._create_course("10SCI".to_string(), None, None)
            .await
            .expect("Failed to create course");
        let fetched = service._get_course(course.id).await.unwrap();

        assert_eq!(fetched, course);
    }

    #[tokio::test]
    async fn test_courses_by_subject() {
        let service = setup_test_service().await;
        let subjects = SubjectsService::new(service.db.clone());
        let group = subjects._create_subject_group("Science".to_string()).await.unwrap();
        let chemistry = subjects
            ._create_subject(group.id, "CHEM".to_string(), "Chemistry".to_string())
            .await
            .unwrap();

        service._create_course("12CHE".to_string(), Some(chemistry.id), None).await.unwrap();
        service._create_course("11CHE".to_string(), Some(chemistry.id), None).await.unwrap();
        service._create_course("11ART".to_string(), None, None).await.unwrap();

        let courses = service._list_courses_for_subject(chemistry.id).await.unwrap();
        let names: Vec<_> = courses.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["11CHE", "12CHE"]);
    }

    #[tokio::test]
    async fn test_unknown_subject_rejected() {
        let service = setup_test_service().await;

        let result = service
            ._create_course("10MAT".to_string(), Some(SubjectId::new()), None)
            .await;

        assert!(matches!(result, Err(CoursesServiceError::SubjectNotFound)));
    }

    #[tokio::test]
    async fn test_deleting_subject_keeps_course() {
        let service = setup_test_service().await;
        let subjects = SubjectsService::new(service.db.clone());
        let group = subjects._create_subject_group("Arts".to_string()).await.unwrap();
        let music = subjects
            ._create_subject(group.id, "MUS".to_string(), "Music".to_string())
            .await
            .unwrap();
        let course = service._create_course("9MUS".to_string(), Some(music.id), None).await.unwrap();

        subjects._delete_subject(music.id).await.unwrap();

        let course = service._get_course(course.id).await.unwrap();
        assert_eq!(course.subject_id, None);
    }

    #[tokio::test]
    async fn test_delete_course_cascades() {
        let service = setup_test_service().await;
        let course = service._create_course("10ENG".to_string(), None, None).await.unwrap();

        let page = service
            .pages()
            ._create_page(course.id, None, "Poetry".to_string(), String::new(), None)
            .await
            .unwrap();

        let schedule_id = ScheduleId::new();
        schedule::ActiveModel {
            id: Set(schedule_id),
            name: Set("10ENG A".to_string()),
            course_id: Set(course.id),
            ..Default::default()
        }
        .insert(&service.db)
        .await
        .unwrap();

        let event_type_id = EventTypeId::new();
        event_type::ActiveModel {
            id: Set(event_type_id),
            name: Set("Trip".to_string()),
        }
        .insert(&service.db)
        .await
        .unwrap();

        let event_id = EventId::new();
        event::ActiveModel {
            id: Set(event_id),
            title: Set("Theatre visit".to_string()),
            description: Set(String::new()),
            event_type_id: Set(event_type_id),
            course_id: Set(course.id),
            place_id: Set(None),
            date: Set(date(2026, 11, 3)),
            start_time: Set(chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
            duration: Set(None),
        }
        .insert(&service.db)
        .await
        .unwrap();

        service._delete_course(course.id).await.unwrap();

        assert!(Page::find_by_id(page.id).one(&service.db).await.unwrap().is_none());
        assert!(Schedule::find_by_id(schedule_id).one(&service.db).await.unwrap().is_none());
        assert!(Event::find_by_id(event_id).one(&service.db).await.unwrap().is_none());
        assert!(matches!(
            service._get_course(course.id).await,
            Err(CoursesServiceError::CourseNotFound)
        ));
    }

    #[tokio::test]
    async fn test_course_outline_requires_course() {
        let service = setup_test_service().await;

        let result = service._course_outline(CourseId::new()).await;
        assert!(matches!(result, Err(CoursesServiceError::CourseNotFound)));
    }

    #[tokio::test]
    async fn test_rename_course() {
        let service = setup_test_service().await;
        let course = service._create_course("10SCI".to_string(), None, None).await.unwrap();

        let renamed = service._rename_course(course.id, "10SCX".to_string()).await.unwrap();
        assert_eq!(renamed.name, "10SCX");
        assert_eq!(service._list_courses().await.unwrap().len(), 1);
    }
}
