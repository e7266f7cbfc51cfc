use chrono::Utc;
use sea_orm::{prelude::Decimal, DatabaseConnection, TransactionTrait};
use thiserror::Error;
use zel_core::prelude::*;

use crate::{
    content::{self, ContentObject, ContentRef},
    entity::prelude::*,
    error::{check_decimal, check_len, ValidationError},
    ids::{AssessmentId, GradeId, StudentId, SubmissionId},
};

#[derive(Debug, Error)]
pub enum AssessmentsServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("assessment not found")]
    AssessmentNotFound,

    #[error("attachment target not found")]
    TargetNotFound,

    #[error("student not found")]
    StudentNotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<AssessmentsServiceError> for ResourceError {
    fn from(error: AssessmentsServiceError) -> Self {
        match error {
            AssessmentsServiceError::DbError(error) => ResourceError::infra(error),
            AssessmentsServiceError::AssessmentNotFound => ResourceError::app(error),
            AssessmentsServiceError::TargetNotFound => ResourceError::app(error),
            AssessmentsServiceError::StudentNotFound => ResourceError::app(error),
            AssessmentsServiceError::Validation(_) => ResourceError::app(error),
        }
    }
}

#[derive(Clone)]
pub struct AssessmentsService {
    db: DatabaseConnection,
}

impl AssessmentsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create an assessment attached to `target`, which must exist at creation time.
    pub async fn _create_assessment(
        &self,
        name: Option<String>,
        target: ContentRef,
    ) -> Result<AssessmentModel, AssessmentsServiceError> {
        if let Some(name) = &name {
            check_len("name", name, 32)?;
        }

        let object = content::resolve(&self.db, target)
            .await?
            .ok_or(AssessmentsServiceError::TargetNotFound)?;

        let assessment = AssessmentActiveModel {
            id: Set(AssessmentId::new()),
            name: Set(name),
            content_kind: Set(target.kind),
            content_id: Set(target.id),
        };

        let assessment = Assessment::insert(assessment)
            .exec_with_returning(&self.db)
            .await?;

        tracing::info!(
            id = %assessment.id,
            kind = ?target.kind,
            target = %target.id,
            label = %object.label(),
            "created assessment"
        );
        Ok(assessment)
    }

    pub async fn _get_assessment(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<AssessmentModel, AssessmentsServiceError> {
        Assessment::find_by_id(assessment_id)
            .one(&self.db)
            .await?
            .ok_or(AssessmentsServiceError::AssessmentNotFound)
    }

    /// Assessments attached to `target`.
    pub async fn _list_assessments_for(
        &self,
        target: ContentRef,
    ) -> Result<Vec<AssessmentModel>, AssessmentsServiceError> {
        let assessments = Assessment::find()
            .filter(AssessmentColumn::ContentKind.eq(target.kind))
            .filter(AssessmentColumn::ContentId.eq(target.id))
            .order_by_asc(AssessmentColumn::Id)
            .all(&self.db)
            .await?;
        Ok(assessments)
    }

    /// Load what an assessment is attached to. `None` when the target has since been deleted.
    pub async fn _assessment_target(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Option<ContentObject>, AssessmentsServiceError> {
        let assessment = self._get_assessment(assessment_id).await?;
        let target = content::resolve(&self.db, assessment.content_ref()).await?;

        if target.is_none() {
            tracing::debug!(id = %assessment_id, "assessment target no longer exists");
        }
        Ok(target)
    }

    /// Delete an assessment with its grades and submissions.
    pub async fn _delete_assessment(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<(), AssessmentsServiceError> {
        let result = Assessment::delete_by_id(assessment_id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AssessmentsServiceError::AssessmentNotFound);
        }
        tracing::info!(id = %assessment_id, "deleted assessment");
        Ok(())
    }

    /// Record a student's score, replacing any earlier one.
    pub async fn _record_grade(
        &self,
        assessment_id: AssessmentId,
        student_id: StudentId,
        score: Option<Decimal>,
    ) -> Result<GradeModel, AssessmentsServiceError> {
        if let Some(score) = score {
            check_decimal("score", score, 10, 9)?;
        }
        self._get_assessment(assessment_id).await?;
        self.ensure_student(student_id).await?;

        let txn = self.db.begin().await?;

        let existing = Grade::find()
            .filter(GradeColumn::AssessmentId.eq(assessment_id))
            .filter(GradeColumn::StudentId.eq(student_id))
            .one(&txn)
            .await?;

        let grade = match existing {
            Some(grade) => {
                let mut grade: GradeActiveModel = grade.into();
                grade.score = Set(score);
                grade.update(&txn).await?
            }
            None => {
                let grade = GradeActiveModel {
                    id: Set(GradeId::new()),
                    assessment_id: Set(assessment_id),
                    student_id: Set(student_id),
                    score: Set(score),
                };
                Grade::insert(grade).exec_with_returning(&txn).await?
            }
        };

        txn.commit().await?;

        tracing::info!(assessment = %assessment_id, student = %student_id, "recorded grade");
        Ok(grade)
    }

    pub async fn _get_grade(
        &self,
        assessment_id: AssessmentId,
        student_id: StudentId,
    ) -> Result<Option<GradeModel>, AssessmentsServiceError> {
        let grade = Grade::find()
            .filter(GradeColumn::AssessmentId.eq(assessment_id))
            .filter(GradeColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await?;
        Ok(grade)
    }

    pub async fn _list_grades(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Vec<GradeModel>, AssessmentsServiceError> {
        let grades = Grade::find()
            .filter(GradeColumn::AssessmentId.eq(assessment_id))
            .all(&self.db)
            .await?;
        Ok(grades)
    }

    pub async fn _submit(
        &self,
        assessment_id: AssessmentId,
        student_id: StudentId,
    ) -> Result<SubmissionModel, AssessmentsServiceError> {
        self._get_assessment(assessment_id).await?;
        self.ensure_student(student_id).await?;

        let submission = SubmissionActiveModel {
            id: Set(SubmissionId::new()),
            assessment_id: Set(assessment_id),
            student_id: Set(student_id),
            created: Set(Utc::now()),
        };

        let submission = Submission::insert(submission)
            .exec_with_returning(&self.db)
            .await?;

        tracing::info!(assessment = %assessment_id, student = %student_id, "received submission");
        Ok(submission)
    }

    /// Submissions for an assessment, oldest first.
    pub async fn _list_submissions(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Vec<SubmissionModel>, AssessmentsServiceError> {
        let submissions = Submission::find()
            .filter(SubmissionColumn::AssessmentId.eq(assessment_id))
            .order_by_asc(SubmissionColumn::Created)
            .all(&self.db)
            .await?;
        Ok(submissions)
    }

    async fn ensure_student(&self, student_id: StudentId) -> Result<(), AssessmentsServiceError> {
        Student::find_by_id(student_id)
            .one(&self.db)
            .await?
            .ok_or(AssessmentsServiceError::StudentNotFound)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        content::ContentKind,
        entity::activity,
        ids::{ActivityId, CourseId},
        test_utils::{create_course, create_student, setup_test_db},
    };

    async fn setup_test_service() -> (AssessmentsService, CourseId) {
        let db = setup_test_db().await;
        let course_id = create_course(&db, "Year 12 Biology").await;
        (AssessmentsService::new(db), course_id)
    }

    async fn create_activity(service: &AssessmentsService) -> ActivityId {
        let id = ActivityId::new();
        let start = Utc::now();
        activity::ActiveModel {
            id: Set(id),
            subject: Set("Field trip".to_string()),
            track_attendance: Set(true),
            start: Set(start),
            end: Set(start + chrono::Duration::hours(2)),
            ..Default::default()
        }
        .insert(&service.db)
        .await
        .unwrap();
        id
    }

    #[tokio::test]
    async fn test_attach_to_course_and_activity() {
        let (service, course_id) = setup_test_service().await;
        let activity_id = create_activity(&service).await;

        let exam = service
            ._create_assessment(Some("Exam".to_string()), course_id.into())
            .await
            .expect("Failed to create assessment");
        let report = service
            ._create_assessment(Some("Trip report".to_string()), activity_id.into())
            .await
            .unwrap();

        assert_eq!(exam.content_kind, ContentKind::Course);
        assert_eq!(report.content_ref(), ContentRef::from(activity_id));

        let on_activity = service._list_assessments_for(activity_id.into()).await.unwrap();
        assert_eq!(on_activity.len(), 1);
        assert_eq!(on_activity[0].id, report.id);

        match service._assessment_target(exam.id).await.unwrap() {
            Some(ContentObject::Course(course)) => assert_eq!(course.id, course_id),
            other => panic!("unexpected target: {other:?}"),
        }

        let target = service._assessment_target(report.id).await.unwrap().unwrap();
        assert_eq!(target.kind(), ContentKind::Activity);
        assert_eq!(target.label(), "Field trip");
    }

    #[tokio::test]
    async fn test_missing_target_rejected() {
        let (service, _) = setup_test_service().await;

        let result = service._create_assessment(None, CourseId::new().into()).await;
        assert!(matches!(result, Err(AssessmentsServiceError::TargetNotFound)));
    }

    #[tokio::test]
    async fn test_deleted_target_leaves_dangling_reference() {
        let (service, _) = setup_test_service().await;
        let activity_id = create_activity(&service).await;
        let assessment = service
            ._create_assessment(Some("Quiz".to_string()), activity_id.into())
            .await
            .unwrap();

        Activity::delete_by_id(activity_id).exec(&service.db).await.unwrap();

        let assessment = service._get_assessment(assessment.id).await.unwrap();
        assert_eq!(assessment.content_ref(), ContentRef::from(activity_id));
        assert!(service._assessment_target(assessment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overlong_name_rejected() {
        let (service, course_id) = setup_test_service().await;

        let result = service
            ._create_assessment(Some("x".repeat(33)), course_id.into())
            .await;
        assert!(matches!(
            result,
            Err(AssessmentsServiceError::Validation(ValidationError::TooLong { field: "name", .. }))
        ));
    }

    #[tokio::test]
    async fn test_grade_is_replaced() {
        let (service, course_id) = setup_test_service().await;
        let student_id = create_student(&service.db, "Aroha", "Ngata", 131_000_001).await;
        let assessment = service._create_assessment(None, course_id.into()).await.unwrap();

        let first = service
            ._record_grade(assessment.id, student_id, Some(Decimal::new(5, 1)))
            .await
            .unwrap();
        let second = service
            ._record_grade(assessment.id, student_id, Some(Decimal::new(75, 2)))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        let grades = service._list_grades(assessment.id).await.unwrap();
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].score, Some(Decimal::new(75, 2)));

        let fetched = service._get_grade(assessment.id, student_id).await.unwrap();
        assert_eq!(fetched.map(|g| g.id), Some(first.id));
    }

    #[tokio::test]
    async fn test_score_outside_precision_rejected() {
        let (service, course_id) = setup_test_service().await;
        let student_id = create_student(&service.db, "Mere", "Tipene", 131_000_003).await;
        let assessment = service._create_assessment(None, course_id.into()).await.unwrap();

        let result = service
            ._record_grade(assessment.id, student_id, Some(Decimal::new(12345, 0)))
            .await;
        assert!(matches!(
            result,
            Err(AssessmentsServiceError::Validation(ValidationError::Precision { field: "score", .. }))
        ));
        assert!(service._get_grade(assessment.id, student_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_grade_requires_student() {
        let (service, course_id) = setup_test_service().await;
        let assessment = service._create_assessment(None, course_id.into()).await.unwrap();

        let result = service._record_grade(assessment.id, StudentId::new(), None).await;
        assert!(matches!(result, Err(AssessmentsServiceError::StudentNotFound)));
    }

    #[tokio::test]
    async fn test_delete_assessment_removes_grades_and_submissions() {
        let (service, course_id) = setup_test_service().await;
        let student_id = create_student(&service.db, "Tama", "Wiremu", 131_000_002).await;
        let assessment = service._create_assessment(None, course_id.into()).await.unwrap();

        service._record_grade(assessment.id, student_id, None).await.unwrap();
        service._submit(assessment.id, student_id).await.unwrap();
        service._submit(assessment.id, student_id).await.unwrap();
        assert_eq!(service._list_submissions(assessment.id).await.unwrap().len(), 2);

        service._delete_assessment(assessment.id).await.unwrap();

        assert!(service._list_grades(assessment.id).await.unwrap().is_empty());
        assert!(service._list_submissions(assessment.id).await.unwrap().is_empty());
        assert!(matches!(
            service._delete_assessment(assessment.id).await,
            Err(AssessmentsServiceError::AssessmentNotFound)
        ));
    }
}
