use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};
use thiserror::Error;
use zel_core::prelude::*;

use crate::{
    entity::prelude::*,
    error::{check_required, ValidationError},
    ids::{ActivityId, CourseId, EnrolmentId, ScheduleId, StudentId},
};

#[derive(Debug, Error)]
pub enum SchedulingServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("schedule not found")]
    ScheduleNotFound,

    #[error("activity not found")]
    ActivityNotFound,

    #[error("enrolment not found")]
    EnrolmentNotFound,

    #[error("course not found")]
    CourseNotFound,

    #[error("student not found")]
    StudentNotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<SchedulingServiceError> for ResourceError {
    fn from(error: SchedulingServiceError) -> Self {
        match error {
            SchedulingServiceError::DbError(error) => ResourceError::infra(error),
            SchedulingServiceError::ScheduleNotFound => ResourceError::app(error),
            SchedulingServiceError::ActivityNotFound => ResourceError::app(error),
            SchedulingServiceError::EnrolmentNotFound => ResourceError::app(error),
            SchedulingServiceError::CourseNotFound => ResourceError::app(error),
            SchedulingServiceError::StudentNotFound => ResourceError::app(error),
            SchedulingServiceError::Validation(_) => ResourceError::app(error),
        }
    }
}

/// Parameters for a new activity.
#[derive(Clone, Debug)]
pub struct NewActivity {
    pub subject: String,
    pub track_attendance: bool,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SchedulingService {
    db: DatabaseConnection,
}

impl SchedulingService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn _create_schedule(
        &self,
        course_id: CourseId,
        name: String,
    ) -> Result<ScheduleModel, SchedulingServiceError> {
        check_required("name", &name, 32)?;

        Course::find_by_id(course_id)
            .one(&self.db)
            .await?
            .ok_or(SchedulingServiceError::CourseNotFound)?;

        let schedule = ScheduleActiveModel {
            id: Set(ScheduleId::new()),
            name: Set(name),
            course_id: Set(course_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::info!(id = %schedule.id, %course_id, "created schedule");
        Ok(schedule)
    }

    pub async fn _get_schedule(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<ScheduleModel, SchedulingServiceError> {
        Schedule::find_by_id(schedule_id)
            .one(&self.db)
            .await?
            .ok_or(SchedulingServiceError::ScheduleNotFound)
    }

    pub async fn _list_schedules(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<ScheduleModel>, SchedulingServiceError> {
        let schedules = Schedule::find()
            .filter(ScheduleColumn::CourseId.eq(course_id))
            .order_by_asc(ScheduleColumn::Name)
            .all(&self.db)
            .await?;
        Ok(schedules)
    }

    pub async fn _rename_schedule(
        &self,
        schedule_id: ScheduleId,
        name: String,
    ) -> Result<ScheduleModel, SchedulingServiceError> {
        check_required("name", &name, 32)?;

        let mut schedule: ScheduleActiveModel = self._get_schedule(schedule_id).await?.into();
        schedule.name = Set(name);
        Ok(schedule.update(&self.db).await?)
    }

    pub async fn _delete_schedule(&self, schedule_id: ScheduleId) -> Result<(), SchedulingServiceError> {
        let result = Schedule::delete_by_id(schedule_id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(SchedulingServiceError::ScheduleNotFound);
        }
        tracing::info!(id = %schedule_id, "deleted schedule");
        Ok(())
    }

    /// Create an activity and put it on each of `schedule_ids`.
    pub async fn _create_activity(
        &self,
        activity: NewActivity,
        schedule_ids: &[ScheduleId],
    ) -> Result<ActivityModel, SchedulingServiceError> {
        check_required("subject", &activity.subject, 64)?;
        if activity.start > activity.end {
            return Err(ValidationError::TimeRange.into());
        }

        let txn = self.db.begin().await?;

        for schedule_id in schedule_ids {
            Schedule::find_by_id(*schedule_id)
                .one(&txn)
                .await?
                .ok_or(SchedulingServiceError::ScheduleNotFound)?;
        }

        let created = ActivityActiveModel {
            id: Set(ActivityId::new()),
            subject: Set(activity.subject),
            track_attendance: Set(activity.track_attendance),
            start: Set(activity.start),
            end: Set(activity.end),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for schedule_id in schedule_ids {
            let link = ScheduleActivityActiveModel {
                schedule_id: Set(*schedule_id),
                activity_id: Set(created.id),
            };
            ScheduleActivity::insert(link).exec(&txn).await?;
        }

        txn.commit().await?;

        tracing::info!(id = %created.id, schedules = schedule_ids.len(), "created activity");
        Ok(created)
    }

    pub async fn _get_activity(
        &self,
        activity_id: ActivityId,
    ) -> Result<ActivityModel, SchedulingServiceError> {
        Activity::find_by_id(activity_id)
            .one(&self.db)
            .await?
            .ok_or(SchedulingServiceError::ActivityNotFound)
    }

    /// Put an existing activity on a schedule. Linking twice is a no-op.
    pub async fn _link_activity(
        &self,
        schedule_id: ScheduleId,
        activity_id: ActivityId,
    ) -> Result<(), SchedulingServiceError> {
        self._get_schedule(schedule_id).await?;
        self._get_activity(activity_id).await?;

        let linked = ScheduleActivity::find_by_id((schedule_id, activity_id))
            .one(&self.db)
            .await?
            .is_some();
        if linked {
            return Ok(());
        }

        let link = ScheduleActivityActiveModel {
            schedule_id: Set(schedule_id),
            activity_id: Set(activity_id),
        };
        ScheduleActivity::insert(link).exec(&self.db).await?;
        Ok(())
    }

    pub async fn _unlink_activity(
        &self,
        schedule_id: ScheduleId,
        activity_id: ActivityId,
    ) -> Result<(), SchedulingServiceError> {
        ScheduleActivity::delete_by_id((schedule_id, activity_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Activities on a schedule ordered by start.
    pub async fn _list_activities(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Vec<ActivityModel>, SchedulingServiceError> {
        let schedule = self._get_schedule(schedule_id).await?;
        let activities = schedule
            .find_related(Activity)
            .order_by_asc(ActivityColumn::Start)
            .all(&self.db)
            .await?;
        Ok(activities)
    }

    pub async fn _list_schedules_for_activity(
        &self,
        activity_id: ActivityId,
    ) -> Result<Vec<ScheduleModel>, SchedulingServiceError> {
        let activity = self._get_activity(activity_id).await?;
        let schedules = activity
            .find_related(Schedule)
            .order_by_asc(ScheduleColumn::Name)
            .all(&self.db)
            .await?;
        Ok(schedules)
    }

    pub async fn _update_activity_times(
        &self,
        activity_id: ActivityId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ActivityModel, SchedulingServiceError> {
        if start > end {
            return Err(ValidationError::TimeRange.into());
        }

        let mut activity: ActivityActiveModel = self._get_activity(activity_id).await?.into();
        activity.start = Set(start);
        activity.end = Set(end);
        Ok(activity.update(&self.db).await?)
    }

    pub async fn _delete_activity(&self, activity_id: ActivityId) -> Result<(), SchedulingServiceError> {
        let result = Activity::delete_by_id(activity_id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(SchedulingServiceError::ActivityNotFound);
        }
        Ok(())
    }

    /// Enrol a student in a schedule from `start`, optionally until `end`.
    pub async fn _enrol(
        &self,
        student_id: StudentId,
        schedule_id: ScheduleId,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<EnrolmentModel, SchedulingServiceError> {
        if end.is_some_and(|end| start > end) {
            tracing::warn!(student = %student_id, schedule = %schedule_id, "rejected enrolment ending before it starts");
            return Err(ValidationError::DateRange.into());
        }

        self._get_schedule(schedule_id).await?;
        Student::find_by_id(student_id)
            .one(&self.db)
            .await?
            .ok_or(SchedulingServiceError::StudentNotFound)?;

        let enrolment = EnrolmentActiveModel {
            id: Set(EnrolmentId::new()),
            student_id: Set(student_id),
            schedule_id: Set(schedule_id),
            start: Set(start),
            end: Set(end),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(id = %enrolment.id, student = %student_id, schedule = %schedule_id, "enrolled student");
        Ok(enrolment)
    }

    /// Close an enrolment on `end`.
    pub async fn _end_enrolment(
        &self,
        enrolment_id: EnrolmentId,
        end: NaiveDate,
    ) -> Result<EnrolmentModel, SchedulingServiceError> {
        let enrolment = Enrolment::find_by_id(enrolment_id)
            .one(&self.db)
            .await?
            .ok_or(SchedulingServiceError::EnrolmentNotFound)?;

        if enrolment.start > end {
            return Err(ValidationError::DateRange.into());
        }

        let mut enrolment: EnrolmentActiveModel = enrolment.into();
        enrolment.end = Set(Some(end));
        let enrolment = enrolment.update(&self.db).await?;

        tracing::info!(id = %enrolment_id, %end, "ended enrolment");
        Ok(enrolment)
    }

    pub async fn _list_enrolments(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Vec<EnrolmentModel>, SchedulingServiceError> {
        let enrolments = Enrolment::find()
            .filter(EnrolmentColumn::ScheduleId.eq(schedule_id))
            .order_by_asc(EnrolmentColumn::Start)
            .all(&self.db)
            .await?;
        Ok(enrolments)
    }

    pub async fn _list_enrolments_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<EnrolmentModel>, SchedulingServiceError> {
        let enrolments = Enrolment::find()
            .filter(EnrolmentColumn::StudentId.eq(student_id))
            .order_by_asc(EnrolmentColumn::Start)
            .all(&self.db)
            .await?;
        Ok(enrolments)
    }

    /// Students enrolled in `schedule_id` on `today`.
    pub async fn _current_students(
        &self,
        schedule_id: ScheduleId,
        today: NaiveDate,
    ) -> Result<Vec<StudentModel>, SchedulingServiceError> {
        let student_ids: Vec<StudentId> = Enrolment::find()
            .filter(EnrolmentColumn::ScheduleId.eq(schedule_id))
            .filter(EnrolmentColumn::Start.lte(today))
            .filter(
                Condition::any()
                    .add(EnrolmentColumn::End.is_null())
                    .add(EnrolmentColumn::End.gte(today)),
            )
            .all(&self.db)
            .await?
            .into_iter()
            .map(|enrolment| enrolment.student_id)
            .collect();

        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let students = Student::find()
            .filter(StudentColumn::Id.is_in(student_ids))
            .all(&self.db)
            .await?;

        tracing::debug!(schedule = %schedule_id, %today, students = students.len(), "loaded current students");
        Ok(students)
    }

    /// Activities a student is expected at between `from` and `to` inclusive.
    ///
    /// An activity counts when it sits on a schedule the student is enrolled in
    /// and its start date falls within that enrolment.
    pub async fn _student_calendar(
        &self,
        student_id: StudentId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ActivityModel>, SchedulingServiceError> {
        if from > to {
            return Err(ValidationError::DateRange.into());
        }

        let enrolments = self._list_enrolments_for_student(student_id).await?;

        // Keyed by id so an activity on two schedules shows up once
        let mut calendar = BTreeMap::new();
        for enrolment in enrolments {
            let activities = ScheduleActivity::find()
                .filter(ScheduleActivityColumn::ScheduleId.eq(enrolment.schedule_id))
                .find_also_related(Activity)
                .all(&self.db)
                .await?;

            for (_, activity) in activities {
                let Some(activity) = activity else { continue };
                let day = activity.start.date_naive();
                if day >= from && day <= to && enrolment.is_active_on(day) {
                    calendar.insert(activity.id.into_uuid(), activity);
                }
            }
        }

        let mut calendar: Vec<_> = calendar.into_values().collect();
        calendar.sort_by_key(|activity| activity.start);
        Ok(calendar)
    }
}
