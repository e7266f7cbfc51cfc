use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zel_core::prelude::*;

use crate::{
    entity::prelude::*,
    error::{check_len, check_required, ValidationError},
    ids::{ActivityId, AttendanceId, StudentId},
};

#[derive(Debug, Error)]
pub enum AttendanceServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("activity not found")]
    ActivityNotFound,

    #[error("student not found")]
    StudentNotFound,

    #[error("unknown attendance code")]
    CodeNotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<AttendanceServiceError> for ResourceError {
    fn from(error: AttendanceServiceError) -> Self {
        match error {
            AttendanceServiceError::DbError(error) => ResourceError::infra(error),
            AttendanceServiceError::ActivityNotFound => ResourceError::app(error),
            AttendanceServiceError::StudentNotFound => ResourceError::app(error),
            AttendanceServiceError::CodeNotFound => ResourceError::app(error),
            AttendanceServiceError::Validation(_) => ResourceError::app(error),
        }
    }
}

/// One row of the MoE attendance code table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAttendanceCode {
    pub code: String,
    pub in_class: bool,
    pub reason: String,
    #[serde(default)]
    pub explanation: String,
    pub audit_code: String,
    pub truancy_code: String,
    pub half_day_calc: bool,
}

impl NewAttendanceCode {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        check_required("code", &self.code, 1)?;
        check_required("reason", &self.reason, 128)?;
        check_len("audit_code", &self.audit_code, 1)?;
        check_len("truancy_code", &self.truancy_code, 1)?;
        Ok(())
    }

    pub(crate) fn into_active_model(self) -> AttendanceCodeActiveModel {
        AttendanceCodeActiveModel {
            code: Set(self.code),
            in_class: Set(self.in_class),
            reason: Set(self.reason),
            explanation: Set(self.explanation),
            audit_code: Set(self.audit_code),
            truancy_code: Set(self.truancy_code),
            half_day_calc: Set(self.half_day_calc),
        }
    }
}

#[derive(Clone)]
pub struct AttendanceService {
    db: DatabaseConnection,
}

impl AttendanceService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn _create_code(
        &self,
        code: NewAttendanceCode,
    ) -> Result<AttendanceCodeModel, AttendanceServiceError> {
        code.validate()?;

        let code = AttendanceCode::insert(code.into_active_model())
            .exec_with_returning(&self.db)
            .await?;

        tracing::info!(code = %code.code, "created attendance code");
        Ok(code)
    }

    pub async fn _list_codes(&self) -> Result<Vec<AttendanceCodeModel>, AttendanceServiceError> {
        let codes = AttendanceCode::find()
            .order_by_asc(AttendanceCodeColumn::Code)
            .all(&self.db)
            .await?;
        Ok(codes)
    }

    /// Mark a student at an activity. A second mark replaces the first.
    pub async fn _record_attendance(
        &self,
        activity_id: ActivityId,
        student_id: StudentId,
        code: String,
    ) -> Result<AttendanceModel, AttendanceServiceError> {
        let activity = Activity::find_by_id(activity_id)
            .one(&self.db)
            .await?
            .ok_or(AttendanceServiceError::ActivityNotFound)?;

        if !activity.track_attendance {
            tracing::warn!(activity = %activity_id, "rejected attendance for untracked activity");
            return Err(ValidationError::AttendanceNotTracked.into());
        }

        Student::find_by_id(student_id)
            .one(&self.db)
            .await?
            .ok_or(AttendanceServiceError::StudentNotFound)?;
        AttendanceCode::find_by_id(code.clone())
            .one(&self.db)
            .await?
            .ok_or(AttendanceServiceError::CodeNotFound)?;

        let txn = self.db.begin().await?;

        let existing = Attendance::find()
            .filter(AttendanceColumn::ActivityId.eq(activity_id))
            .filter(AttendanceColumn::StudentId.eq(student_id))
            .one(&txn)
            .await?;

        let mark = match existing {
            Some(mark) => {
                let mut mark: AttendanceActiveModel = mark.into();
                mark.code = Set(code);
                mark.update(&txn).await?
            }
            None => {
                let mark = AttendanceActiveModel {
                    id: Set(AttendanceId::new()),
                    activity_id: Set(activity_id),
                    student_id: Set(student_id),
                    code: Set(code),
                };
                Attendance::insert(mark).exec_with_returning(&txn).await?
            }
        };

        txn.commit().await?;

        tracing::info!(activity = %activity_id, student = %student_id, code = %mark.code, "recorded attendance");
        Ok(mark)
    }

    pub async fn _list_for_activity(
        &self,
        activity_id: ActivityId,
    ) -> Result<Vec<AttendanceModel>, AttendanceServiceError> {
        let marks = Attendance::find()
            .filter(AttendanceColumn::ActivityId.eq(activity_id))
            .all(&self.db)
            .await?;
        Ok(marks)
    }

    /// A student's marks with the activity each belongs to, earliest activity first.
    pub async fn _list_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<(AttendanceModel, ActivityModel)>, AttendanceServiceError> {
        let rows = Attendance::find()
            .filter(AttendanceColumn::StudentId.eq(student_id))
            .find_also_related(Activity)
            .order_by_asc(ActivityColumn::Start)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(mark, activity)| activity.map(|activity| (mark, activity)))
            .collect())
    }
}
