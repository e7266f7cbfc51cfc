// SeaORM entities, one module per table.

pub mod activity;
pub mod assessment;
pub mod attendance;
pub mod attendance_code;
pub mod course;
pub mod eligibility_criteria;
pub mod enrolment;
pub mod event;
pub mod event_group;
pub mod event_type;
pub mod exchange_scheme;
pub mod grade;
pub mod group;
pub mod instructional_year_level;
pub mod leave_reason;
pub mod page;
pub mod person;
pub mod place;
pub mod schedule;
pub mod schedule_activity;
pub mod school;
pub mod school_enrolment;
pub mod student;
pub mod student_type;
pub mod subject;
pub mod subject_group;
pub mod submission;
pub mod zoning_status;

use sea_orm::{ActiveValue, Value};

#[cfg(test)]
mod tests;

/// The value an active model field will hold after saving, if known.
pub(crate) fn current<V>(value: &ActiveValue<V>) -> Option<&V>
where
    V: Into<Value>,
{
    match value {
        ActiveValue::Set(value) | ActiveValue::Unchanged(value) => Some(value),
        ActiveValue::NotSet => None,
    }
}

pub mod prelude {
    // Re-export all entities for convenience
    pub use super::activity::{
        ActiveModel as ActivityActiveModel, Column as ActivityColumn, Entity as Activity,
        Model as ActivityModel,
    };
    pub use super::assessment::{
        ActiveModel as AssessmentActiveModel, Column as AssessmentColumn, Entity as Assessment,
        Model as AssessmentModel,
    };
    pub use super::attendance::{
        ActiveModel as AttendanceActiveModel, Column as AttendanceColumn, Entity as Attendance,
        Model as AttendanceModel,
    };
    pub use super::attendance_code::{
        ActiveModel as AttendanceCodeActiveModel, Column as AttendanceCodeColumn, Entity as AttendanceCode,
        Model as AttendanceCodeModel,
    };
    pub use super::course::{
        ActiveModel as CourseActiveModel, Column as CourseColumn, Entity as Course,
        Model as CourseModel,
    };
    pub use super::eligibility_criteria::{
        ActiveModel as EligibilityCriteriaActiveModel, Column as EligibilityCriteriaColumn, Entity as EligibilityCriteria,
        Model as EligibilityCriteriaModel,
    };
    pub use super::enrolment::{
        ActiveModel as EnrolmentActiveModel, Column as EnrolmentColumn, Entity as Enrolment,
        Model as EnrolmentModel,
    };
    pub use super::event::{
        ActiveModel as EventActiveModel, Column as EventColumn, Entity as Event,
        Model as EventModel,
    };
    pub use super::event_group::{
        ActiveModel as EventGroupActiveModel, Column as EventGroupColumn, Entity as EventGroup,
        Model as EventGroupModel,
    };
    pub use super::event_type::{
        ActiveModel as EventTypeActiveModel, Column as EventTypeColumn, Entity as EventType,
        Model as EventTypeModel,
    };
    pub use super::exchange_scheme::{
        ActiveModel as ExchangeSchemeActiveModel, Column as ExchangeSchemeColumn, Entity as ExchangeScheme,
        Model as ExchangeSchemeModel,
    };
    pub use super::grade::{
        ActiveModel as GradeActiveModel, Column as GradeColumn, Entity as Grade,
        Model as GradeModel,
    };
    pub use super::group::{
        ActiveModel as GroupActiveModel, Column as GroupColumn, Entity as Group,
        Model as GroupModel,
    };
    pub use super::instructional_year_level::{
        ActiveModel as InstructionalYearLevelActiveModel, Column as InstructionalYearLevelColumn, Entity as InstructionalYearLevel,
        Model as InstructionalYearLevelModel,
    };
    pub use super::leave_reason::{
        ActiveModel as LeaveReasonActiveModel, Column as LeaveReasonColumn, Entity as LeaveReason,
        Model as LeaveReasonModel,
    };
    pub use super::page::{
        ActiveModel as PageActiveModel, Column as PageColumn, Entity as Page,
        Model as PageModel,
    };
    pub use super::person::{
        ActiveModel as PersonActiveModel, Column as PersonColumn, Entity as Person,
        Model as PersonModel,
    };
    pub use super::place::{
        ActiveModel as PlaceActiveModel, Column as PlaceColumn, Entity as Place,
        Model as PlaceModel,
    };
    pub use super::schedule::{
        ActiveModel as ScheduleActiveModel, Column as ScheduleColumn, Entity as Schedule,
        Model as ScheduleModel,
    };
    pub use super::schedule_activity::{
        ActiveModel as ScheduleActivityActiveModel, Column as ScheduleActivityColumn, Entity as ScheduleActivity,
        Model as ScheduleActivityModel,
    };
    pub use super::school::{
        ActiveModel as SchoolActiveModel, Column as SchoolColumn, Entity as School,
        Model as SchoolModel,
    };
    pub use super::school_enrolment::{
        ActiveModel as SchoolEnrolmentActiveModel, Column as SchoolEnrolmentColumn, Entity as SchoolEnrolment,
        Model as SchoolEnrolmentModel,
    };
    pub use super::student::{
        ActiveModel as StudentActiveModel, Column as StudentColumn, Entity as Student,
        Model as StudentModel,
    };
    pub use super::student_type::{
        ActiveModel as StudentTypeActiveModel, Column as StudentTypeColumn, Entity as StudentType,
        Model as StudentTypeModel,
    };
    pub use super::subject::{
        ActiveModel as SubjectActiveModel, Column as SubjectColumn, Entity as Subject,
        Model as SubjectModel,
    };
    pub use super::subject_group::{
        ActiveModel as SubjectGroupActiveModel, Column as SubjectGroupColumn, Entity as SubjectGroup,
        Model as SubjectGroupModel,
    };
    pub use super::submission::{
        ActiveModel as SubmissionActiveModel, Column as SubmissionColumn, Entity as Submission,
        Model as SubmissionModel,
    };
    pub use super::zoning_status::{
        ActiveModel as ZoningStatusActiveModel, Column as ZoningStatusColumn, Entity as ZoningStatus,
        Model as ZoningStatusModel,
    };
    pub use super::student::Orrs;

    // Re-export commonly used SeaORM types and traits
    pub use sea_orm::{
        ActiveModelTrait,
        ActiveValue,

        ColumnTrait,
        Condition,
        ConnectionTrait,

        // Database and connection types
        Database,
        DatabaseConnection,
        DbConn,
        // Common result types
        DbErr,
        SqlErr,

        // Core traits
        EntityTrait,
        IntoActiveModel,
        ModelTrait,
        NotSet,
        PaginatorTrait,
        QueryFilter,
        QueryOrder,
        QuerySelect,
        Related,
        RelationTrait,
        // Active model helpers
        Set,
        TransactionTrait,
        Unchanged,
    };
}
