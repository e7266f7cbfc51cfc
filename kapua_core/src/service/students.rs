use chrono::NaiveDate;
use sea_orm::{prelude::Decimal, DatabaseConnection};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zel_core::prelude::*;

use crate::{
    entity::prelude::*,
    error::{check_decimal, check_required, ValidationError},
    service::reference::{
        Code, NumericCode, DESCRIPTION_LEN, LEAVE_REASON_CODE_LEN, STUDENT_TYPE_CODE_LEN,
        ZONING_STATUS_CODE_LEN,
    },
    ids::{
        EligibilityCriteriaId, ExchangeSchemeId, LeaveReasonId, PersonId, SchoolEnrolmentId,
        SchoolId, StudentId, StudentTypeId, ZoningStatusId,
    },
};

#[derive(Debug, Error)]
pub enum StudentsServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("student not found")]
    StudentNotFound,

    #[error("person not found")]
    PersonNotFound,

    #[error("school not found")]
    SchoolNotFound,

    #[error("school enrolment not found")]
    SchoolEnrolmentNotFound,

    #[error("a student with this National Student Number already exists")]
    DuplicateMinistryId,

    #[error("this person is already a student")]
    DuplicatePerson,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<StudentsServiceError> for ResourceError {
    fn from(error: StudentsServiceError) -> Self {
        match error {
            StudentsServiceError::DbError(error) => ResourceError::infra(error),
            StudentsServiceError::StudentNotFound => ResourceError::app(error),
            StudentsServiceError::PersonNotFound => ResourceError::app(error),
            StudentsServiceError::SchoolNotFound => ResourceError::app(error),
            StudentsServiceError::SchoolEnrolmentNotFound => ResourceError::app(error),
            StudentsServiceError::DuplicateMinistryId => ResourceError::app(error),
            StudentsServiceError::DuplicatePerson => ResourceError::app(error),
            StudentsServiceError::Validation(_) => ResourceError::app(error),
        }
    }
}

/// Roll return fields of a student that can change over time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDetails {
    pub ministry_id: i64,
    #[serde(default)]
    pub orrs: Orrs,
    pub funding_year_level: i32,
    pub student_type_id: StudentTypeId,
    pub zoning_status_id: ZoningStatusId,
    pub tuition_fee: Option<i32>,
    pub fulltime_equivalent: Option<Decimal>,
    pub exchange_scheme_id: Option<ExchangeSchemeId>,
    #[serde(default)]
    pub boarding_status: bool,
    pub eligibility_criteria_id: Option<EligibilityCriteriaId>,
    pub year_level: i32,
}

impl StudentDetails {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(fte) = self.fulltime_equivalent {
            check_decimal("fulltime_equivalent", fte, 3, 1)?;
        }
        Ok(())
    }

    fn apply(self, student: &mut StudentActiveModel) {
        student.ministry_id = Set(self.ministry_id);
        student.orrs = Set(self.orrs);
        student.funding_year_level = Set(self.funding_year_level);
        student.student_type_id = Set(self.student_type_id);
        student.zoning_status_id = Set(self.zoning_status_id);
        student.tuition_fee = Set(self.tuition_fee);
        student.fulltime_equivalent = Set(self.fulltime_equivalent);
        student.exchange_scheme_id = Set(self.exchange_scheme_id);
        student.boarding_status = Set(self.boarding_status);
        student.eligibility_criteria_id = Set(self.eligibility_criteria_id);
        student.year_level = Set(self.year_level);
    }
}

/// One line of the student index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: StudentId,
    pub ministry_id: i64,
    pub display_name: String,
    pub year_level: i32,
}

/// A student together with the person they are.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student: StudentModel,
    pub person: PersonModel,
}

fn unique_violation(error: DbErr) -> StudentsServiceError {
    match error.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) if message.contains("ministry_id") => {
            StudentsServiceError::DuplicateMinistryId
        }
        Some(SqlErr::UniqueConstraintViolation(message)) if message.contains("person_id") => {
            StudentsServiceError::DuplicatePerson
        }
        _ => error.into(),
    }
}

#[derive(Clone)]
pub struct StudentsService {
    db: DatabaseConnection,
}

impl StudentsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn _create_person(
        &self,
        first_name: String,
        last_name: String,
    ) -> Result<PersonModel, StudentsServiceError> {
        check_required("first_name", &first_name, 64)?;
        check_required("last_name", &last_name, 64)?;

        let person = PersonActiveModel {
            id: Set(PersonId::new()),
            first_name: Set(first_name),
            last_name: Set(last_name),
        };
        Ok(Person::insert(person).exec_with_returning(&self.db).await?)
    }

    pub async fn _create_school(
        &self,
        name: String,
        ministry_code: i32,
    ) -> Result<SchoolModel, StudentsServiceError> {
        check_required("name", &name, 64)?;

        let school = SchoolActiveModel {
            id: Set(SchoolId::new()),
            name: Set(name),
            ministry_code: Set(ministry_code),
        };
        Ok(School::insert(school).exec_with_returning(&self.db).await?)
    }

    pub async fn _list_schools(&self) -> Result<Vec<SchoolModel>, StudentsServiceError> {
        Ok(School::find()
            .order_by_asc(SchoolColumn::Name)
            .all(&self.db)
            .await?)
    }

    pub async fn _create_student_type(
        &self,
        ministry_code: String,
        description: String,
    ) -> Result<StudentTypeModel, StudentsServiceError> {
        let code = Code { ministry_code, description };
        code.validate(STUDENT_TYPE_CODE_LEN, DESCRIPTION_LEN)?;

        let student_type = StudentTypeActiveModel {
            id: Set(StudentTypeId::new()),
            ministry_code: Set(code.ministry_code),
            description: Set(code.description),
        };
        Ok(StudentType::insert(student_type)
            .exec_with_returning(&self.db)
            .await?)
    }

    pub async fn _create_zoning_status(
        &self,
        ministry_code: String,
        description: String,
    ) -> Result<ZoningStatusModel, StudentsServiceError> {
        let code = Code { ministry_code, description };
        code.validate(ZONING_STATUS_CODE_LEN, DESCRIPTION_LEN)?;

        let status = ZoningStatusActiveModel {
            id: Set(ZoningStatusId::new()),
            ministry_code: Set(code.ministry_code),
            description: Set(code.description),
        };
        Ok(ZoningStatus::insert(status).exec_with_returning(&self.db).await?)
    }

    pub async fn _create_exchange_scheme(
        &self,
        ministry_code: i32,
        description: String,
    ) -> Result<ExchangeSchemeModel, StudentsServiceError> {
        let code = NumericCode { ministry_code, description };
        code.validate()?;

        let scheme = ExchangeSchemeActiveModel {
            id: Set(ExchangeSchemeId::new()),
            ministry_code: Set(code.ministry_code),
            description: Set(code.description),
        };
        Ok(ExchangeScheme::insert(scheme).exec_with_returning(&self.db).await?)
    }

    pub async fn _create_eligibility_criteria(
        &self,
        ministry_code: i32,
        description: String,
    ) -> Result<EligibilityCriteriaModel, StudentsServiceError> {
        let code = NumericCode { ministry_code, description };
        code.validate()?;

        let criteria = EligibilityCriteriaActiveModel {
            id: Set(EligibilityCriteriaId::new()),
            ministry_code: Set(code.ministry_code),
            description: Set(code.description),
        };
        Ok(EligibilityCriteria::insert(criteria)
            .exec_with_returning(&self.db)
            .await?)
    }

    pub async fn _create_leave_reason(
        &self,
        ministry_code: String,
        description: String,
    ) -> Result<LeaveReasonModel, StudentsServiceError> {
        let code = Code { ministry_code, description };
        code.validate(LEAVE_REASON_CODE_LEN, DESCRIPTION_LEN)?;

        let reason = LeaveReasonActiveModel {
            id: Set(LeaveReasonId::new()),
            ministry_code: Set(code.ministry_code),
            description: Set(code.description),
        };
        Ok(LeaveReason::insert(reason).exec_with_returning(&self.db).await?)
    }

    /// Register `person_id` as a student.
    ///
    /// A person can be a student once, and a National Student Number belongs
    /// to one student.
    pub async fn _create_student(
        &self,
        person_id: PersonId,
        details: StudentDetails,
    ) -> Result<StudentModel, StudentsServiceError> {
        details.validate()?;
        Person::find_by_id(person_id)
            .one(&self.db)
            .await?
            .ok_or(StudentsServiceError::PersonNotFound)?;

        let mut student = StudentActiveModel {
            id: Set(StudentId::new()),
            person_id: Set(person_id),
            ..Default::default()
        };
        details.apply(&mut student);

        let student = Student::insert(student)
            .exec_with_returning(&self.db)
            .await
            .map_err(unique_violation)?;

        tracing::info!(
            id = %student.id,
            ministry_id = student.ministry_id,
            orrs = student.orrs.label(),
            "created student"
        );
        Ok(student)
    }

    pub async fn _get_student(&self, student_id: StudentId) -> Result<StudentRecord, StudentsServiceError> {
        let (student, person) = Student::find_by_id(student_id)
            .find_also_related(Person)
            .one(&self.db)
            .await?
            .ok_or(StudentsServiceError::StudentNotFound)?;
        let person = person.ok_or(StudentsServiceError::PersonNotFound)?;

        Ok(StudentRecord { student, person })
    }

    pub async fn _find_by_ministry_id(
        &self,
        ministry_id: i64,
    ) -> Result<Option<StudentModel>, StudentsServiceError> {
        Ok(Student::find()
            .filter(StudentColumn::MinistryId.eq(ministry_id))
            .one(&self.db)
            .await?)
    }

    pub async fn _update_student(
        &self,
        student_id: StudentId,
        details: StudentDetails,
    ) -> Result<StudentModel, StudentsServiceError> {
        details.validate()?;
        let student = Student::find_by_id(student_id)
            .one(&self.db)
            .await?
            .ok_or(StudentsServiceError::StudentNotFound)?;

        let mut student: StudentActiveModel = student.into();
        details.apply(&mut student);

        let student = student.update(&self.db).await.map_err(unique_violation)?;

        tracing::info!(id = %student_id, "updated student");
        Ok(student)
    }

    /// Delete a student and everything recorded against them. The person stays.
    pub async fn _delete_student(&self, student_id: StudentId) -> Result<(), StudentsServiceError> {
        let result = Student::delete_by_id(student_id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StudentsServiceError::StudentNotFound);
        }
        tracing::info!(id = %student_id, "deleted student");
        Ok(())
    }

    /// Every student with a display name, sorted by last then first name.
    pub async fn _index(&self) -> Result<Vec<StudentSummary>, StudentsServiceError> {
        let rows = Student::find()
            .find_also_related(Person)
            .order_by_asc(PersonColumn::LastName)
            .order_by_asc(PersonColumn::FirstName)
            .all(&self.db)
            .await?;

        let index = rows
            .into_iter()
            .filter_map(|(student, person)| {
                person.map(|person| StudentSummary {
                    id: student.id,
                    ministry_id: student.ministry_id,
                    display_name: person.full_name(),
                    year_level: student.year_level,
                })
            })
            .collect::<Vec<_>>();

        tracing::debug!(students = index.len(), "loaded student index");
        Ok(index)
    }

    pub async fn _enrol_in_school(
        &self,
        student_id: StudentId,
        school_id: SchoolId,
        start: NaiveDate,
    ) -> Result<SchoolEnrolmentModel, StudentsServiceError> {
        Student::find_by_id(student_id)
            .one(&self.db)
            .await?
            .ok_or(StudentsServiceError::StudentNotFound)?;
        School::find_by_id(school_id)
            .one(&self.db)
            .await?
            .ok_or(StudentsServiceError::SchoolNotFound)?;

        let enrolment = SchoolEnrolmentActiveModel {
            id: Set(SchoolEnrolmentId::new()),
            student_id: Set(student_id),
            school_id: Set(school_id),
            start: Set(start),
            end: Set(None),
            leave_reason_id: Set(None),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(student = %student_id, school = %school_id, %start, "enrolled in school");
        Ok(enrolment)
    }

    /// Record a student leaving a school on `end`.
    pub async fn _leave_school(
        &self,
        enrolment_id: SchoolEnrolmentId,
        end: NaiveDate,
        leave_reason_id: Option<LeaveReasonId>,
    ) -> Result<SchoolEnrolmentModel, StudentsServiceError> {
        let enrolment = SchoolEnrolment::find_by_id(enrolment_id)
            .one(&self.db)
            .await?
            .ok_or(StudentsServiceError::SchoolEnrolmentNotFound)?;

        if enrolment.start > end {
            tracing::warn!(enrolment = %enrolment_id, %end, "rejected leaving date before start");
            return Err(ValidationError::DateRange.into());
        }

        let mut enrolment: SchoolEnrolmentActiveModel = enrolment.into();
        enrolment.end = Set(Some(end));
        enrolment.leave_reason_id = Set(leave_reason_id);
        Ok(enrolment.update(&self.db).await?)
    }

    pub async fn _list_school_enrolments(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<SchoolEnrolmentModel>, StudentsServiceError> {
        Ok(SchoolEnrolment::find()
            .filter(SchoolEnrolmentColumn::StudentId.eq(student_id))
            .order_by_asc(SchoolEnrolmentColumn::Start)
            .all(&self.db)
            .await?)
    }
}

#[zel_service(name = "students")]
trait Students {
    #[doc = "List all students by last name, then first name"]
    #[method(name = "index")]
    async fn index(&self) -> Result<Vec<StudentSummary>, ResourceError>;

    #[doc = "Get a student with their personal details"]
    #[method(name = "get_student")]
    async fn get_student(&self, student_id: StudentId) -> Result<StudentRecord, ResourceError>;

    #[doc = "Look a student up by National Student Number"]
    #[method(name = "find_by_ministry_id")]
    async fn find_by_ministry_id(&self, ministry_id: i64) -> Result<Option<StudentModel>, ResourceError>;
}

#[async_trait]
impl StudentsServer for StudentsService {
    async fn index(&self, _ctx: RequestContext) -> Result<Vec<StudentSummary>, ResourceError> {
        Ok(self._index().await?)
    }

    async fn get_student(
        &self,
        _ctx: RequestContext,
        student_id: StudentId,
    ) -> Result<StudentRecord, ResourceError> {
        Ok(self._get_student(student_id).await?)
    }

    async fn find_by_ministry_id(
        &self,
        _ctx: RequestContext,
        ministry_id: i64,
    ) -> Result<Option<StudentModel>, ResourceError> {
        Ok(self._find_by_ministry_id(ministry_id).await?)
    }
}
