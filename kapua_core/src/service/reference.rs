//! Import of the MoE reference code tables.
//!
//! The tables arrive as a single JSON document. Importing is idempotent: a row
//! whose ministry code (or, for subject groups, name) is already present is
//! left alone.

use std::path::Path;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    entity::prelude::*,
    error::{check_required, ValidationError},
    ids::{
        EligibilityCriteriaId, ExchangeSchemeId, InstructionalYearLevelId, LeaveReasonId,
        StudentTypeId, SubjectGroupId, SubjectId, ZoningStatusId,
    },
    service::attendance::NewAttendanceCode,
};

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("could not read reference codes")]
    Io(#[from] std::io::Error),

    #[error("malformed reference codes")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectCode {
    pub ministry_code: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectGroupCodes {
    pub name: String,
    #[serde(default)]
    pub subjects: Vec<SubjectCode>,
}

/// A code with a textual ministry code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code {
    pub ministry_code: String,
    pub description: String,
}

impl Code {
    pub(crate) fn validate(
        &self,
        code_len: usize,
        description_len: usize,
    ) -> Result<(), ValidationError> {
        check_required("ministry_code", &self.ministry_code, code_len)?;
        check_required("description", &self.description, description_len)
    }
}

/// A code with a numeric ministry code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericCode {
    pub ministry_code: i32,
    pub description: String,
}

impl NumericCode {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        check_required("description", &self.description, DESCRIPTION_LEN)
    }
}

pub(crate) const DESCRIPTION_LEN: usize = 256;
pub(crate) const YEAR_LEVEL_CODE_LEN: usize = 4;
pub(crate) const YEAR_LEVEL_DESCRIPTION_LEN: usize = 32;
pub(crate) const STUDENT_TYPE_CODE_LEN: usize = 8;
pub(crate) const ZONING_STATUS_CODE_LEN: usize = 4;
pub(crate) const LEAVE_REASON_CODE_LEN: usize = 1;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceCodes {
    pub subject_groups: Vec<SubjectGroupCodes>,
    pub instructional_year_levels: Vec<Code>,
    pub attendance_codes: Vec<NewAttendanceCode>,
    pub student_types: Vec<Code>,
    pub zoning_statuses: Vec<Code>,
    pub exchange_schemes: Vec<NumericCode>,
    pub eligibility_criteria: Vec<NumericCode>,
    pub leave_reasons: Vec<Code>,
}

impl ReferenceCodes {
    pub async fn load(path: &Path) -> Result<Self, ReferenceError> {
        let contents = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Rows inserted per table by one import.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub subject_groups: usize,
    pub subjects: usize,
    pub instructional_year_levels: usize,
    pub attendance_codes: usize,
    pub student_types: usize,
    pub zoning_statuses: usize,
    pub exchange_schemes: usize,
    pub eligibility_criteria: usize,
    pub leave_reasons: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.subject_groups
            + self.subjects
            + self.instructional_year_levels
            + self.attendance_codes
            + self.student_types
            + self.zoning_statuses
            + self.exchange_schemes
            + self.eligibility_criteria
            + self.leave_reasons
    }
}

#[derive(Clone)]
pub struct ReferenceService {
    db: DatabaseConnection,
}

impl ReferenceService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Load every table of `codes` in one transaction.
    pub async fn _import(&self, codes: ReferenceCodes) -> Result<ImportSummary, ReferenceError> {
        let txn = self.db.begin().await?;
        let mut summary = ImportSummary::default();

        import_subjects(&txn, codes.subject_groups, &mut summary).await?;

        for level in codes.instructional_year_levels {
            level.validate(YEAR_LEVEL_CODE_LEN, YEAR_LEVEL_DESCRIPTION_LEN)?;
            let exists = InstructionalYearLevel::find()
                .filter(InstructionalYearLevelColumn::MinistryCode.eq(level.ministry_code.as_str()))
                .one(&txn)
                .await?
                .is_some();
            if !exists {
                InstructionalYearLevelActiveModel {
                    id: Set(InstructionalYearLevelId::new()),
                    ministry_code: Set(level.ministry_code),
                    description: Set(level.description),
                }
                .insert(&txn)
                .await?;
                summary.instructional_year_levels += 1;
            }
        }

        for code in codes.attendance_codes {
            code.validate()?;
            let exists = AttendanceCode::find_by_id(code.code.clone())
                .one(&txn)
                .await?
                .is_some();
            if !exists {
                AttendanceCode::insert(code.into_active_model())
                    .exec(&txn)
                    .await?;
                summary.attendance_codes += 1;
            }
        }

        for code in codes.student_types {
            code.validate(STUDENT_TYPE_CODE_LEN, DESCRIPTION_LEN)?;
            let exists = StudentType::find()
                .filter(StudentTypeColumn::MinistryCode.eq(code.ministry_code.as_str()))
                .one(&txn)
                .await?
                .is_some();
            if !exists {
                StudentTypeActiveModel {
                    id: Set(StudentTypeId::new()),
                    ministry_code: Set(code.ministry_code),
                    description: Set(code.description),
                }
                .insert(&txn)
                .await?;
                summary.student_types += 1;
            }
        }

        for code in codes.zoning_statuses {
            code.validate(ZONING_STATUS_CODE_LEN, DESCRIPTION_LEN)?;
            let exists = ZoningStatus::find()
                .filter(ZoningStatusColumn::MinistryCode.eq(code.ministry_code.as_str()))
                .one(&txn)
                .await?
                .is_some();
            if !exists {
                ZoningStatusActiveModel {
                    id: Set(ZoningStatusId::new()),
                    ministry_code: Set(code.ministry_code),
                    description: Set(code.description),
                }
                .insert(&txn)
                .await?;
                summary.zoning_statuses += 1;
            }
        }

        for code in codes.exchange_schemes {
            code.validate()?;
            let exists = ExchangeScheme::find()
                .filter(ExchangeSchemeColumn::MinistryCode.eq(code.ministry_code))
                .one(&txn)
                .await?
                .is_some();
            if !exists {
                ExchangeSchemeActiveModel {
                    id: Set(ExchangeSchemeId::new()),
                    ministry_code: Set(code.ministry_code),
                    description: Set(code.description),
                }
                .insert(&txn)
                .await?;
                summary.exchange_schemes += 1;
            }
        }

        for code in codes.eligibility_criteria {
            code.validate()?;
            let exists = EligibilityCriteria::find()
                .filter(EligibilityCriteriaColumn::MinistryCode.eq(code.ministry_code))
                .one(&txn)
                .await?
                .is_some();
            if !exists {
                EligibilityCriteriaActiveModel {
                    id: Set(EligibilityCriteriaId::new()),
                    ministry_code: Set(code.ministry_code),
                    description: Set(code.description),
                }
                .insert(&txn)
                .await?;
                summary.eligibility_criteria += 1;
            }
        }

        for code in codes.leave_reasons {
            code.validate(LEAVE_REASON_CODE_LEN, DESCRIPTION_LEN)?;
            let exists = LeaveReason::find()
                .filter(LeaveReasonColumn::MinistryCode.eq(code.ministry_code.as_str()))
                .one(&txn)
                .await?
                .is_some();
            if !exists {
                LeaveReasonActiveModel {
                    id: Set(LeaveReasonId::new()),
                    ministry_code: Set(code.ministry_code),
                    description: Set(code.description),
                }
                .insert(&txn)
                .await?;
                summary.leave_reasons += 1;
            }
        }

        txn.commit().await?;

        tracing::info!(inserted = summary.total(), ?summary, "imported reference codes");
        Ok(summary)
    }
}

async fn import_subjects(
    txn: &DatabaseTransaction,
    groups: Vec<SubjectGroupCodes>,
    summary: &mut ImportSummary,
) -> Result<(), ReferenceError> {
    for group in groups {
        check_required("name", &group.name, 64)?;

        let existing = SubjectGroup::find()
            .filter(SubjectGroupColumn::Name.eq(group.name.as_str()))
            .one(txn)
            .await?;
        let group_id = match existing {
            Some(existing) => existing.id,
            None => {
                let created = SubjectGroupActiveModel {
                    id: Set(SubjectGroupId::new()),
                    name: Set(group.name),
                    ..Default::default()
                }
                .insert(txn)
                .await?;
                summary.subject_groups += 1;
                created.id
            }
        };

        for subject in group.subjects {
            check_required("ministry_code", &subject.ministry_code, 4)?;
            check_required("name", &subject.name, 64)?;

            let exists = Subject::find()
                .filter(SubjectColumn::MinistryCode.eq(subject.ministry_code.as_str()))
                .one(txn)
                .await?
                .is_some();
            if exists {
                continue;
            }

            SubjectActiveModel {
                id: Set(SubjectId::new()),
                ministry_code: Set(subject.ministry_code),
                name: Set(subject.name),
                group_id: Set(group_id),
                ..Default::default()
            }
            .insert(txn)
            .await?;
            summary.subjects += 1;
        }
    }

    Ok(())
}
