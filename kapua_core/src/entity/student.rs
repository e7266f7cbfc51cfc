use crate::ids::{
    EligibilityCriteriaId, ExchangeSchemeId, PersonId, StudentId, StudentTypeId, ZoningStatusId,
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// [16] Ongoing Resourcing Scheme funding level.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(1))")]
pub enum Orrs {
    #[default]
    #[sea_orm(string_value = "N")]
    NonOrrs,
    #[sea_orm(string_value = "H")]
    High,
    #[sea_orm(string_value = "V")]
    VeryHigh,
}

impl Orrs {
    pub fn label(&self) -> &'static str {
        match self {
            Orrs::NonOrrs => "Non-ORRS",
            Orrs::High => "ORRS - High Level",
            Orrs::VeryHigh => "ORRS - Very High Level",
        }
    }
}

// Bracketed numbers are the field positions on the MoE roll return.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: StudentId,
    #[sea_orm(unique)]
    pub person_id: PersonId,
    /// [3] National Student Number
    #[sea_orm(unique)]
    pub ministry_id: i64,
    /// [16] ORRS
    pub orrs: Orrs,
    /// [17] Funding Year Level
    pub funding_year_level: i32,
    /// [18] Type of Student
    pub student_type_id: StudentTypeId,
    /// [20] Zoning Status
    pub zoning_status_id: ZoningStatusId,
    /// [22] Tuition Fee Paid by International Students
    pub tuition_fee: Option<i32>,
    /// [23] Full Time Equivalent
    #[sea_orm(column_type = "Decimal(Some((3, 1)))", nullable)]
    pub fulltime_equivalent: Option<Decimal>,
    /// [94] Exchange Scheme or Agreement
    pub exchange_scheme_id: Option<ExchangeSchemeId>,
    /// [95] Student is a school boarder
    pub boarding_status: bool,
    /// [100] Eligibility Criteria
    pub eligibility_criteria_id: Option<EligibilityCriteriaId>,
    /// [103] Current Year Level
    pub year_level: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::person::Entity",
        from = "Column::PersonId",
        to = "super::person::Column::Id"
    )]
    Person,
    #[sea_orm(
        belongs_to = "super::student_type::Entity",
        from = "Column::StudentTypeId",
        to = "super::student_type::Column::Id"
    )]
    StudentType,
    #[sea_orm(
        belongs_to = "super::zoning_status::Entity",
        from = "Column::ZoningStatusId",
        to = "super::zoning_status::Column::Id"
    )]
    ZoningStatus,
    #[sea_orm(
        belongs_to = "super::exchange_scheme::Entity",
        from = "Column::ExchangeSchemeId",
        to = "super::exchange_scheme::Column::Id"
    )]
    ExchangeScheme,
    #[sea_orm(
        belongs_to = "super::eligibility_criteria::Entity",
        from = "Column::EligibilityCriteriaId",
        to = "super::eligibility_criteria::Column::Id"
    )]
    EligibilityCriteria,
    #[sea_orm(has_many = "super::enrolment::Entity")]
    Enrolment,
    #[sea_orm(has_many = "super::school_enrolment::Entity")]
    SchoolEnrolment,
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Person.def()
    }
}

impl Related<super::student_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentType.def()
    }
}

impl Related<super::zoning_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ZoningStatus.def()
    }
}

impl Related<super::exchange_scheme::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExchangeScheme.def()
    }
}

impl Related<super::eligibility_criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EligibilityCriteria.def()
    }
}

impl Related<super::enrolment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrolment.def()
    }
}

impl Related<super::school_enrolment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SchoolEnrolment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
