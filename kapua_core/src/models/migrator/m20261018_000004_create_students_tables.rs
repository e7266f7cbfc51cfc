use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(School::Table)
                    .col(pk_uuid(School::Id))
                    .col(string_len(School::Name, 64))
                    .col(integer(School::MinistryCode))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StudentType::Table)
                    .col(pk_uuid(StudentType::Id))
                    .col(string_len(StudentType::MinistryCode, 8))
                    .col(string_len(StudentType::Description, 256))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ZoningStatus::Table)
                    .col(pk_uuid(ZoningStatus::Id))
                    .col(string_len(ZoningStatus::MinistryCode, 4))
                    .col(string_len(ZoningStatus::Description, 256))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExchangeScheme::Table)
                    .col(pk_uuid(ExchangeScheme::Id))
                    .col(integer(ExchangeScheme::MinistryCode))
                    .col(string_len(ExchangeScheme::Description, 256))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EligibilityCriteria::Table)
                    .col(pk_uuid(EligibilityCriteria::Id))
                    .col(integer(EligibilityCriteria::MinistryCode))
                    .col(string_len(EligibilityCriteria::Description, 256))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LeaveReason::Table)
                    .col(pk_uuid(LeaveReason::Id))
                    .col(string_len(LeaveReason::MinistryCode, 1))
                    .col(string_len(LeaveReason::Description, 256))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .col(pk_uuid(Student::Id))
                    .col(uuid_uniq(Student::PersonId))
                    .col(big_integer_uniq(Student::MinistryId))
                    .col(string_len(Student::Orrs, 1).default("N"))
                    .col(integer(Student::FundingYearLevel))
                    .col(uuid(Student::StudentTypeId))
                    .col(uuid(Student::ZoningStatusId))
                    .col(integer_null(Student::TuitionFee))
                    .col(decimal_len_null(Student::FulltimeEquivalent, 3, 1))
                    .col(uuid_null(Student::ExchangeSchemeId))
                    .col(boolean(Student::BoardingStatus).default(false))
                    .col(uuid_null(Student::EligibilityCriteriaId))
                    .col(integer(Student::YearLevel))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_person_id")
                            .from(Student::Table, Student::PersonId)
                            .to(Person::Table, Person::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_student_type_id")
                            .from(Student::Table, Student::StudentTypeId)
                            .to(StudentType::Table, StudentType::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_zoning_status_id")
                            .from(Student::Table, Student::ZoningStatusId)
                            .to(ZoningStatus::Table, ZoningStatus::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_exchange_scheme_id")
                            .from(Student::Table, Student::ExchangeSchemeId)
                            .to(ExchangeScheme::Table, ExchangeScheme::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_eligibility_criteria_id")
                            .from(Student::Table, Student::EligibilityCriteriaId)
                            .to(EligibilityCriteria::Table, EligibilityCriteria::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SchoolEnrolment::Table)
                    .col(pk_uuid(SchoolEnrolment::Id))
                    .col(uuid(SchoolEnrolment::StudentId))
                    .col(uuid(SchoolEnrolment::SchoolId))
                    .col(date(SchoolEnrolment::Start))
                    .col(date_null(SchoolEnrolment::End))
                    .col(uuid_null(SchoolEnrolment::LeaveReasonId))
                    .check(
                        Expr::col(SchoolEnrolment::End)
                            .is_null()
                            .or(Expr::col(SchoolEnrolment::Start)
                                .lte(Expr::col(SchoolEnrolment::End))),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_school_enrolment_student_id")
                            .from(SchoolEnrolment::Table, SchoolEnrolment::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_school_enrolment_school_id")
                            .from(SchoolEnrolment::Table, SchoolEnrolment::SchoolId)
                            .to(School::Table, School::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_school_enrolment_leave_reason_id")
                            .from(SchoolEnrolment::Table, SchoolEnrolment::LeaveReasonId)
                            .to(LeaveReason::Table, LeaveReason::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_school_enrolment_student_id")
                    .table(SchoolEnrolment::Table)
                    .col(SchoolEnrolment::StudentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SchoolEnrolment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Student::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LeaveReason::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EligibilityCriteria::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExchangeScheme::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ZoningStatus::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentType::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(School::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum School {
    Table,
    Id,
    Name,
    MinistryCode,
}

#[derive(DeriveIden)]
pub enum StudentType {
    Table,
    Id,
    MinistryCode,
    Description,
}

#[derive(DeriveIden)]
pub enum ZoningStatus {
    Table,
    Id,
    MinistryCode,
    Description,
}

#[derive(DeriveIden)]
pub enum ExchangeScheme {
    Table,
    Id,
    MinistryCode,
    Description,
}

#[derive(DeriveIden)]
pub enum EligibilityCriteria {
    Table,
    Id,
    MinistryCode,
    Description,
}

#[derive(DeriveIden)]
pub enum LeaveReason {
    Table,
    Id,
    MinistryCode,
    Description,
}

#[derive(DeriveIden)]
pub enum Student {
    Table,
    Id,
    PersonId,
    MinistryId,
    Orrs,
    FundingYearLevel,
    StudentTypeId,
    ZoningStatusId,
    TuitionFee,
    FulltimeEquivalent,
    ExchangeSchemeId,
    BoardingStatus,
    EligibilityCriteriaId,
    YearLevel,
}

#[derive(DeriveIden)]
pub enum SchoolEnrolment {
    Table,
    Id,
    StudentId,
    SchoolId,
    Start,
    End,
    LeaveReasonId,
}

#[derive(DeriveIden)]
enum Person {
    Table,
    Id,
}
