use sea_orm::DatabaseConnection;
use thiserror::Error;
use zel_core::prelude::*;

use crate::{
    entity::prelude::*,
    error::{check_required, ValidationError},
    ids::{InstructionalYearLevelId, SubjectGroupId, SubjectId},
    service::reference::{Code, YEAR_LEVEL_CODE_LEN, YEAR_LEVEL_DESCRIPTION_LEN},
};

#[derive(Debug, Error)]
pub enum SubjectsServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("subject group not found")]
    SubjectGroupNotFound,

    #[error("subject not found")]
    SubjectNotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<SubjectsServiceError> for ResourceError {
    fn from(error: SubjectsServiceError) -> Self {
        match error {
            SubjectsServiceError::DbError(error) => ResourceError::infra(error),
            SubjectsServiceError::SubjectGroupNotFound => ResourceError::app(error),
            SubjectsServiceError::SubjectNotFound => ResourceError::app(error),
            SubjectsServiceError::Validation(_) => ResourceError::app(error),
        }
    }
}

#[derive(Clone)]
pub struct SubjectsService {
    db: DatabaseConnection,
}

impl SubjectsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a subject group. The slug is derived from the name.
    pub async fn _create_subject_group(
        &self,
        name: String,
    ) -> Result<SubjectGroupModel, SubjectsServiceError> {
        check_required("name", &name, 64)?;

        let group = SubjectGroupActiveModel {
            id: Set(SubjectGroupId::new()),
            name: Set(name),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::info!(id = %group.id, slug = %group.slug, "created subject group");
        Ok(group)
    }

    pub async fn _get_subject_group(
        &self,
        group_id: SubjectGroupId,
    ) -> Result<SubjectGroupModel, SubjectsServiceError> {
        SubjectGroup::find_by_id(group_id)
            .one(&self.db)
            .await?
            .ok_or(SubjectsServiceError::SubjectGroupNotFound)
    }

    pub async fn _list_subject_groups(&self) -> Result<Vec<SubjectGroupModel>, SubjectsServiceError> {
        let groups = SubjectGroup::find()
            .order_by_asc(SubjectGroupColumn::Name)
            .all(&self.db)
            .await?;
        Ok(groups)
    }

    /// Rename a subject group. Its slug is left as it was.
    pub async fn _rename_subject_group(
        &self,
        group_id: SubjectGroupId,
        name: String,
    ) -> Result<SubjectGroupModel, SubjectsServiceError> {
        check_required("name", &name, 64)?;

        let mut group: SubjectGroupActiveModel = self._get_subject_group(group_id).await?.into();
        group.name = Set(name);
        let group = group.update(&self.db).await?;

        tracing::info!(id = %group.id, "renamed subject group");
        Ok(group)
    }

    /// Delete a subject group and, through the foreign key, its subjects.
    pub async fn _delete_subject_group(
        &self,
        group_id: SubjectGroupId,
    ) -> Result<(), SubjectsServiceError> {
        let result = SubjectGroup::delete_by_id(group_id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(SubjectsServiceError::SubjectGroupNotFound);
        }
        tracing::info!(id = %group_id, "deleted subject group");
        Ok(())
    }

    pub async fn _create_subject(
        &self,
        group_id: SubjectGroupId,
        ministry_code: String,
        name: String,
    ) -> Result<SubjectModel, SubjectsServiceError> {
        check_required("ministry_code", &ministry_code, 4)?;
        check_required("name", &name, 64)?;

        // Surface a missing group as a typed error rather than a foreign key failure
        self._get_subject_group(group_id).await?;

        let subject = SubjectActiveModel {
            id: Set(SubjectId::new()),
            ministry_code: Set(ministry_code),
            name: Set(name),
            group_id: Set(group_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        tracing::info!(id = %subject.id, slug = %subject.slug, "created subject");
        Ok(subject)
    }

    pub async fn _get_subject(&self, subject_id: SubjectId) -> Result<SubjectModel, SubjectsServiceError> {
        Subject::find_by_id(subject_id)
            .one(&self.db)
            .await?
            .ok_or(SubjectsServiceError::SubjectNotFound)
    }

    pub async fn _list_subjects(&self) -> Result<Vec<SubjectModel>, SubjectsServiceError> {
        let subjects = Subject::find()
            .order_by_asc(SubjectColumn::Name)
            .all(&self.db)
            .await?;
        Ok(subjects)
    }

    pub async fn _list_subjects_in_group(
        &self,
        group_id: SubjectGroupId,
    ) -> Result<Vec<SubjectModel>, SubjectsServiceError> {
        let subjects = Subject::find()
            .filter(SubjectColumn::GroupId.eq(group_id))
            .order_by_asc(SubjectColumn::Name)
            .all(&self.db)
            .await?;
        Ok(subjects)
    }

    pub async fn _rename_subject(
        &self,
        subject_id: SubjectId,
        name: String,
    ) -> Result<SubjectModel, SubjectsServiceError> {
        check_required("name", &name, 64)?;

        let mut subject: SubjectActiveModel = self._get_subject(subject_id).await?.into();
        subject.name = Set(name);
        let subject = subject.update(&self.db).await?;

        tracing::info!(id = %subject.id, "renamed subject");
        Ok(subject)
    }

    pub async fn _delete_subject(&self, subject_id: SubjectId) -> Result<(), SubjectsServiceError> {
        let result = Subject::delete_by_id(subject_id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(SubjectsServiceError::SubjectNotFound);
        }
        tracing::info!(id = %subject_id, "deleted subject");
        Ok(())
    }

    pub async fn _create_year_level(
        &self,
        ministry_code: String,
        description: String,
    ) -> Result<InstructionalYearLevelModel, SubjectsServiceError> {
        let code = Code { ministry_code, description };
        code.validate(YEAR_LEVEL_CODE_LEN, YEAR_LEVEL_DESCRIPTION_LEN)?;

        let level = InstructionalYearLevelActiveModel {
            id: Set(InstructionalYearLevelId::new()),
            ministry_code: Set(code.ministry_code),
            description: Set(code.description),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(id = %level.id, code = %level.ministry_code, "created instructional year level");
        Ok(level)
    }

    pub async fn _list_year_levels(
        &self,
    ) -> Result<Vec<InstructionalYearLevelModel>, SubjectsServiceError> {
        let levels = InstructionalYearLevel::find()
            .order_by_asc(InstructionalYearLevelColumn::MinistryCode)
            .all(&self.db)
            .await?;
        Ok(levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    async fn setup_test_service() -> SubjectsService {
        SubjectsService::new(setup_test_db().await)
    }

    #[tokio::test]
    async fn test_group_slug_derived_from_name() {
        let service = setup_test_service().await;

        let group = service
            ._create_subject_group("Social Sciences".to_string())
            .await
            .expect("Failed to create subject group");

        assert_eq!(group.slug, "social-sciences");
    }

    #[tokio::test]
    async fn test_slug_survives_rename() {
        let service = setup_test_service().await;
        let group = service
            ._create_subject_group("Technology".to_string())
            .await
            .unwrap();
        let subject = service
            ._create_subject(group.id, "DIGI".to_string(), "Digital Technology".to_string())
            .await
            .unwrap();

        let renamed_group = service
            ._rename_subject_group(group.id, "Technologies".to_string())
            .await
            .unwrap();
        let renamed_subject = service
            ._rename_subject(subject.id, "Digital Tech".to_string())
            .await
            .unwrap();

        assert_eq!(renamed_group.name, "Technologies");
        assert_eq!(renamed_group.slug, "technology");
        assert_eq!(renamed_subject.slug, "digital-technology");
    }

    #[tokio::test]
    async fn test_subjects_listed_by_name_within_group() {
        let service = setup_test_service().await;
        let arts = service._create_subject_group("The Arts".to_string()).await.unwrap();
        let science = service._create_subject_group("Science".to_string()).await.unwrap();

        service._create_subject(arts.id, "MUS".to_string(), "Music".to_string()).await.unwrap();
        service._create_subject(arts.id, "DRA".to_string(), "Drama".to_string()).await.unwrap();
        service._create_subject(science.id, "CHEM".to_string(), "Chemistry".to_string()).await.unwrap();

        let in_arts = service._list_subjects_in_group(arts.id).await.unwrap();
        let names: Vec<_> = in_arts.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Drama", "Music"]);

        let all = service._list_subjects().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "Chemistry");
    }

    #[tokio::test]
    async fn test_groups_listed_by_name() {
        let service = setup_test_service().await;
        service._create_subject_group("Mathematics".to_string()).await.unwrap();
        service._create_subject_group("English".to_string()).await.unwrap();

        let groups = service._list_subject_groups().await.unwrap();
        assert_eq!(groups[0].name, "English");
        assert_eq!(groups[1].name, "Mathematics");
    }

    #[tokio::test]
    async fn test_deleting_group_removes_subjects() {
        let service = setup_test_service().await;
        let group = service._create_subject_group("Languages".to_string()).await.unwrap();
        let subject = service
            ._create_subject(group.id, "FREN".to_string(), "French".to_string())
            .await
            .unwrap();

        service._delete_subject_group(group.id).await.unwrap();

        let result = service._get_subject(subject.id).await;
        assert!(matches!(result, Err(SubjectsServiceError::SubjectNotFound)));
    }

    #[tokio::test]
    async fn test_subject_requires_existing_group() {
        let service = setup_test_service().await;

        let result = service
            ._create_subject(SubjectGroupId::new(), "HIST".to_string(), "History".to_string())
            .await;

        assert!(matches!(result, Err(SubjectsServiceError::SubjectGroupNotFound)));
    }

    #[tokio::test]
    async fn test_overlong_code_rejected() {
        let service = setup_test_service().await;
        let group = service._create_subject_group("Science".to_string()).await.unwrap();

        let result = service
            ._create_subject(group.id, "PHYSICS".to_string(), "Physics".to_string())
            .await;

        assert!(matches!(
            result,
            Err(SubjectsServiceError::Validation(ValidationError::TooLong {
                field: "ministry_code",
                max: 4
            }))
        ));
    }

    #[tokio::test]
    async fn test_year_levels() {
        let service = setup_test_service().await;
        service._create_year_level("10".to_string(), "Year 10".to_string()).await.unwrap();
        service._create_year_level("09".to_string(), "Year 9".to_string()).await.unwrap();

        let levels = service._list_year_levels().await.unwrap();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].ministry_code, "09");
    }
}
