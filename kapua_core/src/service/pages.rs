use sea_orm::{DatabaseConnection, TransactionTrait};
use thiserror::Error;
use zel_core::prelude::*;

use crate::{
    content::ContentRef,
    entity::prelude::*,
    error::{check_required, ValidationError},
    ids::{CourseId, PageId},
    tree,
};

#[derive(Debug, Error)]
pub enum PagesServiceError {
    #[error("fatal database error")]
    DbError(#[from] DbErr),

    #[error("page not found")]
    PageNotFound,

    #[error("course not found")]
    CourseNotFound,

    #[error("stored page path is malformed")]
    MalformedPath(#[from] uuid::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<PagesServiceError> for ResourceError {
    fn from(error: PagesServiceError) -> Self {
        match error {
            PagesServiceError::DbError(error) => ResourceError::infra(error),
            PagesServiceError::MalformedPath(error) => ResourceError::infra(error),
            PagesServiceError::PageNotFound => ResourceError::app(error),
            PagesServiceError::CourseNotFound => ResourceError::app(error),
            PagesServiceError::Validation(_) => ResourceError::app(error),
        }
    }
}

/// The content outline of a course: a forest of pages per course.
#[derive(Clone)]
pub struct PagesService {
    db: DatabaseConnection,
}

impl PagesService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a page in `course_id`, optionally beneath `parent_id`.
    ///
    /// The parent has to belong to the same course.
    pub async fn _create_page(
        &self,
        course_id: CourseId,
        parent_id: Option<PageId>,
        name: String,
        content: String,
        attachment: Option<ContentRef>,
    ) -> Result<PageModel, PagesServiceError> {
        check_required("name", &name, 64)?;

        let course_exists = Course::find_by_id(course_id).one(&self.db).await?.is_some();
        if !course_exists {
            return Err(PagesServiceError::CourseNotFound);
        }

        let id = PageId::new();
        let path = match parent_id {
            Some(parent_id) => {
                let parent = self._get_page(parent_id).await?;
                if parent.course_id != course_id {
                    tracing::warn!(%course_id, parent = %parent_id, "rejected page under foreign course");
                    return Err(ValidationError::CrossCourseParent.into());
                }
                tree::child_path(&parent.path, id)
            }
            None => tree::root_path(id),
        };

        let page = PageActiveModel {
            id: Set(id),
            course_id: Set(course_id),
            parent_id: Set(parent_id),
            name: Set(name),
            content: Set(content),
            content_kind: Set(attachment.map(|r| r.kind)),
            content_id: Set(attachment.map(|r| r.id)),
            depth: Set(tree::depth(&path)),
            path: Set(path),
        };

        let page = Page::insert(page).exec_with_returning(&self.db).await?;

        tracing::info!(id = %page.id, %course_id, depth = page.depth, "created page");
        Ok(page)
    }

    pub async fn _get_page(&self, page_id: PageId) -> Result<PageModel, PagesServiceError> {
        find_page(&self.db, page_id).await
    }

    /// Direct children of a page, oldest first.
    pub async fn _children(&self, page_id: PageId) -> Result<Vec<PageModel>, PagesServiceError> {
        let children = Page::find()
            .filter(PageColumn::ParentId.eq(page_id))
            .order_by_asc(PageColumn::Path)
            .all(&self.db)
            .await?;
        Ok(children)
    }

    /// Top level pages of a course.
    pub async fn _roots(&self, course_id: CourseId) -> Result<Vec<PageModel>, PagesServiceError> {
        let roots = Page::find()
            .filter(PageColumn::CourseId.eq(course_id))
            .filter(PageColumn::ParentId.is_null())
            .order_by_asc(PageColumn::Path)
            .all(&self.db)
            .await?;
        Ok(roots)
    }

    /// Ancestors of a page ordered from the root down.
    pub async fn _ancestors(
        &self,
        page_id: PageId,
        include_self: bool,
    ) -> Result<Vec<PageModel>, PagesServiceError> {
        let page = self._get_page(page_id).await?;
        let ids = tree::ancestor_ids(&page.path)?;

        let mut ancestors = if ids.is_empty() {
            Vec::new()
        } else {
            Page::find()
                .filter(PageColumn::Id.is_in(ids))
                .order_by_asc(PageColumn::Depth)
                .all(&self.db)
                .await?
        };

        if include_self {
            ancestors.push(page);
        }
        Ok(ancestors)
    }

    /// Every page below `page_id`, in pre-order.
    pub async fn _descendants(
        &self,
        page_id: PageId,
        include_self: bool,
    ) -> Result<Vec<PageModel>, PagesServiceError> {
        let page = self._get_page(page_id).await?;

        let mut query = Page::find().filter(PageColumn::Path.starts_with(&page.path));
        if !include_self {
            query = query.filter(PageColumn::Id.ne(page_id));
        }

        let descendants = query.order_by_asc(PageColumn::Path).all(&self.db).await?;
        Ok(descendants)
    }

    /// All pages of a course in pre-order.
    pub async fn _course_outline(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<PageModel>, PagesServiceError> {
        let pages = Page::find()
            .filter(PageColumn::CourseId.eq(course_id))
            .order_by_asc(PageColumn::Path)
            .all(&self.db)
            .await?;

        tracing::debug!(%course_id, pages = pages.len(), "loaded course outline");
        Ok(pages)
    }

    /// Re-parent a page, carrying its whole subtree along.
    ///
    /// `None` makes the page a root of its course.
    pub async fn _move_page(
        &self,
        page_id: PageId,
        new_parent_id: Option<PageId>,
    ) -> Result<PageModel, PagesServiceError> {
        // Checks read through the transaction that rewrites the subtree
        let txn = self.db.begin().await?;
        let page = find_page(&txn, page_id).await?;

        let new_path = match new_parent_id {
            Some(parent_id) => {
                let parent = find_page(&txn, parent_id).await?;
                if parent.course_id != page.course_id {
                    tracing::warn!(page = %page_id, parent = %parent_id, "rejected move to foreign course");
                    return Err(ValidationError::CrossCourseParent.into());
                }
                if tree::is_within(&parent.path, &page.path) {
                    tracing::warn!(page = %page_id, parent = %parent_id, "rejected move beneath own subtree");
                    return Err(ValidationError::TreeCycle.into());
                }
                tree::child_path(&parent.path, page_id)
            }
            None => tree::root_path(page_id),
        };

        let old_path = page.path.clone();

        let subtree = Page::find()
            .filter(PageColumn::Path.starts_with(&old_path))
            .all(&txn)
            .await?;

        let mut moved = None;
        for node in subtree {
            let path = tree::rebase(&node.path, &old_path, &new_path);
            let is_moved_page = node.id == page_id;

            let mut active: PageActiveModel = node.into();
            active.depth = Set(tree::depth(&path));
            active.path = Set(path);
            if is_moved_page {
                active.parent_id = Set(new_parent_id);
            }

            let updated = active.update(&txn).await?;
            if is_moved_page {
                moved = Some(updated);
            }
        }

        txn.commit().await?;

        tracing::info!(page = %page_id, parent = ?new_parent_id, "moved page");
        moved.ok_or(PagesServiceError::PageNotFound)
    }

    pub async fn _rename_page(
        &self,
        page_id: PageId,
        name: String,
    ) -> Result<PageModel, PagesServiceError> {
        check_required("name", &name, 64)?;

        let mut page: PageActiveModel = self._get_page(page_id).await?.into();
        page.name = Set(name);
        Ok(page.update(&self.db).await?)
    }

    pub async fn _update_page_content(
        &self,
        page_id: PageId,
        content: String,
    ) -> Result<PageModel, PagesServiceError> {
        let mut page: PageActiveModel = self._get_page(page_id).await?.into();
        page.content = Set(content);
        Ok(page.update(&self.db).await?)
    }

    /// Point a page at some other object, or clear the pointer with `None`.
    pub async fn _attach_to_page(
        &self,
        page_id: PageId,
        attachment: Option<ContentRef>,
    ) -> Result<PageModel, PagesServiceError> {
        let mut page: PageActiveModel = self._get_page(page_id).await?.into();
        page.content_kind = Set(attachment.map(|r| r.kind));
        page.content_id = Set(attachment.map(|r| r.id));
        Ok(page.update(&self.db).await?)
    }

    /// Delete a page together with everything beneath it.
    pub async fn _delete_page(&self, page_id: PageId) -> Result<u64, PagesServiceError> {
        let page = self._get_page(page_id).await?;

        let result = Page::delete_many()
            .filter(PageColumn::Path.starts_with(&page.path))
            .exec(&self.db)
            .await?;

        tracing::info!(page = %page_id, removed = result.rows_affected, "deleted page subtree");
        Ok(result.rows_affected)
    }
}

async fn find_page<C>(db: &C, page_id: PageId) -> Result<PageModel, PagesServiceError>
where
    C: ConnectionTrait,
{
    Page::find_by_id(page_id)
        .one(db)
        .await?
        .ok_or(PagesServiceError::PageNotFound)
}
