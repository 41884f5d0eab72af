//! Blog post repository.
//!
//! The only derived write in the content layer lives here: `published_at`
//! is stamped once when a post first moves to `published`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use brightclass_core::{BlogPostId, BlogStatus};

use super::RepositoryError;
use crate::models::content::{BlogPost, BlogPostUpdate, NewBlogPost, stamp_published_at};

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct BlogPostRow {
    id: i32,
    title: String,
    slug: String,
    excerpt: String,
    body: String,
    cover_image_url: Option<String>,
    category: Option<String>,
    status: String,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BlogPostRow> for BlogPost {
    type Error = RepositoryError;

    fn try_from(row: BlogPostRow) -> Result<Self, Self::Error> {
        let status: BlogStatus = row
            .status
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid status: {e}")))?;

        Ok(Self {
            id: BlogPostId::new(row.id),
            title: row.title,
            slug: row.slug,
            excerpt: row.excerpt,
            body: row.body,
            cover_image_url: row.cover_image_url,
            category: row.category,
            status,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const COLUMNS: &str = "id, title, slug, excerpt, body, cover_image_url, category, status, \
                       published_at, created_at, updated_at";

/// Repository for blog post database operations.
pub struct BlogPostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BlogPostRepository<'a> {
    /// Create a new blog post repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List posts, newest first, optionally filtered by status and category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<BlogStatus>,
        category: Option<&str>,
    ) -> Result<Vec<BlogPost>, RepositoryError> {
        let rows: Vec<BlogPostRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM blog_post \
             WHERE ($1::text IS NULL OR status = $1) \
               AND ($2::text IS NULL OR category = $2) \
             ORDER BY created_at DESC"
        ))
        .bind(status.map(|s| s.as_str()))
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a post by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: BlogPostId) -> Result<Option<BlogPost>, RepositoryError> {
        let row: Option<BlogPostRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM blog_post WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a post. A post created directly in `published` state gets its
    /// `published_at` stamped immediately.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewBlogPost) -> Result<BlogPost, RepositoryError> {
        let status = new.status.unwrap_or(BlogStatus::Draft);
        let published_at = stamp_published_at(status, None, Utc::now());

        let row: BlogPostRow = sqlx::query_as(&format!(
            "INSERT INTO blog_post \
                 (title, slug, excerpt, body, cover_image_url, category, status, published_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new.title)
        .bind(&new.slug)
        .bind(&new.excerpt)
        .bind(&new.body)
        .bind(new.cover_image_url.as_deref())
        .bind(new.category.as_deref())
        .bind(status.as_str())
        .bind(published_at)
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_unique)?;

        row.try_into()
    }

    /// Apply a partial update, stamping `published_at` when the effective
    /// status first becomes `published`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the post doesn't exist.
    /// Returns `RepositoryError::Conflict` if a new slug is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: BlogPostId,
        update: &BlogPostUpdate,
    ) -> Result<BlogPost, RepositoryError> {
        let current = self.get(id).await?.ok_or(RepositoryError::NotFound)?;

        let effective_status = update.status.unwrap_or(current.status);
        let published_at = stamp_published_at(effective_status, current.published_at, Utc::now());

        let row: BlogPostRow = sqlx::query_as(&format!(
            "UPDATE blog_post SET \
                 title = COALESCE($2, title), \
                 slug = COALESCE($3, slug), \
                 excerpt = COALESCE($4, excerpt), \
                 body = COALESCE($5, body), \
                 cover_image_url = COALESCE($6, cover_image_url), \
                 category = COALESCE($7, category), \
                 status = $8, \
                 published_at = $9, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(update.title.as_deref())
        .bind(update.slug.as_deref())
        .bind(update.excerpt.as_deref())
        .bind(update.body.as_deref())
        .bind(update.cover_image_url.as_deref())
        .bind(update.category.as_deref())
        .bind(effective_status.as_str())
        .bind(published_at)
        .fetch_one(self.pool)
        .await
        .map_err(conflict_on_unique)?;

        row.try_into()
    }

    /// Delete a post.
    ///
    /// # Returns
    ///
    /// Returns `true` if the post was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: BlogPostId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM blog_post WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn conflict_on_unique(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict("slug already exists".to_owned());
    }
    RepositoryError::Database(e)
}
