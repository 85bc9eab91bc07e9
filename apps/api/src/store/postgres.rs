use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{
    ApplicationChanges, ApplicationFilter, ApplicationRow, ApplicationStatus, CategoryFilter,
    NewApplication,
};
use crate::models::category::CategoryRow;
use crate::store::{RecordStore, CATEGORY_IN_USE, CATEGORY_NOT_FOUND};

/// `cvs` columns under the names `ApplicationRow` expects.
const APPLICATION_COLUMNS: &str = "id, user_id, company_name AS company, name AS position, \
     status, applied_at AS applied_date, description AS notes, document_path AS document_url, \
     website, category_id, created_at";

/// Record store backed by the shared PostgreSQL pool.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// Maps a dangling `category_id` on an application write to not-found.
fn map_category_reference(err: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&err) {
        AppError::NotFound(CATEGORY_NOT_FOUND.to_string())
    } else {
        AppError::Database(err)
    }
}

/// Escapes `%`, `_` and `\` so user input matches literally under ILIKE.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list_categories(&self, owner: Uuid) -> Result<Vec<CategoryRow>, AppError> {
        Ok(sqlx::query_as::<_, CategoryRow>(
            "SELECT id, user_id, name, created_at FROM categories WHERE user_id = $1 ORDER BY created_at, id",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_category(&self, owner: Uuid, id: i64) -> Result<Option<CategoryRow>, AppError> {
        Ok(sqlx::query_as::<_, CategoryRow>(
            "SELECT id, user_id, name, created_at FROM categories WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_category(&self, owner: Uuid, name: &str) -> Result<CategoryRow, AppError> {
        Ok(sqlx::query_as::<_, CategoryRow>(
            "INSERT INTO categories (user_id, name) VALUES ($1, $2) RETURNING id, user_id, name, created_at",
        )
        .bind(owner)
        .bind(name)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn rename_category(
        &self,
        owner: Uuid,
        id: i64,
        name: &str,
    ) -> Result<Option<CategoryRow>, AppError> {
        Ok(sqlx::query_as::<_, CategoryRow>(
            r#"
            UPDATE categories SET name = $1
            WHERE id = $2 AND user_id = $3
            RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(name)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn count_category_usage(&self, owner: Uuid, id: i64) -> Result<i64, AppError> {
        Ok(
            sqlx::query_scalar("SELECT COUNT(*) FROM cvs WHERE category_id = $1 AND user_id = $2")
                .bind(id)
                .bind(owner)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn delete_category(&self, owner: Uuid, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                // An application was filed under the category after the usage check.
                if is_foreign_key_violation(&e) {
                    AppError::Conflict(CATEGORY_IN_USE.to_string())
                } else {
                    AppError::Database(e)
                }
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_applications(
        &self,
        owner: Uuid,
        filter: &ApplicationFilter,
    ) -> Result<Vec<ApplicationRow>, AppError> {
        let (uncategorized, category_id) = match filter.category {
            CategoryFilter::Any => (false, None),
            CategoryFilter::Uncategorized => (true, None),
            CategoryFilter::Only(id) => (false, Some(id)),
        };
        let sql = format!(
            r#"
            SELECT {APPLICATION_COLUMNS}
            FROM cvs
            WHERE user_id = $1
              AND ($2::text IS NULL OR company_name ILIKE $2 OR name ILIKE $2)
              AND (NOT $3 OR category_id IS NULL)
              AND ($4::bigint IS NULL OR category_id = $4)
              AND ($5::cv_status IS NULL OR status = $5)
            ORDER BY created_at DESC, id DESC
            "#
        );
        Ok(sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(owner)
            .bind(filter.query.as_deref().map(like_pattern))
            .bind(uncategorized)
            .bind(category_id)
            .bind(filter.status)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_application(
        &self,
        owner: Uuid,
        id: i64,
    ) -> Result<Option<ApplicationRow>, AppError> {
        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM cvs WHERE id = $1 AND user_id = $2");
        Ok(sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_application(
        &self,
        owner: Uuid,
        new: &NewApplication,
    ) -> Result<ApplicationRow, AppError> {
        let sql = format!(
            r#"
            INSERT INTO cvs
                (user_id, name, company_name, status, applied_at, description,
                 document_path, website, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {APPLICATION_COLUMNS}
            "#
        );
        sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(owner)
            .bind(&new.position)
            .bind(&new.company)
            .bind(new.status)
            .bind(new.applied_date)
            .bind(&new.notes)
            .bind(&new.document_url)
            .bind(&new.website)
            .bind(new.category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_category_reference)
    }

    async fn update_application(
        &self,
        owner: Uuid,
        id: i64,
        changes: &ApplicationChanges,
    ) -> Result<Option<ApplicationRow>, AppError> {
        let sql = format!(
            r#"
            UPDATE cvs SET
                company_name = $1,
                name = $2,
                status = $3,
                applied_at = $4,
                description = $5,
                category_id = $6,
                website = $7
            WHERE id = $8 AND user_id = $9
            RETURNING {APPLICATION_COLUMNS}
            "#
        );
        sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(&changes.company)
            .bind(&changes.position)
            .bind(changes.status)
            .bind(changes.applied_date)
            .bind(&changes.notes)
            .bind(changes.category_id)
            .bind(&changes.website)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_category_reference)
    }

    async fn set_application_status(
        &self,
        owner: Uuid,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationRow>, AppError> {
        let sql = format!(
            "UPDATE cvs SET status = $1 WHERE id = $2 AND user_id = $3 RETURNING {APPLICATION_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(status)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_application(&self, owner: Uuid, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM cvs WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
