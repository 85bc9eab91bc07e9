//! Owner-scoped persistence for categories and applications.
//!
//! Every method takes the owning user id and must never read or write a row
//! belonging to anyone else. Missing and foreign rows are indistinguishable to
//! callers: both come back as `None` / `false`.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{
    ApplicationChanges, ApplicationFilter, ApplicationRow, ApplicationStatus, NewApplication,
};
use crate::models::category::CategoryRow;

pub const CATEGORY_IN_USE: &str = "Category is being used by applications";
pub const CATEGORY_NOT_FOUND: &str = "Category not found or unauthorized";
pub const APPLICATION_NOT_FOUND: &str = "CV not found or unauthorized";

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_categories(&self, owner: Uuid) -> Result<Vec<CategoryRow>, AppError>;

    async fn get_category(&self, owner: Uuid, id: i64) -> Result<Option<CategoryRow>, AppError>;

    async fn insert_category(&self, owner: Uuid, name: &str) -> Result<CategoryRow, AppError>;

    async fn rename_category(
        &self,
        owner: Uuid,
        id: i64,
        name: &str,
    ) -> Result<Option<CategoryRow>, AppError>;

    /// Number of the owner's applications filed under the category.
    async fn count_category_usage(&self, owner: Uuid, id: i64) -> Result<i64, AppError>;

    /// Returns `false` when no owned row matched.
    async fn delete_category(&self, owner: Uuid, id: i64) -> Result<bool, AppError>;

    /// Newest first.
    async fn list_applications(
        &self,
        owner: Uuid,
        filter: &ApplicationFilter,
    ) -> Result<Vec<ApplicationRow>, AppError>;

    async fn get_application(
        &self,
        owner: Uuid,
        id: i64,
    ) -> Result<Option<ApplicationRow>, AppError>;

    async fn insert_application(
        &self,
        owner: Uuid,
        new: &NewApplication,
    ) -> Result<ApplicationRow, AppError>;

    async fn update_application(
        &self,
        owner: Uuid,
        id: i64,
        changes: &ApplicationChanges,
    ) -> Result<Option<ApplicationRow>, AppError>;

    async fn set_application_status(
        &self,
        owner: Uuid,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationRow>, AppError>;

    async fn delete_application(&self, owner: Uuid, id: i64) -> Result<bool, AppError>;
}
