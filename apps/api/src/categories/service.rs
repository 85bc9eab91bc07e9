//! Category rules: non-empty names, owner scoping, and the in-use guard on delete.

use tracing::{info, warn};

use crate::auth::OwnerScope;
use crate::errors::AppError;
use crate::models::category::CategoryRow;
use crate::store::{CATEGORY_IN_USE, CATEGORY_NOT_FOUND};
use crate::validation::non_blank;

pub const CATEGORY_NAME_REQUIRED: &str = "Category name is required";

pub async fn list_categories(scope: &OwnerScope<'_>) -> Result<Vec<CategoryRow>, AppError> {
    scope.list_categories().await
}

pub async fn create_category(
    scope: &OwnerScope<'_>,
    name: Option<String>,
) -> Result<CategoryRow, AppError> {
    let name =
        non_blank(name).ok_or_else(|| AppError::Validation(CATEGORY_NAME_REQUIRED.to_string()))?;
    let category = scope.insert_category(&name).await?;
    info!("Created category {} for user {}", category.id, scope.owner());
    Ok(category)
}

pub async fn rename_category(
    scope: &OwnerScope<'_>,
    id: i64,
    name: Option<String>,
) -> Result<CategoryRow, AppError> {
    let name =
        non_blank(name).ok_or_else(|| AppError::Validation(CATEGORY_NAME_REQUIRED.to_string()))?;
    let category = scope
        .rename_category(id, &name)
        .await?
        .ok_or_else(|| AppError::NotFound(CATEGORY_NOT_FOUND.to_string()))?;
    info!("Renamed category {id} for user {}", scope.owner());
    Ok(category)
}

/// Deletes a category unless one of the owner's applications still uses it.
pub async fn delete_category(scope: &OwnerScope<'_>, id: i64) -> Result<(), AppError> {
    let in_use = scope.count_category_usage(id).await?;
    if in_use > 0 {
        warn!(
            "Refused to delete category {id} for user {}: {in_use} application(s) reference it",
            scope.owner()
        );
        return Err(AppError::Conflict(CATEGORY_IN_USE.to_string()));
    }

    if !scope.delete_category(id).await? {
        return Err(AppError::NotFound(CATEGORY_NOT_FOUND.to_string()));
    }
    info!("Deleted category {id} for user {}", scope.owner());
    Ok(())
}

/// Confirms an optional category reference points at one of the owner's categories.
pub async fn ensure_owned(scope: &OwnerScope<'_>, category_id: Option<i64>) -> Result<(), AppError> {
    let Some(id) = category_id else {
        return Ok(());
    };
    match scope.get_category(id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound(CATEGORY_NOT_FOUND.to_string())),
    }
}
