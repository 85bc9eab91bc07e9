use tracing::info;

use crate::auth::OwnerScope;
use crate::categories::service::ensure_owned;
use crate::errors::AppError;
use crate::models::application::{
    ApplicationChanges, ApplicationFilter, ApplicationRow, ApplicationStatus, NewApplication,
};
use crate::store::APPLICATION_NOT_FOUND;

fn not_found() -> AppError {
    AppError::NotFound(APPLICATION_NOT_FOUND.to_string())
}

pub async fn list_applications(
    scope: &OwnerScope<'_>,
    filter: &ApplicationFilter,
) -> Result<Vec<ApplicationRow>, AppError> {
    scope.list_applications(filter).await
}

pub async fn get_application(scope: &OwnerScope<'_>, id: i64) -> Result<ApplicationRow, AppError> {
    scope.get_application(id).await?.ok_or_else(not_found)
}

/// Inserts a validated application owned by the caller.
pub async fn register_application(
    scope: &OwnerScope<'_>,
    new: &NewApplication,
) -> Result<ApplicationRow, AppError> {
    ensure_owned(scope, new.category_id).await?;
    let row = scope.insert_application(new).await?;
    info!(
        "Registered application {} ({} @ {}) for user {}",
        row.id,
        row.position,
        row.company,
        scope.owner()
    );
    Ok(row)
}

pub async fn update_application(
    scope: &OwnerScope<'_>,
    id: i64,
    changes: &ApplicationChanges,
) -> Result<ApplicationRow, AppError> {
    if scope.get_application(id).await?.is_none() {
        return Err(not_found());
    }
    ensure_owned(scope, changes.category_id).await?;
    let row = scope
        .update_application(id, changes)
        .await?
        .ok_or_else(not_found)?;
    info!("Updated application {id} for user {}", scope.owner());
    Ok(row)
}

/// Changes only the status column.
pub async fn change_status(
    scope: &OwnerScope<'_>,
    id: i64,
    status: ApplicationStatus,
) -> Result<ApplicationRow, AppError> {
    let row = scope
        .set_application_status(id, status)
        .await?
        .ok_or_else(not_found)?;
    info!("Application {id} of user {} is now {status}", scope.owner());
    Ok(row)
}

pub async fn delete_application(scope: &OwnerScope<'_>, id: i64) -> Result<(), AppError> {
    if !scope.delete_application(id).await? {
        return Err(not_found());
    }
    info!("Deleted application {id} for user {}", scope.owner());
    Ok(())
}
