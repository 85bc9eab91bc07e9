use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::applications::dashboard::{build_dashboard, summarize_statuses, DashboardView, StatusSummary};
use crate::applications::requests::{
    ApplicationQuery, CreateApplicationRequest, DeleteApplicationRequest, StatusChangeRequest,
    UpdateApplicationRequest,
};
use crate::applications::{service, upload};
use crate::auth::Caller;
use crate::errors::AppError;
use crate::extract::{ApiJson, ApiMultipart, ApiQuery};
use crate::models::application::{ApplicationFilter, ApplicationRow};
use crate::state::AppState;
use crate::validation::{non_blank, parse_id};

fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}

/// GET /applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    caller: Caller,
    ApiQuery(query): ApiQuery<ApplicationQuery>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    let filter = query.into_filter()?;
    let rows = service::list_applications(&caller.scope(&state), &filter).await?;
    Ok(Json(rows))
}

/// GET /applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<ApplicationRow>, AppError> {
    let id = parse_id(&id)?;
    let row = service::get_application(&caller.scope(&state), id).await?;
    Ok(Json(row))
}

/// POST /applications
///
/// Registers an application whose document the client already uploaded.
pub async fn handle_create_application(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(req): ApiJson<CreateApplicationRequest>,
) -> Result<Json<Value>, AppError> {
    let new = req.into_new_application()?;
    service::register_application(&caller.scope(&state), &new).await?;
    Ok(success())
}

/// POST /applications/upload
///
/// Multipart variant that stores the document itself.
pub async fn handle_upload_application(
    State(state): State<AppState>,
    caller: Caller,
    ApiMultipart(mut multipart): ApiMultipart,
) -> Result<Json<Value>, AppError> {
    let form = upload::read_upload_form(&mut multipart).await?;
    let row = upload::upload_application(
        &caller.scope(&state),
        state.documents.as_ref(),
        form,
        Utc::now().timestamp_millis(),
    )
    .await?;
    Ok(Json(json!({
        "success": true,
        "id": row.id,
        "documentUrl": row.document_url,
    })))
}

/// PUT /applications
pub async fn handle_update_application(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(req): ApiJson<UpdateApplicationRequest>,
) -> Result<Json<Value>, AppError> {
    let (id, changes) = req.into_changes()?;
    service::update_application(&caller.scope(&state), id, &changes).await?;
    Ok(success())
}

/// PUT /applications/status
pub async fn handle_change_status(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(req): ApiJson<StatusChangeRequest>,
) -> Result<Json<Value>, AppError> {
    let (id, status) = req.parse()?;
    service::change_status(&caller.scope(&state), id, status).await?;
    Ok(success())
}

/// DELETE /applications
pub async fn handle_delete_application(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(req): ApiJson<DeleteApplicationRequest>,
) -> Result<Json<Value>, AppError> {
    let id = req.parse()?;
    service::delete_application(&caller.scope(&state), id).await?;
    Ok(success())
}

/// GET /applications/stats
pub async fn handle_status_summary(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<StatusSummary>, AppError> {
    let rows =
        service::list_applications(&caller.scope(&state), &ApplicationFilter::default()).await?;
    Ok(Json(summarize_statuses(&rows)))
}

/// GET /dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    caller: Caller,
    ApiQuery(query): ApiQuery<ApplicationQuery>,
) -> Result<Json<DashboardView>, AppError> {
    let scope = caller.scope(&state);
    let filter = ApplicationFilter {
        query: non_blank(query.q),
        ..Default::default()
    };
    let (categories, applications) = tokio::try_join!(
        crate::categories::service::list_categories(&scope),
        service::list_applications(&scope, &filter),
    )?;
    Ok(Json(build_dashboard(categories, applications)))
}
