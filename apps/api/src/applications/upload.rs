//! Single-call upload: store the document, then register its application row.
//! If the row cannot be written the stored object is removed again.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use tracing::{error, info, warn};

use crate::applications::{requests::CreateApplicationRequest, service};
use crate::auth::OwnerScope;
use crate::categories::service::ensure_owned;
use crate::documents::{document_key, is_pdf, DocumentStorage};
use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::validation::{non_blank, IdInput};

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Parsed multipart body of `POST /applications/upload`.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub metadata: CreateApplicationRequest,
    pub file: Option<Bytes>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge("Upload exceeds the maximum allowed size".to_string());
    }
    AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
}

pub async fn read_upload_form(multipart: &mut Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            form.file = Some(field.bytes().await.map_err(multipart_error)?);
            continue;
        }
        let value = field.text().await.map_err(multipart_error)?;
        let metadata = &mut form.metadata;
        match name.as_str() {
            "positionName" => metadata.position_name = Some(value),
            "company" => metadata.company = Some(value),
            "status" => metadata.status = Some(value),
            "appliedDate" => metadata.applied_date = Some(value),
            "notes" => metadata.notes = Some(value),
            "website" => metadata.website = Some(value),
            "categoryId" => metadata.category_id = Some(IdInput::Text(value)),
            other => warn!("Ignoring unexpected upload field '{other}'"),
        }
    }
    Ok(form)
}

/// Validates everything, stores the document, inserts the row. The object is
/// deleted if the insert fails.
pub async fn upload_application(
    scope: &OwnerScope<'_>,
    documents: &dyn DocumentStorage,
    form: UploadForm,
    timestamp_millis: i64,
) -> Result<ApplicationRow, AppError> {
    let UploadForm { mut metadata, file } = form;

    let file = file
        .filter(|f| !f.is_empty())
        .ok_or_else(|| AppError::Validation("A PDF document is required".to_string()))?;
    if !is_pdf(&file) {
        return Err(AppError::Validation(
            "Only PDF documents are accepted".to_string(),
        ));
    }

    let position = non_blank(metadata.position_name.clone()).unwrap_or_default();
    let key = document_key(scope.owner(), &position, timestamp_millis);
    metadata.document_url = Some(documents.url_for(&key));

    let new = metadata.into_new_application()?;
    ensure_owned(scope, new.category_id).await?;

    documents.put(&key, file, PDF_CONTENT_TYPE).await?;

    match service::register_application(scope, &new).await {
        Ok(row) => {
            info!("Stored document {key} for application {}", row.id);
            Ok(row)
        }
        Err(e) => {
            warn!("Registering upload {key} failed, removing stored document");
            if let Err(cleanup) = documents.remove(&key).await {
                error!("Orphaned document {key} could not be removed: {cleanup}");
            }
            Err(e)
        }
    }
}
