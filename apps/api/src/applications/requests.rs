//! Wire shapes of the application endpoints and their conversion into
//! validated store commands.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::application::{
    ApplicationChanges, ApplicationFilter, ApplicationStatus, CategoryFilter, NewApplication,
};
use crate::validation::{
    category_ref, non_blank, parse_applied_date, parse_id, parse_status, IdInput,
    MISSING_REQUIRED_FIELDS,
};

fn missing() -> AppError {
    AppError::Validation(MISSING_REQUIRED_FIELDS.to_string())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    pub document_url: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub company: Option<String>,
    pub category_id: Option<IdInput>,
    pub applied_date: Option<String>,
    pub position_name: Option<String>,
    pub website: Option<String>,
}

impl CreateApplicationRequest {
    pub fn into_new_application(self) -> Result<NewApplication, AppError> {
        let (Some(document_url), Some(status), Some(company), Some(applied_date), Some(position)) = (
            non_blank(self.document_url),
            non_blank(self.status),
            non_blank(self.company),
            non_blank(self.applied_date),
            non_blank(self.position_name),
        ) else {
            return Err(missing());
        };

        Ok(NewApplication {
            company,
            position,
            status: parse_status(&status)?,
            applied_date: parse_applied_date(&applied_date)?,
            notes: non_blank(self.notes),
            document_url,
            website: non_blank(self.website),
            category_id: category_ref(self.category_id)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationRequest {
    pub id: Option<IdInput>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<String>,
    pub applied_date: Option<String>,
    pub notes: Option<String>,
    pub category_id: Option<IdInput>,
    pub website: Option<String>,
}

impl UpdateApplicationRequest {
    /// Returns the target id and the full set of overwritten fields.
    pub fn into_changes(self) -> Result<(i64, ApplicationChanges), AppError> {
        let (Some(id), Some(company), Some(position), Some(status), Some(applied_date)) = (
            self.id,
            non_blank(self.company),
            non_blank(self.position),
            non_blank(self.status),
            non_blank(self.applied_date),
        ) else {
            return Err(missing());
        };

        Ok((
            id.parse()?,
            ApplicationChanges {
                company,
                position,
                status: parse_status(&status)?,
                applied_date: parse_applied_date(&applied_date)?,
                notes: non_blank(self.notes),
                website: non_blank(self.website),
                category_id: category_ref(self.category_id)?,
            },
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub id: Option<IdInput>,
    pub status: Option<String>,
}

impl StatusChangeRequest {
    pub fn parse(self) -> Result<(i64, ApplicationStatus), AppError> {
        let (Some(id), Some(status)) = (self.id, non_blank(self.status)) else {
            return Err(missing());
        };
        Ok((id.parse()?, parse_status(&status)?))
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteApplicationRequest {
    pub id: Option<IdInput>,
}

impl DeleteApplicationRequest {
    pub fn parse(self) -> Result<i64, AppError> {
        self.id.ok_or_else(missing)?.parse()
    }
}

/// Query string of the list endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationQuery {
    pub q: Option<String>,
    pub category_id: Option<String>,
    pub status: Option<String>,
}

impl ApplicationQuery {
    pub fn into_filter(self) -> Result<ApplicationFilter, AppError> {
        let category = match non_blank(self.category_id) {
            None => CategoryFilter::Any,
            Some(raw) if raw.eq_ignore_ascii_case("uncategorized") => CategoryFilter::Uncategorized,
            Some(raw) => CategoryFilter::Only(parse_id(&raw)?),
        };
        let status = non_blank(self.status)
            .map(|s| parse_status(&s))
            .transpose()?;
        Ok(ApplicationFilter {
            query: non_blank(self.q),
            category,
            status,
        })
    }
}
