use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Progress of a tracked application. Any value may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "cv_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Planned,
    Pending,
    Declined,
    Interview,
    #[sqlx(rename = "practical interview")]
    #[serde(rename = "practical interview")]
    PracticalInterview,
    Accepted,
}

impl ApplicationStatus {
    /// Display order used by the dashboard and the statistics endpoint.
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Planned,
        ApplicationStatus::Pending,
        ApplicationStatus::Interview,
        ApplicationStatus::PracticalInterview,
        ApplicationStatus::Accepted,
        ApplicationStatus::Declined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Planned => "planned",
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Declined => "declined",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::PracticalInterview => "practical interview",
            ApplicationStatus::Accepted => "accepted",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A row of the `cvs` table, with columns aliased to API names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRow {
    pub id: i64,
    pub user_id: Uuid,
    pub company: String,
    pub position: String,
    pub status: ApplicationStatus,
    pub applied_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub document_url: String,
    pub website: Option<String>,
    pub category_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Fields of a new application row. The owner is supplied separately.
#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub company: String,
    pub position: String,
    pub status: ApplicationStatus,
    pub applied_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub document_url: String,
    pub website: Option<String>,
    pub category_id: Option<i64>,
}

/// Full overwrite of the mutable fields of an application.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationChanges {
    pub company: String,
    pub position: String,
    pub status: ApplicationStatus,
    pub applied_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub website: Option<String>,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    Any,
    Uncategorized,
    Only(i64),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationFilter {
    /// Case-insensitive substring matched against company or position.
    pub query: Option<String>,
    pub category: CategoryFilter,
    pub status: Option<ApplicationStatus>,
}

#[cfg(test)]
impl ApplicationFilter {
    pub fn matches(&self, row: &ApplicationRow) -> bool {
        if let Some(query) = &self.query {
            let needle = query.to_lowercase();
            if !row.company.to_lowercase().contains(&needle)
                && !row.position.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        let category_ok = match self.category {
            CategoryFilter::Any => true,
            CategoryFilter::Uncategorized => row.category_id.is_none(),
            CategoryFilter::Only(id) => row.category_id == Some(id),
        };
        category_ok && self.status.map_or(true, |s| row.status == s)
    }
}
