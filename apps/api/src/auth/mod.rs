//! Caller identity resolution and the owner scope every handler works through.

pub mod token;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::auth::token::verify_access_token;
use crate::errors::AppError;
use crate::models::application::{
    ApplicationChanges, ApplicationFilter, ApplicationRow, ApplicationStatus, NewApplication,
};
use crate::models::category::CategoryRow;
use crate::state::AppState;
use crate::store::RecordStore;

pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";

/// The authenticated user behind a request.
///
/// Extraction fails with a redirect to the sign-in page when the request
/// carries no valid access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
}

impl Caller {
    /// Binds the record store to this caller; every query made through the
    /// returned scope is filtered by the caller's id.
    pub fn scope<'a>(&self, state: &'a AppState) -> OwnerScope<'a> {
        OwnerScope {
            store: state.store.as_ref(),
            owner: self.user_id,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let sign_in = || AppError::SignInRequired(state.config.sign_in_url.clone());

        let token = bearer_token(parts)
            .map(str::to_owned)
            .or_else(|| cookie_token(parts))
            .ok_or_else(sign_in)?;

        match verify_access_token(
            &token,
            state.config.auth_jwt_secret.as_bytes(),
            Utc::now().timestamp(),
        ) {
            Ok(claims) => Ok(Caller {
                user_id: claims.sub,
            }),
            Err(e) => {
                warn!("Rejected access token on {}: {e}", parts.uri.path());
                Err(sign_in())
            }
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn cookie_token(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    jar.get(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value_trimmed())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Record store access pinned to one owner.
pub struct OwnerScope<'a> {
    store: &'a dyn RecordStore,
    owner: Uuid,
}

impl OwnerScope<'_> {
    pub fn owner(&self) -> Uuid {
        self.owner
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryRow>, AppError> {
        self.store.list_categories(self.owner).await
    }

    pub async fn get_category(&self, id: i64) -> Result<Option<CategoryRow>, AppError> {
        self.store.get_category(self.owner, id).await
    }

    pub async fn insert_category(&self, name: &str) -> Result<CategoryRow, AppError> {
        self.store.insert_category(self.owner, name).await
    }

    pub async fn rename_category(&self, id: i64, name: &str) -> Result<Option<CategoryRow>, AppError> {
        self.store.rename_category(self.owner, id, name).await
    }

    pub async fn count_category_usage(&self, id: i64) -> Result<i64, AppError> {
        self.store.count_category_usage(self.owner, id).await
    }

    pub async fn delete_category(&self, id: i64) -> Result<bool, AppError> {
        self.store.delete_category(self.owner, id).await
    }

    pub async fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<ApplicationRow>, AppError> {
        self.store.list_applications(self.owner, filter).await
    }

    pub async fn get_application(&self, id: i64) -> Result<Option<ApplicationRow>, AppError> {
        self.store.get_application(self.owner, id).await
    }

    pub async fn insert_application(&self, new: &NewApplication) -> Result<ApplicationRow, AppError> {
        self.store.insert_application(self.owner, new).await
    }

    pub async fn update_application(
        &self,
        id: i64,
        changes: &ApplicationChanges,
    ) -> Result<Option<ApplicationRow>, AppError> {
        self.store.update_application(self.owner, id, changes).await
    }

    pub async fn set_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationRow>, AppError> {
        self.store.set_application_status(self.owner, id, status).await
    }

    pub async fn delete_application(&self, id: i64) -> Result<bool, AppError> {
        self.store.delete_application(self.owner, id).await
    }
}
