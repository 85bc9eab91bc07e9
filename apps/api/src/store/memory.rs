//! In-process `RecordStore` used by router and service tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{
    ApplicationChanges, ApplicationFilter, ApplicationRow, ApplicationStatus, NewApplication,
};
use crate::models::category::CategoryRow;
use crate::store::{RecordStore, CATEGORY_IN_USE, CATEGORY_NOT_FOUND};

#[derive(Default)]
struct Tables {
    next_id: i64,
    categories: Vec<CategoryRow>,
    applications: Vec<ApplicationRow>,
    /// Forces the next application insert to fail.
    fail_next_insert: bool,
    /// Makes usage counts report zero, as if a reference landed after the count.
    stale_usage_counts: bool,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Strictly increasing timestamps keep "newest first" deterministic.
    fn stamp(&self) -> chrono::DateTime<Utc> {
        Utc::now() + Duration::milliseconds(self.next_id)
    }

    fn category_exists(&self, id: Option<i64>) -> bool {
        id.map_or(true, |id| self.categories.iter().any(|c| c.id == id))
    }
}

#[derive(Default)]
pub struct MemoryRecordStore {
    tables: Mutex<Tables>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_insert(&self) {
        self.tables.lock().unwrap().fail_next_insert = true;
    }

    pub fn stale_usage_counts(&self) {
        self.tables.lock().unwrap().stale_usage_counts = true;
    }

    /// Unscoped view of every application row, for assertions.
    pub fn all_applications(&self) -> Vec<ApplicationRow> {
        self.tables.lock().unwrap().applications.clone()
    }

    pub fn all_categories(&self) -> Vec<CategoryRow> {
        self.tables.lock().unwrap().categories.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list_categories(&self, owner: Uuid) -> Result<Vec<CategoryRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .categories
            .iter()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect())
    }

    async fn get_category(&self, owner: Uuid, id: i64) -> Result<Option<CategoryRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .categories
            .iter()
            .find(|c| c.id == id && c.user_id == owner)
            .cloned())
    }

    async fn insert_category(&self, owner: Uuid, name: &str) -> Result<CategoryRow, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        let row = CategoryRow {
            id,
            user_id: owner,
            name: name.to_string(),
            created_at: tables.stamp(),
        };
        tables.categories.push(row.clone());
        Ok(row)
    }

    async fn rename_category(
        &self,
        owner: Uuid,
        id: i64,
        name: &str,
    ) -> Result<Option<CategoryRow>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables
            .categories
            .iter_mut()
            .find(|c| c.id == id && c.user_id == owner)
            .map(|c| {
                c.name = name.to_string();
                c.clone()
            }))
    }

    async fn count_category_usage(&self, owner: Uuid, id: i64) -> Result<i64, AppError> {
        let tables = self.tables.lock().unwrap();
        if tables.stale_usage_counts {
            return Ok(0);
        }
        Ok(tables
            .applications
            .iter()
            .filter(|a| a.user_id == owner && a.category_id == Some(id))
            .count() as i64)
    }

    async fn delete_category(&self, owner: Uuid, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(index) = tables
            .categories
            .iter()
            .position(|c| c.id == id && c.user_id == owner)
        else {
            return Ok(false);
        };
        if tables.applications.iter().any(|a| a.category_id == Some(id)) {
            return Err(AppError::Conflict(CATEGORY_IN_USE.to_string()));
        }
        tables.categories.remove(index);
        Ok(true)
    }

    async fn list_applications(
        &self,
        owner: Uuid,
        filter: &ApplicationFilter,
    ) -> Result<Vec<ApplicationRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<_> = tables
            .applications
            .iter()
            .filter(|a| a.user_id == owner && filter.matches(a))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn get_application(
        &self,
        owner: Uuid,
        id: i64,
    ) -> Result<Option<ApplicationRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .applications
            .iter()
            .find(|a| a.id == id && a.user_id == owner)
            .cloned())
    }

    async fn insert_application(
        &self,
        owner: Uuid,
        new: &NewApplication,
    ) -> Result<ApplicationRow, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if std::mem::take(&mut tables.fail_next_insert) {
            return Err(AppError::Internal(anyhow::anyhow!("injected insert failure")));
        }
        if !tables.category_exists(new.category_id) {
            return Err(AppError::NotFound(CATEGORY_NOT_FOUND.to_string()));
        }
        let id = tables.next_id();
        let row = ApplicationRow {
            id,
            user_id: owner,
            company: new.company.clone(),
            position: new.position.clone(),
            status: new.status,
            applied_date: new.applied_date,
            notes: new.notes.clone(),
            document_url: new.document_url.clone(),
            website: new.website.clone(),
            category_id: new.category_id,
            created_at: tables.stamp(),
        };
        tables.applications.push(row.clone());
        Ok(row)
    }

    async fn update_application(
        &self,
        owner: Uuid,
        id: i64,
        changes: &ApplicationChanges,
    ) -> Result<Option<ApplicationRow>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.category_exists(changes.category_id) {
            return Err(AppError::NotFound(CATEGORY_NOT_FOUND.to_string()));
        }
        Ok(tables
            .applications
            .iter_mut()
            .find(|a| a.id == id && a.user_id == owner)
            .map(|a| {
                a.company = changes.company.clone();
                a.position = changes.position.clone();
                a.status = changes.status;
                a.applied_date = changes.applied_date;
                a.notes = changes.notes.clone();
                a.website = changes.website.clone();
                a.category_id = changes.category_id;
                a.clone()
            }))
    }

    async fn set_application_status(
        &self,
        owner: Uuid,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<Option<ApplicationRow>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables
            .applications
            .iter_mut()
            .find(|a| a.id == id && a.user_id == owner)
            .map(|a| {
                a.status = status;
                a.clone()
            }))
    }

    async fn delete_application(&self, owner: Uuid, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.applications.len();
        tables
            .applications
            .retain(|a| !(a.id == id && a.user_id == owner));
        Ok(tables.applications.len() < before)
    }
}
