//! Read models for the dashboard: grouping by category and status breakdown.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::application::{ApplicationRow, ApplicationStatus};
use crate::models::category::CategoryRow;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationGroup {
    /// `None` for the uncategorized bucket.
    pub category: Option<CategoryRow>,
    pub applications: Vec<ApplicationRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub categories: Vec<CategoryRow>,
    pub groups: Vec<ApplicationGroup>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub statuses: Vec<StatusCount>,
}

/// Buckets applications by category, preserving their order within each bucket.
///
/// The uncategorized bucket comes first, then one bucket per category in the
/// order given, including empty ones. Rows pointing at a category that is not
/// in `categories` land in the uncategorized bucket.
pub fn group_by_category(
    categories: &[CategoryRow],
    applications: Vec<ApplicationRow>,
) -> Vec<ApplicationGroup> {
    let slot: HashMap<i64, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id, i + 1))
        .collect();

    let mut groups: Vec<ApplicationGroup> = std::iter::once(None)
        .chain(categories.iter().cloned().map(Some))
        .map(|category| ApplicationGroup {
            category,
            applications: Vec::new(),
        })
        .collect();

    for application in applications {
        let index = application
            .category_id
            .and_then(|id| slot.get(&id).copied())
            .unwrap_or(0);
        groups[index].applications.push(application);
    }
    groups
}

pub fn build_dashboard(
    categories: Vec<CategoryRow>,
    applications: Vec<ApplicationRow>,
) -> DashboardView {
    let total = applications.len();
    let groups = group_by_category(&categories, applications);
    DashboardView {
        categories,
        groups,
        total,
    }
}

/// Counts per status in display order, zeros included. Percentages are
/// rounded to one decimal.
pub fn summarize_statuses(applications: &[ApplicationRow]) -> StatusSummary {
    let total = applications.len();
    let statuses = ApplicationStatus::ALL
        .into_iter()
        .map(|status| {
            let count = applications.iter().filter(|a| a.status == status).count();
            let percent = if total == 0 {
                0.0
            } else {
                (count as f64 * 1000.0 / total as f64).round() / 10.0
            };
            StatusCount {
                status,
                count,
                percent,
            }
        })
        .collect();
    StatusSummary { total, statuses }
}
