use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
};
use minijinja::context;
use serde::{Deserialize, Serialize};

use super::{parse_id, see_other};
use crate::{AppState, error::AppError, models::PropertyFilter};

const NOT_IN_ANY_COLLECTION: &str = "The entry with the given ID was not found in any collection.";

/// DashboardFilter
///
/// Query parameters of the admin dashboard. Blank values are ignored.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardFilter {
    /// Developer id.
    pub developer: String,
    pub status: String,
    /// Case-insensitive match on the listing name.
    pub search: String,
}

impl DashboardFilter {
    fn to_property_filter(&self) -> PropertyFilter {
        let present = |value: &str| Some(value.trim().to_string()).filter(|v| !v.is_empty());
        PropertyFilter {
            developer: present(&self.developer),
            status: present(&self.status),
            name: present(&self.search),
            ..PropertyFilter::default()
        }
    }
}

/// dashboard
///
/// [Admin Route] Everything the site stores, on one page. A repository
/// failure is logged and the dashboard renders empty rather than erroring.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(filter): Query<DashboardFilter>,
) -> Result<Html<String>, AppError> {
    let repo = &state.repo;
    let loaded = tokio::try_join!(
        repo.list_properties(filter.to_property_filter()),
        repo.list_developers(),
        repo.list_users(),
        repo.list_tasks(),
        repo.list_testimonials(),
        repo.list_blogs(),
        repo.list_careers(),
    );

    let (properties, developers, users, tasks, tests, blogs, careers) = match loaded {
        Ok(data) => data,
        Err(e) => {
            tracing::error!("Error fetching Data: {}", e);
            Default::default()
        }
    };

    state.views.render(
        "admin-dashboard.html",
        context! {
            prop_count => properties.len(),
            deve_count => developers.len(),
            users_count => users.len(),
            blogs_count => blogs.len(),
            properties,
            developers,
            users,
            tasks,
            tests,
            blogs,
            careers,
            filter,
            is_admin => true,
        },
    )
}

/// delete_entry
///
/// [Admin Route] Deletes the id from whichever collection holds it.
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id, NOT_IN_ANY_COLLECTION)?;
    let removed = state.repo.delete_any(id).await?;

    if removed.is_empty() {
        return Err(AppError::not_found(NOT_IN_ANY_COLLECTION));
    }

    tracing::info!(id = %id, collections = ?removed, "entry deleted");
    Ok(see_other("/admin"))
}
