use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::engine::DirectorySearch;
use super::filters::SearchFilters;
use super::profile::{Availability, SmeProfile};

/// Read seam over whatever holds the current SME profile snapshot.
pub trait ProfileDirectory: Send + Sync {
    fn snapshot(&self) -> Result<Vec<SmeProfile>, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("profile directory unavailable: {0}")]
    Unavailable(String),
}

/// Router builder exposing the expert search endpoint.
pub fn directory_router<D>(directory: Arc<D>) -> Router
where
    D: ProfileDirectory + 'static,
{
    Router::new()
        .route("/api/v1/experts", get(search_handler::<D>))
        .with_state(directory)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct SearchParams {
    pub(crate) q: Option<String>,
    pub(crate) role: Option<String>,
    pub(crate) sector: Option<String>,
    pub(crate) location: Option<String>,
    pub(crate) availability: Option<Availability>,
    pub(crate) specialization: Option<String>,
}

impl SearchParams {
    fn into_parts(self) -> (String, SearchFilters) {
        (
            self.q.unwrap_or_default(),
            SearchFilters {
                role: self.role,
                sector: self.sector,
                location: self.location,
                availability: self.availability,
                specialization: self.specialization,
            },
        )
    }
}

pub(crate) async fn search_handler<D>(
    State(directory): State<Arc<D>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    D: ProfileDirectory + 'static,
{
    let candidates = match directory.snapshot() {
        Ok(candidates) => candidates,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response();
        }
    };

    let mut search = DirectorySearch::with_candidates(candidates);
    let (query, filters) = params.into_parts();
    search.set_query(query);
    search.set_filters(filters);

    let payload = json!({
        "total": search.results().len(),
        "experts": search.results(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
