//! Axum route handlers for reference-data status and reload.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::{CatalogSnapshot, LoadDiagnostic};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TrackSummary {
    pub track_id: String,
    pub name: String,
    pub courses: usize,
}

#[derive(Debug, Serialize)]
pub struct CatalogStatus {
    pub courses: usize,
    pub course_names: Vec<String>,
    pub cases: usize,
    pub tracks: Vec<TrackSummary>,
    pub diagnostics: Vec<LoadDiagnostic>,
    pub loaded_at: DateTime<Utc>,
}

impl From<&CatalogSnapshot> for CatalogStatus {
    fn from(snapshot: &CatalogSnapshot) -> Self {
        Self {
            courses: snapshot.catalog.len(),
            course_names: snapshot.catalog.names().to_vec(),
            cases: snapshot.cases.len(),
            tracks: snapshot
                .tracks
                .iter()
                .map(|t| TrackSummary {
                    track_id: t.track_id.clone(),
                    name: t.name.clone(),
                    courses: t.courses.len(),
                })
                .collect(),
            diagnostics: snapshot.diagnostics.clone(),
            loaded_at: snapshot.loaded_at,
        }
    }
}

/// GET /api/v1/catalog
pub async fn handle_catalog_status(State(state): State<AppState>) -> Json<CatalogStatus> {
    let snapshot = state.catalog.snapshot().await;
    Json(CatalogStatus::from(snapshot.as_ref()))
}

/// POST /api/v1/catalog/reload
///
/// Drops the cached snapshot and returns the freshly loaded status.
pub async fn handle_catalog_reload(State(state): State<AppState>) -> Json<CatalogStatus> {
    state.catalog.invalidate().await;
    let snapshot = state.catalog.snapshot().await;
    Json(CatalogStatus::from(snapshot.as_ref()))
}
