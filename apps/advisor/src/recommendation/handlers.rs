//! Axum route handlers for the diagnosis form and the recommendation API.

use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    Form, Json,
};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::DiagnosisInput;
use crate::recommendation::grounding::RecommendedStep;
use crate::recommendation::html::{render_page, PageView};
use crate::recommendation::pipeline::run_recommendation;
use crate::retrieval::ScoredCase;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendation_id: Uuid,
    pub recommendation: String,
    pub rag_context: String,
    pub curriculum_text: String,
    pub matched_cases: Vec<ScoredCase>,
    pub recommended_courses: Vec<RecommendedStep>,
}

/// GET /
///
/// Empty diagnosis form plus any reference-data load diagnostics.
pub async fn handle_form_page(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.catalog.snapshot().await;
    Html(render_page(&PageView {
        input: &DiagnosisInput::default(),
        diagnostics: &snapshot.diagnostics,
        catalog_ready: !snapshot.catalog.is_empty(),
        error: None,
        outcome: None,
    }))
}

/// POST /recommend
///
/// Form submission. Failures, including a body that does not deserialize,
/// are rendered on the page next to the form so the user can submit again.
pub async fn handle_form_submit(
    State(state): State<AppState>,
    form: Result<Form<DiagnosisInput>, FormRejection>,
) -> Html<String> {
    let snapshot = state.catalog.snapshot().await;

    let input = match form {
        Ok(Form(input)) => input,
        Err(rejection) => {
            warn!("Rejected form submission: {rejection}");
            let error = format!("입력값을 확인해주세요: {}", rejection.body_text());
            return Html(render_page(&PageView {
                input: &DiagnosisInput::default(),
                diagnostics: &snapshot.diagnostics,
                catalog_ready: !snapshot.catalog.is_empty(),
                error: Some(&error),
                outcome: None,
            }));
        }
    };

    let result = run_recommendation(
        &snapshot,
        state.retriever.as_ref(),
        state.generator.as_ref(),
        &input,
    )
    .await;

    let (outcome, error) = match result {
        Ok(outcome) => (Some(outcome), None),
        Err(e) => {
            warn!("Recommendation failed: {e}");
            (None, Some(e.user_message()))
        }
    };

    Html(render_page(&PageView {
        input: &input,
        diagnostics: &snapshot.diagnostics,
        catalog_ready: !snapshot.catalog.is_empty(),
        error: error.as_deref(),
        outcome: outcome.as_ref(),
    }))
}

/// POST /api/v1/recommendations
///
/// JSON variant of the form submission.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(input): Json<DiagnosisInput>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let snapshot = state.catalog.snapshot().await;
    let outcome = run_recommendation(
        &snapshot,
        state.retriever.as_ref(),
        state.generator.as_ref(),
        &input,
    )
    .await?;

    Ok(Json(RecommendationResponse {
        recommendation_id: outcome.recommendation_id,
        recommendation: outcome.recommendation,
        rag_context: outcome.rag_context,
        curriculum_text: outcome.curriculum_text,
        matched_cases: outcome.matched_cases,
        recommended_courses: outcome.recommended_courses,
    }))
}
