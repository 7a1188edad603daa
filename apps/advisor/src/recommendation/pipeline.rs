//! Recommendation pipeline: one form submission, end to end.
//!
//! Flow: validate input → check catalog → retrieve cases → render RAG context →
//!       compose prompt → generate → ground step courses against the catalog.

use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::catalog::CatalogSnapshot;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::DiagnosisInput;
use crate::prompt::{compose_recommendation_prompt, render_case_context, PromptContext};
use crate::recommendation::grounding::{ground_steps, RecommendedStep};
use crate::retrieval::{build_query, CaseRetriever, ScoredCase};

/// Everything the presenter needs to show for one submission.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationOutcome {
    pub recommendation_id: Uuid,
    /// Model output, markdown with the five mandated sections.
    pub recommendation: String,
    pub rag_context: String,
    pub curriculum_text: String,
    pub matched_cases: Vec<ScoredCase>,
    pub recommended_courses: Vec<RecommendedStep>,
    #[serde(skip)]
    pub prompt: String,
}

/// Runs retrieval, composition and generation for one diagnosis.
///
/// An empty course catalog stops the pipeline before the model is called.
pub async fn run_recommendation(
    snapshot: &CatalogSnapshot,
    retriever: &dyn CaseRetriever,
    generator: &dyn TextGenerator,
    input: &DiagnosisInput,
) -> Result<RecommendationOutcome, AppError> {
    input.validate()?;

    if snapshot.catalog.is_empty() {
        return Err(AppError::Precondition(
            "유효한 강의 목록(valid courses)이 로드되지 않았습니다. 데이터 파일을 확인해주세요."
                .to_string(),
        ));
    }

    let recommendation_id = Uuid::new_v4();
    let span = info_span!("recommendation", id = %recommendation_id);

    async move {
        // Step 1: Retrieve precedent cases
        let query = build_query(&input.pain_point, &input.issue);
        let matched_cases = retriever.retrieve(&query, &snapshot.cases);
        info!(
            "Retrieved {} precedent cases from {}",
            matched_cases.len(),
            snapshot.cases.len()
        );

        // Step 2: Compose prompt
        let rag_context = render_case_context(matched_cases.iter().map(|s| &s.case));
        let available_courses = snapshot.catalog.as_prompt_list();
        let prompt = compose_recommendation_prompt(
            input,
            PromptContext {
                available_courses: &available_courses,
                curriculum_text: &snapshot.curriculum_text,
                rag_context: &rag_context,
            },
        );

        // Step 3: Generate
        let recommendation = generator.generate(&prompt).await?;
        info!("Recommendation generated ({} chars)", recommendation.chars().count());

        // Step 4: Ground step courses
        let recommended_courses = ground_steps(&recommendation, &snapshot.catalog);
        for step in recommended_courses.iter().filter(|s| !s.is_known()) {
            warn!(
                "Step {} course '{}' is not in the course catalog",
                step.step, step.course
            );
        }

        Ok::<_, AppError>(RecommendationOutcome {
            recommendation_id,
            recommendation,
            rag_context,
            curriculum_text: snapshot.curriculum_text.clone(),
            matched_cases,
            recommended_courses,
            prompt,
        })
    }
    .instrument(span)
    .await
}
