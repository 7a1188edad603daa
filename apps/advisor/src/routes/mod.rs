pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::catalog::handlers as catalog;
use crate::recommendation::handlers as recommendation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Diagnosis form
        .route("/", get(recommendation::handle_form_page))
        .route("/recommend", post(recommendation::handle_form_submit))
        // JSON API
        .route(
            "/api/v1/recommendations",
            post(recommendation::handle_recommend),
        )
        .route("/api/v1/catalog", get(catalog::handle_catalog_status))
        .route(
            "/api/v1/catalog/reload",
            post(catalog::handle_catalog_reload),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::catalog::CatalogRepository;
    use crate::config::{DataSources, DEFAULT_MASTER_FILE};
    use crate::retrieval::KeywordRetriever;
    use crate::testing::FakeGenerator;

    fn make_state(dir: &TempDir, generator: Arc<FakeGenerator>) -> AppState {
        AppState {
            catalog: Arc::new(CatalogRepository::new(DataSources::in_dir(dir.path()))),
            retriever: Arc::new(KeywordRetriever::default()),
            generator,
        }
    }

    fn write_master(dir: &TempDir) {
        fs::write(
            dir.path().join(DEFAULT_MASTER_FILE),
            "훈련과정명(정답라벨)\nMES 기초\n데이터 분석\n",
        )
        .unwrap();
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let app = build_router(make_state(&dir, Arc::new(FakeGenerator::replying(""))));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_catalog_status_reports_missing_sources() {
        let dir = TempDir::new().unwrap();
        write_master(&dir);
        let app = build_router(make_state(&dir, Arc::new(FakeGenerator::replying(""))));

        let response = app
            .oneshot(Request::get("/api/v1/catalog").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["courses"], 2);
        assert_eq!(json["cases"], 0);
        // curriculum and cases files are absent
        assert_eq!(json["diagnostics"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_recommend_json() {
        let dir = TempDir::new().unwrap();
        write_master(&dir);
        let generator = Arc::new(FakeGenerator::replying(
            "#### 1. 기업 진단 내용\n- **Step 1 (기초/입문):** MES 기초",
        ));
        let app = build_router(make_state(&dir, generator.clone()));

        let request = Request::post("/api/v1/recommendations")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"industry":"제조업","issue":"MES 도입","pain_point":"전산화 미비"}"#,
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["recommendation"]
            .as_str()
            .unwrap()
            .contains("기업 진단 내용"));
        assert_eq!(json["recommended_courses"][0]["canonical"], "MES 기초");
        assert!(json.get("prompt").is_none());
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_recommend_json_without_catalog_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let generator = Arc::new(FakeGenerator::replying("unused"));
        let app = build_router(make_state(&dir, generator.clone()));

        let request = Request::post("/api/v1/recommendations")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"issue":"MES 도입"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_form_submit_with_undecodable_body_re_renders_form() {
        let dir = TempDir::new().unwrap();
        write_master(&dir);
        let generator = Arc::new(FakeGenerator::replying("unused"));
        let app = build_router(make_state(&dir, generator.clone()));

        let request = Request::post("/recommend")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("company_type=XYZ&issue=MES&date=not-a-date"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<form"));
        assert!(html.contains("입력값을 확인해주세요"));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_form_submit_renders_model_failure_inline() {
        let dir = TempDir::new().unwrap();
        write_master(&dir);
        let app = build_router(make_state(&dir, Arc::new(FakeGenerator::failing(429))));

        let request = Request::post("/recommend")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("issue=MES&pain_point=%EC%A0%84%EC%82%B0%ED%99%94"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("분석 중 오류 발생"));
        assert!(html.contains("전산화"));
    }
}
