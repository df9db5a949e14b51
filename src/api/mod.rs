pub mod dto;
pub mod errors;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::{chat::ChatService, data::DataService};
use handlers::ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub chat: ChatService,
    pub data: DataService,
}

pub fn router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/", get(handlers::get_health))
        .route("/api/chat", post(handlers::post_chat))
        .route("/api/data/stats", get(handlers::get_stats))
        .route("/api/data/recent", get(handlers::get_recent))
        .route("/api/data/query", post(handlers::post_query))
        .with_state(state)
        .split_for_parts();

    router.route(
        "/api-docs/openapi.json",
        get(move || async move { axum::Json(api) }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use crate::llm::{ollama::OllamaBackend, Completion, CompletionBackend, UNAVAILABLE_TEXT};
    use async_trait::async_trait;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use sqlx::SqlitePool;
    use std::sync::Arc;

    struct CannedBackend(&'static str);

    #[async_trait]
    impl CompletionBackend for CannedBackend {
        async fn complete(&self, _prompt: &str) -> Completion {
            Completion::Generated(self.0.to_owned())
        }
    }

    async fn server_with(backend: Arc<dyn CompletionBackend>) -> (TestServer, SqlitePool) {
        let pool = create_test_pool().await;
        let data = DataService::new(pool.clone());
        let state = AppState {
            chat: ChatService::new(data.clone(), backend),
            data,
        };
        (TestServer::new(router(state)).unwrap(), pool)
    }

    async fn seed_row(pool: &SqlitePool, temperature: Option<f64>) {
        sqlx::query(
            "INSERT INTO measurements (float_id, temperature, timestamp)
             VALUES ('2902746', ?, '2024-03-01T00:00:00Z')",
        )
        .bind(temperature)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn chat_returns_reply_from_backend() {
        let (server, pool) = server_with(Arc::new(CannedBackend("It is warm."))).await;
        seed_row(&pool, Some(18.5)).await;

        let response = server
            .post("/api/chat")
            .json(&json!({ "message": "How warm is it?" }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["reply"], "It is warm.");
    }

    #[tokio::test]
    async fn chat_is_200_even_when_backend_is_unreachable() {
        let backend = OllamaBackend::new("http://127.0.0.1:9", "llama3.2").unwrap();
        let (server, _pool) = server_with(Arc::new(backend)).await;

        let response = server
            .post("/api/chat")
            .json(&json!({ "message": "hello" }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["reply"], UNAVAILABLE_TEXT);
    }

    #[tokio::test]
    async fn chat_treats_missing_message_as_empty_question() {
        let (server, _pool) = server_with(Arc::new(CannedBackend("ok"))).await;

        let response = server.post("/api/chat").json(&json!({})).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body["reply"].is_string());
    }

    #[tokio::test]
    async fn stats_endpoint_reports_aggregates() {
        let (server, pool) = server_with(Arc::new(CannedBackend("ok"))).await;
        seed_row(&pool, Some(10.0)).await;
        seed_row(&pool, Some(20.0)).await;
        seed_row(&pool, None).await;

        let response = server.get("/api/data/stats").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["total_measurements"], 3);
        assert_eq!(body["unique_floats"], 1);
        assert_eq!(body["average_temperature"], 15.0);
    }

    #[tokio::test]
    async fn stats_endpoint_is_zeroed_on_empty_table() {
        let (server, _pool) = server_with(Arc::new(CannedBackend("ok"))).await;

        let response = server.get("/api/data/stats").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["total_measurements"], 0);
        assert_eq!(body["average_temperature"], 0.0);
    }

    #[tokio::test]
    async fn recent_endpoint_caps_at_five_rows() {
        let (server, pool) = server_with(Arc::new(CannedBackend("ok"))).await;
        for _ in 0..8 {
            seed_row(&pool, Some(20.0)).await;
        }

        let response = server.get("/api/data/recent").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn query_endpoint_applies_filters() {
        let (server, pool) = server_with(Arc::new(CannedBackend("ok"))).await;
        sqlx::query(
            "INSERT INTO measurements (float_id, temperature, pressure, timestamp) VALUES
                ('2902746', 28.0, 10.0,   '2024-03-01T00:00:00Z'),
                ('2902746', 4.0,  1800.0, '2024-03-02T00:00:00Z'),
                ('5906042', 27.0, 12.0,   '2024-03-03T00:00:00Z')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let response = server
            .post("/api/data/query")
            .json(&json!({ "max_pressure": 50.0, "float_id": "2902746" }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["temperature"], 28.0);
    }

    #[tokio::test]
    async fn query_endpoint_accepts_an_empty_filter_body() {
        let (server, pool) = server_with(Arc::new(CannedBackend("ok"))).await;
        seed_row(&pool, Some(18.5)).await;
        seed_row(&pool, Some(19.5)).await;

        let response = server.post("/api/data/query").json(&json!({})).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn health_endpoint_identifies_the_service() {
        let (server, _pool) = server_with(Arc::new(CannedBackend("ok"))).await;

        let response = server.get("/").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "online");
        assert_eq!(body["service"], "FloatChat API");
    }

    #[tokio::test]
    async fn openapi_spec_is_served() {
        let (server, _pool) = server_with(Arc::new(CannedBackend("ok"))).await;

        let response = server.get("/api-docs/openapi.json").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body["paths"]["/api/chat"].is_object());
    }
}
