pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tracing::info;

use crate::ingest::handlers as ingest;
use crate::search::handlers as search;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    let router = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/upload", post(ingest::handle_upload).layer(upload_limit))
        .route("/api/search", post(search::handle_search))
        .route("/api/resumes/:id", get(ingest::handle_get_resume));

    // Front-end assets are optional; the API works without them.
    let static_dir = state.config.static_dir.clone();
    let router = if static_dir.is_dir() {
        info!("Serving static files from {}", static_dir.display());
        router.fallback_service(ServeDir::new(static_dir))
    } else {
        router
    };

    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::multipart::{Form, Part};
    use reqwest::StatusCode;
    use serde_json::{json, Value};

    use super::*;
    use crate::config::{Config, StoreBackend};
    use crate::matching::embedder::{DigestEmbedder, Embedder, DEFAULT_DIM};
    use crate::matching::vector::encode_embedding;
    use crate::store::json_file::{JsonFileStore, FILE_NAME};
    use crate::store::{InMemoryStore, ResumeStore};

    fn test_config() -> Config {
        Config {
            store_backend: StoreBackend::Memory,
            static_dir: "does-not-exist".into(),
            ..Config::default()
        }
    }

    async fn spawn_app() -> String {
        spawn_app_with(Arc::new(InMemoryStore::new()), test_config()).await
    }

    async fn spawn_app_with(store: Arc<dyn ResumeStore>, config: Config) -> String {
        let state = AppState {
            store,
            embedder: Arc::new(DigestEmbedder),
            config,
        };

        let app = build_router(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}")
    }

    fn text_file(contents: &str, file_name: &str) -> Part {
        Part::bytes(contents.as_bytes().to_vec())
            .file_name(file_name.to_string())
            .mime_str("text/plain")
            .unwrap()
    }

    async fn upload(base: &str, form: Form) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{base}/api/upload"))
            .multipart(form)
            .send()
            .await
            .unwrap()
    }

    async fn search(base: &str, body: Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{base}/api/search"))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_backends() {
        let base = spawn_app().await;
        let body: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
        assert_eq!(body["embedder"], "sha256-digest");
        assert_eq!(body["embedding_dim"], 128);
    }

    #[tokio::test]
    async fn test_upload_then_search_finds_exact_text() {
        let base = spawn_app().await;
        let resume = "Software Engineer with Python experience";

        let res = upload(
            &base,
            Form::new()
                .text("name", "Ada Lovelace")
                .text("email", "ada@example.com")
                .part("file", text_file(resume, "ada.txt")),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let uploaded: Value = res.json().await.unwrap();
        assert_eq!(uploaded["success"], true);
        assert_eq!(uploaded["id"], 1);
        assert_eq!(uploaded["snippet"], resume);

        upload(
            &base,
            Form::new().part("file", text_file("Pastry chef, 5 years", "chef.txt")),
        )
        .await;

        let res = search(&base, json!({ "query": resume })).await;
        assert_eq!(res.status(), StatusCode::OK);
        let hits: Vec<Value> = res.json().await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0]["id"], 1);
        assert_eq!(hits[0]["name"], "Ada Lovelace");
        assert_eq!(hits[0]["fileName"], "ada.txt");
        assert!((hits[0]["score"].as_f64().unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(hits[0]["snippet"], format!("{resume}..."));
        assert_eq!(hits[1]["name"], "Unknown Candidate");
        assert_eq!(hits[1]["email"], "No Email");
    }

    #[tokio::test]
    async fn test_search_respects_top_k() {
        let base = spawn_app().await;
        for i in 0..4 {
            upload(
                &base,
                Form::new().part("file", text_file(&format!("resume {i}"), "r.txt")),
            )
            .await;
        }

        let hits: Vec<Value> = search(&base, json!({ "query": "resume", "top_k": 2 }))
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);

        let hits: Vec<Value> = search(&base, json!({ "query": "resume", "top_k": 0 }))
            .await
            .json()
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_on_empty_store_is_empty_list() {
        let base = spawn_app().await;
        let res = search(&base, json!({ "query": "anyone" })).await;
        assert_eq!(res.status(), StatusCode::OK);
        let hits: Vec<Value> = res.json().await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_validation_errors() {
        let base = spawn_app().await;

        let res = search(&base, json!({ "query": "  " })).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let res = search(&base, json!({})).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = search(&base, json!({ "query": "rust", "top_k": -3 })).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_search_body_type_mismatch_uses_error_envelope() {
        let base = spawn_app().await;
        let res = search(&base, json!({ "query": "rust", "top_k": "5" })).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let res = reqwest::Client::new()
            .post(format!("{base}/api/search"))
            .header("content-type", "application/json")
            .body("{ not json")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upload_over_limit_names_the_limit() {
        let config = Config {
            max_upload_bytes: 1024,
            ..test_config()
        };
        let base = spawn_app_with(Arc::new(InMemoryStore::new()), config).await;

        let res = upload(
            &base,
            Form::new().part("file", text_file(&"a".repeat(5000), "big.txt")),
        )
        .await;

        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("1024"), "message was {message:?}");
    }

    #[tokio::test]
    async fn test_upload_pdf_then_search() {
        let base = spawn_app().await;
        let pdf = Part::bytes(include_bytes!("../../tests/fixtures/resume.pdf").to_vec())
            .file_name("resume.pdf")
            .mime_str("application/pdf")
            .unwrap();

        let res = upload(&base, Form::new().text("name", "Pat").part("file", pdf)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let uploaded: Value = res.json().await.unwrap();
        assert!(uploaded["snippet"].as_str().unwrap().contains("Postgres"));

        let hits: Vec<Value> = search(&base, json!({ "query": "Postgres" }))
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0]["fileName"], "resume.pdf");
    }

    #[tokio::test]
    async fn test_search_json_store_with_unreadable_embedding() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(FILE_NAME);
        let text = "Site reliability engineer";
        let good = encode_embedding(&DigestEmbedder.embed(text, DEFAULT_DIM));
        let doc = json!({
            "resumes": [
                {
                    "id": 1, "name": "Broken", "email": "b@example.com",
                    "text": "Unreadable row", "embedding": "[0.1, oops",
                    "file_name": "broken.txt", "created_at": "2024-05-01T10:00:00Z"
                },
                {
                    "id": 2, "name": "Good", "email": "g@example.com",
                    "text": text, "embedding": good,
                    "file_name": "good.txt", "created_at": "2024-05-01T10:00:00Z"
                }
            ],
            "last_id": 2
        });
        std::fs::write(&path, doc.to_string()).unwrap();

        let store = JsonFileStore::open(path).await.unwrap();
        let base = spawn_app_with(Arc::new(store), test_config()).await;

        let res = search(&base, json!({ "query": text })).await;
        assert_eq!(res.status(), StatusCode::OK);
        let hits: Vec<Value> = res.json().await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0]["id"], 2);
        assert!((hits[0]["score"].as_f64().unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(hits[1]["id"], 1);
        assert_eq!(hits[1]["score"], 0.0);
        assert_eq!(hits[1]["name"], "Broken");
    }

    #[tokio::test]
    async fn test_upload_without_file_rejected() {
        let base = spawn_app().await;
        let res = upload(&base, Form::new().text("name", "No File")).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"]["message"], "File is required");
    }

    #[tokio::test]
    async fn test_upload_unsupported_type_rejected() {
        let base = spawn_app().await;
        let part = Part::bytes(vec![0x50, 0x4B, 0x03, 0x04])
            .file_name("resume.docx")
            .mime_str("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
            .unwrap();

        let res = upload(&base, Form::new().part("file", part)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(
            body["error"]["message"],
            "Unsupported file type. Use PDF or TXT."
        );

        let disguised = Part::bytes(vec![0x50, 0x4B, 0x03, 0x04])
            .file_name("resume.docx")
            .mime_str("text/plain")
            .unwrap();
        let res = upload(&base, Form::new().part("file", disguised)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_blank_text_rejected() {
        let base = spawn_app().await;
        let res = upload(&base, Form::new().part("file", text_file(" \n ", "blank.txt"))).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"]["message"], "Could not extract text from file.");
    }

    #[tokio::test]
    async fn test_get_resume_by_id() {
        let base = spawn_app().await;
        upload(
            &base,
            Form::new()
                .text("name", "Linus")
                .part("file", text_file("Kernel maintainer", "linus.txt")),
        )
        .await;

        let res = reqwest::get(format!("{base}/api/resumes/1")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["name"], "Linus");
        assert_eq!(body["text"], "Kernel maintainer");
        assert!(body.get("embedding").is_none());

        let res = reqwest::get(format!("{base}/api/resumes/42")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
