//! Router assembly.

mod campus;
mod common;

pub use campus::campus_routes;
pub use common::common_routes;

use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::TraceLayer;

/// Full application router: common routes plus the campus API, with request tracing.
/// Bodies over `body_limit` fail in the body extractor and answer 500 like any other bad body.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(common_routes())
        .merge(campus_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BODY_LIMIT;
    use crate::gateway::MemoryGateway;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(AppState::new(MemoryGateway::new()), DEFAULT_BODY_LIMIT)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(v) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(v.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn text(response: Response) -> String {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let response = send(&app, "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_ready_with_memory_store() {
        let app = test_app();
        let response = send(&app, "GET", "/ready", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"status": "ok", "store": "ok"}));

        let info = json_body(send(&app, "GET", "/version", None).await).await;
        assert_eq!(info["name"], env!("CARGO_PKG_NAME"));
    }

    #[tokio::test]
    async fn test_list_students_empty() {
        let app = test_app();
        let response = send(&app, "GET", "/students", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_create_student_then_duplicate_aadhar() {
        let app = test_app();

        let response = send(&app, "POST", "/students", Some(json!({"name": "A", "aadhar": "123"}))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let student = json_body(response).await;
        assert_eq!(student["name"], "A");
        assert_eq!(student["aadhar"], "123");
        assert_eq!(student["proctorId"], Value::Null);
        assert!(student["id"].as_str().is_some());

        let response = send(&app, "POST", "/students", Some(json!({"name": "B", "aadhar": "123"}))).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(text(response).await, "Aadhar number exists");
    }

    #[tokio::test]
    async fn test_create_professor_duplicate_aadhar() {
        let app = test_app();
        let body = json!({"name": "P", "aadhar": "77"});
        assert_eq!(send(&app, "POST", "/professors", Some(body.clone())).await.status(), StatusCode::CREATED);

        let response = send(&app, "POST", "/professors", Some(body)).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(text(response).await, "Aadhar number exists");

        let listed = json_body(send(&app, "GET", "/professors", None).await).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_student_twice() {
        let app = test_app();
        let response = send(&app, "POST", "/students", Some(json!({"name": "A", "aadhar": "1"}))).await;
        let id = json_body(response).await["id"].as_str().unwrap().to_string();

        let response = send(&app, "DELETE", &format!("/students/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text(response).await, "Deleted");

        let response = send(&app, "DELETE", &format!("/students/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_missing_targets_are_not_found() {
        let app = test_app();
        let patch = Some(json!({"name": "X"}));
        for uri in ["/students/nope", "/professors/nope"] {
            assert_eq!(send(&app, "PATCH", uri, patch.clone()).await.status(), StatusCode::NOT_FOUND);
            assert_eq!(send(&app, "DELETE", uri, None).await.status(), StatusCode::NOT_FOUND);
        }
        let uri = "/students/nope/library-membership";
        assert_eq!(
            send(&app, "PATCH", uri, Some(json!({"bookLimit": 3}))).await.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(send(&app, "DELETE", uri, None).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(send(&app, "GET", uri, None).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_patch_student_keeps_unset_fields() {
        let app = test_app();
        let response = send(&app, "POST", "/students", Some(json!({"name": "A", "aadhar": "1"}))).await;
        let id = json_body(response).await["id"].as_str().unwrap().to_string();

        let response = send(&app, "PATCH", &format!("/students/{id}"), Some(json!({"name": "Ann"}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let student = json_body(response).await;
        assert_eq!(student["name"], "Ann");
        assert_eq!(student["aadhar"], "1");
    }

    #[tokio::test]
    async fn test_patch_professor_updates_given_fields() {
        let app = test_app();
        let response = send(&app, "POST", "/professors", Some(json!({"name": "P", "aadhar": "9"}))).await;
        let pid = json_body(response).await["id"].as_str().unwrap().to_string();

        let response = send(&app, "PATCH", &format!("/professors/{pid}"), Some(json!({"name": "Prof"}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"id": pid, "name": "Prof", "aadhar": "9"}));
    }

    #[tokio::test]
    async fn test_json_body_without_content_type() {
        let app = test_app();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/students")
                    .body(Body::from(r#"{"name":"A","aadhar":"123"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await["aadhar"], "123");
    }

    #[tokio::test]
    async fn test_oversized_body_is_generic_error() {
        let app = app(AppState::new(MemoryGateway::new()), 32);
        let name = "x".repeat(64);
        let response = send(&app, "POST", "/students", Some(json!({"name": name, "aadhar": "1"}))).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text(response).await, "Error");
        let listed = json_body(send(&app, "GET", "/students", None).await).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn test_proctorship_assignment_and_enriched_listing() {
        let app = test_app();
        let response = send(&app, "POST", "/professors", Some(json!({"name": "P", "aadhar": "9"}))).await;
        let pid = json_body(response).await["id"].as_str().unwrap().to_string();
        let response = send(&app, "POST", "/students", Some(json!({"name": "A", "aadhar": "1"}))).await;
        let sid = json_body(response).await["id"].as_str().unwrap().to_string();
        send(&app, "POST", "/students", Some(json!({"name": "B", "aadhar": "2"}))).await;

        let uri = format!("/professors/{pid}/proctorships");
        let response = send(&app, "POST", &uri, Some(json!({"studentId": sid}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["proctorId"], pid.as_str());

        let listed = json_body(send(&app, "GET", &uri, None).await).await;
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], sid.as_str());

        let enriched = json_body(send(&app, "GET", "/students/enriched", None).await).await;
        let enriched = enriched.as_array().unwrap();
        let a = enriched.iter().find(|s| s["id"] == sid.as_str()).unwrap();
        assert_eq!(a["proctor"]["id"], pid.as_str());
        let b = enriched.iter().find(|s| s["id"] != sid.as_str()).unwrap();
        assert_eq!(b["proctor"], Value::Null);
    }

    #[tokio::test]
    async fn test_assign_proctor_missing_student() {
        let app = test_app();
        let response = send(&app, "POST", "/professors", Some(json!({"name": "P", "aadhar": "9"}))).await;
        let pid = json_body(response).await["id"].as_str().unwrap().to_string();

        let uri = format!("/professors/{pid}/proctorships");
        let response = send(&app, "POST", &uri, Some(json!({"studentId": "ghost"}))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_membership_lifecycle() {
        let app = test_app();
        let response = send(&app, "POST", "/students", Some(json!({"name": "A", "aadhar": "1"}))).await;
        let sid = json_body(response).await["id"].as_str().unwrap().to_string();
        let uri = format!("/students/{sid}/library-membership");

        let response = send(&app, "POST", &uri, Some(json!({"bookLimit": 3}))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;
        assert_eq!(created["studentId"], sid.as_str());
        assert_eq!(created["bookLimit"], 3);

        let response = send(&app, "POST", &uri, Some(json!({}))).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(text(response).await, "Membership exists");

        let response = send(&app, "GET", &uri, None).await;
        assert_eq!(json_body(response).await, created);

        let response = send(&app, "PATCH", &uri, Some(json!({"bookLimit": 8}))).await;
        assert_eq!(json_body(response).await["bookLimit"], 8);

        let response = send(&app, "DELETE", &uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text(response).await, "Deleted");
        assert_eq!(send(&app, "GET", &uri, None).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_body_is_generic_error() {
        let app = test_app();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/students")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(text(response).await, "Error");

        let response = send(&app, "POST", "/students", Some(json!({"name": "no aadhar"}))).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_membership_for_unknown_student_is_error() {
        let app = test_app();
        let response = send(&app, "POST", "/students/ghost/library-membership", Some(json!({}))).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
