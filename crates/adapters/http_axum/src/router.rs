//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use voxhub_app::ports::{Clock, EventPublisher};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` and includes a [`TraceLayer`] that logs
/// each HTTP request/response at the `DEBUG` level using the `tracing`
/// ecosystem.
pub fn build<P, C>(state: AppState<P, C>) -> Router
where
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::test_support::test_state;

    fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let app = build(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_apply_immediate_chat_command() {
        let app = build(test_state());

        let (status, body) = send(
            &app,
            json_request(Method::POST, "/api/chat", &json!({"message": "turn on fan"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"reply": "Fan turned ON"}));

        let (status, body) = send(&app, empty_request(Method::GET, "/api/devices/Fan")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "on");
    }

    #[tokio::test]
    async fn should_reply_when_chat_message_not_understood() {
        let app = build(test_state());

        let (status, body) = send(
            &app,
            json_request(Method::POST, "/api/chat", &json!({"message": "please"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "I didn't understand that.");
        assert!(body.get("scheduled").is_none());
    }

    #[tokio::test]
    async fn should_list_schedule_and_cancel_it() {
        let app = build(test_state());
        let at = (chrono::Local::now() + chrono::Duration::hours(2)).format("%H:%M");
        let message = format!("turn on light at {at}");

        let (_, body) = send(
            &app,
            json_request(Method::POST, "/api/chat", &json!({"message": message})),
        )
        .await;
        let reply = body["reply"].as_str().unwrap();
        assert!(reply.starts_with("Okay, I will turn ON Light at "), "{reply}");
        let action_id = body["scheduled"].as_str().unwrap().to_string();

        let (_, pending) = send(&app, empty_request(Method::GET, "/api/schedules")).await;
        assert_eq!(pending.as_array().unwrap().len(), 1);
        assert_eq!(pending[0]["id"], action_id.as_str());
        assert_eq!(pending[0]["device_id"], "Light");

        let uri = format!("/api/schedules/{action_id}");
        let (status, body) = send(&app, empty_request(Method::DELETE, &uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"cancelled": true}));

        let (_, body) = send(&app, empty_request(Method::DELETE, &uri)).await;
        assert_eq!(body, json!({"cancelled": false}));

        let (_, pending) = send(&app, empty_request(Method::GET, "/api/schedules")).await;
        assert_eq!(pending, json!([]));
    }

    #[tokio::test]
    async fn should_return_bad_request_for_malformed_schedule_id() {
        let app = build(test_state());

        let (status, body) =
            send(&app, empty_request(Method::DELETE, "/api/schedules/not-a-uuid")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid identifier"));
    }

    #[tokio::test]
    async fn should_list_seeded_devices_in_order() {
        let app = build(test_state());

        let (status, body) = send(&app, empty_request(Method::GET, "/api/devices")).await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|device| device["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["Fan", "Light"]);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_device() {
        let app = build(test_state());

        let (status, body) = send(&app, empty_request(Method::GET, "/api/devices/Heater")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "device Heater not found");
    }

    #[tokio::test]
    async fn should_register_unknown_device_on_put() {
        let app = build(test_state());

        let (status, body) = send(
            &app,
            json_request(Method::PUT, "/api/devices/Heater", &json!({"status": "on"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "Heater turned ON");
        assert_eq!(body["device"]["status"], "on");

        let (status, _) = send(&app, empty_request(Method::GET, "/api/devices/Heater")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn should_reject_blank_device_id() {
        let app = build(test_state());

        let (status, _) = send(&app, empty_request(Method::GET, "/api/devices/%20")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
