//! Axum route handlers for the Matchmaking API.
//!
//! One endpoint, one linear pipeline per submission:
//! validate → generate (soft-fail to fallback) → record history → notify.
//! The WhatsApp leg never starts before the generation result is in, and a
//! delivery failure does not roll back the history append.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matchmaking::generator::{generate_profile, MatchRequest};
use crate::matchmaking::prompts::FALLBACK_PROFILE;
use crate::matchmaking::validation::validate_request;
use crate::state::AppState;
use crate::whatsapp::format_message_body;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of one form submission. `status` is `"sent"` when the gateway
/// accepted the message and `"delivery_failed"` when generation produced a
/// profile but delivery did not go through.
#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub status: String,
    pub session_id: String,
    pub profile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_error: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
///
/// Runs the full matchmaking pipeline for one form submission. Validation
/// failures return 400 before any outbound call is made.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    validate_request(&request).map_err(AppError::Validation)?;

    let session_id = request
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let history = state.sessions.history(&session_id);
    info!(
        "Generating match profile for session {session_id} ({} prior profiles)",
        history.len()
    );

    let profile = match generate_profile(&state.llm, &request, &history).await {
        Ok(text) => {
            state.sessions.push(&session_id, text.clone());
            text
        }
        Err(e) => {
            // Soft-fail: the user still gets a message. The fallback text is
            // not a profile, so it stays out of the avoid-list.
            warn!("Profile generation failed, substituting fallback: {e}");
            FALLBACK_PROFILE.to_string()
        }
    };

    let to = request.whatsapp_number.trim();
    let body = format_message_body(request.name.trim(), &profile);

    let response = match state.whatsapp.send_chat(to, &body).await {
        Ok(_) => MatchResponse {
            status: "sent".to_string(),
            session_id,
            profile,
            delivered_to: Some(to.to_string()),
            delivery_error: None,
        },
        Err(e) => MatchResponse {
            status: "delivery_failed".to_string(),
            session_id,
            profile,
            delivered_to: None,
            delivery_error: Some(e.to_string()),
        },
    };

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmClient;
    use crate::session::SessionStore;
    use crate::whatsapp::WhatsAppClient;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PROFILE_TEXT: &str = "Name: Ayesha\nAge: 24\nLocation: Lahore\nMarital status: Single";

    fn test_state(llm_server: &MockServer, wa_server: &MockServer) -> AppState {
        AppState {
            llm: LlmClient::with_base_url("test-key".to_string(), llm_server.uri()),
            whatsapp: WhatsAppClient::with_base_url(
                "instance42".to_string(),
                "secret-token".to_string(),
                wa_server.uri(),
            ),
            sessions: Arc::new(SessionStore::new()),
        }
    }

    fn request(session_id: Option<&str>) -> MatchRequest {
        MatchRequest {
            name: "Ali".to_string(),
            age: "25".to_string(),
            gender: "Male".to_string(),
            whatsapp_number: "+923001234567".to_string(),
            preferences: "kind, 23-25, Lahore".to_string(),
            session_id: session_id.map(str::to_string),
        }
    }

    async fn mock_llm_success(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": PROFILE_TEXT}}]
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_successful_pipeline_reports_destination_and_records_history() {
        let llm_server = MockServer::start().await;
        let wa_server = MockServer::start().await;
        mock_llm_success(&llm_server).await;
        Mock::given(method("POST"))
            .and(path("/instance42/messages/chat"))
            .and(body_string_contains("to=%2B923001234567"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sent": "true"})))
            .expect(1)
            .mount(&wa_server)
            .await;

        let state = test_state(&llm_server, &wa_server);
        let Json(response) = handle_match(State(state.clone()), Json(request(Some("s1"))))
            .await
            .unwrap();

        assert_eq!(response.status, "sent");
        assert_eq!(response.session_id, "s1");
        assert_eq!(response.profile, PROFILE_TEXT);
        assert_eq!(response.delivered_to.as_deref(), Some("+923001234567"));
        assert!(response.delivery_error.is_none());
        assert_eq!(state.sessions.history("s1"), vec![PROFILE_TEXT.to_string()]);
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_outbound_call() {
        let llm_server = MockServer::start().await;
        let wa_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&llm_server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&wa_server)
            .await;

        let state = test_state(&llm_server, &wa_server);

        let mut missing_field = request(None);
        missing_field.age = String::new();
        let err = handle_match(State(state.clone()), Json(missing_field))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut bad_number = request(None);
        bad_number.whatsapp_number = "03001234567".to_string();
        let err = handle_match(State(state), Json(bad_number))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_generation_failure_falls_back_and_still_notifies() {
        let llm_server = MockServer::start().await;
        let wa_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&llm_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/instance42/messages/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sent": "true"})))
            .expect(1)
            .mount(&wa_server)
            .await;

        let state = test_state(&llm_server, &wa_server);
        let Json(response) = handle_match(State(state.clone()), Json(request(Some("s1"))))
            .await
            .unwrap();

        assert_eq!(response.status, "sent");
        assert_eq!(response.profile, FALLBACK_PROFILE);
        // Fallback text must not pollute the avoid-list
        assert!(state.sessions.history("s1").is_empty());
    }

    #[tokio::test]
    async fn test_gateway_rejection_is_reported_but_history_is_kept() {
        let llm_server = MockServer::start().await;
        let wa_server = MockServer::start().await;
        mock_llm_success(&llm_server).await;
        Mock::given(method("POST"))
            .and(path("/instance42/messages/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "invalid token"})))
            .mount(&wa_server)
            .await;

        let state = test_state(&llm_server, &wa_server);
        let Json(response) = handle_match(State(state.clone()), Json(request(Some("s1"))))
            .await
            .unwrap();

        assert_eq!(response.status, "delivery_failed");
        assert_eq!(response.profile, PROFILE_TEXT);
        assert!(response.delivered_to.is_none());
        assert!(response
            .delivery_error
            .as_deref()
            .unwrap()
            .contains("invalid token"));
        // Generation succeeded, so the append is retained
        assert_eq!(state.sessions.history("s1"), vec![PROFILE_TEXT.to_string()]);
    }

    #[tokio::test]
    async fn test_missing_session_id_mints_one() {
        let llm_server = MockServer::start().await;
        let wa_server = MockServer::start().await;
        mock_llm_success(&llm_server).await;
        Mock::given(method("POST"))
            .and(path("/instance42/messages/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sent": "true"})))
            .mount(&wa_server)
            .await;

        let state = test_state(&llm_server, &wa_server);
        let Json(response) = handle_match(State(state.clone()), Json(request(None)))
            .await
            .unwrap();

        assert!(Uuid::parse_str(&response.session_id).is_ok());
        assert_eq!(
            state.sessions.history(&response.session_id),
            vec![PROFILE_TEXT.to_string()]
        );
    }

    #[tokio::test]
    async fn test_second_submission_sends_prior_profile_in_avoid_list() {
        let llm_server = MockServer::start().await;
        let wa_server = MockServer::start().await;
        mock_llm_success(&llm_server).await;
        Mock::given(method("POST"))
            .and(path("/instance42/messages/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sent": "true"})))
            .mount(&wa_server)
            .await;

        let state = test_state(&llm_server, &wa_server);
        handle_match(State(state.clone()), Json(request(Some("s1"))))
            .await
            .unwrap();
        handle_match(State(state.clone()), Json(request(Some("s1"))))
            .await
            .unwrap();

        let llm_requests = llm_server.received_requests().await.unwrap();
        assert_eq!(llm_requests.len(), 2);
        let first_body = String::from_utf8(llm_requests[0].body.clone()).unwrap();
        let second_body = String::from_utf8(llm_requests[1].body.clone()).unwrap();
        assert!(!first_body.contains("Previously generated profiles"));
        assert!(second_body.contains("Previously generated profiles"));
        // The prior profile travels verbatim (JSON-escaped) in the prompt
        assert!(second_body.contains("Name: Ayesha"));
    }
}
