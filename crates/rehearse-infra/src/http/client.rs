//! HttpInterviewTransport -- concrete [`InterviewTransport`] over the
//! interview service's JSON API.
//!
//! The credential travels in the `X-API-Key` header only, never in a body or
//! URL. Every response is classified into exactly one outcome: the decoded
//! payload, `Unauthorized` for any 401, or `Failure(message)` for everything
//! else. No retries.

use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use rehearse_core::transport::InterviewTransport;
use rehearse_types::config::ClientConfig;
use rehearse_types::credential::{Credential, CREDENTIAL_HEADER};
use rehearse_types::error::TransportError;
use rehearse_types::interview::{Feedback, SessionStatusReport};
use rehearse_types::persona::Persona;
use rehearse_types::wire::{
    EndInterviewRequest, ErrorBody, PersonaCatalog, RespondRequest, RespondResponse,
    StartInterviewRequest, StartInterviewResponse,
};

/// Interview service client.
///
/// Holds no credential of its own; callers pass it per request.
pub struct HttpInterviewTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInterviewTransport {
    /// Create a transport against `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create reqwest client");

        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and classify the response.
    async fn call<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        credential: Option<&Credential>,
        endpoint: &str,
    ) -> Result<R, TransportError> {
        let request = match credential {
            Some(credential) => request.header(CREDENTIAL_HEADER, credential.expose()),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            debug!(endpoint, error = %e, "Request failed");
            if e.is_timeout() {
                TransportError::Failure("request timed out".to_string())
            } else if e.is_connect() {
                TransportError::Failure("could not reach the interview service".to_string())
            } else {
                TransportError::Failure(format!("request failed: {e}"))
            }
        })?;

        let status = response.status();
        debug!(endpoint, status = status.as_u16(), "Response received");

        if status == StatusCode::UNAUTHORIZED {
            return Err(TransportError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Failure(error_message(status, &body)));
        }

        response.json::<R>().await.map_err(|e| {
            TransportError::Failure(format!("invalid response from server: {e}"))
        })
    }
}

/// Prefer the server's `{"error": ...}` text, else the bare status.
fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.error.trim().is_empty() => parsed.error,
        _ => format!("HTTP {status}"),
    }
}

impl InterviewTransport for HttpInterviewTransport {
    async fn list_personas(
        &self,
        credential: Option<&Credential>,
    ) -> Result<Vec<Persona>, TransportError> {
        let request = self.client.get(self.url("/api/personas"));
        let catalog: PersonaCatalog = self.call(request, credential, "personas").await?;
        Ok(catalog.personas)
    }

    async fn start_interview(
        &self,
        credential: &Credential,
        persona_id: &str,
    ) -> Result<StartInterviewResponse, TransportError> {
        let body = StartInterviewRequest {
            persona_id: persona_id.to_string(),
        };
        let request = self.client.post(self.url("/api/interview/start")).json(&body);
        self.call(request, Some(credential), "start").await
    }

    async fn respond(
        &self,
        credential: &Credential,
        session_id: &str,
        user_message: &str,
    ) -> Result<String, TransportError> {
        let body = RespondRequest {
            session_id: session_id.to_string(),
            user_message: user_message.to_string(),
        };
        let request = self.client.post(self.url("/api/interview/respond")).json(&body);
        let reply: RespondResponse = self.call(request, Some(credential), "respond").await?;
        Ok(reply.response)
    }

    async fn end_interview(
        &self,
        credential: &Credential,
        session_id: &str,
    ) -> Result<Feedback, TransportError> {
        let body = EndInterviewRequest {
            session_id: session_id.to_string(),
        };
        let request = self.client.post(self.url("/api/interview/end")).json(&body);
        self.call(request, Some(credential), "end").await
    }

    async fn session_status(
        &self,
        credential: Option<&Credential>,
        session_id: &str,
    ) -> Result<SessionStatusReport, TransportError> {
        let request = self
            .client
            .get(self.url("/api/interview/status"))
            .query(&[("session_id", session_id)]);
        self.call(request, credential, "status").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rehearse_types::interview::FeedbackBody;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    const KEY: &str = "sk-or-v1-test";

    fn transport(server: &MockServer) -> HttpInterviewTransport {
        HttpInterviewTransport::new(server.uri(), Duration::from_secs(5))
    }

    fn credential() -> Credential {
        Credential::parse(KEY).unwrap()
    }

    #[test]
    fn new_trims_trailing_slash() {
        let transport = HttpInterviewTransport::new("http://localhost:5000/", Duration::from_secs(1));
        assert_eq!(transport.base_url(), "http://localhost:5000");
        assert_eq!(transport.url("/api/personas"), "http://localhost:5000/api/personas");
    }

    #[test]
    fn error_message_prefers_server_text() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"error": "Invalid session"}"#),
            "Invalid session"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "HTTP 500 Internal Server Error"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, r#"{"error": ""}"#),
            "HTTP 502 Bad Gateway"
        );
    }

    #[tokio::test]
    async fn list_personas_decodes_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/personas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "personas": [{
                    "id": "tech",
                    "emoji": "💻",
                    "name": "Alex Rivera",
                    "title": "CTO & Co-Founder",
                    "company": "TechStart Inc",
                    "description": "Challenge your technical and system design skills"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let personas = transport(&server).list_personas(None).await.unwrap();
        assert_eq!(personas.len(), 1);
        assert_eq!(personas[0].id, "tech");
        assert_eq!(personas[0].emoji, "💻");
    }

    #[tokio::test]
    async fn start_sends_credential_header_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/interview/start"))
            .and(header(CREDENTIAL_HEADER, KEY))
            .and(body_json(json!({"persona_id": "hr"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "session_id": "s1",
                "opening_question": "Tell me about yourself.",
                "persona": {"id": "hr", "name": "Lisa Patel", "title": "HR Director", "company": "Fortune 500 Corp"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let started = transport(&server)
            .start_interview(&credential(), "hr")
            .await
            .unwrap();
        assert_eq!(started.session_id, "s1");
        let persona = started.persona.unwrap();
        assert_eq!(persona.name, "Lisa Patel");
        assert_eq!(persona.emoji, "");
    }

    #[tokio::test]
    async fn start_accepts_body_without_persona_echo() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/interview/start"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "session_id": "s1",
                "opening_question": "Tell me about yourself."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let started = transport(&server)
            .start_interview(&credential(), "p1")
            .await
            .unwrap();
        assert_eq!(started.session_id, "s1");
        assert_eq!(started.opening_question, "Tell me about yourself.");
        assert!(started.persona.is_none());
    }

    #[tokio::test]
    async fn credential_never_leaves_the_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/interview/respond"))
            .and(header_exists(CREDENTIAL_HEADER))
            .respond_with(|request: &Request| {
                let body = String::from_utf8_lossy(&request.body).to_string();
                if body.contains(KEY) || request.url.as_str().contains(KEY) {
                    ResponseTemplate::new(500)
                } else {
                    ResponseTemplate::new(200).set_body_json(json!({"response": "Go on."}))
                }
            })
            .mount(&server)
            .await;

        let reply = transport(&server)
            .respond(&credential(), "s1", "I built X")
            .await
            .unwrap();
        assert_eq!(reply, "Go on.");
    }

    #[tokio::test]
    async fn unauthorized_is_classified_regardless_of_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/interview/respond"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid API key"})))
            .mount(&server)
            .await;

        let err = transport(&server)
            .respond(&credential(), "s1", "hello")
            .await
            .unwrap_err();
        assert_eq!(err, TransportError::Unauthorized);
    }

    #[tokio::test]
    async fn server_error_uses_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/interview/start"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid persona"})))
            .mount(&server)
            .await;

        let err = transport(&server)
            .start_interview(&credential(), "nope")
            .await
            .unwrap_err();
        assert_eq!(err, TransportError::Failure("Invalid persona".to_string()));
    }

    #[tokio::test]
    async fn malformed_json_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/interview/respond"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = transport(&server)
            .respond(&credential(), "s1", "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Failure(m) if m.starts_with("invalid response")));
    }

    #[tokio::test]
    async fn unreachable_server_is_failure() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let transport = HttpInterviewTransport::new(uri, Duration::from_secs(2));
        let err = transport.list_personas(None).await.unwrap_err();
        assert!(matches!(err, TransportError::Failure(_)));
    }

    #[tokio::test]
    async fn end_interview_decodes_structured_feedback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/interview/end"))
            .and(body_json(json!({"session_id": "s1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "duration": "5m 12s",
                "message_count": 4,
                "feedback": {"raw_feedback": "Good structure..."}
            })))
            .mount(&server)
            .await;

        let feedback = transport(&server)
            .end_interview(&credential(), "s1")
            .await
            .unwrap();
        assert_eq!(feedback.duration, "5m 12s");
        assert_eq!(feedback.message_count, 4);
        assert!(matches!(feedback.feedback, FeedbackBody::Structured(_)));
        assert_eq!(feedback.feedback.to_plain_text(), "Good structure...");
    }

    #[tokio::test]
    async fn session_status_uses_query_parameter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/interview/status"))
            .and(query_param("session_id", "s1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "active",
                "persona_id": "case",
                "message_count": 2
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/interview/status"))
            .and(query_param("session_id", "gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Invalid session"})))
            .mount(&server)
            .await;

        let transport = transport(&server);
        let report = transport.session_status(Some(&credential()), "s1").await.unwrap();
        assert_eq!(report.persona_id, "case");
        assert_eq!(report.message_count, 2);

        let err = transport.session_status(None, "gone").await.unwrap_err();
        assert_eq!(err, TransportError::Failure("Invalid session".to_string()));
    }
}
