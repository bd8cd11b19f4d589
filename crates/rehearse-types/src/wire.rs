//! JSON request and response bodies of the interview service.

use serde::{Deserialize, Serialize};

use crate::persona::Persona;

/// `GET /api/personas`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaCatalog {
    pub personas: Vec<Persona>,
}

/// `POST /api/interview/start` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartInterviewRequest {
    pub persona_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartInterviewResponse {
    pub session_id: String,
    /// Partial persona echo; absent from some deployments.
    #[serde(default)]
    pub persona: Option<Persona>,
    pub opening_question: String,
}

/// `POST /api/interview/respond` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondRequest {
    pub session_id: String,
    pub user_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondResponse {
    pub response: String,
}

/// `POST /api/interview/end` body. The response is [`crate::interview::Feedback`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndInterviewRequest {
    pub session_id: String,
}

/// Error body of any non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
