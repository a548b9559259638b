//! Request and response bodies for the welcome endpoint.

use serde::{Deserialize, Serialize};

use crate::adapters::http::error::ErrorResponse;
use crate::application::handlers::{WelcomeCommand, WelcomeResult};
use crate::domain::foundation::SessionId;
use crate::ports::Attendance;

/// POST /conversation/welcome body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeRequest {
    pub session_id: String,
    pub user_name: String,
    pub user_utterance: String,
    pub attendance_total: Option<u32>,
    pub attendance_streak: Option<u32>,
}

impl WelcomeRequest {
    pub fn into_command(self) -> Result<WelcomeCommand, ErrorResponse> {
        let session_id = SessionId::new(&self.session_id)
            .map_err(|e| ErrorResponse::bad_request(e.to_string()).with_detail("field", "sessionId"))?;
        if self.user_name.trim().is_empty() {
            return Err(ErrorResponse::bad_request("userName must not be empty").with_detail("field", "userName"));
        }
        if self.user_utterance.trim().is_empty() {
            return Err(ErrorResponse::bad_request("userUtterance must not be empty")
                .with_detail("field", "userUtterance"));
        }
        Ok(WelcomeCommand {
            session_id,
            user_name: self.user_name.trim().to_string(),
            user_utterance: self.user_utterance.trim().to_string(),
            attendance: Attendance {
                total: self.attendance_total,
                streak: self.attendance_streak,
            },
        })
    }
}

/// POST /conversation/welcome response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeResponse {
    pub ai_utterance: String,
    /// True when the client should move on to topic exploration.
    pub choice: bool,
}

impl From<WelcomeResult> for WelcomeResponse {
    fn from(result: WelcomeResult) -> Self {
        Self {
            ai_utterance: result.ai_utterance,
            choice: result.choice,
        }
    }
}
