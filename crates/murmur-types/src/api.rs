use serde::{Deserialize, Serialize};

// -- Accounts --

/// Missing and `null` fields both come through as `None` so they fail
/// validation rather than JSON extraction. Unknown fields such as
/// `accountId` are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

// -- Messages --

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateMessageRequest {
    #[serde(rename = "postedBy")]
    pub posted_by: Option<i64>,
    #[serde(rename = "messageText")]
    pub text: Option<String>,
    #[serde(rename = "timePostedEpoch")]
    pub posted_at: Option<i64>,
}

/// Only `messageText` is read; other message fields are accepted and ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateMessageRequest {
    #[serde(rename = "messageText")]
    pub text: Option<String>,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Status line, e.g. `"409 Conflict"`.
    pub status: String,
    pub message: String,
}
