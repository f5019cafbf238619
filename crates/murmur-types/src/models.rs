use serde::{Deserialize, Serialize};

/// A registered user.
///
/// `id` is `None` until the store assigns one. The password is kept and
/// returned exactly as the client supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "accountId")]
    pub id: Option<i64>,
    pub username: String,
    pub password: String,
}

impl Account {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            password: password.into(),
        }
    }
}

/// A text post authored by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "messageId")]
    pub id: Option<i64>,
    #[serde(rename = "postedBy")]
    pub posted_by: i64,
    #[serde(rename = "messageText")]
    pub text: String,
    /// Seconds since the Unix epoch.
    #[serde(rename = "timePostedEpoch")]
    pub posted_at: i64,
}
