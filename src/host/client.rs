//! Blocking HTTP implementation of [`HostApi`].

use reqwest::blocking::{Client, Response};
use serde_json::Value;

use super::{decode_chat_list, ChatListPayload, HostApi, HostError};

/// Talks to the host's REST endpoints over HTTP.
///
/// Every request is `POST` with a JSON body (possibly empty) and carries the
/// host's CSRF token when one was captured at startup.
pub struct HttpHostApi {
    http: Client,
    base_url: String,
    csrf_token: Option<String>,
}

impl HttpHostApi {
    /// Create a client for a host at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            csrf_token: None,
        }
    }

    /// Attach the host's CSRF token to every request.
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    fn post(&self, path: &str, body: Value) -> Result<Response, HostError> {
        let mut request = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(&body);
        if let Some(token) = &self.csrf_token {
            request = request.header("X-CSRF-Token", token);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(HostError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

impl HostApi for HttpHostApi {
    fn fetch_persona_avatars(&self) -> Result<Vec<String>, HostError> {
        let body: Value = self
            .post("/api/avatars/get", Value::Null)?
            .json()
            .map_err(|e| HostError::Decode(e.to_string()))?;
        match body {
            Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()),
            other => Err(HostError::Decode(format!(
                "expected avatar array, got {other}"
            ))),
        }
    }

    fn delete_persona(&self, avatar: &str) -> Result<(), HostError> {
        self.post("/api/avatars/delete", serde_json::json!({ "avatar": avatar }))?;
        Ok(())
    }

    fn fetch_chats(&self, avatar_url: &str) -> Result<ChatListPayload, HostError> {
        let body: Value = self
            .post(
                "/api/characters/chats",
                serde_json::json!({ "avatar_url": avatar_url, "simple": false }),
            )?
            .json()
            .map_err(|e| HostError::Decode(e.to_string()))?;
        Ok(decode_chat_list(body))
    }

    fn delete_chat(&self, chat_file: &str, avatar_url: &str) -> Result<(), HostError> {
        self.post(
            "/api/chats/delete",
            serde_json::json!({ "chatfile": chat_file, "avatar_url": avatar_url }),
        )?;
        Ok(())
    }

    fn delete_character(&self, avatar_url: &str, delete_chats: bool) -> Result<(), HostError> {
        self.post(
            "/api/characters/delete",
            serde_json::json!({ "avatar_url": avatar_url, "delete_chats": delete_chats }),
        )?;
        Ok(())
    }
}
