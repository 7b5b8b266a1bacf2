//! Gemini `generateContent` backend.

use crate::{ChatBackend, ChatError, ChatFuture};
use core_config::ChatConfig;
use core_events::{ChatRole, ChatTurn};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

pub struct GeminiBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key_env: String,
    timeout: Duration,
}

impl GeminiBackend {
    pub fn from_config(cfg: &ChatConfig) -> Result<Self, ChatError> {
        let timeout = cfg.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ChatError::Transport)?;
        Ok(Self {
            client,
            endpoint: cfg.endpoint.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            api_key_env: cfg.api_key_env.clone(),
            timeout,
        })
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }

    async fn call(&self, history: Vec<ChatTurn>, prompt: String) -> Result<String, ChatError> {
        // Read per request so a key exported after startup is picked up.
        let key = std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ChatError::MissingCredential(self.api_key_env.clone()))?;

        let body = build_request(&history, &prompt);
        debug!(target: "chat.http", model = %self.model, turns = body.contents.len(), "request_start");
        let response = self
            .client
            .post(self.url())
            .query(&[("key", key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport(e))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| self.transport(e))?;
        debug!(target: "chat.http", status, len = text.len(), "response_received");
        parse_response(status, &text)
    }

    fn transport(&self, e: reqwest::Error) -> ChatError {
        if e.is_timeout() {
            warn!(target: "chat.http", timeout_s = self.timeout.as_secs(), "request_timeout");
            ChatError::Timeout(self.timeout)
        } else {
            ChatError::Transport(e)
        }
    }
}

impl ChatBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn complete(&self, history: Vec<ChatTurn>, prompt: String) -> ChatFuture<'_> {
        Box::pin(self.call(history, prompt))
    }
}

fn build_request<'a>(history: &'a [ChatTurn], prompt: &'a str) -> GenerateRequest<'a> {
    let mut contents: Vec<Content<'a>> = history
        .iter()
        .map(|turn| Content {
            role: turn.role.as_str(),
            parts: [Part { text: &turn.text }],
        })
        .collect();
    contents.push(Content {
        role: ChatRole::User.as_str(),
        parts: [Part { text: prompt }],
    });
    GenerateRequest { contents }
}

/// Interpret a raw HTTP status and body.
fn parse_response(status: u16, body: &str) -> Result<String, ChatError> {
    if status >= 300 {
        return Err(ChatError::Status {
            code: status,
            body: body.to_string(),
        });
    }
    let parsed: GenerateResponse = serde_json::from_str(body)?;
    if let Some(err) = parsed.error {
        return Err(ChatError::Api(err.message));
    }
    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or(ChatError::EmptyResponse)
}
