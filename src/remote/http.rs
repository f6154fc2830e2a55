//! HTTP diagram service client.
//!
//! Thin reqwest wrapper over the generation, render, storage and history
//! endpoints. Every endpoint takes a JSON POST carrying the user's email and
//! answers JSON; failures carry `{ "error": "..." }`. Response parsing lives
//! in pure `parse_*` functions for testability.

use std::time::Duration;

use serde_json::{Value, json};
use tracing::{debug, warn};

use super::config::RemoteConfig;
use super::types::{DiagramService, GeneratedDiagram, HistoryItem, PersistReceipt, RemoteError};
use crate::artifact::Artifact;
use crate::diagram::{DiagramKind, DiagramSchema, Er, Flowchart, Uml};
use crate::session::SessionContext;

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpDiagramService {
    http: reqwest::Client,
    config: RemoteConfig,
}

impl HttpDiagramService {
    /// # Errors
    ///
    /// Returns [`RemoteError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| RemoteError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    async fn post(&self, url: &str, ctx: &SessionContext, body: &Value) -> Result<String, RemoteError> {
        let mut request = self.http.post(url).json(body);
        if let Some(token) = ctx.auth_token.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            warn!(%url, status, "diagram service call failed");
            return Err(RemoteError::Status { status, message: error_message(&text, status) });
        }
        debug!(%url, status, bytes = text.len(), "diagram service call ok");
        Ok(text)
    }
}

#[async_trait::async_trait]
impl DiagramService for HttpDiagramService {
    async fn generate(
        &self,
        ctx: &SessionContext,
        kind: DiagramKind,
        prompt: &str,
    ) -> Result<GeneratedDiagram, RemoteError> {
        let url = self.config.url(&self.config.paths.generate, Some(kind));
        let body = json!({ "email": ctx.user_email, "prompt": prompt });
        let text = self.post(&url, ctx, &body).await?;
        parse_generate_response(kind, &text)
    }

    async fn render(&self, ctx: &SessionContext, kind: DiagramKind, document: &Value) -> Result<Artifact, RemoteError> {
        let url = self.config.url(&self.config.paths.render, Some(kind));
        let mut body = serde_json::Map::new();
        body.insert("email".into(), Value::String(ctx.user_email.clone()));
        body.insert(kind.data_field().into(), document.clone());
        let text = self.post(&url, ctx, &Value::Object(body)).await?;
        parse_render_response(&text)
    }

    async fn persist(
        &self,
        ctx: &SessionContext,
        kind: DiagramKind,
        artifact: &Artifact,
    ) -> Result<PersistReceipt, RemoteError> {
        let url = self.config.url(&self.config.paths.persist, Some(kind));
        let body = json!({
            "email": ctx.user_email,
            "svg": artifact.to_base64(),
            "type": kind.as_str(),
            "isBase64Encoded": true,
        });
        let text = self.post(&url, ctx, &body).await?;
        parse_persist_response(&text)
    }

    async fn history(&self, ctx: &SessionContext, kind: Option<DiagramKind>) -> Result<Vec<HistoryItem>, RemoteError> {
        let url = self.config.url(&self.config.paths.history, kind);
        let mut body = json!({ "email": ctx.user_email });
        if let Some(kind) = kind {
            body["type"] = Value::String(kind.as_str().into());
        }
        let text = self.post(&url, ctx, &body).await?;
        parse_history_response(&text)
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn collection_fields(kind: DiagramKind) -> (&'static str, &'static str) {
    match kind {
        DiagramKind::Flowchart => (Flowchart::NODES_FIELD, Flowchart::LINKS_FIELD),
        DiagramKind::Uml => (Uml::NODES_FIELD, Uml::LINKS_FIELD),
        DiagramKind::Er => (Er::NODES_FIELD, Er::LINKS_FIELD),
    }
}

fn parse_object(json: &str) -> Result<Value, RemoteError> {
    let value: Value = serde_json::from_str(json).map_err(|e| RemoteError::Parse(e.to_string()))?;
    if !value.is_object() {
        return Err(RemoteError::Parse("expected a JSON object".into()));
    }
    Ok(value)
}

fn svg_of(value: &Value) -> Option<Artifact> {
    value
        .get("svg")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(Artifact::new)
}

/// A generation response must hold both element collections of `kind`.
fn parse_generate_response(kind: DiagramKind, json: &str) -> Result<GeneratedDiagram, RemoteError> {
    let value = parse_object(json)?;
    let (nodes, links) = collection_fields(kind);
    if value.get(nodes).is_none() || value.get(links).is_none() {
        return Err(RemoteError::Parse(format!("missing {nodes} and {links}")));
    }
    let artifact = svg_of(&value);
    Ok(GeneratedDiagram { payload: value, artifact })
}

fn parse_render_response(json: &str) -> Result<Artifact, RemoteError> {
    svg_of(&parse_object(json)?).ok_or_else(|| RemoteError::Parse("missing svg".into()))
}

fn parse_persist_response(json: &str) -> Result<PersistReceipt, RemoteError> {
    serde_json::from_str(json).map_err(|e| RemoteError::Parse(e.to_string()))
}

#[derive(serde::Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    items: Vec<HistoryItem>,
    error: Option<String>,
}

fn parse_history_response(json: &str) -> Result<Vec<HistoryItem>, RemoteError> {
    let response: HistoryResponse = serde_json::from_str(json).map_err(|e| RemoteError::Parse(e.to_string()))?;
    if !response.success {
        return Err(RemoteError::Rejected(response.error.unwrap_or_else(|| "failed to fetch history".into())));
    }
    Ok(response.items)
}

/// Best human-readable message from an error body.
fn error_message(body: &str, status: u16) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["error", "message"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_owned))
        })
        .unwrap_or_else(|| format!("server returned {status} status"))
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
