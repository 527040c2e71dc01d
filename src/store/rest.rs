//! PostgREST client for the Supabase `/rest/v1` endpoint.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{Query, RecordStore, StoreError};
use crate::config::StoreConfig;

/// Default timeout for a single read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error body returned by PostgREST on rejected queries.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    code: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

/// Blocking HTTP implementation of [`RecordStore`].
pub struct RestStore {
    http: Client,
    base_url: String,
    key: String,
}

impl RestStore {
    /// Creates a client for the given project.
    pub fn new(config: &StoreConfig, timeout: Duration) -> Result<Self, StoreError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("codex-vivus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.url.clone(),
            key: config.key.clone(),
        })
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }
}

impl RecordStore for RestStore {
    fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        let url = self.endpoint(query.table_name());
        debug!(table = query.table_name(), "select");

        let resp = self
            .http
            .get(&url)
            .query(&query.to_params())
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(parse_error_body(status.as_u16(), &body));
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Array(rows)) => Ok(rows),
            Ok(Value::Null) => Ok(Vec::new()),
            Ok(other) => Err(StoreError::Decode(format!(
                "expected an array of rows, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(StoreError::Decode(e.to_string())),
        }
    }
}

/// Converts a non-2xx response into a query error.
///
/// PostgREST answers with `{message, code, details, hint}`; gateways in front
/// of it sometimes answer with plain text, which is kept as the message.
fn parse_error_body(status: u16, body: &str) -> StoreError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => StoreError::Query {
            message: err
                .message
                .unwrap_or_else(|| format!("HTTP {}", status)),
            code: err.code,
            details: err.details,
            hint: err.hint,
        },
        Err(_) => {
            let text = body.trim();
            let message = if text.is_empty() {
                format!("HTTP {}", status)
            } else {
                format!("HTTP {}: {}", status, text)
            };
            StoreError::query(message)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_postgrest_error() {
        let body = r#"{"code":"42P01","details":null,"hint":null,"message":"relation \"public.fluxos\" does not exist"}"#;
        match parse_error_body(404, body) {
            StoreError::Query { message, code, .. } => {
                assert!(message.contains("does not exist"));
                assert_eq!(code.as_deref(), Some("42P01"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn keeps_plain_text_errors() {
        let err = parse_error_body(502, "Bad Gateway");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
        assert_eq!(parse_error_body(500, "").to_string(), "HTTP 500");
    }

    #[test]
    fn builds_table_endpoint() {
        let cfg = StoreConfig {
            url: "https://abc.supabase.co".to_string(),
            key: "k".to_string(),
        };
        let store = RestStore::new(&cfg, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            store.endpoint("fluxos"),
            "https://abc.supabase.co/rest/v1/fluxos"
        );
    }

    #[test]
    fn unreachable_store_is_a_transport_error() {
        let cfg = StoreConfig {
            url: "http://127.0.0.1:9".to_string(),
            key: "k".to_string(),
        };
        let store = RestStore::new(&cfg, Duration::from_secs(2)).unwrap();
        let err = store.select(&Query::table("fluxos")).unwrap_err();
        assert!(err.is_transport(), "got {:?}", err);
    }
}
