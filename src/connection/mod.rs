mod env;

pub use env::load_connection;

use serde::Deserialize;
use serde_json::{Map, Value};

/// A stored orchestrator connection: flat fields plus a nested `extra` blob.
///
/// Flat fields also hold legacy flattened names such as
/// `extra__google_cloud_platform__key_path`, which older orchestrator
/// versions wrote instead of the nested form.
#[derive(Debug, Clone)]
pub struct Connection {
    conn_id: String,
    conn_type: String,
    fields: Map<String, Value>,
    extra: Map<String, Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Connection `{0}` not found in environment")]
    NotFound(String),

    #[error("Invalid JSON for connection `{0}`: {1}")]
    InvalidJson(String, String),

    #[error("Connection `{0}` is not JSON-serialized (URI form is not supported)")]
    UnsupportedFormat(String),
}

/// JSON-serialized connection form used by the orchestrator's env variables.
#[derive(Debug, Deserialize)]
struct ConnectionJson {
    #[serde(default)]
    conn_type: String,
    #[serde(default)]
    extra: Option<Value>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Connection {
    pub fn new(conn_id: &str, conn_type: &str) -> Self {
        Self {
            conn_id: conn_id.to_string(),
            conn_type: conn_type.to_string(),
            fields: Map::new(),
            extra: Map::new(),
        }
    }

    /// Set a flat connection field (including legacy flattened names).
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Set an entry in the nested `extra` blob.
    pub fn with_extra(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(name.to_string(), value.into());
        self
    }

    /// Parse the orchestrator's JSON-serialized connection form.
    ///
    /// `extra` is accepted either as a JSON object or as a JSON-encoded
    /// string containing one; older records store the latter.
    pub fn from_json(conn_id: &str, body: &str) -> Result<Self, ConnectionError> {
        if !body.trim_start().starts_with('{') {
            return Err(ConnectionError::UnsupportedFormat(conn_id.to_string()));
        }

        let parsed: ConnectionJson = serde_json::from_str(body)
            .map_err(|e| ConnectionError::InvalidJson(conn_id.to_string(), e.to_string()))?;

        let extra = match parsed.extra {
            Some(Value::Object(map)) => map,
            Some(Value::String(raw)) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => map,
                _ => {
                    tracing::debug!(
                        "Connection {} extra string is not a JSON object, ignoring",
                        conn_id
                    );
                    Map::new()
                }
            },
            Some(Value::Null) | None => Map::new(),
            Some(_) => {
                tracing::debug!("Connection {} extra is not a JSON object, ignoring", conn_id);
                Map::new()
            }
        };

        Ok(Self {
            conn_id: conn_id.to_string(),
            conn_type: parsed.conn_type,
            fields: parsed.fields,
            extra,
        })
    }

    pub fn conn_id(&self) -> &str {
        &self.conn_id
    }

    pub fn conn_type(&self) -> &str {
        &self.conn_type
    }

    /// Resolve a single candidate path against this record.
    ///
    /// `extra.<name>` reads the nested blob; any other path reads the flat
    /// fields under that exact name. JSON nulls count as absent.
    pub fn field_value(&self, path: &str) -> Option<&Value> {
        let value = match path.strip_prefix("extra.") {
            Some(name) => self.extra.get(name),
            None => self.fields.get(path),
        };
        value.filter(|v| !v.is_null())
    }
}
