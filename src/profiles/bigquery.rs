// profiles/bigquery.rs — BigQuery service account profile mapping

use super::{FieldMapping, MappingError, Profile, ProfileArgs, ProfileMapping};
use crate::connection::Connection;
use serde_json::Value;

const CONNECTION_TYPE: &str = "google_cloud_platform";
const PROFILE_TYPE: &str = "bigquery";
const DEFAULT_THREADS: u64 = 1;

// Multiple candidates for the keyfile params because older orchestrator
// versions stored them under flattened names.
const FIELD_MAPPING: FieldMapping = &[
    ("project", &["extra.project"]),
    ("dataset", &["dataset"]),
    (
        "keyfile",
        &[
            "key_path",
            "extra__google_cloud_platform__key_path",
            "extra.key_path",
        ],
    ),
    (
        "keyfile_dict",
        &[
            "keyfile_dict",
            "extra__google_cloud_platform__keyfile_dict",
            "extra.keyfile_dict",
        ],
    ),
];

// One of keyfile/keyfile_dict is also required; that is enforced by the
// fallback chain in `profile` rather than listed here.
const REQUIRED_FIELDS: &[&str] = &["project", "dataset"];

/// Maps a GCP connection to a bigquery profile authenticated via a service
/// account file or inline service account JSON.
#[derive(Debug)]
pub struct BigQueryServiceAccountMapping {
    conn: Connection,
    profile_args: ProfileArgs,
}

impl BigQueryServiceAccountMapping {
    pub fn new(conn: Connection, profile_args: ProfileArgs) -> Self {
        Self { conn, profile_args }
    }

    /// Decode a keyfile dict stored as a JSON-encoded string. Values that do
    /// not contain a JSON object pass through untouched.
    fn decode_keyfile_dict(value: Value) -> Value {
        if let Value::String(raw) = &value {
            if let Ok(parsed @ Value::Object(_)) = serde_json::from_str::<Value>(raw) {
                return parsed;
            }
        }
        value
    }
}

impl ProfileMapping for BigQueryServiceAccountMapping {
    fn connection_type(&self) -> &'static str {
        CONNECTION_TYPE
    }

    fn field_mapping(&self) -> FieldMapping {
        FIELD_MAPPING
    }

    fn required_fields(&self) -> &'static [&'static str] {
        REQUIRED_FIELDS
    }

    fn connection(&self) -> &Connection {
        &self.conn
    }

    fn profile_args(&self) -> &ProfileArgs {
        &self.profile_args
    }

    /// Generates the profile. Defaults `threads` to 1. The profile either
    /// uses `keyfile` as a path to a json file, or `keyfile_json` as the json
    /// contents directly; the dict form wins when both are stored.
    fn profile(&self) -> Result<Profile, MappingError> {
        let project = self.resolve("project")?;
        let dataset = self.resolve("dataset")?;

        let mut profile = Profile::new();
        profile.insert("type".to_string(), Value::from(PROFILE_TYPE));
        profile.insert("project".to_string(), project);
        profile.insert("dataset".to_string(), dataset);
        profile.insert(
            "threads".to_string(),
            self.profile_args
                .get("threads")
                .cloned()
                .unwrap_or_else(|| Value::from(DEFAULT_THREADS)),
        );

        // Caller-supplied args override the computed base
        for (key, value) in &self.profile_args {
            profile.insert(key.clone(), value.clone());
        }

        // Use the inline dict if it is stored, otherwise the keyfile path.
        // Written after the overlay so profile args cannot clobber them.
        match self.try_resolve("keyfile_dict") {
            Some(dict) => {
                tracing::debug!(
                    "Connection {} authenticates with an inline keyfile dict",
                    self.conn.conn_id()
                );
                profile.insert("keyfile_json".to_string(), Self::decode_keyfile_dict(dict));
                profile.insert("method".to_string(), Value::from("service-account-json"));
            }
            None => {
                tracing::debug!(
                    "Connection {} has no keyfile dict, trying keyfile path",
                    self.conn.conn_id()
                );
                let keyfile =
                    self.try_resolve("keyfile")
                        .ok_or_else(|| MappingError::MissingCredential {
                            conn_id: self.conn.conn_id().to_string(),
                        })?;
                profile.insert("keyfile".to_string(), keyfile);
                profile.insert("method".to_string(), Value::from("service-account"));
            }
        }

        tracing::info!(
            "Generated {} profile for connection {} (method={})",
            PROFILE_TYPE,
            self.conn.conn_id(),
            profile.get("method").and_then(|v| v.as_str()).unwrap_or("")
        );

        Ok(profile)
    }
}
