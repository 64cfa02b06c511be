// profiles/types.rs — Profile types and mapping errors

use serde_json::{Map, Value};
use thiserror::Error;

/// Flat warehouse profile produced by a mapping.
pub type Profile = Map<String, Value>;

/// Free-form caller overrides merged into the generated profile.
pub type ProfileArgs = Map<String, Value>;

/// Profile mapping errors
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Required field `{field}` could not be resolved from connection `{conn_id}`")]
    MissingRequiredField { conn_id: String, field: String },

    #[error("Connection `{conn_id}` has neither a service account keyfile nor a keyfile dict")]
    MissingCredential { conn_id: String },

    #[error("No profile mapping claims connection `{conn_id}` (type `{conn_type}`)")]
    UnclaimedConnection { conn_id: String, conn_type: String },
}
