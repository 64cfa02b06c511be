// profiles/mod.rs — Profile mappings and claim-based selection

mod bigquery;
mod types;

pub use bigquery::BigQueryServiceAccountMapping;
pub use types::{MappingError, Profile, ProfileArgs};

use crate::connection::Connection;
use serde_json::Value;

/// Logical profile field -> candidate connection paths, tried in order.
pub type FieldMapping = &'static [(&'static str, &'static [&'static str])];

/// A mapping from one stored connection to one warehouse profile.
///
/// Implementations supply the static lookup tables; the provided methods
/// implement candidate-path resolution, required-field validation, and
/// connection claiming on top of them.
pub trait ProfileMapping: std::fmt::Debug {
    /// Orchestrator connection type this mapping understands.
    fn connection_type(&self) -> &'static str;

    /// Candidate source paths per logical field, in priority order.
    fn field_mapping(&self) -> FieldMapping;

    /// Fields that must resolve for the mapping to be usable.
    fn required_fields(&self) -> &'static [&'static str];

    fn connection(&self) -> &Connection;

    fn profile_args(&self) -> &ProfileArgs;

    /// Generate the warehouse profile. Pure: recomputed on every call.
    fn profile(&self) -> Result<Profile, MappingError>;

    /// Look up a logical field: caller-supplied profile args first, then the
    /// field's candidate paths against the connection, first match wins.
    fn try_resolve(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.profile_args().get(name) {
            tracing::debug!("Field {} taken from profile args", name);
            return Some(value.clone());
        }

        let candidates = self
            .field_mapping()
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, candidates)| *candidates)?;

        for path in candidates {
            if let Some(value) = self.connection().field_value(path) {
                tracing::debug!("Field {} resolved from {}", name, path);
                return Some(value.clone());
            }
        }

        None
    }

    /// Like `try_resolve`, but an unresolved field is an error.
    fn resolve(&self, name: &str) -> Result<Value, MappingError> {
        self.try_resolve(name)
            .ok_or_else(|| MappingError::MissingRequiredField {
                conn_id: self.connection().conn_id().to_string(),
                field: name.to_string(),
            })
    }

    /// Check that every required field resolves, in declared order.
    fn validate(&self) -> Result<(), MappingError> {
        for field in self.required_fields() {
            self.resolve(field)?;
        }
        Ok(())
    }

    /// Whether this mapping can serve the connection it was built with:
    /// the connection type matches and all required fields resolve.
    fn can_claim(&self) -> bool {
        self.connection().conn_type() == self.connection_type() && self.validate().is_ok()
    }
}

/// Find the profile mapping that claims the given connection.
///
/// Mappings are tried in priority order; the first whose connection type
/// matches and whose required fields resolve wins.
pub fn mapping_for(
    conn: Connection,
    profile_args: ProfileArgs,
) -> Result<Box<dyn ProfileMapping>, MappingError> {
    let conn_id = conn.conn_id().to_string();
    let conn_type = conn.conn_type().to_string();

    let mapping = BigQueryServiceAccountMapping::new(conn, profile_args);
    if mapping.can_claim() {
        tracing::debug!(
            "Connection {} claimed by bigquery service account mapping",
            conn_id
        );
        return Ok(Box::new(mapping));
    }

    Err(MappingError::UnclaimedConnection { conn_id, conn_type })
}
