// connection/env.rs — Load connections from the orchestrator's environment variables

use super::{Connection, ConnectionError};
use std::env;

/// Load a connection serialized as JSON in `AIRFLOW_CONN_<CONN_ID>`.
///
/// A local `.env` file is picked up first when present, so development
/// setups can keep connections out of the shell environment.
pub fn load_connection(conn_id: &str) -> Result<Connection, ConnectionError> {
    dotenvy::dotenv().ok();

    let var = format!("AIRFLOW_CONN_{}", conn_id.to_uppercase());
    let raw = env::var(&var).map_err(|_| ConnectionError::NotFound(conn_id.to_string()))?;

    let conn = Connection::from_json(conn_id, &raw)?;
    tracing::info!(
        "Loaded connection {} (type {}) from {}",
        conn_id,
        conn.conn_type(),
        var
    );
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_load_connection_from_env() {
        env::set_var(
            "AIRFLOW_CONN_GCP_ENV_TEST",
            r#"{"conn_type": "google_cloud_platform", "dataset": "d1", "extra": {"project": "p1"}}"#,
        );

        let conn = load_connection("gcp_env_test").unwrap();
        assert_eq!(conn.conn_id(), "gcp_env_test");
        assert_eq!(conn.conn_type(), "google_cloud_platform");
        assert_eq!(conn.field_value("dataset"), Some(&Value::from("d1")));
        assert_eq!(conn.field_value("extra.project"), Some(&Value::from("p1")));
    }

    #[test]
    fn test_load_connection_missing_var() {
        let err = load_connection("gcp_env_never_set").unwrap_err();
        match err {
            ConnectionError::NotFound(conn_id) => assert_eq!(conn_id, "gcp_env_never_set"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_load_connection_uri_form_rejected() {
        env::set_var(
            "AIRFLOW_CONN_GCP_ENV_URI_TEST",
            "google-cloud-platform://?extra__google_cloud_platform__project=p1",
        );

        let err = load_connection("gcp_env_uri_test").unwrap_err();
        assert!(matches!(err, ConnectionError::UnsupportedFormat(_)));
    }
}
