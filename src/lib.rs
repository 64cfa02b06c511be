pub mod connection;
pub mod profiles;

pub use connection::{load_connection, Connection, ConnectionError};
pub use profiles::{
    mapping_for, BigQueryServiceAccountMapping, FieldMapping, MappingError, Profile, ProfileArgs,
    ProfileMapping,
};
