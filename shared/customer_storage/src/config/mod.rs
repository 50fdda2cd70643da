//! Connection configuration for the document database
//!
//! All four values are required and have no defaults. Loading is a pure function of the
//! key/value source it is given, so tests can pass a map instead of touching the process
//! environment.

mod error;

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fmt;

pub use error::{ConfigError, ConfigResult};
use strum::{AsRefStr, Display};

/// Names of the variables the configuration is read from, in the order they are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigVariable {
    /// Endpoint URL of the document database
    DocumentDbEndpoint,
    /// Access key for the document database
    DocumentDbKey,
    /// Database the container lives in
    DocumentDbDatabaseId,
    /// Container holding the customer documents
    DocumentDbContainerId,
}

/// A read-only key/value source such as the process environment
pub trait ConfigSource {
    /// Returns the value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;
}

/// The environment of the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl ConfigSource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }
}

impl<S: ConfigSource + ?Sized> ConfigSource for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Validated connection parameters for one container
#[derive(Clone, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Endpoint URL of the document database
    pub endpoint: String,
    /// Access key
    pub key: String,
    /// Database id
    pub database_id: String,
    /// Container id
    pub container_id: String,
}

impl fmt::Debug for ContainerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerConfig")
            .field("endpoint", &self.endpoint)
            .field("key", &"<redacted>")
            .field("database_id", &self.database_id)
            .field("container_id", &self.container_id)
            .finish()
    }
}

impl ContainerConfig {
    /// Loads the configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVariable` naming the first required variable that is
    /// absent or empty
    pub fn from_env() -> ConfigResult<Self> {
        load_config(&ProcessEnv)
    }
}

/// Loads the configuration from `source`
///
/// Variables are checked in the order endpoint, key, database id, container id and the first
/// one that is absent or empty is reported. Nothing is returned unless all four are present.
///
/// # Errors
///
/// Returns `ConfigError::MissingVariable` naming the first missing variable
pub fn load_config<S: ConfigSource + ?Sized>(source: &S) -> ConfigResult<ContainerConfig> {
    Ok(ContainerConfig {
        endpoint: required(source, ConfigVariable::DocumentDbEndpoint)?,
        key: required(source, ConfigVariable::DocumentDbKey)?,
        database_id: required(source, ConfigVariable::DocumentDbDatabaseId)?,
        container_id: required(source, ConfigVariable::DocumentDbContainerId)?,
    })
}

fn required<S: ConfigSource + ?Sized>(source: &S, variable: ConfigVariable) -> ConfigResult<String> {
    source
        .get(variable.as_ref())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVariable(variable))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;

    fn complete_env() -> HashMap<String, String> {
        HashMap::from([
            (
                "DOCUMENT_DB_ENDPOINT".to_string(),
                "http://localhost:4566".to_string(),
            ),
            ("DOCUMENT_DB_KEY".to_string(), "test:test".to_string()),
            (
                "DOCUMENT_DB_DATABASE_ID".to_string(),
                "customer-db".to_string(),
            ),
            (
                "DOCUMENT_DB_CONTAINER_ID".to_string(),
                "customers".to_string(),
            ),
        ])
    }

    #[test]
    fn test_variable_names() {
        assert_eq!(
            ConfigVariable::DocumentDbEndpoint.to_string(),
            "DOCUMENT_DB_ENDPOINT"
        );
        assert_eq!(ConfigVariable::DocumentDbKey.as_ref(), "DOCUMENT_DB_KEY");
        assert_eq!(
            ConfigVariable::DocumentDbDatabaseId.to_string(),
            "DOCUMENT_DB_DATABASE_ID"
        );
        assert_eq!(
            ConfigVariable::DocumentDbContainerId.to_string(),
            "DOCUMENT_DB_CONTAINER_ID"
        );
    }

    #[test]
    fn test_load_complete_config() {
        let config = load_config(&complete_env()).expect("config should load");

        assert_eq!(
            config,
            ContainerConfig {
                endpoint: "http://localhost:4566".to_string(),
                key: "test:test".to_string(),
                database_id: "customer-db".to_string(),
                container_id: "customers".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_container_id() {
        let mut env = complete_env();
        env.remove("DOCUMENT_DB_CONTAINER_ID");

        let err = load_config(&env).unwrap_err();

        assert_eq!(
            err,
            ConfigError::MissingVariable(ConfigVariable::DocumentDbContainerId)
        );
        assert_eq!(
            err.to_string(),
            "Missing required environment variable: DOCUMENT_DB_CONTAINER_ID"
        );
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let mut env = complete_env();
        env.insert("DOCUMENT_DB_KEY".to_string(), String::new());

        assert_eq!(
            load_config(&env).unwrap_err(),
            ConfigError::MissingVariable(ConfigVariable::DocumentDbKey)
        );
    }

    #[test]
    fn test_first_missing_variable_is_reported() {
        let env = BTreeMap::from([(
            "DOCUMENT_DB_KEY".to_string(),
            "test:test".to_string(),
        )]);

        assert_eq!(
            load_config(&env).unwrap_err(),
            ConfigError::MissingVariable(ConfigVariable::DocumentDbEndpoint)
        );

        let empty: HashMap<String, String> = HashMap::new();
        assert_eq!(
            load_config(&empty).unwrap_err(),
            ConfigError::MissingVariable(ConfigVariable::DocumentDbEndpoint)
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = load_config(&complete_env()).expect("config should load");
        let debug = format!("{config:?}");

        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("test:test"));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        for (key, value) in complete_env() {
            env::set_var(key, value);
        }

        let config = ContainerConfig::from_env().expect("config should load");
        assert_eq!(config.database_id, "customer-db");
        assert_eq!(config.container_id, "customers");

        env::remove_var("DOCUMENT_DB_DATABASE_ID");
        assert_eq!(
            ContainerConfig::from_env().unwrap_err(),
            ConfigError::MissingVariable(ConfigVariable::DocumentDbDatabaseId)
        );

        for key in complete_env().keys() {
            env::remove_var(key);
        }
    }
}
