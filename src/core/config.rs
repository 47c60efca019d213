//! Configuration for the routing data store.

use serde::{Deserialize, Serialize};

use crate::core::errors::{HandoffResult, HandoffStoreError};

/// Storage configuration for routing data.
///
/// The connection string is the credential for the backing table service;
/// for the bundled `SQLite` backend it is the database path (`:memory:`
/// supported). Each record kind is stored in its own named collection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Connection credential for the backing table service.
    pub connection_string: String,
    /// Bot instance collection name.
    pub bot_instance_table: String,
    /// User collection name.
    pub user_table: String,
    /// Aggregation channel collection name.
    pub aggregation_channel_table: String,
    /// Connection request collection name.
    pub connection_request_table: String,
    /// Connection collection name.
    pub connection_table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            connection_string: "routing.sqlite".to_string(),
            bot_instance_table: "bot_instances".to_string(),
            user_table: "users".to_string(),
            aggregation_channel_table: "aggregation_channels".to_string(),
            connection_request_table: "connection_requests".to_string(),
            connection_table: "connections".to_string(),
        }
    }
}

impl StoreConfig {
    /// Default collection layout over a specific backing database.
    #[must_use]
    pub fn with_connection_string(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            ..Self::default()
        }
    }

    /// Validate configuration invariants.
    ///
    /// A missing or empty connection credential is fatal; construction of
    /// the store does not proceed past it.
    ///
    /// # Errors
    /// Returns an error if the connection string or any collection name is
    /// empty.
    pub fn validate(&self) -> HandoffResult<()> {
        if self.connection_string.trim().is_empty() {
            return Err(HandoffStoreError::InvalidConfig(
                "connection_string must not be empty".to_string(),
            ));
        }

        for (field, value) in [
            ("bot_instance_table", &self.bot_instance_table),
            ("user_table", &self.user_table),
            ("aggregation_channel_table", &self.aggregation_channel_table),
            ("connection_request_table", &self.connection_request_table),
            ("connection_table", &self.connection_table),
        ] {
            if value.trim().is_empty() {
                return Err(HandoffStoreError::InvalidConfig(format!(
                    "{field} must not be empty"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(StoreConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_connection_string_is_fatal() {
        let config = StoreConfig::with_connection_string("  ");
        assert!(matches!(
            config.validate(),
            Err(HandoffStoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn empty_collection_name_is_rejected() {
        let config = StoreConfig {
            user_table: String::new(),
            ..StoreConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(HandoffStoreError::InvalidConfig(_))
        ));
    }
}
