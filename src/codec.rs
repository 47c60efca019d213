//! Serialization of domain records to and from opaque text bodies.
//!
//! Records are stored as JSON text alongside their derived keys. Encoding
//! is lossless: decoding an encoded record yields a record equal to the
//! input.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::errors::{HandoffResult, HandoffStoreError};

/// Record kind labels carried in decode errors.
pub mod kind {
    /// Endpoint reference records.
    pub const ENDPOINT: &str = "endpoint";
    /// Connection request records.
    pub const CONNECTION_REQUEST: &str = "connection request";
    /// Connection records.
    pub const CONNECTION: &str = "connection";
}

/// Serialize a record into the text body stored alongside its key.
///
/// # Errors
/// Returns an error if the record cannot be represented as JSON; this does
/// not happen for the record types in this crate.
pub fn encode<T: Serialize>(kind: &'static str, record: &T) -> HandoffResult<String> {
    serde_json::to_string(record)
        .map_err(|source| HandoffStoreError::MalformedRecord { kind, source })
}

/// Deserialize a stored text body back into a record.
///
/// # Errors
/// Returns [`HandoffStoreError::MalformedRecord`] if the body is not the
/// serialized form of the expected record type.
pub fn decode<T: DeserializeOwned>(kind: &'static str, body: &str) -> HandoffResult<T> {
    serde_json::from_str(body)
        .map_err(|source| HandoffStoreError::MalformedRecord { kind, source })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;
    use crate::core::endpoint::EndpointReference;
    use crate::core::ids::{BotId, ConversationId, UserId};
    use crate::core::records::{Connection, ConnectionRequest};

    fn user_endpoint(conversation: &str, user: &str) -> EndpointReference {
        EndpointReference::user(
            ConversationId::new(conversation).unwrap(),
            UserId::new(user).unwrap(),
        )
    }

    #[test]
    fn endpoint_round_trip_is_exact() {
        let bot = EndpointReference::bot(
            ConversationId::new("conv-b").unwrap(),
            BotId::new("bot-1").unwrap(),
        );
        let body = encode(kind::ENDPOINT, &bot).unwrap();
        let restored: EndpointReference = decode(kind::ENDPOINT, &body).unwrap();
        assert_eq!(restored, bot);
    }

    #[test]
    fn connection_request_round_trip_is_exact() {
        let created_at = Utc.with_ymd_and_hms(2026, 8, 7, 9, 30, 11).unwrap();
        let request = ConnectionRequest::new(user_endpoint("conv-u", "user-1"), created_at);
        let body = encode(kind::CONNECTION_REQUEST, &request).unwrap();
        let restored: ConnectionRequest = decode(kind::CONNECTION_REQUEST, &body).unwrap();
        assert_eq!(restored, request);
    }

    #[test]
    fn connection_round_trip_is_exact() {
        let connection = Connection::new(
            user_endpoint("conv-owner", "agent-1"),
            user_endpoint("conv-req", "user-1"),
        );
        let body = encode(kind::CONNECTION, &connection).unwrap();
        let restored: Connection = decode(kind::CONNECTION, &body).unwrap();
        assert_eq!(restored, connection);
    }

    #[test]
    fn decode_rejects_garbage_with_record_kind() {
        let err = decode::<Connection>(kind::CONNECTION, "not a record").unwrap_err();
        match err {
            HandoffStoreError::MalformedRecord { kind: k, .. } => assert_eq!(k, kind::CONNECTION),
            other => panic!("unexpected error: {other}"),
        }
    }
}
