//! Row-key derivation for routing records.
//!
//! Every record kind derives its row key from conversation identifiers.
//! The connection key concatenates both parties' conversation identifiers
//! in a fixed canonical order: requestor first, then owner. The order is a
//! documented contract; swapping the endpoints derives a different key, so
//! a connection of (owner A, requestor B) and one of (owner B, requestor A)
//! are distinct records.

use crate::core::endpoint::EndpointReference;
use crate::core::records::{Connection, ConnectionRequest};

/// Row key of an endpoint reference: its conversation identifier.
#[must_use]
pub fn endpoint_key(endpoint: &EndpointReference) -> String {
    endpoint.conversation_id.as_str().to_string()
}

/// Row key of a connection request: the requestor's conversation identifier.
#[must_use]
pub fn connection_request_key(request: &ConnectionRequest) -> String {
    endpoint_key(&request.requestor)
}

/// Row key of a connection: the requestor's conversation identifier
/// concatenated with the owner's, in that order.
#[must_use]
pub fn connection_key(connection: &Connection) -> String {
    format!(
        "{}{}",
        connection.requestor.conversation_id.as_str(),
        connection.owner.conversation_id.as_str()
    )
}
