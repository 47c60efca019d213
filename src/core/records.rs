//! Pending connection requests and established connections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::endpoint::EndpointReference;

/// A pending request from an endpoint to be connected to a counterpart.
///
/// Created when a user asks for assistance; destroyed when accepted
/// (converted into a [`Connection`]) or explicitly withdrawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRequest {
    /// Endpoint asking to be connected.
    pub requestor: EndpointReference,
    /// Creation time of the request.
    pub created_at: DateTime<Utc>,
}

impl ConnectionRequest {
    /// Build a request with an explicit creation time.
    #[must_use]
    pub const fn new(requestor: EndpointReference, created_at: DateTime<Utc>) -> Self {
        Self {
            requestor,
            created_at,
        }
    }
}

/// An established pairing of two endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Endpoint that accepted the request and owns the connection.
    pub owner: EndpointReference,
    /// Endpoint whose request was accepted.
    pub requestor: EndpointReference,
}

impl Connection {
    /// Pair an owner with a requestor.
    #[must_use]
    pub const fn new(owner: EndpointReference, requestor: EndpointReference) -> Self {
        Self { owner, requestor }
    }
}
