//! Conversational endpoint references.

use serde::{Deserialize, Serialize};

use crate::core::ids::{BotId, ConversationId, UserId};

/// The account behind a conversational endpoint.
///
/// Exactly one identity applies to an endpoint. Branching on the variant is
/// how records are routed between the bot-instance and user collections,
/// and the compiler keeps every branch site exhaustive.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointIdentity {
    /// The endpoint belongs to a bot instance.
    Bot {
        /// Bot account identifier.
        bot_id: BotId,
    },
    /// The endpoint belongs to a human user.
    User {
        /// User account identifier.
        user_id: UserId,
    },
}

impl EndpointIdentity {
    /// True when the identity names a bot instance.
    #[must_use]
    pub const fn is_bot(&self) -> bool {
        matches!(self, Self::Bot { .. })
    }
}

/// A conversational party: one conversation plus the account behind it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointReference {
    /// Stable conversation identifier issued by the chat channel.
    pub conversation_id: ConversationId,
    /// Bot or user identity behind this endpoint.
    pub identity: EndpointIdentity,
}

impl EndpointReference {
    /// Reference a bot instance endpoint.
    #[must_use]
    pub const fn bot(conversation_id: ConversationId, bot_id: BotId) -> Self {
        Self {
            conversation_id,
            identity: EndpointIdentity::Bot { bot_id },
        }
    }

    /// Reference a user endpoint.
    #[must_use]
    pub const fn user(conversation_id: ConversationId, user_id: UserId) -> Self {
        Self {
            conversation_id,
            identity: EndpointIdentity::User { user_id },
        }
    }

    /// True when this endpoint belongs to a bot instance.
    #[must_use]
    pub const fn is_bot(&self) -> bool {
        self.identity.is_bot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_routes_bots_and_users() {
        let bot = EndpointReference::bot(
            ConversationId::new("conv-b").unwrap(),
            BotId::new("bot-1").unwrap(),
        );
        let user = EndpointReference::user(
            ConversationId::new("conv-u").unwrap(),
            UserId::new("user-1").unwrap(),
        );
        assert!(bot.is_bot());
        assert!(!user.is_bot());
    }

    #[test]
    fn serde_round_trip_preserves_identity() {
        let user = EndpointReference::user(
            ConversationId::new("conv-u").unwrap(),
            UserId::new("user-1").unwrap(),
        );
        let json = serde_json::to_string(&user).unwrap();
        let restored: EndpointReference = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, user);
    }
}
