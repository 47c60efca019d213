//! Identifier types for routing records.
//!
//! Conversation and account identifiers are issued by the chat channel and
//! are opaque to this crate; they are wrapped in validated newtypes because
//! row keys are derived from them. The only invariant enforced is
//! non-emptiness: an empty conversation identifier would derive an empty
//! (or silently colliding) row key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned when validating an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// Empty identifier.
    #[error("{kind} must not be empty")]
    Empty {
        /// Which identifier kind was rejected.
        kind: &'static str,
    },
}

/// Declare a validated channel-issued identifier newtype.
macro_rules! define_str_id {
    (
        $(#[$meta:meta])*
        $name:ident, kind = $kind:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[repr(transparent)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Build a validated identifier.
            ///
            /// # Errors
            /// Returns [`IdError::Empty`] if the input is empty.
            pub fn new(raw: impl Into<String>) -> Result<Self, IdError> {
                let value = raw.into();
                if value.is_empty() {
                    return Err(IdError::Empty { kind: $kind });
                }
                Ok(Self(value))
            }

            /// Borrow as `&str`.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume into `String`.
            #[inline]
            #[must_use]
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            #[inline]
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl From<$name> for String {
            #[inline]
            fn from(value: $name) -> Self {
                value.into_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            #[inline]
            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

define_str_id!(
    /// Stable conversation identifier issued by the chat channel.
    ///
    /// Row keys for every record kind are derived from conversation
    /// identifiers, so two endpoints sharing a conversation identifier are
    /// the same endpoint as far as the store is concerned.
    ConversationId,
    kind = "conversation id"
);

define_str_id!(
    /// Bot account identifier.
    BotId,
    kind = "bot id"
);

define_str_id!(
    /// User account identifier.
    UserId,
    kind = "user id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identifier_is_rejected() {
        assert_eq!(
            ConversationId::new(""),
            Err(IdError::Empty {
                kind: "conversation id"
            })
        );
        assert!(BotId::new("").is_err());
        assert!(UserId::new("").is_err());
    }

    #[test]
    fn display_and_parse_round_trip() {
        let id = ConversationId::new("conv-42").unwrap();
        assert_eq!(id.to_string(), "conv-42");
        assert_eq!("conv-42".parse::<ConversationId>().unwrap(), id);
    }

    #[test]
    fn serde_is_transparent() {
        let id = UserId::new("user-1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"user-1\"");
        let restored: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, id);
    }
}
