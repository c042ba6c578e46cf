//! Closed string enumerations used by the contact-flow event
//!
//! Each enum accepts exactly its wire literals; anything else is rejected
//! during decoding with a message naming the enum and the allowed values.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// A string that is not one of an enum's literals
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for {kind}: `{value}`, expected one of: {}", .expected.join(", "))]
pub struct InvalidLiteral {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static [&'static str],
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $literal:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every accepted wire literal
            pub const LITERALS: &'static [&'static str] = &[$($literal),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $literal ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = InvalidLiteral;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $literal => Ok($name::$variant), )+
                    _ => Err(InvalidLiteral {
                        kind: stringify!($name),
                        value: s.to_string(),
                        expected: Self::LITERALS,
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let literal = String::deserialize(deserializer)?;
                literal.parse().map_err(de::Error::custom)
            }
        }
    };
}

wire_enum! {
    /// How the contact reached the contact center
    Channel {
        Voice => "VOICE",
        Chat => "CHAT",
        Task => "TASK",
        Email => "EMAIL",
    }
}

wire_enum! {
    /// How the contact was initiated
    InitiationMethod {
        Inbound => "INBOUND",
        Outbound => "OUTBOUND",
        Transfer => "TRANSFER",
        Callback => "CALLBACK",
        Api => "API",
        Disconnect => "DISCONNECT",
        Flow => "FLOW",
    }
}

wire_enum! {
    /// Address kind of a customer or system endpoint
    EndpointType {
        TelephoneNumber => "TELEPHONE_NUMBER",
        EmailAddress => "EMAIL_ADDRESS",
    }
}

wire_enum! {
    ReferenceStatus {
        Available => "AVAILABLE",
        Deleted => "DELETED",
        Approved => "APPROVED",
        Rejected => "REJECTED",
        Processing => "PROCESSING",
        Failed => "FAILED",
    }
}

wire_enum! {
    /// What a contact reference points at
    ReferenceType {
        Url => "URL",
        Attachment => "ATTACHMENT",
        String => "STRING",
        ContactAnalysis => "CONTACT_ANALYSIS",
        Number => "NUMBER",
        Date => "DATE",
        Email => "EMAIL",
        EmailMessage => "EMAIL_MESSAGE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals_round_trip_through_from_str() {
        for literal in InitiationMethod::LITERALS {
            let method: InitiationMethod = literal.parse().unwrap();
            assert_eq!(method.as_str(), *literal);
        }
        assert_eq!(Channel::Email.to_string(), "EMAIL");
        assert_eq!("CONTACT_ANALYSIS".parse::<ReferenceType>().unwrap(), ReferenceType::ContactAnalysis);
    }

    #[test]
    fn test_unknown_literal_rejected() {
        let err = "voice".parse::<Channel>().unwrap_err();
        assert_eq!(err.kind, "Channel");
        assert_eq!(
            err.to_string(),
            "invalid value for Channel: `voice`, expected one of: VOICE, CHAT, TASK, EMAIL"
        );
    }

    #[test]
    fn test_serde_uses_wire_literals() {
        assert_eq!(serde_json::to_string(&EndpointType::EmailAddress).unwrap(), "\"EMAIL_ADDRESS\"");
        let status: ReferenceStatus = serde_json::from_str("\"PROCESSING\"").unwrap();
        assert_eq!(status, ReferenceStatus::Processing);
        assert!(serde_json::from_str::<ReferenceStatus>("\"PENDING\"").is_err());
    }
}
