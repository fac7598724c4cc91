//! Newtype domain identifiers.
//!
//! Every record kind has its own identifier type so that a [`SeedId`] can never
//! be passed where a [`NoteId`] is expected, even though both wrap a UUID.
//! User identities come from the identity collaborator as opaque strings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty
            /// or whitespace only.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.trim().is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Macro for UUID-wrapped newtypes (store-assigned or locally generated).
// Generates: struct (Copy), new_random(), from_uuid(), as_uuid(), FromStr, Display.
// ---------------------------------------------------------------------------
macro_rules! uuid_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a new random identifier.
            pub fn new_random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID (e.g. one assigned by the remote store).
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Returns the underlying [`Uuid`].
            pub fn as_uuid(self) -> Uuid {
                self.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: String-backed (supplied by the identity collaborator)
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies the authenticated user that owns seeds, articles, and notes.
    ///
    /// Every repository call is scoped by a [`UserId`]; there is no
    /// cross-user listing.
    UserId
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed
// ---------------------------------------------------------------------------

uuid_id! {
    /// Identifies a captured story seed.
    SeedId
}

uuid_id! {
    /// Identifies a saved article.
    ArticleId
}

uuid_id! {
    /// Identifies a library note (template, prompt, or reference).
    NoteId
}

uuid_id! {
    /// Identifies one authoring attempt (one pass from seed selection to save
    /// or discard).
    ///
    /// Generated fresh every time a seed is selected; attached to tracing spans
    /// so all collaborator calls of one attempt can be correlated.
    SessionId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_rejects_blank() {
        assert!(UserId::new("").is_none());
        assert!(UserId::new("   ").is_none());
        assert_eq!(UserId::new("u-1").map(|u| u.to_string()), Some("u-1".into()));
    }

    #[test]
    fn uuid_ids_parse_and_display() {
        let id = SeedId::new_random();
        let parsed: SeedId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<NoteId>().is_err());
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = ArticleId::from_uuid(Uuid::from_u128(7));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000007\"");

        let user: UserId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(user.as_str(), "abc");
    }
}
