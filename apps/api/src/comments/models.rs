use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::comments::canonical::{canonicalize_heuristic, tokenize};

/// Display name used when a comment author does not provide one.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// A fully-normalized comment. Immutable once constructed: the write path
/// creates it, the read path reconstructs it from the persisted shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: String,
    pub name: String,
    pub text: String,
    /// The raw topic string as the author submitted it.
    pub role: String,
    /// Normalized grouping key produced by the canonicalizer at write time.
    pub canonical_role: String,
    /// String variants considered equivalent to `canonical_role`.
    pub aliases: Vec<String>,
    /// Lowercase, punctuation-stripped words of `canonical_role`.
    pub tokens: Vec<String>,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
    /// True only for synthetic seed comments, which are never persisted.
    pub auto: bool,
}

/// The persisted shape of a comment. Every field is optional: the comment
/// document predates canonical metadata, and nothing stops a hand-edited
/// file from carrying partial entries. Normalization into `CommentRecord`
/// happens here, immediately at the boundary — partial data never
/// propagates past it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredComment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto: Option<bool>,
}

impl StoredComment {
    /// Normalizes a persisted entry into a strict `CommentRecord`.
    ///
    /// Returns `None` for entries with no usable `text` or `role` — those
    /// violate the write-path invariant and are dropped rather than served.
    /// Entries written before canonical metadata existed are retrofitted
    /// with the deterministic heuristic, never the LLM, so bulk reads stay
    /// fast and side-effect-free.
    pub fn into_record(self) -> Option<CommentRecord> {
        let text = non_empty(self.text)?;
        let role = non_empty(self.role)?;

        let (canonical_role, aliases, tokens) = match non_empty(self.canonical_role) {
            Some(canonical) => {
                let aliases = self
                    .aliases
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| vec![role.clone(), canonical.clone()]);
                let tokens = self
                    .tokens
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| tokenize(&canonical));
                (canonical, aliases, tokens)
            }
            None => {
                let retrofit = canonicalize_heuristic(&role);
                (retrofit.canonical, retrofit.aliases, retrofit.tokens)
            }
        };

        Some(CommentRecord {
            id: non_empty(self.id).unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: non_empty(self.name).unwrap_or_else(|| ANONYMOUS_NAME.to_string()),
            text,
            role,
            canonical_role,
            aliases,
            tokens,
            timestamp: self.timestamp.unwrap_or(0),
            auto: self.auto.unwrap_or(false),
        })
    }
}

impl From<&CommentRecord> for StoredComment {
    fn from(record: &CommentRecord) -> Self {
        StoredComment {
            id: Some(record.id.clone()),
            name: Some(record.name.clone()),
            text: Some(record.text.clone()),
            role: Some(record.role.clone()),
            canonical_role: Some(record.canonical_role.clone()),
            aliases: Some(record.aliases.clone()),
            tokens: Some(record.tokens.clone()),
            timestamp: Some(record.timestamp),
            auto: Some(record.auto),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
