//! Domain models for publishing images to Arweave.
//!
//! - [`Tag`] - Name/value label attached to a transaction
//! - [`PublishUnit`] - Payload and tags awaiting a signature
//! - [`SignedUnit`] - Wallet-signed unit with its ledger id
//! - [`ContentId`] - Transaction id assigned by the ledger
//! - [`PublishedRef`] - Id and public URL of a published unit
//! - [`TagQuery`] - Tag/owner filter for gallery lookups

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag name carrying the application identifier.
pub const TAG_APP_NAME: &str = "App-Name";

/// Tag name carrying the payload MIME type.
pub const TAG_CONTENT_TYPE: &str = "Content-Type";

// =============================================================================
// Tags
// =============================================================================

/// A key/value label on a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// `App-Name` tag.
    pub fn app_name(value: impl Into<String>) -> Self {
        Self::new(TAG_APP_NAME, value)
    }

    /// `Content-Type` tag.
    pub fn content_type(value: impl Into<String>) -> Self {
        Self::new(TAG_CONTENT_TYPE, value)
    }
}

// =============================================================================
// Content Identifier
// =============================================================================

/// Transaction id assigned to a signed unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Publish Units
// =============================================================================

/// Payload bytes plus tags, built once per staged file.
///
/// Fields are private so a built unit cannot be altered before signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishUnit {
    name: String,
    data: Vec<u8>,
    tags: Vec<Tag>,
}

impl PublishUnit {
    pub fn new(name: impl Into<String>, data: Vec<u8>, tags: Vec<Tag>) -> Self {
        Self {
            name: name.into(),
            data,
            tags,
        }
    }

    /// Display name of the source file.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Tags in insertion order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// First value of the named tag.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.value.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.tag(TAG_CONTENT_TYPE)
    }
}

/// A unit after the wallet signed it.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedUnit {
    /// Ledger id (derived from the signature).
    pub id: ContentId,
    /// The unit that was signed.
    pub unit: PublishUnit,
    /// Wire transaction as produced by the wallet, posted as-is.
    pub envelope: serde_json::Value,
}

/// Response status of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitStatus {
    pub code: u16,
    /// Response body, kept for error reporting.
    pub detail: String,
}

impl SubmitStatus {
    pub fn new(code: u16) -> Self {
        Self {
            code,
            detail: String::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Only an explicit 200 counts.
    pub fn is_success(&self) -> bool {
        self.code == crate::config::SUCCESS_STATUS
    }
}

// =============================================================================
// Published References
// =============================================================================

/// A successfully published unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublishedRef {
    pub id: ContentId,
    pub url: String,
}

// =============================================================================
// Queries
// =============================================================================

/// Filter used to find published units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagQuery {
    pub tags: Vec<Tag>,
    pub owners: Vec<String>,
}

impl TagQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push(Tag::new(name, value));
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owners.push(owner.into());
        self
    }

    /// Whether a unit with `tags` owned by `owner` satisfies this filter.
    pub fn matches(&self, owner: &str, tags: &[Tag]) -> bool {
        let owner_ok = self.owners.is_empty() || self.owners.iter().any(|o| o == owner);
        owner_ok && self.tags.iter().all(|wanted| tags.contains(wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_tag_lookup() {
        let unit = PublishUnit::new(
            "a.png",
            vec![1, 2, 3],
            vec![Tag::app_name("demo"), Tag::content_type("image/png")],
        );
        assert_eq!(unit.tag(TAG_APP_NAME), Some("demo"));
        assert_eq!(unit.content_type(), Some("image/png"));
        assert_eq!(unit.tag("Missing"), None);
    }

    #[test]
    fn test_query_matches() {
        let tags = vec![Tag::app_name("demo"), Tag::content_type("image/png")];
        let query = TagQuery::new().tag(TAG_APP_NAME, "demo").owner("alice");

        assert!(query.matches("alice", &tags));
        assert!(!query.matches("bob", &tags));
        assert!(!TagQuery::new().tag(TAG_APP_NAME, "other").matches("alice", &tags));
        assert!(TagQuery::new().matches("anyone", &[]));
    }

    #[test]
    fn test_submit_status() {
        assert!(SubmitStatus::new(200).is_success());
        assert!(!SubmitStatus::new(202).is_success());
        assert!(!SubmitStatus::new(400).is_success());
    }

    #[test]
    fn test_content_id_serializes_as_string() {
        let json = serde_json::to_string(&ContentId::new("xyz")).unwrap();
        assert_eq!(json, "\"xyz\"");
    }
}
