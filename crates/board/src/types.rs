//! Shared value types for the board domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types
//! describe whole entities: the board a URL points at, the board's identity
//! once fetched, its field schema, and the caller's desired statuses.

use serde::{Deserialize, Serialize};

use crate::{BoardId, BoardNumber, FieldId, OptionId};

// ---------------------------------------------------------------------------
// Board addressing
// ---------------------------------------------------------------------------

/// Who owns a board. Selects which branch of the schema query is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    /// `.../orgs/<owner>/projects/<n>`
    Organization,
    /// `.../users/<owner>/projects/<n>`
    User,
}

impl OwnerKind {
    /// Returns `true` for organization-owned boards.
    pub fn is_organization(self) -> bool {
        matches!(self, Self::Organization)
    }
}

impl std::fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Organization => write!(f, "organization"),
            Self::User => write!(f, "user"),
        }
    }
}

/// A board address parsed from its URL. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardDescriptor {
    /// Login of the owning organization or user.
    pub owner: String,
    /// Board number within the owner.
    pub number: BoardNumber,
    /// Whether `owner` is an organization or a user.
    pub owner_kind: OwnerKind,
}

impl BoardDescriptor {
    /// Returns `true` if the board is organization-owned.
    pub fn owner_is_organization(&self) -> bool {
        self.owner_kind.is_organization()
    }
}

impl std::fmt::Display for BoardDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}/projects/{}", self.owner_kind, self.owner, self.number)
    }
}

/// The remote identity of a board, fetched once during initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardIdentity {
    /// Handle used by every subsequent mutation.
    pub id: BoardId,
    /// Human-readable board title.
    pub title: String,
}

// ---------------------------------------------------------------------------
// Field schema
// ---------------------------------------------------------------------------

/// One option of a single-select field, as declared on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub id: OptionId,
    pub name: String,
}

/// A configurable single-select field with its options in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub name: String,
    pub options: Vec<FieldOption>,
}

/// A field entry exactly as the schema query returned it.
///
/// Field kinds this system does not model come back without an id (and
/// usually without anything else), so every member is optional. Indexing
/// discards entries that fail the id check; see [`crate::FieldIndex`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawField {
    pub id: Option<String>,
    pub name: Option<String>,
    pub options: Option<Vec<RawFieldOption>>,
}

/// An option entry inside a [`RawField`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFieldOption {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Everything one schema fetch returns about a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSchema {
    pub id: BoardId,
    pub title: String,
    pub fields: Vec<RawField>,
}

// ---------------------------------------------------------------------------
// Items and desired status
// ---------------------------------------------------------------------------

/// Whether the item being synchronized is an issue or a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Issue,
    PullRequest,
}

impl ItemKind {
    /// Maps the harness' `is_pull_request` flag onto an [`ItemKind`].
    pub fn from_is_pull_request(is_pull_request: bool) -> Self {
        if is_pull_request {
            Self::PullRequest
        } else {
            Self::Issue
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Issue => write!(f, "issue"),
            Self::PullRequest => write!(f, "pull request"),
        }
    }
}

/// Desired status labels, one per item kind. Fixed for the lifetime of a
/// [`crate::Project`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultStatusConfig {
    pub issues: String,
    pub pull_requests: String,
}

impl DefaultStatusConfig {
    pub fn new(issues: impl Into<String>, pull_requests: impl Into<String>) -> Self {
        Self {
            issues: issues.into(),
            pull_requests: pull_requests.into(),
        }
    }

    /// Returns the label that applies to `kind`.
    pub fn label_for(&self, kind: ItemKind) -> &str {
        match kind {
            ItemKind::Issue => &self.issues,
            ItemKind::PullRequest => &self.pull_requests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_follows_item_kind() {
        let defaults = DefaultStatusConfig::new("Backlog", "In Review");
        assert_eq!(defaults.label_for(ItemKind::Issue), "Backlog");
        assert_eq!(defaults.label_for(ItemKind::from_is_pull_request(true)), "In Review");
    }

    #[test]
    fn raw_field_tolerates_empty_object() {
        let field: RawField = serde_json::from_str("{}").unwrap();
        assert_eq!(field, RawField::default());
    }

    #[test]
    fn raw_field_decodes_options() {
        let field: RawField = serde_json::from_str(
            r#"{"id":"F1","name":"Status","options":[{"id":"o1","name":"Todo"},{"name":"no id"}]}"#,
        )
        .unwrap();
        let options = field.options.unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[1].id, None);
    }
}
