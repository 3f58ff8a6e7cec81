//! Which issue or pull request a run synchronizes.
//!
//! Either given explicitly (`--item-id`, `--pull-request`) or taken from the
//! webhook payload GitHub Actions writes to `GITHUB_EVENT_PATH`.

use std::path::{Path, PathBuf};

use board::{ContentId, ItemKind};
use serde::Deserialize;
use thiserror::Error;

/// The item to put on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTarget {
    pub content_id: ContentId,
    pub kind: ItemKind,
}

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("no item given: pass --item-id or --event-path")]
    NotSpecified,

    #[error("item id must not be empty")]
    EmptyItemId,

    #[error("failed to read event payload {path}")]
    ReadEvent {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse event payload {path}")]
    ParseEvent {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("event payload {path} carries neither an issue nor a pull request")]
    NoItemInEvent { path: PathBuf },
}

impl ItemTarget {
    pub fn from_item_id(id: &str, is_pull_request: bool) -> Result<Self, TargetError> {
        Ok(Self {
            content_id: ContentId::new(id.trim()).ok_or(TargetError::EmptyItemId)?,
            kind: ItemKind::from_is_pull_request(is_pull_request),
        })
    }

    pub fn from_event_file(path: &Path) -> Result<Self, TargetError> {
        let raw = std::fs::read_to_string(path).map_err(|source| TargetError::ReadEvent {
            path: path.to_path_buf(),
            source,
        })?;
        from_event_json(&raw)
            .map_err(|source| TargetError::ParseEvent {
                path: path.to_path_buf(),
                source,
            })?
            .ok_or_else(|| TargetError::NoItemInEvent {
                path: path.to_path_buf(),
            })
    }
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<NodeRef>,
    issue: Option<IssueRef>,
}

#[derive(Debug, Deserialize)]
struct NodeRef {
    node_id: String,
}

#[derive(Debug, Deserialize)]
struct IssueRef {
    node_id: String,
    /// Present (non-null) when the "issue" is really a pull request, as in
    /// `issue_comment` events on pull requests.
    pull_request: Option<serde_json::Value>,
}

/// Extracts the item from a webhook payload. `pull_request` takes precedence
/// over `issue`.
fn from_event_json(raw: &str) -> Result<Option<ItemTarget>, serde_json::Error> {
    let payload: EventPayload = serde_json::from_str(raw)?;

    let target = if let Some(pr) = payload.pull_request {
        ContentId::new(pr.node_id).map(|content_id| ItemTarget {
            content_id,
            kind: ItemKind::PullRequest,
        })
    } else if let Some(issue) = payload.issue {
        let kind = ItemKind::from_is_pull_request(issue.pull_request.is_some());
        ContentId::new(issue.node_id).map(|content_id| ItemTarget { content_id, kind })
    } else {
        None
    };

    Ok(target)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn explicit_item_id_is_trimmed() {
        let target = ItemTarget::from_item_id(" I_kwDO123 ", false).unwrap();
        assert_eq!(target.content_id.as_str(), "I_kwDO123");
        assert_eq!(target.kind, ItemKind::Issue);
    }

    #[test]
    fn explicit_empty_item_id_is_rejected() {
        assert!(matches!(
            ItemTarget::from_item_id("   ", true),
            Err(TargetError::EmptyItemId)
        ));
    }

    #[test]
    fn issues_event_yields_issue() {
        let target =
            from_event_json(r#"{"action":"opened","issue":{"number":3,"node_id":"I_abc"}}"#)
                .unwrap()
                .unwrap();
        assert_eq!(target.content_id.as_str(), "I_abc");
        assert_eq!(target.kind, ItemKind::Issue);
    }

    #[test]
    fn pull_request_event_yields_pull_request() {
        let target =
            from_event_json(r#"{"action":"opened","pull_request":{"node_id":"PR_xyz"}}"#)
                .unwrap()
                .unwrap();
        assert_eq!(target.content_id.as_str(), "PR_xyz");
        assert_eq!(target.kind, ItemKind::PullRequest);
    }

    #[test]
    fn comment_on_pull_request_is_a_pull_request() {
        let target = from_event_json(
            r#"{"action":"created","issue":{"node_id":"PR_xyz","pull_request":{"url":"https://api.github.com/x"}},"comment":{}}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(target.kind, ItemKind::PullRequest);
    }

    #[test]
    fn null_pull_request_marker_means_issue() {
        let target = from_event_json(r#"{"issue":{"node_id":"I_abc","pull_request":null}}"#)
            .unwrap()
            .unwrap();
        assert_eq!(target.kind, ItemKind::Issue);
    }

    #[test]
    fn payload_without_item_is_none() {
        assert_eq!(from_event_json(r#"{"action":"push","ref":"main"}"#).unwrap(), None);
    }

    #[test]
    fn event_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"pull_request":{{"node_id":"PR_file"}}}}"#).unwrap();

        let target = ItemTarget::from_event_file(file.path()).unwrap();
        assert_eq!(target.content_id.as_str(), "PR_file");
    }

    #[test]
    fn event_file_without_item_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"zen":"Keep it logically awesome."}}"#).unwrap();

        assert!(matches!(
            ItemTarget::from_event_file(file.path()),
            Err(TargetError::NoItemInEvent { .. })
        ));
    }

    #[test]
    fn missing_event_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        assert!(matches!(
            ItemTarget::from_event_file(&path),
            Err(TargetError::ReadEvent { .. })
        ));
    }

    #[test]
    fn malformed_event_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            ItemTarget::from_event_file(file.path()),
            Err(TargetError::ParseEvent { .. })
        ));
    }
}
