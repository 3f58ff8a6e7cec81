//! Error and retry-policy types for the board domain.
//!
//! [`BoardError`] is the closed set of conditions that abort [`crate::Project`]
//! operations; callers branch on the variant. [`RemoteError`] is what a
//! [`crate::ProjectApi`] implementation reports when a remote call fails, and
//! is carried verbatim inside the `BoardError` variant for the step that made
//! the call.
//!
//! [`RetryPolicy`] is advisory: the orchestrator never retries, but a harness
//! deciding whether to re-run an item can ask a [`RemoteError`] for one.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{BoardItemId, BoardNumber, ContentId};

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether a failed remote call is worth repeating and, if so, after what delay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt (e.g. from `Retry-After`).
        /// `None` means apply the caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// Retrying will fail the same way; a human has to fix something first.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Remote-call errors
// ---------------------------------------------------------------------------

/// Failure of a single request against the remote project API.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RemoteError {
    /// The request never produced a response (connect failure, timeout, ...).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The credential was rejected.
    #[error("remote API rejected the credential")]
    Unauthorized,

    /// The remote API throttled the request.
    #[error("rate limited by remote API")]
    RateLimited {
        /// Delay advertised by the API, if any.
        retry_after: Option<Duration>,
    },

    /// Non-success HTTP status.
    #[error("remote API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The request was executed but the API reported errors in its payload.
    #[error("remote API reported errors: {}", .messages.join("; "))]
    GraphQl { messages: Vec<String> },

    /// The response could not be decoded.
    #[error("could not decode remote response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Classifies this failure for callers that implement their own retries.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Transport(_) => RetryPolicy::Retryable { after: None },
            Self::RateLimited { retry_after } => RetryPolicy::Retryable {
                after: *retry_after,
            },
            Self::Api { status, .. } if *status >= 500 => RetryPolicy::Retryable { after: None },
            Self::Unauthorized | Self::Api { .. } | Self::GraphQl { .. } | Self::Decode(_) => {
                RetryPolicy::NonRetryable
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestrator errors
// ---------------------------------------------------------------------------

/// Everything that can abort [`crate::Project::init`] or
/// [`crate::Project::ensure_membership_and_status`].
///
/// None of these is retried or suppressed internally. Failures of the ensure
/// operation leave the cached board identity and field index untouched, so the
/// same project can be used again once the underlying condition is fixed.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The board URL does not contain `/(orgs|users)/<owner>/projects/<number>`.
    #[error("invalid project board URL: {url}")]
    InvalidUrl { url: String },

    /// The schema query itself failed.
    #[error("failed to fetch board schema")]
    SchemaFetchFailed(#[source] RemoteError),

    /// The owner exists but has no such board, or the owner is missing.
    #[error("board {number} not found for {owner}")]
    BoardNotFound { owner: String, number: BoardNumber },

    /// An item operation was attempted before a successful `init()`.
    #[error("project has not been initialized")]
    NotInitialized,

    /// The board has no single-select field named "Status".
    #[error("board has no \"Status\" field")]
    MissingStatusField,

    /// No option of the Status field contains the requested label.
    #[error("no Status option matches \"{label}\"")]
    StatusValueNotFound { label: String },

    /// Looking up the item's membership failed.
    #[error("failed to look up board membership for {item_id}")]
    LookupFailed {
        item_id: ContentId,
        #[source]
        source: RemoteError,
    },

    /// The add-to-board mutation failed.
    #[error("failed to add {item_id} to the board")]
    AddFailed {
        item_id: ContentId,
        #[source]
        source: RemoteError,
    },

    /// The add-to-board mutation succeeded without returning a board-item id.
    #[error("adding {item_id} to the board returned no board-item id")]
    AddReturnedNoId { item_id: ContentId },

    /// The item was added but the follow-up lookup still reports it absent.
    #[error("{item_id} is not on the board after being added")]
    MembershipNotFoundAfterAdd { item_id: ContentId },

    /// The add mutation and the follow-up lookup disagree on the board-item id.
    #[error("board-item id mismatch: add returned {added}, lookup returned {found}")]
    MembershipIdMismatch {
        added: BoardItemId,
        found: BoardItemId,
    },

    /// The set-field-value mutation failed.
    #[error("failed to set status on board item {board_item_id}")]
    StatusUpdateFailed {
        board_item_id: BoardItemId,
        #[source]
        source: RemoteError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_carries_its_delay_into_the_policy() {
        let err = RemoteError::RateLimited {
            retry_after: Some(Duration::from_secs(60)),
        };
        assert_eq!(
            err.retry_policy(),
            RetryPolicy::Retryable {
                after: Some(Duration::from_secs(60))
            }
        );
    }

    #[test]
    fn client_errors_are_not_retryable() {
        assert_eq!(RemoteError::Unauthorized.retry_policy(), RetryPolicy::NonRetryable);
        let err = RemoteError::Api {
            status: 422,
            message: "bad".into(),
        };
        assert_eq!(err.retry_policy(), RetryPolicy::NonRetryable);
        let err = RemoteError::Api {
            status: 502,
            message: "bad gateway".into(),
        };
        assert_eq!(err.retry_policy(), RetryPolicy::Retryable { after: None });
    }

    #[test]
    fn graphql_messages_are_joined() {
        let err = RemoteError::GraphQl {
            messages: vec!["first".into(), "second".into()],
        };
        assert_eq!(err.to_string(), "remote API reported errors: first; second");
    }
}
