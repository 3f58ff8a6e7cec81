//! Port trait for the remote project API.
//!
//! [`crate::Project`] performs every remote call through one injected
//! [`ProjectApi`]. Infrastructure crates implement it (see the `github` crate
//! for the GraphQL adapter); tests use [`crate::testing::MockProjectApi`].
//! Authentication, transport, timeouts, and rate limiting belong to the
//! implementation, not to the orchestrator.

use async_trait::async_trait;

use crate::{
    BoardDescriptor, BoardId, BoardItemId, BoardSchema, ContentId, FieldId, OptionId, RemoteError,
};

/// Request/response channel to a project-management API.
#[async_trait]
pub trait ProjectApi: Send + Sync {
    /// Fetches a board's id, title, and single-select field schema in one
    /// round trip, selecting the organization or user branch per
    /// [`BoardDescriptor::owner_kind`].
    ///
    /// Returns `Ok(None)` when the owner or the board does not exist.
    async fn fetch_board_schema(
        &self,
        board: &BoardDescriptor,
    ) -> Result<Option<BoardSchema>, RemoteError>;

    /// Returns the board-item id of `item` on `board`, or `None` if the item
    /// is not a member.
    async fn lookup_membership(
        &self,
        item: &ContentId,
        board: &BoardId,
    ) -> Result<Option<BoardItemId>, RemoteError>;

    /// Adds `item` to `board`. Returns the new board-item id, or `None` if the
    /// API accepted the mutation without returning one.
    async fn add_to_board(
        &self,
        item: &ContentId,
        board: &BoardId,
    ) -> Result<Option<BoardItemId>, RemoteError>;

    /// Sets a single-select field on a board item to `option`.
    async fn set_field_value(
        &self,
        board: &BoardId,
        board_item: &BoardItemId,
        field: &FieldId,
        option: &OptionId,
    ) -> Result<(), RemoteError>;
}
