//! Project-board synchronization domain for projsync.
//!
//! This crate holds the logic for keeping one issue or pull request on a
//! project board with the right Status: resolving a board URL, indexing the
//! board's single-select fields, matching a desired status label to an
//! option, and the [`Project`] orchestrator that ties them together.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! Remote calls go through the [`ProjectApi`] trait; the `github` crate
//! implements it over GraphQL.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`BoardId`, `BoardItemId`, `ContentId`, etc.) |
//! | [`types`] | Value types (`BoardDescriptor`, `FieldDescriptor`, `DefaultStatusConfig`, etc.) |
//! | [`errors`] | `BoardError`, `RemoteError`, `RetryPolicy` |
//! | [`url`] | Board URL resolution |
//! | [`fields`] | `FieldIndex` |
//! | [`status`] | Status option resolution |
//! | [`ports`] | The `ProjectApi` port trait |
//! | [`project`] | The `Project` orchestrator |
//! | [`testing`] | `MockProjectApi` and fixtures |

pub mod errors;
pub mod fields;
pub mod identifiers;
pub mod ports;
pub mod project;
pub mod status;
pub mod testing;
pub mod types;
pub mod url;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{BoardError, RemoteError, RetryPolicy};
pub use fields::FieldIndex;
pub use identifiers::{
    BoardId, BoardItemId, BoardNumber, ContentId, EmptyIdentifier, FieldId, OptionId,
};
pub use ports::ProjectApi;
pub use project::Project;
pub use status::{resolve_status, StatusSelection, STATUS_FIELD};
pub use types::{
    BoardDescriptor, BoardIdentity, BoardSchema, DefaultStatusConfig, FieldDescriptor,
    FieldOption, ItemKind, OwnerKind, RawField, RawFieldOption,
};
pub use url::parse_board_url;
