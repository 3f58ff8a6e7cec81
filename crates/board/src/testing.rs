//! In-memory [`ProjectApi`] for tests.
//!
//! [`MockProjectApi`] keeps boards and memberships in memory, records every
//! call for assertions, and can be scripted to fail or misbehave on the
//! add-to-board step.
//!
//! ```rust,ignore
//! use board::testing::{fixtures, MockProjectApi};
//!
//! let api = Arc::new(MockProjectApi::new());
//! api.add_board(fixtures::org_board("acme", 7), fixtures::schema("PVT_1", "Roadmap", vec![
//!     fixtures::status_field(&[("o1", "Todo"), ("o2", "Done")]),
//! ]));
//!
//! let url = "https://github.com/orgs/acme/projects/7";
//! let mut project = Project::new(api.clone(), url, defaults);
//! project.init().await?;
//! assert_eq!(api.add_calls(), 0);
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::{
    BoardDescriptor, BoardId, BoardItemId, BoardSchema, ContentId, FieldId, OptionId, ProjectApi,
    RemoteError,
};

/// A call received by [`MockProjectApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    FetchBoardSchema {
        board: BoardDescriptor,
    },
    LookupMembership {
        item: ContentId,
        board: BoardId,
    },
    AddToBoard {
        item: ContentId,
        board: BoardId,
    },
    SetFieldValue {
        board: BoardId,
        board_item: BoardItemId,
        field: FieldId,
        option: OptionId,
    },
}

/// How the mock answers `add_to_board`.
#[derive(Debug, Clone, Default)]
pub enum AddBehavior {
    /// Record a membership under a generated id and return that id.
    #[default]
    Insert,
    /// Fail with the given error; nothing is recorded.
    Fail(RemoteError),
    /// Succeed without returning an id; nothing is recorded.
    ReturnNoId,
    /// Return `id` without recording a membership.
    ReturnUnrecorded(BoardItemId),
    /// Return `returned` but record the membership under `recorded`.
    ReturnDifferent {
        returned: BoardItemId,
        recorded: BoardItemId,
    },
}

#[derive(Debug, Default)]
struct MockState {
    boards: HashMap<BoardDescriptor, BoardSchema>,
    memberships: HashMap<(ContentId, BoardId), BoardItemId>,
    add_behavior: AddBehavior,
    schema_error: Option<RemoteError>,
    lookup_error: Option<RemoteError>,
    nth_lookup_error: Option<(usize, RemoteError)>,
    lookups: usize,
    set_field_error: Option<RemoteError>,
    field_values: HashMap<(BoardItemId, FieldId), OptionId>,
    calls: Vec<RecordedCall>,
    next_item: u32,
}

/// Mock implementation of [`ProjectApi`].
#[derive(Debug, Default)]
pub struct MockProjectApi {
    state: Mutex<MockState>,
}

impl MockProjectApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state poisoned")
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Makes `schema` the answer for `board`.
    pub fn add_board(&self, board: BoardDescriptor, schema: BoardSchema) {
        self.state().boards.insert(board, schema);
    }

    /// Pre-records `item` as a member of `board`.
    pub fn add_membership(&self, item: ContentId, board: BoardId, board_item: BoardItemId) {
        self.state().memberships.insert((item, board), board_item);
    }

    pub fn set_add_behavior(&self, behavior: AddBehavior) {
        self.state().add_behavior = behavior;
    }

    /// Fails every schema fetch with `error` until cleared.
    pub fn fail_schema_fetch(&self, error: Option<RemoteError>) {
        self.state().schema_error = error;
    }

    /// Fails every membership lookup with `error` until cleared.
    pub fn fail_lookup(&self, error: Option<RemoteError>) {
        self.state().lookup_error = error;
    }

    /// Fails only the `n`th membership lookup (1-based, counted over the
    /// mock's lifetime). Earlier and later lookups answer normally.
    pub fn fail_nth_lookup(&self, n: usize, error: RemoteError) {
        self.state().nth_lookup_error = Some((n, error));
    }

    /// Fails every set-field-value call with `error` until cleared.
    pub fn fail_set_field(&self, error: Option<RemoteError>) {
        self.state().set_field_error = error;
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    pub fn add_calls(&self) -> usize {
        self.count(|c| matches!(c, RecordedCall::AddToBoard { .. }))
    }

    pub fn set_field_calls(&self) -> usize {
        self.count(|c| matches!(c, RecordedCall::SetFieldValue { .. }))
    }

    /// Number of mutations (adds and field updates) received.
    pub fn mutation_calls(&self) -> usize {
        self.add_calls() + self.set_field_calls()
    }

    /// Board-item id currently recorded for `item` on `board`.
    pub fn membership(&self, item: &ContentId, board: &BoardId) -> Option<BoardItemId> {
        self.state()
            .memberships
            .get(&(item.clone(), board.clone()))
            .cloned()
    }

    /// Option last applied to `field` of `board_item`.
    pub fn field_value(&self, board_item: &BoardItemId, field: &FieldId) -> Option<OptionId> {
        self.state()
            .field_values
            .get(&(board_item.clone(), field.clone()))
            .cloned()
    }

    fn count(&self, pred: impl Fn(&RecordedCall) -> bool) -> usize {
        self.state().calls.iter().filter(|c| pred(c)).count()
    }
}

#[async_trait]
impl ProjectApi for MockProjectApi {
    async fn fetch_board_schema(
        &self,
        board: &BoardDescriptor,
    ) -> Result<Option<BoardSchema>, RemoteError> {
        let mut state = self.state();
        state.calls.push(RecordedCall::FetchBoardSchema {
            board: board.clone(),
        });
        if let Some(err) = state.schema_error.clone() {
            return Err(err);
        }
        Ok(state.boards.get(board).cloned())
    }

    async fn lookup_membership(
        &self,
        item: &ContentId,
        board: &BoardId,
    ) -> Result<Option<BoardItemId>, RemoteError> {
        let mut state = self.state();
        state.calls.push(RecordedCall::LookupMembership {
            item: item.clone(),
            board: board.clone(),
        });
        state.lookups += 1;
        if let Some(err) = state.lookup_error.clone() {
            return Err(err);
        }
        if let Some((n, err)) = &state.nth_lookup_error {
            if *n == state.lookups {
                return Err(err.clone());
            }
        }
        Ok(state.memberships.get(&(item.clone(), board.clone())).cloned())
    }

    async fn add_to_board(
        &self,
        item: &ContentId,
        board: &BoardId,
    ) -> Result<Option<BoardItemId>, RemoteError> {
        let mut state = self.state();
        state.calls.push(RecordedCall::AddToBoard {
            item: item.clone(),
            board: board.clone(),
        });

        let key = (item.clone(), board.clone());
        match state.add_behavior.clone() {
            AddBehavior::Insert => {
                state.next_item += 1;
                let id = BoardItemId::new(format!("PVTI_{}", state.next_item))
                    .expect("generated id is non-empty");
                state.memberships.insert(key, id.clone());
                Ok(Some(id))
            }
            AddBehavior::Fail(err) => Err(err),
            AddBehavior::ReturnNoId => Ok(None),
            AddBehavior::ReturnUnrecorded(id) => Ok(Some(id)),
            AddBehavior::ReturnDifferent { returned, recorded } => {
                state.memberships.insert(key, recorded);
                Ok(Some(returned))
            }
        }
    }

    async fn set_field_value(
        &self,
        board: &BoardId,
        board_item: &BoardItemId,
        field: &FieldId,
        option: &OptionId,
    ) -> Result<(), RemoteError> {
        let mut state = self.state();
        state.calls.push(RecordedCall::SetFieldValue {
            board: board.clone(),
            board_item: board_item.clone(),
            field: field.clone(),
            option: option.clone(),
        });
        if let Some(err) = state.set_field_error.clone() {
            return Err(err);
        }
        state
            .field_values
            .insert((board_item.clone(), field.clone()), option.clone());
        Ok(())
    }
}

/// Builders for boards and schemas used across tests.
pub mod fixtures {
    use crate::{
        BoardDescriptor, BoardId, BoardNumber, BoardSchema, OwnerKind, RawField, RawFieldOption,
        STATUS_FIELD,
    };

    pub fn org_board(owner: &str, number: u64) -> BoardDescriptor {
        BoardDescriptor {
            owner: owner.to_string(),
            number: BoardNumber::new(number),
            owner_kind: OwnerKind::Organization,
        }
    }

    pub fn user_board(owner: &str, number: u64) -> BoardDescriptor {
        BoardDescriptor {
            owner: owner.to_string(),
            number: BoardNumber::new(number),
            owner_kind: OwnerKind::User,
        }
    }

    pub fn schema(id: &str, title: &str, fields: Vec<RawField>) -> BoardSchema {
        BoardSchema {
            id: BoardId::new(id).expect("fixture board id is non-empty"),
            title: title.to_string(),
            fields,
        }
    }

    /// A single-select field with `(id, name)` options.
    pub fn single_select(id: &str, name: &str, options: &[(&str, &str)]) -> RawField {
        RawField {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            options: Some(
                options
                    .iter()
                    .map(|(id, name)| RawFieldOption {
                        id: Some(id.to_string()),
                        name: Some(name.to_string()),
                    })
                    .collect(),
            ),
        }
    }

    /// The "Status" field, id `F_status`.
    pub fn status_field(options: &[(&str, &str)]) -> RawField {
        single_select("F_status", STATUS_FIELD, options)
    }

    /// An entry the schema query returns for field kinds that are not single-select.
    pub fn unmodelled_field() -> RawField {
        RawField::default()
    }
}
