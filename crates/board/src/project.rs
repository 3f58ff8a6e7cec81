//! The `Project` orchestrator: board initialization and the
//! ensure-membership-and-status transition.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    parse_board_url, resolve_status, BoardError, BoardId, BoardIdentity, BoardItemId, ContentId,
    DefaultStatusConfig, FieldIndex, ItemKind, ProjectApi,
};

/// State written by a successful [`Project::init`].
#[derive(Debug, Clone)]
struct ResolvedBoard {
    identity: BoardIdentity,
    fields: FieldIndex,
}

/// One project board, addressed by URL, and the statuses items should get on it.
///
/// Call [`Project::init`] once, then
/// [`Project::ensure_membership_and_status`] per item. The project is not
/// meant to be shared between concurrent tasks; `init` takes `&mut self` and
/// the ensure operation only reads what `init` cached.
pub struct Project {
    api: Arc<dyn ProjectApi>,
    url: String,
    defaults: DefaultStatusConfig,
    board: Option<ResolvedBoard>,
}

impl Project {
    /// Creates an uninitialized project. No remote call is made.
    pub fn new(
        api: Arc<dyn ProjectApi>,
        url: impl Into<String>,
        defaults: DefaultStatusConfig,
    ) -> Self {
        Self {
            api,
            url: url.into(),
            defaults,
            board: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn defaults(&self) -> &DefaultStatusConfig {
        &self.defaults
    }

    /// Board identity cached by the last successful `init`.
    pub fn identity(&self) -> Option<&BoardIdentity> {
        self.board.as_ref().map(|b| &b.identity)
    }

    /// Field index cached by the last successful `init`.
    pub fn fields(&self) -> Option<&FieldIndex> {
        self.board.as_ref().map(|b| &b.fields)
    }

    /// Resolves the board URL, fetches the board schema, and caches the
    /// board identity and field index.
    ///
    /// Calling it again re-resolves from scratch; the cache is only replaced
    /// when the new resolution succeeds.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn init(&mut self) -> Result<BoardIdentity, BoardError> {
        let descriptor = parse_board_url(&self.url)?;
        debug!(board = %descriptor, "fetching board schema");

        let schema = self
            .api
            .fetch_board_schema(&descriptor)
            .await
            .map_err(BoardError::SchemaFetchFailed)?
            .ok_or_else(|| BoardError::BoardNotFound {
                owner: descriptor.owner.clone(),
                number: descriptor.number,
            })?;

        let fields = FieldIndex::from_raw(schema.fields);
        let identity = BoardIdentity {
            id: schema.id,
            title: schema.title,
        };
        info!(
            board_id = %identity.id,
            title = %identity.title,
            fields = fields.len(),
            "board initialized"
        );

        self.board = Some(ResolvedBoard {
            identity: identity.clone(),
            fields,
        });
        Ok(identity)
    }

    /// Makes sure `item_id` is on the board and its Status is the default for
    /// `kind`. Returns the item's board-item id.
    ///
    /// The Status option is resolved from the cached field index before any
    /// remote call, so a board without a usable Status option fails without
    /// side effects. After that, the item is looked up and added if absent;
    /// a freshly added item is looked up again and both ids must agree.
    /// Finally the Status is set.
    ///
    /// Safe to repeat: a second call finds the item and only re-applies the
    /// status. If the status update fails after an add, the item stays on the
    /// board without the desired status; nothing is rolled back.
    #[instrument(skip(self, item_id, kind), fields(item = %item_id, kind = %kind))]
    pub async fn ensure_membership_and_status(
        &self,
        item_id: &ContentId,
        kind: ItemKind,
    ) -> Result<BoardItemId, BoardError> {
        let board = self.board.as_ref().ok_or(BoardError::NotInitialized)?;
        let board_id = &board.identity.id;

        let label = self.defaults.label_for(kind);
        let selection =
            resolve_status(&board.fields, label)?.ok_or_else(|| BoardError::StatusValueNotFound {
                label: label.to_string(),
            })?;

        let board_item_id = match self.lookup(item_id, board_id).await? {
            Some(existing) => {
                info!(board_item = %existing, "item already on board");
                existing
            }
            None => self.add(item_id, board_id).await?,
        };

        self.api
            .set_field_value(
                board_id,
                &board_item_id,
                &selection.field_id,
                &selection.option_id,
            )
            .await
            .map_err(|source| BoardError::StatusUpdateFailed {
                board_item_id: board_item_id.clone(),
                source,
            })?;
        info!(
            board_item = %board_item_id,
            status = %selection.option_name,
            "status applied"
        );

        Ok(board_item_id)
    }

    async fn lookup(
        &self,
        item_id: &ContentId,
        board_id: &BoardId,
    ) -> Result<Option<BoardItemId>, BoardError> {
        self.api
            .lookup_membership(item_id, board_id)
            .await
            .map_err(|source| BoardError::LookupFailed {
                item_id: item_id.clone(),
                source,
            })
    }

    async fn add(
        &self,
        item_id: &ContentId,
        board_id: &BoardId,
    ) -> Result<BoardItemId, BoardError> {
        let added = self
            .api
            .add_to_board(item_id, board_id)
            .await
            .map_err(|source| BoardError::AddFailed {
                item_id: item_id.clone(),
                source,
            })?
            .ok_or_else(|| BoardError::AddReturnedNoId {
                item_id: item_id.clone(),
            })?;
        info!(board_item = %added, "item added to board");

        let found = self.lookup(item_id, board_id).await?.ok_or_else(|| {
            BoardError::MembershipNotFoundAfterAdd {
                item_id: item_id.clone(),
            }
        })?;

        if found != added {
            return Err(BoardError::MembershipIdMismatch { added, found });
        }
        Ok(added)
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("url", &self.url)
            .field("defaults", &self.defaults)
            .field("board", &self.board)
            .finish_non_exhaustive()
    }
}
