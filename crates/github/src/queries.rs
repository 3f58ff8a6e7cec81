//! GraphQL documents for Projects V2 and decoding of their responses.
//!
//! Decoding is kept apart from transport so each response shape can be
//! checked against literal JSON.

use board::{BoardId, BoardItemId, BoardSchema, OwnerKind, RawField, RemoteError};
use serde::Deserialize;

/// Error `type` GitHub uses when a login, board, or node does not exist.
const NOT_FOUND: &str = "NOT_FOUND";
/// Error `type` GitHub uses for secondary rate limits reported in-band.
const RATE_LIMITED: &str = "RATE_LIMITED";

pub(crate) const ORGANIZATION_BOARD_QUERY: &str = r#"
query($owner: String!, $number: Int!) {
  organization(login: $owner) {
    projectV2(number: $number) {
      id
      title
      fields(first: 20) {
        nodes {
          ... on ProjectV2SingleSelectField {
            id
            name
            options { id name }
          }
        }
      }
    }
  }
}
"#;

pub(crate) const USER_BOARD_QUERY: &str = r#"
query($owner: String!, $number: Int!) {
  user(login: $owner) {
    projectV2(number: $number) {
      id
      title
      fields(first: 20) {
        nodes {
          ... on ProjectV2SingleSelectField {
            id
            name
            options { id name }
          }
        }
      }
    }
  }
}
"#;

pub(crate) const MEMBERSHIP_QUERY: &str = r#"
query($itemId: ID!) {
  node(id: $itemId) {
    ... on Issue {
      projectItems(first: 100) { nodes { id project { id } } }
    }
    ... on PullRequest {
      projectItems(first: 100) { nodes { id project { id } } }
    }
  }
}
"#;

pub(crate) const ADD_ITEM_MUTATION: &str = r#"
mutation($projectId: ID!, $contentId: ID!) {
  addProjectV2ItemById(input: { projectId: $projectId, contentId: $contentId }) {
    item { id }
  }
}
"#;

pub(crate) const SET_SINGLE_SELECT_MUTATION: &str = r#"
mutation($projectId: ID!, $itemId: ID!, $fieldId: ID!, $optionId: String!) {
  updateProjectV2ItemFieldValue(
    input: {
      projectId: $projectId
      itemId: $itemId
      fieldId: $fieldId
      value: { singleSelectOptionId: $optionId }
    }
  ) {
    projectV2Item { id }
  }
}
"#;

pub(crate) fn board_query(kind: OwnerKind) -> &'static str {
    match kind {
        OwnerKind::Organization => ORGANIZATION_BOARD_QUERY,
        OwnerKind::User => USER_BOARD_QUERY,
    }
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl GraphQlError {
    fn is(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }
}

/// Turns in-band errors into a [`RemoteError`]; `None` if there are none.
fn errors_to_remote(errors: &[GraphQlError]) -> Option<RemoteError> {
    if errors.is_empty() {
        return None;
    }
    if errors.iter().any(|e| e.is(RATE_LIMITED)) {
        return Some(RemoteError::RateLimited { retry_after: None });
    }
    Some(RemoteError::GraphQl {
        messages: errors.iter().map(|e| e.message.clone()).collect(),
    })
}

/// `nodes` list of a GraphQL connection. The list and individual nodes may
/// be null.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Connection<T> {
    #[serde(default)]
    nodes: Option<Vec<Option<T>>>,
}

impl<T> Connection<T> {
    /// The listed nodes, with a null list read as empty.
    pub fn into_nodes(self) -> Vec<Option<T>> {
        self.nodes.unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Board schema
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct BoardData {
    organization: Option<OwnerNode>,
    user: Option<OwnerNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnerNode {
    project_v2: Option<ProjectNode>,
}

#[derive(Debug, Deserialize)]
struct ProjectNode {
    id: String,
    #[serde(default)]
    title: Option<String>,
    fields: Option<Connection<RawField>>,
}

/// Picks the branch for `kind` out of a board-schema response.
///
/// `NOT_FOUND` errors mean the owner or board does not exist and yield
/// `Ok(None)`, as does a missing branch. Any other error fails the call.
pub(crate) fn decode_board(
    response: GraphQlResponse<BoardData>,
    kind: OwnerKind,
) -> Result<Option<BoardSchema>, RemoteError> {
    let unexpected: Vec<_> = response
        .errors
        .iter()
        .filter(|e| !e.is(NOT_FOUND))
        .cloned()
        .collect();
    if let Some(err) = errors_to_remote(&unexpected) {
        return Err(err);
    }

    let Some(data) = response.data else {
        return Ok(None);
    };
    let owner = match kind {
        OwnerKind::Organization => data.organization,
        OwnerKind::User => data.user,
    };
    let Some(project) = owner.and_then(|o| o.project_v2) else {
        return Ok(None);
    };

    let id = BoardId::new(project.id)
        .ok_or_else(|| RemoteError::Decode("board has an empty id".to_string()))?;
    let fields = project
        .fields
        .map(|c| {
            c.into_nodes()
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect()
        })
        .unwrap_or_default();

    Ok(Some(BoardSchema {
        id,
        title: project.title.unwrap_or_default(),
        fields,
    }))
}

// ---------------------------------------------------------------------------
// Membership lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct MembershipData {
    node: Option<ContentNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentNode {
    project_items: Option<Connection<ProjectItemNode>>,
}

#[derive(Debug, Deserialize)]
struct ProjectItemNode {
    id: String,
    project: Option<ProjectRef>,
}

#[derive(Debug, Deserialize)]
struct ProjectRef {
    id: String,
}

/// Finds the board item of the looked-up content on `board`.
pub(crate) fn decode_membership(
    response: GraphQlResponse<MembershipData>,
    board: &BoardId,
) -> Result<Option<BoardItemId>, RemoteError> {
    if let Some(err) = errors_to_remote(&response.errors) {
        return Err(err);
    }

    let items = response
        .data
        .and_then(|d| d.node)
        .and_then(|n| n.project_items)
        .map(Connection::into_nodes)
        .unwrap_or_default();

    Ok(items
        .into_iter()
        .flatten()
        .find(|item| {
            item.project
                .as_ref()
                .is_some_and(|p| p.id == board.as_str())
        })
        .and_then(|item| BoardItemId::new(item.id)))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddItemData {
    add_project_v2_item_by_id: Option<AddItemPayload>,
}

#[derive(Debug, Deserialize)]
struct AddItemPayload {
    item: Option<ItemRef>,
}

#[derive(Debug, Deserialize)]
struct ItemRef {
    id: Option<String>,
}

/// Extracts the new board-item id. A missing or empty id is `Ok(None)`.
pub(crate) fn decode_added_item(
    response: GraphQlResponse<AddItemData>,
) -> Result<Option<BoardItemId>, RemoteError> {
    if let Some(err) = errors_to_remote(&response.errors) {
        return Err(err);
    }

    Ok(response
        .data
        .and_then(|d| d.add_project_v2_item_by_id)
        .and_then(|p| p.item)
        .and_then(|i| i.id)
        .and_then(BoardItemId::new))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SetFieldData {
    #[allow(dead_code)]
    update_project_v2_item_field_value: Option<serde_json::Value>,
}

pub(crate) fn decode_set_field(response: GraphQlResponse<SetFieldData>) -> Result<(), RemoteError> {
    match errors_to_remote(&response.errors) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
