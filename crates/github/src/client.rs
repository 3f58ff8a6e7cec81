//! `ProjectApi` over the GitHub GraphQL endpoint.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use board::{
    BoardDescriptor, BoardId, BoardItemId, BoardSchema, ContentId, FieldId, OptionId, ProjectApi,
    RemoteError,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::config::{GithubClientError, GithubConfig};
use crate::queries::{
    board_query, decode_added_item, decode_board, decode_membership, decode_set_field,
    AddItemData, BoardData, GraphQlResponse, MembershipData, SetFieldData, ADD_ITEM_MUTATION,
    MEMBERSHIP_QUERY, SET_SINGLE_SELECT_MUTATION,
};

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// GitHub Projects V2 client.
///
/// One HTTP POST per [`ProjectApi`] call; no retries. Failures are classified
/// into [`RemoteError`] so callers can consult
/// [`RemoteError::retry_policy`].
pub struct GraphqlProjectApi {
    client: Client,
    endpoint: String,
}

impl GraphqlProjectApi {
    /// Builds a client with the token installed as a default header.
    pub fn new(config: GithubConfig) -> Result<Self, GithubClientError> {
        if config.token.trim().is_empty() {
            return Err(GithubClientError::NotConfigured(
                "GitHub token is required".to_string(),
            ));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token.trim()))
            .map_err(|_| {
                GithubClientError::NotConfigured(
                    "GitHub token contains characters not allowed in a header".to_string(),
                )
            })?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs()))
            .user_agent(config.user_agent())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.graphql_url().to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<GraphQlResponse<T>, RemoteError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &headers, body, SystemTime::now()));
        }

        response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(format!("failed to parse GraphQL response: {e}")))
    }
}

#[async_trait]
impl ProjectApi for GraphqlProjectApi {
    #[instrument(skip(self, board), fields(board = %board))]
    async fn fetch_board_schema(
        &self,
        board: &BoardDescriptor,
    ) -> Result<Option<BoardSchema>, RemoteError> {
        let response = self
            .execute::<BoardData>(
                board_query(board.owner_kind),
                json!({ "owner": board.owner, "number": board.number.as_u64() }),
            )
            .await?;
        let schema = decode_board(response, board.owner_kind)?;
        debug!(found = schema.is_some(), "board schema fetched");
        Ok(schema)
    }

    #[instrument(skip(self))]
    async fn lookup_membership(
        &self,
        item: &ContentId,
        board: &BoardId,
    ) -> Result<Option<BoardItemId>, RemoteError> {
        let response = self
            .execute::<MembershipData>(MEMBERSHIP_QUERY, json!({ "itemId": item.as_str() }))
            .await?;
        decode_membership(response, board)
    }

    #[instrument(skip(self))]
    async fn add_to_board(
        &self,
        item: &ContentId,
        board: &BoardId,
    ) -> Result<Option<BoardItemId>, RemoteError> {
        let response = self
            .execute::<AddItemData>(
                ADD_ITEM_MUTATION,
                json!({ "projectId": board.as_str(), "contentId": item.as_str() }),
            )
            .await?;
        decode_added_item(response)
    }

    #[instrument(skip(self))]
    async fn set_field_value(
        &self,
        board: &BoardId,
        board_item: &BoardItemId,
        field: &FieldId,
        option: &OptionId,
    ) -> Result<(), RemoteError> {
        let response = self
            .execute::<SetFieldData>(
                SET_SINGLE_SELECT_MUTATION,
                json!({
                    "projectId": board.as_str(),
                    "itemId": board_item.as_str(),
                    "fieldId": field.as_str(),
                    "optionId": option.as_str(),
                }),
            )
            .await?;
        decode_set_field(response)
    }
}

/// Maps a non-success HTTP response onto a [`RemoteError`].
///
/// GitHub signals primary rate limits with 403 and an exhausted
/// `x-ratelimit-remaining`, secondary ones with 403/429 and `retry-after`.
fn classify_failure(
    status: StatusCode,
    headers: &HeaderMap,
    body: String,
    now: SystemTime,
) -> RemoteError {
    if status == StatusCode::UNAUTHORIZED {
        return RemoteError::Unauthorized;
    }

    let exhausted = header_u64(headers, RATE_LIMIT_REMAINING) == Some(0);
    let retry_after = header_u64(headers, RETRY_AFTER.as_str()).map(Duration::from_secs);
    let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && (exhausted || retry_after.is_some()));

    if rate_limited {
        let retry_after = retry_after.or_else(|| {
            let reset = header_u64(headers, RATE_LIMIT_RESET)?;
            let now = now.duration_since(UNIX_EPOCH).ok()?.as_secs();
            Some(Duration::from_secs(reset.saturating_sub(now)))
        });
        return RemoteError::RateLimited { retry_after };
    }

    RemoteError::Api {
        status: status.as_u16(),
        message: body,
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
