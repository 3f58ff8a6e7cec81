//! projsync GitHub infrastructure adapter.
//!
//! Implements the [`board::ProjectApi`] port against the GitHub GraphQL API
//! (Projects V2) using `reqwest`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules.
//! GraphQL documents, authentication headers, response decoding, and the
//! mapping of HTTP / in-band failures onto [`board::RemoteError`] live here;
//! the [`board`] crate never sees them.
//!
//! ## Limits
//!
//! Each call is a single request: the first 20 fields of a board and the
//! first 100 board memberships of an item are considered. Nothing is retried.

mod client;
mod config;
mod queries;

pub use client::GraphqlProjectApi;
pub use config::{GithubClientError, GithubConfig, DEFAULT_GRAPHQL_URL, DEFAULT_TIMEOUT_SECS};
