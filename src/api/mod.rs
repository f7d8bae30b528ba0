// src/api/mod.rs
//! GitHub API interaction for the demo list.
//!
//! The HTTP plumbing (headers, status handling, body decoding) lives in
//! [`client`]; [`github`] turns the users listing into a
//! [`PageSource`](crate::PageSource) paged by the `since` cursor.

pub mod client;
pub mod github;

pub use client::{ApiResponse, GithubHttpClient};
pub use github::{page_from_users, GithubUsers, UserPage};
