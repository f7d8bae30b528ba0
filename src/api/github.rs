// src/api/github.rs
//! The GitHub users listing as a page source.
//!
//! `GET users?per_page=N` returns users ordered by id; the next page is
//! `GET users?since=<largest id seen>&per_page=N`. An empty answer means
//! the listing is exhausted.

use async_trait::async_trait;

use super::client::GithubHttpClient;
use crate::algebras::{FetchError, PageSource};
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::model::{CursorPage, GithubUser};

const USERS_PATH: &str = "users";

/// A page of users whose cursor is the largest user id on it.
pub type UserPage = CursorPage<GithubUser>;

/// Builds the page for one response, `None` when the response was empty.
pub fn page_from_users(users: Vec<GithubUser>) -> Option<UserPage> {
    CursorPage::from_items(users, |user| user.id)
}

#[derive(Clone)]
pub struct GithubUsers {
    client: GithubHttpClient,
    per_page: u32,
    retry: RetryPolicy,
}

impl GithubUsers {
    pub fn new(client: GithubHttpClient, per_page: u32) -> Self {
        Self {
            client,
            per_page,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    async fn fetch(&self, since: Option<u64>) -> Result<Option<UserPage>, FetchError> {
        let query = users_query(since, self.per_page);
        let client = &self.client;
        let query = query.as_slice();

        let users: Vec<GithubUser> = retry_with_backoff(
            || async move {
                client
                    .get_json(USERS_PATH, query)
                    .await
                    .map_err(FetchError::from)
            },
            self.retry,
        )
        .await?;

        log::debug!(
            "Fetched {} user(s) after {}",
            users.len(),
            since.map_or_else(|| "the start".to_string(), |id| format!("#{}", id))
        );
        Ok(page_from_users(users))
    }
}

fn users_query(since: Option<u64>, per_page: u32) -> Vec<(&'static str, String)> {
    let mut query = Vec::with_capacity(2);
    if let Some(since) = since {
        query.push(("since", since.to_string()));
    }
    query.push(("per_page", per_page.to_string()));
    query
}

#[async_trait]
impl PageSource for GithubUsers {
    type Page = UserPage;

    async fn first_page(&self) -> Result<UserPage, FetchError> {
        // An empty listing is still a valid first page.
        Ok(self
            .fetch(None)
            .await?
            .unwrap_or_else(|| CursorPage::new(Vec::new(), 0)))
    }

    async fn page_after(&self, last: &UserPage) -> Result<Option<UserPage>, FetchError> {
        self.fetch(Some(last.cursor)).await
    }
}
