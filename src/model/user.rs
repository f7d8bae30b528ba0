// src/model/user.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// An entry of the GitHub users listing. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubUser {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default, rename = "type")]
    pub account_type: Option<String>,
}

impl fmt::Display for GithubUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.login)?;
        if let Some(url) = &self.html_url {
            write!(f, " <{}>", url)?;
        }
        Ok(())
    }
}
