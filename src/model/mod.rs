// src/model/mod.rs
//! Page and item types used by the demo data source.

mod page;
mod user;

pub use page::CursorPage;
pub use user::GithubUser;
