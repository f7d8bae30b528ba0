// src/lib.rs
//! infinite-list — a headless controller for paginated, infinitely scrolling lists.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **List controller** — `InfiniteList`, `ListConfig`, the status flags and transitions
//! - **Error handling** — `AppError`, `FetchError`
//! - **Capabilities** — `PageSource`, `FnSource`
//! - **Extraction** — `ItemPage`, `flatten`, `unique_sorted_by`, `unique_by`
//! - **Demo source** — `GithubUsers`, `GithubHttpClient`, `CursorPage`, `GithubUser`
//! - **Configuration** — `DemoConfig`, `CommandLineInput`, `RetryPolicy`

mod algebras;
mod api;
mod config;
mod constants;
mod error;
mod error_recovery;
mod extract;
mod list;
mod model;

// --- Error Handling ---
pub use crate::error::{AppError, Result};

// --- Algebras (Capability Traits) ---
pub use crate::algebras::{FetchError, FnSource, PageSource};

// --- List Controller ---
pub use crate::list::{
    refresh_ended, should_prefetch, Change, DriverKind, Extractor, FetchDriver, FetchOutcome,
    FlagChange, InfiniteList, ItemDecorator, ListConfig, OutcomeKind, PageStore, Phase,
    Presentation, Signals, StatusAggregator, StatusFlag, StatusFlags, StatusSignal, Ticket,
    Transition, Trigger,
};

// --- Extraction ---
pub use crate::extract::{flatten, unique_by, unique_sorted_by, ItemPage};

// --- Domain Model ---
pub use crate::model::{CursorPage, GithubUser};

// --- API Client ---
pub use crate::api::{page_from_users, ApiResponse, GithubHttpClient, GithubUsers, UserPage};

// --- Configuration ---
pub use crate::config::{ApiToken, CommandLineInput, DemoConfig};
pub use crate::constants::{DEFAULT_PAGE_SIZE, PREFETCH_DISTANCE, TRANSITION_CAPACITY};
pub use crate::error_recovery::{retry_with_backoff, RetryPolicy};
