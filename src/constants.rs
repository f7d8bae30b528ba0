// src/constants.rs
//! Domain constants that define the operational boundaries of the list controller.
//!
//! Each constant is named for the behaviour it constrains. Reading them
//! should tell you how eagerly the list prefetches, how much history the
//! transition stream buffers, and how patiently the demo source retries.

use std::time::Duration;

// ---------------------------------------------------------------------------
// List controller
// ---------------------------------------------------------------------------

/// How close to the end of the item collection a displayed row must be
/// before a load-more is triggered.
///
/// A row at `index` triggers when `index + PREFETCH_DISTANCE >= item_count`,
/// so the next page starts loading while the last two rows are on screen.
pub const PREFETCH_DISTANCE: usize = 2;

/// Number of transitions the broadcast channel buffers per subscriber.
///
/// A subscriber that falls further behind than this observes a lag error
/// and skips ahead; the watch channels still carry the current values.
pub const TRANSITION_CAPACITY: usize = 256;

/// Triggers the controller handles back to back before it settles the
/// fetches that finished meanwhile.
pub const TRIGGER_BURST_LIMIT: usize = 32;

// ---------------------------------------------------------------------------
// Demo page source (GitHub users listing)
// ---------------------------------------------------------------------------

/// Base URL of the REST API the demo source talks to.
pub const GITHUB_API_BASE_URL: &str = "https://api.github.com/";

/// Users requested per page. GitHub caps `per_page` at 100.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Upper bound accepted for `per_page`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Media type requested from the API.
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Value sent as `User-Agent`; the API rejects anonymous agents.
pub const USER_AGENT: &str = concat!("infinite-list/", env!("CARGO_PKG_VERSION"));

/// Upper bound for one HTTP request, connection and body included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding an optional API token.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

/// Attempts made for a single page fetch before the failure is surfaced.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubles after each failed attempt.
pub const RETRY_INITIAL_DELAY: Duration = Duration::from_millis(250);

/// Ceiling for the exponential backoff delay.
pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(4);

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
