// src/config.rs
use crate::constants::{DEFAULT_PAGE_SIZE, GITHUB_API_BASE_URL, MAX_PAGE_SIZE, TOKEN_ENV_VAR};
use crate::error::AppError;
use clap::Parser;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Parsed command-line input of the demo.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Base URL of the GitHub REST API
    #[arg(long, default_value = GITHUB_API_BASE_URL)]
    pub base_url: String,

    /// Users fetched per page (1-100)
    #[arg(short = 'n', long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub per_page: u32,

    /// Number of load-more rounds after the first page
    #[arg(short, long, default_value_t = 2)]
    pub pages: u32,

    /// Pull-to-refresh once all pages are loaded
    #[arg(short, long, default_value_t = false)]
    pub refresh: bool,

    /// Attempts per page fetch before giving up (transient errors only)
    #[arg(long, default_value_t = crate::constants::RETRY_MAX_ATTEMPTS)]
    pub retries: u32,

    /// Seconds to wait for each step to settle
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// An API token. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Result<Self, AppError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AppError::InvalidConfiguration(
                "API token cannot be empty".to_string(),
            ));
        }
        if token.chars().any(char::is_whitespace) {
            return Err(AppError::InvalidConfiguration(
                "API token cannot contain whitespace".to_string(),
            ));
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact token in display
        let shown: String = self.0.chars().take(4).collect();
        write!(f, "{}...", shown)
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiToken({})", self)
    }
}

/// Resolved demo configuration, validated and ready to build a list.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub base_url: Url,
    pub token: Option<ApiToken>,
    pub per_page: u32,
    pub pages: u32,
    pub refresh: bool,
    pub retries: u32,
    pub step_timeout: Duration,
    pub verbose: bool,
}

impl DemoConfig {
    /// Resolves the configuration from CLI input and the environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        Self::resolve_with_token(cli, std::env::var(TOKEN_ENV_VAR).ok())
    }

    /// Like [`resolve`](Self::resolve) with the token supplied directly.
    /// An empty token counts as none.
    pub fn resolve_with_token(
        cli: CommandLineInput,
        token: Option<String>,
    ) -> Result<Self, AppError> {
        let base_url = parse_base_url(&cli.base_url)?;

        if !(1..=MAX_PAGE_SIZE).contains(&cli.per_page) {
            return Err(AppError::InvalidConfiguration(format!(
                "per-page must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, cli.per_page
            )));
        }
        if cli.retries == 0 {
            return Err(AppError::InvalidConfiguration(
                "retries must be at least 1".to_string(),
            ));
        }

        let token = token
            .filter(|token| !token.trim().is_empty())
            .map(ApiToken::new)
            .transpose()?;

        Ok(DemoConfig {
            base_url,
            token,
            per_page: cli.per_page,
            pages: cli.pages,
            refresh: cli.refresh,
            retries: cli.retries,
            step_timeout: Duration::from_secs(cli.timeout.max(1)),
            verbose: cli.verbose,
        })
    }
}

/// Parses an http(s) base URL and makes sure relative paths join below it.
fn parse_base_url(input: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(input).map_err(|e| AppError::InvalidUrl {
        url: input.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(AppError::InvalidUrl {
            url: input.to_string(),
            reason: "URL must use http or https".to_string(),
        });
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(GITHUB_API_BASE_URL).expect("Default base URL should be valid"),
            token: None,
            per_page: DEFAULT_PAGE_SIZE,
            pages: 2,
            refresh: false,
            retries: crate::constants::RETRY_MAX_ATTEMPTS,
            step_timeout: Duration::from_secs(30),
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cli(args: &[&str]) -> CommandLineInput {
        let mut argv = vec!["infinite-list"];
        argv.extend_from_slice(args);
        CommandLineInput::parse_from(argv)
    }

    #[test]
    fn test_defaults_resolve() {
        let config = DemoConfig::resolve_with_token(cli(&[]), None).unwrap();
        let default = DemoConfig::default();
        assert_eq!(config.base_url, default.base_url);
        assert_eq!(config.per_page, DEFAULT_PAGE_SIZE);
        assert_eq!(config.pages, 2);
        assert!(!config.refresh);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_flags_are_carried_over() {
        let config = DemoConfig::resolve_with_token(
            cli(&["-n", "5", "--pages", "4", "--refresh", "--timeout", "3"]),
            Some("ghp_token123".to_string()),
        )
        .unwrap();
        assert_eq!(config.per_page, 5);
        assert_eq!(config.pages, 4);
        assert!(config.refresh);
        assert_eq!(config.step_timeout, Duration::from_secs(3));
        assert_eq!(config.token.unwrap().as_str(), "ghp_token123");
    }

    #[test]
    fn test_per_page_bounds() {
        for bad in ["0", "101"] {
            let err = DemoConfig::resolve_with_token(cli(&["--per-page", bad]), None).unwrap_err();
            assert!(matches!(err, AppError::InvalidConfiguration(_)));
        }
        assert!(DemoConfig::resolve_with_token(cli(&["--per-page", "100"]), None).is_ok());
    }

    #[test]
    fn test_base_url_must_be_http() {
        let err = DemoConfig::resolve_with_token(cli(&["--base-url", "ftp://example.com/"]), None)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl { .. }));

        let err = DemoConfig::resolve_with_token(cli(&["--base-url", "not a url"]), None)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl { .. }));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = DemoConfig::resolve_with_token(
            cli(&["--base-url", "https://ghe.example.com/api/v3"]),
            None,
        )
        .unwrap();
        assert_eq!(config.base_url.as_str(), "https://ghe.example.com/api/v3/");
    }

    #[test]
    fn test_empty_token_counts_as_none() {
        let config = DemoConfig::resolve_with_token(cli(&[]), Some("  ".to_string())).unwrap();
        assert!(config.token.is_none());

        let err =
            DemoConfig::resolve_with_token(cli(&[]), Some("two words".to_string())).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_token_is_redacted() {
        let token = ApiToken::new("ghp_supersecretvalue").unwrap();
        assert_eq!(token.to_string(), "ghp_...");
        assert_eq!(format!("{:?}", token), "ApiToken(ghp_...)");
    }
}
