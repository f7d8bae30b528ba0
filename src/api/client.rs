// src/api/client.rs
//! Thin HTTP client wrapper for the GitHub REST API.
//!
//! Handles authentication headers, URL building and turning a response
//! into either a decoded body or an [`AppError`]. It knows nothing about
//! pagination.

use crate::config::ApiToken;
use crate::constants::{ERROR_BODY_PREVIEW_LENGTH, GITHUB_ACCEPT, REQUEST_TIMEOUT, USER_AGENT};
use crate::error::AppError;
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

/// A thin wrapper around a reqwest `Client` bound to one API base URL.
#[derive(Clone)]
pub struct GithubHttpClient {
    client: Client,
    base_url: Url,
}

impl GithubHttpClient {
    /// Creates a client. Requests are anonymous unless a token is given.
    pub fn new(base_url: Url, token: Option<&ApiToken>) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(token)?)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, base_url })
    }

    fn create_headers(token: Option<&ApiToken>) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(GITHUB_ACCEPT));

        if let Some(token) = token {
            let auth_header = format!("Bearer {}", token.as_str());
            let mut value = header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::InvalidConfiguration(format!("Invalid API token format: {}", e))
            })?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        Ok(headers)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` against the base URL and appends the query pairs.
    pub fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, AppError> {
        let mut url = self.base_url.join(path).map_err(|e| AppError::InvalidUrl {
            url: format!("{}{}", self.base_url, path),
            reason: e.to_string(),
        })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Makes a GET request to `url`.
    pub async fn get(&self, url: Url) -> Result<Response, AppError> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        log::trace!("GET {} -> {}", response.url(), response.status());
        Ok(response)
    }

    /// GETs `path` with `query` and decodes a successful JSON body.
    pub async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path, query)?;
        let response = self.get(url).await?;
        let result = extract_response_text(response).await?;
        parse_api_response(result)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: StatusCode,
    pub url: String,
}

/// Reads the response body as text, keeping status and URL alongside it.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}

/// The error document GitHub sends with non-success statuses.
#[derive(Debug, Deserialize)]
struct GithubErrorBody {
    message: String,
}

/// Decodes a successful body or classifies a failed one.
///
/// GitHub reports an exhausted rate limit as `403` with a message saying
/// so; that case is reported as `429` so it is retried like one.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    if result.status.is_success() {
        return serde_json::from_str(&result.data).map_err(|e| {
            log::error!("Failed to parse response from {}: {}", result.url, e);
            AppError::MalformedResponse(format!("{} (body: {})", e, preview(&result.data)))
        });
    }

    let message = serde_json::from_str::<GithubErrorBody>(&result.data)
        .map(|body| body.message)
        .unwrap_or_else(|_| preview(&result.data));

    let status = if result.status == StatusCode::FORBIDDEN
        && message.to_lowercase().contains("rate limit")
    {
        StatusCode::TOO_MANY_REQUESTS
    } else {
        result.status
    };

    Err(AppError::ApiStatus {
        status,
        message: format!("{} ({})", message, result.url),
    })
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let head: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}
