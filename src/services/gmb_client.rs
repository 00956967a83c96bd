// src/services/gmb_client.rs
// DOCUMENTATION: Google My Business API client
// PURPOSE: OAuth code exchange and account/location retrieval for claim verification

use crate::config::Config;
use crate::errors::DirectoryError;
use crate::models::{GmbAccount, GmbLocation};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::Duration;

/// Locations requested per page
const PAGE_SIZE: u32 = 100;

/// Hard stop for runaway pagination
const MAX_PAGES: usize = 50;

/// Google My Business API client
/// DOCUMENTATION: One instance per process; outbound calls share its rate limiter
pub struct GmbClient {
    client: Client,
    base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    oauth_configured: bool,
    limiter: DefaultDirectRateLimiter,
}

/// Token response from the OAuth endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OAuthToken {
    pub access_token: String,
    pub expires_in: Option<u64>,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountsResponse {
    #[serde(default)]
    accounts: Vec<GmbAccount>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationsResponse {
    #[serde(default)]
    locations: Vec<GmbLocation>,
    next_page_token: Option<String>,
}

/// Google API error envelope: {"error": {"code", "message", "status"}}
#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Map a non-success HTTP response to an application error
/// DOCUMENTATION: 401 means the owner's token is bad or expired, 429 means
/// the GMB quota is exhausted, anything else is an upstream failure
fn map_error_status(status: StatusCode, body: &str) -> DirectoryError {
    let detail = serde_json::from_str::<GoogleErrorEnvelope>(body)
        .ok()
        .and_then(|e| match (e.error.status, e.error.message) {
            (Some(s), Some(m)) => Some(format!("{}: {}", s, m)),
            (None, Some(m)) => Some(m),
            (Some(s), None) => Some(s),
            (None, None) => None,
        })
        .unwrap_or_else(|| body.chars().take(200).collect());

    match status {
        StatusCode::UNAUTHORIZED => {
            log::warn!("GMB API rejected credentials: {}", detail);
            DirectoryError::Unauthorized
        }
        StatusCode::TOO_MANY_REQUESTS => {
            log::error!("GMB API quota exceeded");
            DirectoryError::RateLimitExceeded
        }
        other => {
            log::error!("GMB API error {}: {}", other, detail);
            DirectoryError::ExternalApiError(format!("GMB API error {}: {}", other, detail))
        }
    }
}

/// Report a listing cut short by the page cap
/// DOCUMENTATION: Returns true when a page token was still outstanding
fn warn_if_truncated(page_token: Option<&str>, what: &str, collected: usize) -> bool {
    if page_token.is_none() {
        return false;
    }
    log::warn!(
        "GMB {} listing stopped after {} pages with more results pending; using {} collected",
        what,
        MAX_PAGES,
        collected
    );
    true
}

impl GmbClient {
    /// Build the client from configuration
    pub fn from_config(config: &Config) -> Result<Self, DirectoryError> {
        let per_minute = NonZeroU32::new(config.gmb_requests_per_minute).ok_or_else(|| {
            DirectoryError::InvalidInput("GMB_REQUESTS_PER_MINUTE must be non-zero".to_string())
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .map_err(|e| DirectoryError::ExternalApiError(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.gmb_api_base_url.trim_end_matches('/').to_string(),
            token_url: config.gmb_oauth_token_url.clone(),
            client_id: config.gmb_client_id.clone(),
            client_secret: config.gmb_client_secret.clone(),
            oauth_configured: config.has_oauth_credentials(),
            limiter: RateLimiter::direct(Quota::per_minute(per_minute)),
        })
    }

    /// Take one slot from the outbound request budget
    fn acquire(&self) -> Result<(), DirectoryError> {
        self.limiter.check().map_err(|_| {
            log::warn!("Outbound GMB request budget exhausted");
            DirectoryError::RateLimitExceeded
        })
    }

    async fn check_response(response: Response) -> Result<Response, DirectoryError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(map_error_status(status, &body))
    }

    /// Exchange an OAuth authorization code for an access token
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<OAuthToken, DirectoryError> {
        if !self.oauth_configured {
            return Err(DirectoryError::InvalidInput(
                "GMB OAuth credentials not configured".to_string(),
            ));
        }

        self.acquire()?;

        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        log::debug!("Exchanging GMB authorization code");

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                log::error!("GMB token request failed: {}", e);
                DirectoryError::ExternalApiError(format!("Token request failed: {}", e))
            })?;

        let response = Self::check_response(response).await?;

        response.json::<OAuthToken>().await.map_err(|e| {
            log::error!("Failed to parse GMB token response: {}", e);
            DirectoryError::ExternalApiError(format!("Parse error: {}", e))
        })
    }

    /// List all GMB accounts visible to the access token
    pub async fn list_accounts(&self, access_token: &str) -> Result<Vec<GmbAccount>, DirectoryError> {
        let url = format!("{}/accounts", self.base_url);
        let mut accounts = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            self.acquire()?;

            let mut request = self.client.get(&url).bearer_auth(access_token);
            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await.map_err(|e| {
                log::error!("GMB accounts request failed: {}", e);
                DirectoryError::ExternalApiError(format!("Request failed: {}", e))
            })?;

            let page: AccountsResponse = Self::check_response(response)
                .await?
                .json()
                .await
                .map_err(|e| DirectoryError::ExternalApiError(format!("Parse error: {}", e)))?;

            accounts.extend(page.accounts);

            page_token = page.next_page_token.filter(|t| !t.is_empty());
            if page_token.is_none() {
                break;
            }
        }

        warn_if_truncated(page_token.as_deref(), "accounts", accounts.len());

        log::info!("GMB returned {} accounts", accounts.len());
        Ok(accounts)
    }

    /// List every location under one account, following pagination
    pub async fn list_locations(
        &self,
        access_token: &str,
        account_name: &str,
    ) -> Result<Vec<GmbLocation>, DirectoryError> {
        let url = format!("{}/{}/locations", self.base_url, account_name.trim_matches('/'));
        let page_size = PAGE_SIZE.to_string();
        let mut locations = Vec::new();
        let mut page_token: Option<String> = None;

        for page_idx in 0..MAX_PAGES {
            self.acquire()?;

            let mut query = vec![("pageSize", page_size.as_str())];
            if let Some(ref token) = page_token {
                query.push(("pageToken", token.as_str()));
            }

            log::debug!("GMB locations lookup: account={}, page={}", account_name, page_idx + 1);

            let response = self
                .client
                .get(&url)
                .bearer_auth(access_token)
                .query(&query)
                .send()
                .await
                .map_err(|e| {
                    log::error!("GMB locations request failed: {}", e);
                    DirectoryError::ExternalApiError(format!("Request failed: {}", e))
                })?;

            let page: LocationsResponse = Self::check_response(response)
                .await?
                .json()
                .await
                .map_err(|e| DirectoryError::ExternalApiError(format!("Parse error: {}", e)))?;

            locations.extend(page.locations);

            page_token = page.next_page_token.filter(|t| !t.is_empty());
            if page_token.is_none() {
                break;
            }
        }

        warn_if_truncated(page_token.as_deref(), "locations", locations.len());

        log::info!(
            "GMB account {} has {} locations",
            account_name,
            locations.len()
        );
        Ok(locations)
    }
}
