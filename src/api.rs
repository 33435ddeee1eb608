//! # Homebox API Client
//!
//! Thin async wrapper around the Homebox endpoints the label generator
//! needs: authentication, the flat location list, and the item list.
//! Payload structs only name the fields we read; everything else in the
//! API response is ignored.

use std::time::Duration;

use regex::{Regex, RegexBuilder};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::LabelError;
use crate::label::{LabelPattern, Record};

/// Default timeout for Homebox API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Authenticated Homebox API client.
pub struct HomeboxClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: String,
}

/// One entry of `/api/v1/locations`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// One entry of `/api/v1/items`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize)]
struct ItemsPage {
    #[serde(default)]
    items: Vec<ItemSummary>,
}

impl HomeboxClient {
    /// Authenticate and return a ready client.
    pub async fn login(
        base_url: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, LabelError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(LabelError::Api("Homebox base URL is required".to_string()));
        }
        if username.is_empty() || password.is_empty() {
            return Err(LabelError::Api(
                "Homebox username and password are required".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LabelError::Api(format!("HTTP client setup failed: {e}")))?;

        let response = http
            .post(format!("{base_url}/api/v1/users/login"))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
                "stayLoggedIn": true,
            }))
            .send()
            .await
            .map_err(|e| LabelError::Api(format!("login request failed: {e}")))?
            .error_for_status()
            .map_err(|e| LabelError::Api(format!("login rejected: {e}")))?;

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| LabelError::Api(format!("unreadable login response: {e}")))?;
        if token.token.is_empty() {
            return Err(LabelError::Api(
                "login succeeded but did not return a token".to_string(),
            ));
        }

        tracing::info!(base_url, "authenticated against Homebox");

        Ok(Self {
            http,
            base_url,
            token: normalize_token(token.token),
        })
    }

    /// Dashboard base URL, used to build deep links.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Flat list of locations.
    pub async fn list_locations(&self) -> Result<Vec<LocationSummary>, LabelError> {
        self.get_json("/api/v1/locations").await
    }

    /// Flat list of items. Homebox pages this endpoint; `pageSize=-1`
    /// asks for everything at once.
    pub async fn list_items(&self) -> Result<Vec<ItemSummary>, LabelError> {
        let page: ItemsPage = self.get_json("/api/v1/items?pageSize=-1").await?;
        Ok(page.items)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, LabelError> {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .header(AUTHORIZATION, &self.token)
            .send()
            .await
            .map_err(|e| LabelError::Api(format!("request to {path} failed: {e}")))?
            .error_for_status()
            .map_err(|e| LabelError::Api(format!("request to {path} rejected: {e}")))?
            .json()
            .await
            .map_err(|e| LabelError::Api(format!("unreadable response from {path}: {e}")))
    }
}

/// Homebox issues tokens already carrying the scheme; cover both shapes.
fn normalize_token(raw: String) -> String {
    if raw.starts_with("Bearer ") {
        raw
    } else {
        format!("Bearer {raw}")
    }
}

/// Compile the user's case-insensitive name filter.
pub fn compile_name_filter(pattern: &str) -> Result<Regex, LabelError> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

/// Turn location payloads into ordered label records.
///
/// Records are sorted by parsed identifier (tag, then number), untagged
/// records after, ties broken by record id. Deterministic across runs.
pub fn location_records(
    locations: &[LocationSummary],
    base_url: &str,
    name_filter: Option<&Regex>,
    pattern: &LabelPattern,
) -> Vec<Record> {
    let base = base_url.trim_end_matches('/');
    let records = locations
        .iter()
        .filter(|loc| !loc.id.is_empty())
        .filter(|loc| matches_filter(name_filter, &loc.name))
        .map(|loc| {
            Record::new(
                loc.id.clone(),
                loc.name.clone(),
                format!("{base}/location/{}", loc.id),
            )
        })
        .collect();
    sort_records(records, pattern)
}

/// Turn item payloads into ordered label records.
pub fn item_records(
    items: &[ItemSummary],
    base_url: &str,
    name_filter: Option<&Regex>,
    pattern: &LabelPattern,
) -> Vec<Record> {
    let base = base_url.trim_end_matches('/');
    let records = items
        .iter()
        .filter(|item| !item.id.is_empty())
        .filter(|item| matches_filter(name_filter, &item.name))
        .map(|item| {
            Record::new(
                item.id.clone(),
                item.name.clone(),
                format!("{base}/item/{}", item.id),
            )
        })
        .collect();
    sort_records(records, pattern)
}

/// Keep only the records whose ids appear in `ids`, preserving the
/// caller's selection order (web UI checkboxes).
pub fn select_records(records: &[Record], ids: &[String]) -> Vec<Record> {
    ids.iter()
        .filter_map(|id| records.iter().find(|record| &record.id == id))
        .cloned()
        .collect()
}

fn matches_filter(filter: Option<&Regex>, name: &str) -> bool {
    filter.map(|re| re.is_match(name.trim())).unwrap_or(true)
}

fn sort_records(records: Vec<Record>, pattern: &LabelPattern) -> Vec<Record> {
    let mut parsed = pattern.parse_all(&records);
    parsed.sort_by(|a, b| a.sort_key_cmp(b));
    parsed.into_iter().map(|label| label.record).collect()
}
