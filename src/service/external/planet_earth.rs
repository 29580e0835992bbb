//! Client for the Planet Earth game API.
//!
//! Two endpoints are used:
//! - `GET /discord?discord={id}` resolves the account linked to a Discord user
//! - `GET /resident?uuid={uuid}` returns the resident's nation and town

use chrono::{DateTime, TimeZone, Utc};
use reqwest::{header::RETRY_AFTER, StatusCode};
use serde::Deserialize;
use serenity::async_trait;
use std::time::Duration;
use url::Url;

use crate::{
    error::external::ExternalError,
    model::{affiliation::Affiliation, member::LinkedIdentity},
    service::external::AffiliationClient,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the HTTP client used for game API requests.
///
/// Redirects are disabled and every request times out after 10 seconds.
pub fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(REQUEST_TIMEOUT)
        .build()
}

/// `AffiliationClient` backed by the Planet Earth HTTP API.
#[derive(Clone)]
pub struct PlanetEarthClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PlanetEarthClient {
    pub fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    fn endpoint(&self, path: &str, key: &str, value: &str) -> Result<Url, ExternalError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ExternalError::Malformed(e.to_string()))?;
        url.query_pairs_mut().append_pair(key, value);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<String, ExternalError> {
        let response = self.http.get(url).send().await.map_err(transport_error)?;

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        if let Some(err) = classify_status(response.status(), retry_after) {
            return Err(err);
        }

        response.text().await.map_err(transport_error)
    }
}

#[async_trait]
impl AffiliationClient for PlanetEarthClient {
    async fn resolve_identity(&self, member_id: u64) -> Result<Option<LinkedIdentity>, ExternalError> {
        let url = self.endpoint("discord", "discord", &member_id.to_string())?;
        match self.get(url).await {
            Ok(body) => parse_identity(&body),
            Err(ExternalError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn lookup_affiliation(&self, identity: &LinkedIdentity) -> Result<Affiliation, ExternalError> {
        let url = self.endpoint("resident", "uuid", &identity.uuid)?;
        let body = self.get(url).await?;
        parse_resident(&body)
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Deserialize)]
struct DiscordLinkRecord {
    uuid: String,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResidentRecord {
    nation: Option<String>,
    #[serde(alias = "nationUUID")]
    nation_uuid: Option<String>,
    town: Option<String>,
    #[serde(alias = "townUUID")]
    town_uuid: Option<String>,
    nation_ranks: Option<Vec<String>>,
    town_ranks: Option<Vec<String>>,
    /// Epoch milliseconds.
    last_online: Option<i64>,
}

/// Maps an HTTP status to the matching error, or `None` for success.
fn classify_status(status: StatusCode, retry_after: Option<Duration>) -> Option<ExternalError> {
    if status.is_success() {
        return None;
    }

    Some(match status {
        StatusCode::NOT_FOUND => ExternalError::NotFound,
        StatusCode::TOO_MANY_REQUESTS => ExternalError::RateLimited { retry_after },
        StatusCode::REQUEST_TIMEOUT => ExternalError::Unreachable(status.to_string()),
        s if s.is_server_error() => ExternalError::Unreachable(s.to_string()),
        s => ExternalError::Rejected { status: s.as_u16() },
    })
}

fn transport_error(err: reqwest::Error) -> ExternalError {
    if err.is_decode() {
        ExternalError::Malformed(err.to_string())
    } else {
        ExternalError::Unreachable(err.to_string())
    }
}

/// Parses a `Retry-After` header given in seconds.
///
/// Values that do not fit a `Duration` are treated as absent.
fn parse_retry_after(value: &str) -> Option<Duration> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

fn parse_identity(body: &str) -> Result<Option<LinkedIdentity>, ExternalError> {
    let envelope: Envelope<DiscordLinkRecord> =
        serde_json::from_str(body).map_err(|e| ExternalError::Malformed(e.to_string()))?;

    Ok(envelope
        .data
        .into_iter()
        .find(|record| !record.uuid.trim().is_empty())
        .map(|record| LinkedIdentity {
            uuid: record.uuid,
            name: record.name,
        }))
}

fn parse_resident(body: &str) -> Result<Affiliation, ExternalError> {
    let envelope: Envelope<ResidentRecord> =
        serde_json::from_str(body).map_err(|e| ExternalError::Malformed(e.to_string()))?;

    let record = envelope
        .data
        .into_iter()
        .next()
        .ok_or(ExternalError::NotFound)?;

    Ok(Affiliation {
        nation: non_empty(record.nation),
        nation_id: non_empty(record.nation_uuid),
        town: non_empty(record.town),
        town_id: non_empty(record.town_uuid),
        nation_ranks: record.nation_ranks.unwrap_or_default(),
        town_ranks: record.town_ranks.unwrap_or_default(),
        last_online: record.last_online.and_then(millis_to_datetime),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}
