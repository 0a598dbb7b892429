#![allow(missing_docs)]

use crate::config::MoralisConfig;
use crate::error::{MoralisError, Result};
use crate::params::OhlcvQuery;
use crate::types::{
    OhlcvResponse, PairStats, Payload, TokenMetadata, TokenPairStats, TokenPairsResponse, TokenPrice,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

// Sent on the wire as `X-API-Key`; header names are case-insensitive.
const API_KEY_HEADER: &str = "x-api-key";
const NETWORK: &str = "mainnet";

/// Client for the Moralis Solana gateway.
///
/// Every call is a single GET with no retry. The request timeout comes from
/// [`MoralisConfig::timeout_secs`].
#[derive(Debug, Clone)]
pub struct MoralisClient {
    config: MoralisConfig,
    http: Client,
}

impl MoralisClient {
    pub fn new(config: MoralisConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| MoralisError::config("MORALIS_API_KEY contains invalid characters"))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MoralisError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Payload<T>> {
        let url = format!("{}{}", self.config.base_url(), endpoint);
        debug!(endpoint, "Moralis request");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MoralisError::Timeout(endpoint.to_string())
                } else {
                    MoralisError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(MoralisError::api(
                upstream_message(&error_body, status.canonical_reason()),
                status.as_u16(),
                endpoint,
            ));
        }

        let text = response.text().await?;
        debug!(endpoint, status = status.as_u16(), bytes = text.len(), "Moralis response");
        let raw: serde_json::Value = serde_json::from_str(&text)?;
        Ok(Payload::from_value(raw)?)
    }

    pub async fn get_token_price(&self, token_address: &str) -> Result<Payload<TokenPrice>> {
        let endpoint = format!(
            "/token/{}/{}/price",
            NETWORK,
            urlencoding::encode(token_address)
        );
        self.get(&endpoint, &[]).await
    }

    pub async fn get_token_metadata(&self, token_address: &str) -> Result<Payload<TokenMetadata>> {
        let endpoint = format!(
            "/token/{}/{}/metadata",
            NETWORK,
            urlencoding::encode(token_address)
        );
        self.get(&endpoint, &[]).await
    }

    pub async fn get_pair_stats(&self, pair_address: &str) -> Result<Payload<PairStats>> {
        let endpoint = format!(
            "/token/{}/pairs/{}/stats",
            NETWORK,
            urlencoding::encode(pair_address)
        );
        self.get(&endpoint, &[]).await
    }

    pub async fn get_pair_ohlcv(&self, query: &OhlcvQuery) -> Result<Payload<OhlcvResponse>> {
        let endpoint = format!(
            "/token/{}/pairs/{}/ohlcv",
            NETWORK,
            urlencoding::encode(&query.pair_address)
        );
        let params = [
            ("timeframe", query.timeframe.clone()),
            ("currency", query.currency.clone()),
            ("fromDate", query.from_date.clone()),
            ("toDate", query.to_date.clone()),
            ("limit", query.limit.to_string()),
        ];
        self.get(&endpoint, &params).await
    }

    pub async fn get_token_pairs(&self, token_address: &str, limit: u32) -> Result<Payload<TokenPairsResponse>> {
        let endpoint = format!(
            "/token/{}/{}/pairs",
            NETWORK,
            urlencoding::encode(token_address)
        );
        self.get(&endpoint, &[("limit", limit.to_string())]).await
    }

    pub async fn get_token_pair_stats(&self, token_address: &str) -> Result<Payload<TokenPairStats>> {
        let endpoint = format!(
            "/token/{}/{}/pairs/stats",
            NETWORK,
            urlencoding::encode(token_address)
        );
        self.get(&endpoint, &[]).await
    }

    pub fn config(&self) -> &MoralisConfig {
        &self.config
    }
}

/// Moralis error bodies look like `{"message": "..."}`; fall back to the raw
/// body, then the status reason.
fn upstream_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    let body = body.trim();
    if body.is_empty() {
        reason.unwrap_or("request failed").to_string()
    } else {
        body.to_string()
    }
}
