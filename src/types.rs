#![allow(missing_docs)]
//! Moralis Solana gateway payloads and plugin-level value types.
//!
//! Moralis returns many numeric fields as strings (`"1.0023"`) and others as
//! JSON numbers, sometimes for the same field across endpoints, so numeric
//! fields go through the lenient deserialisers below.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::ops::Deref;

fn de_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn de_opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    })
}

fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Static description of one plugin action.
#[derive(Debug, Clone, Copy)]
pub struct ActionDefinition {
    pub name: &'static str,
    pub similes: &'static [&'static str],
    pub description: &'static str,
    /// Handlebars template used for parameter extraction.
    pub template: &'static str,
    /// Fields that must be present in the extracted parameters.
    pub required_fields: &'static [&'static str],
    /// What the user is told when a required field is missing or malformed.
    pub missing_hint: &'static str,
    /// Short noun phrase for error messages ("token price").
    pub subject: &'static str,
    pub examples: &'static [ActionExample],
}

impl ActionDefinition {
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.similes.iter().any(|s| s.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ActionExample {
    pub user: &'static str,
    pub agent: &'static str,
}

/// Text for the chat plus the structured data behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedResult {
    pub text: String,
    pub content: Value,
}

/// A decoded API body kept next to its typed view.
///
/// The typed record drives the chat text; serialising a `Payload` writes the
/// body exactly as the API sent it, so numeric strings and fields the record
/// does not declare reach the structured content untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload<T> {
    raw: Value,
    data: T,
}

impl<T: DeserializeOwned> Payload<T> {
    pub fn from_value(raw: Value) -> serde_json::Result<Self> {
        let data = T::deserialize(&raw)?;
        Ok(Self { raw, data })
    }
}

impl<T> Payload<T> {
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

#[cfg(test)]
impl<T: Serialize> Payload<T> {
    pub(crate) fn from_data(data: T) -> Self {
        let raw = serde_json::to_value(&data).unwrap();
        Self { raw, data }
    }
}

impl<T> Deref for Payload<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

impl<T> Serialize for Payload<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativePrice {
    #[serde(default, deserialize_with = "de_opt_string")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub decimals: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPrice {
    #[serde(default)]
    pub token_address: Option<String>,
    #[serde(default)]
    pub pair_address: Option<String>,
    #[serde(default)]
    pub exchange_name: Option<String>,
    #[serde(default)]
    pub exchange_address: Option<String>,
    #[serde(default)]
    pub native_price: Option<NativePrice>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub usd_price: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub usd_price_24hr_percent_change: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metaplex {
    #[serde(default)]
    pub metadata_uri: Option<String>,
    #[serde(default)]
    pub master_edition: Option<bool>,
    #[serde(default)]
    pub is_mutable: Option<bool>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub seller_fee_basis_points: Option<u64>,
    #[serde(default)]
    pub update_authority: Option<String>,
    #[serde(default)]
    pub primary_sale_happened: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    #[serde(default)]
    pub mint: Option<String>,
    #[serde(default)]
    pub standard: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub decimals: Option<u64>,
    #[serde(default)]
    pub metaplex: Option<Metaplex>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub fully_diluted_value: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub total_supply: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub total_supply_formatted: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub links: Option<HashMap<String, Value>>,
}

impl TokenMetadata {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.symbol.is_none() && self.mint.is_none()
    }
}

/// Values keyed by Moralis' rolling windows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeWindows {
    #[serde(rename = "5min", default, deserialize_with = "de_opt_f64")]
    pub five_min: Option<f64>,
    #[serde(rename = "1h", default, deserialize_with = "de_opt_f64")]
    pub one_hour: Option<f64>,
    #[serde(rename = "4h", default, deserialize_with = "de_opt_f64")]
    pub four_hours: Option<f64>,
    #[serde(rename = "24h", default, deserialize_with = "de_opt_f64")]
    pub one_day: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairStats {
    #[serde(default)]
    pub token_address: Option<String>,
    #[serde(default)]
    pub token_name: Option<String>,
    #[serde(default)]
    pub token_symbol: Option<String>,
    #[serde(default)]
    pub pair_created: Option<String>,
    #[serde(default)]
    pub pair_label: Option<String>,
    #[serde(default)]
    pub pair_address: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub exchange_address: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub current_usd_price: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub current_native_price: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub total_liquidity_usd: Option<f64>,
    #[serde(default)]
    pub price_percent_change: TimeWindows,
    #[serde(default)]
    pub liquidity_percent_change: TimeWindows,
    #[serde(default)]
    pub buys: TimeWindows,
    #[serde(default)]
    pub sells: TimeWindows,
    #[serde(default)]
    pub total_volume: TimeWindows,
    #[serde(default)]
    pub buy_volume: TimeWindows,
    #[serde(default)]
    pub sell_volume: TimeWindows,
    #[serde(default)]
    pub buyers: TimeWindows,
    #[serde(default)]
    pub sellers: TimeWindows,
}

impl PairStats {
    pub fn is_empty(&self) -> bool {
        self.current_usd_price.is_none()
            && self.total_liquidity_usd.is_none()
            && self.pair_label.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    pub timestamp: String,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub close: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub volume: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub trades: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OhlcvResponse {
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub page: Option<u64>,
    #[serde(default)]
    pub pair_address: Option<String>,
    #[serde(default)]
    pub token_address: Option<String>,
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub result: Vec<Candle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairToken {
    #[serde(default)]
    pub token_address: Option<String>,
    #[serde(default)]
    pub token_name: Option<String>,
    #[serde(default)]
    pub token_symbol: Option<String>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub token_decimals: Option<u64>,
    #[serde(default)]
    pub pair_token_type: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub liquidity_usd: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    #[serde(default)]
    pub exchange_address: Option<String>,
    #[serde(default)]
    pub exchange_name: Option<String>,
    #[serde(default)]
    pub pair_address: Option<String>,
    #[serde(default)]
    pub pair_label: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub usd_price: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub usd_price_24hr_percent_change: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub volume_24hr_usd: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub liquidity_usd: Option<f64>,
    #[serde(default)]
    pub inactive_pair: Option<bool>,
    #[serde(default)]
    pub base_token: Option<String>,
    #[serde(default)]
    pub quote_token: Option<String>,
    #[serde(default)]
    pub pair: Vec<PairToken>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairsResponse {
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub page_size: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub page: Option<u64>,
    #[serde(default)]
    pub pairs: Vec<TokenPair>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairStats {
    #[serde(default)]
    pub token_address: Option<String>,
    #[serde(default)]
    pub token_name: Option<String>,
    #[serde(default)]
    pub token_symbol: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub total_liquidity_usd: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub total_active_pairs: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub total_active_dexes: Option<u64>,
    #[serde(default)]
    pub total_volume: TimeWindows,
    #[serde(default)]
    pub total_buy_volume: TimeWindows,
    #[serde(default)]
    pub total_sell_volume: TimeWindows,
    #[serde(default)]
    pub total_buyers: TimeWindows,
    #[serde(default)]
    pub total_sellers: TimeWindows,
}

impl TokenPairStats {
    pub fn is_empty(&self) -> bool {
        self.total_active_pairs.unwrap_or(0) == 0 && self.total_liquidity_usd.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_price_accepts_numeric_strings() {
        let price: TokenPrice = serde_json::from_value(json!({
            "usdPrice": "1.5",
            "nativePrice": { "value": 1000000000u64, "decimals": "9", "symbol": "SOL" },
            "exchangeName": "Raydium"
        }))
        .unwrap();

        assert_eq!(price.usd_price, Some(1.5));
        let native = price.native_price.unwrap();
        assert_eq!(native.value.as_deref(), Some("1000000000"));
        assert_eq!(native.decimals, Some(9));
    }

    #[test]
    fn test_payload_serialises_body_as_received() {
        let body = json!({
            "usdPrice": "0.000012345678901234567890",
            "usdPriceFormatted": "0.0000123"
        });
        let price = Payload::<TokenPrice>::from_value(body.clone()).unwrap();

        assert_eq!(price.usd_price, Some(0.000012345678901234567890));
        assert_eq!(price.raw(), &body);
        assert_eq!(serde_json::to_value(&price).unwrap(), body);
    }

    #[test]
    fn test_payload_rejects_mismatched_shape() {
        assert!(Payload::<OhlcvResponse>::from_value(json!({ "result": "nope" })).is_err());
    }

    #[test]
    fn test_time_windows_rename() {
        let windows: TimeWindows = serde_json::from_value(json!({
            "5min": 0.1, "1h": "2.5", "4h": null, "24h": -3
        }))
        .unwrap();

        assert_eq!(windows.five_min, Some(0.1));
        assert_eq!(windows.one_hour, Some(2.5));
        assert_eq!(windows.four_hours, None);
        assert_eq!(windows.one_day, Some(-3.0));
    }

    #[test]
    fn test_ohlcv_defaults_to_empty_result() {
        let response: OhlcvResponse = serde_json::from_value(json!({ "page": 0 })).unwrap();
        assert!(response.result.is_empty());
    }

    #[test]
    fn test_action_definition_matches_similes() {
        const DEFINITION: ActionDefinition = ActionDefinition {
            name: "GET_THING",
            similes: &["FETCH_THING"],
            description: "",
            template: "",
            required_fields: &[],
            missing_hint: "",
            subject: "thing",
            examples: &[],
        };
        assert!(DEFINITION.matches("get_thing"));
        assert!(DEFINITION.matches("FETCH_THING"));
        assert!(!DEFINITION.matches("OTHER"));
    }
}
