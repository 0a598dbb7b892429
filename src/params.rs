#![allow(missing_docs)]
//! Validation of extracted parameters.
//!
//! The model hands back an untyped map. Before any network call the map is
//! checked against the action's required fields (all missing fields are
//! reported together) and then deserialised into a typed parameter record.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MoralisError, Result};
use crate::extraction::is_absent;
use crate::runtime::ActionParameters;

/// Typed parameters produced from an extracted map.
pub trait ActionParams: DeserializeOwned + Serialize + Send + Sync + Sized {
    /// Field-level checks that run after deserialisation.
    fn check(self) -> Result<Self>;
}

/// Check the required fields, then deserialise and run the typed checks.
pub fn validate_parameters<P: ActionParams>(
    params: &ActionParameters,
    required_fields: &[&str],
) -> Result<P> {
    let missing: Vec<&str> = required_fields
        .iter()
        .copied()
        .filter(|field| is_absent(params.get(*field)))
        .collect();

    if !missing.is_empty() {
        return Err(MoralisError::missing(missing));
    }

    let object: serde_json::Map<String, Value> = params
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let typed: P = serde_json::from_value(Value::Object(object))
        .map_err(|e| MoralisError::invalid("parameters", e.to_string()))?;

    typed.check()
}

/// A Solana address is base58 that decodes to exactly 32 bytes.
pub fn validate_solana_address(field: &str, address: &str) -> Result<String> {
    let address = address.trim();
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|_| MoralisError::invalid(field, "not a base58 string"))?;

    if bytes.len() != 32 {
        return Err(MoralisError::invalid(
            field,
            format!("expected 32 bytes, got {}", bytes.len()),
        ));
    }
    Ok(address.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAddressParams {
    pub token_address: String,
}

impl ActionParams for TokenAddressParams {
    fn check(self) -> Result<Self> {
        Ok(Self {
            token_address: validate_solana_address("tokenAddress", &self.token_address)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairAddressParams {
    pub pair_address: String,
}

impl ActionParams for PairAddressParams {
    fn check(self) -> Result<Self> {
        Ok(Self {
            pair_address: validate_solana_address("pairAddress", &self.pair_address)?,
        })
    }
}

pub const DEFAULT_TOKEN_PAIRS_LIMIT: u32 = 10;
pub const MAX_TOKEN_PAIRS_LIMIT: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairsParams {
    pub token_address: String,
    #[serde(default, deserialize_with = "de_opt_limit")]
    pub limit: Option<u32>,
}

impl TokenPairsParams {
    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_TOKEN_PAIRS_LIMIT)
            .clamp(1, MAX_TOKEN_PAIRS_LIMIT)
    }
}

impl ActionParams for TokenPairsParams {
    fn check(self) -> Result<Self> {
        Ok(Self {
            token_address: validate_solana_address("tokenAddress", &self.token_address)?,
            limit: self.limit,
        })
    }
}

pub const OHLCV_TIMEFRAMES: &[&str] = &[
    "1s", "10s", "30s", "1min", "5min", "10min", "30min", "1h", "4h", "12h", "1d", "1w", "1M",
];
pub const DEFAULT_OHLCV_TIMEFRAME: &str = "1h";

const TIMEFRAME_ALIASES: &[(&str, &str)] = &[
    ("1m", "1min"),
    ("5m", "5min"),
    ("10m", "10min"),
    ("30m", "30min"),
    ("1mo", "1M"),
    ("1month", "1M"),
];

/// Map user input onto a Moralis timeframe. Only an exact `1M` means monthly
/// candles; any other `m` suffix is minutes.
fn normalize_timeframe(raw: &str) -> Option<&'static str> {
    if let Some(exact) = OHLCV_TIMEFRAMES.iter().copied().find(|t| *t == raw) {
        return Some(exact);
    }
    let lower = raw.to_ascii_lowercase();
    if let Some((_, target)) = TIMEFRAME_ALIASES.iter().copied().find(|(alias, _)| *alias == lower) {
        return Some(target);
    }
    OHLCV_TIMEFRAMES
        .iter()
        .copied()
        .find(|t| *t != "1M" && t.eq_ignore_ascii_case(raw))
}
pub const DEFAULT_OHLCV_CURRENCY: &str = "usd";
pub const DEFAULT_OHLCV_LIMIT: u32 = 24;
pub const MAX_OHLCV_LIMIT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OhlcvParams {
    pub pair_address: String,
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
    #[serde(default, deserialize_with = "de_opt_limit")]
    pub limit: Option<u32>,
}

/// A fully resolved OHLCV query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OhlcvQuery {
    pub pair_address: String,
    pub timeframe: String,
    pub currency: String,
    pub from_date: String,
    pub to_date: String,
    pub limit: u32,
}

fn parse_date(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }
    Err(MoralisError::invalid(
        field,
        "expected an ISO date (YYYY-MM-DD) or RFC 3339 timestamp",
    ))
}

fn format_query_date(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

impl OhlcvParams {
    /// Resolve defaults against the invocation's reference time.
    ///
    /// A missing window becomes the 24 hours before `now` (or before/after
    /// whichever bound was supplied).
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<OhlcvQuery> {
        let to = match self.to_date.as_deref() {
            Some(raw) => Some(parse_date("toDate", raw)?),
            None => None,
        };
        let from = match self.from_date.as_deref() {
            Some(raw) => Some(parse_date("fromDate", raw)?),
            None => None,
        };

        let (from, to) = match (from, to) {
            (Some(f), Some(t)) => (f, t),
            (Some(f), None) => (f, f + Duration::days(1)),
            (None, Some(t)) => (t - Duration::days(1), t),
            (None, None) => (now - Duration::days(1), now),
        };

        if from >= to {
            return Err(MoralisError::invalid("fromDate", "must be before toDate"));
        }

        Ok(OhlcvQuery {
            pair_address: self.pair_address.clone(),
            timeframe: self
                .timeframe
                .clone()
                .unwrap_or_else(|| DEFAULT_OHLCV_TIMEFRAME.to_string()),
            currency: self
                .currency
                .clone()
                .unwrap_or_else(|| DEFAULT_OHLCV_CURRENCY.to_string()),
            from_date: format_query_date(from),
            to_date: format_query_date(to),
            limit: self
                .limit
                .unwrap_or(DEFAULT_OHLCV_LIMIT)
                .clamp(1, MAX_OHLCV_LIMIT),
        })
    }
}

impl ActionParams for OhlcvParams {
    fn check(self) -> Result<Self> {
        let pair_address = validate_solana_address("pairAddress", &self.pair_address)?;

        let timeframe = match self.timeframe {
            Some(tf) => {
                let known = normalize_timeframe(tf.trim()).ok_or_else(|| {
                    MoralisError::invalid(
                        "timeframe",
                        format!("must be one of {}", OHLCV_TIMEFRAMES.join(", ")),
                    )
                })?;
                Some(known.to_string())
            }
            None => None,
        };

        let currency = match self.currency {
            Some(c) => {
                let c = c.trim().to_lowercase();
                if c != "usd" && c != "native" {
                    return Err(MoralisError::invalid("currency", "must be usd or native"));
                }
                Some(c)
            }
            None => None,
        };

        if let Some(raw) = self.from_date.as_deref() {
            parse_date("fromDate", raw)?;
        }
        if let Some(raw) = self.to_date.as_deref() {
            parse_date("toDate", raw)?;
        }

        Ok(Self {
            pair_address,
            timeframe,
            currency,
            from_date: self.from_date,
            to_date: self.to_date,
            limit: self.limit,
        })
    }
}

/// Models return limits as numbers or numeric strings.
fn de_opt_limit<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|v| Some(v.min(u32::MAX as u64) as u32))
            .ok_or_else(|| D::Error::custom("limit must be a positive integer")),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| D::Error::custom("limit must be a positive integer")),
        Some(_) => Err(D::Error::custom("limit must be a positive integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    const TOKEN: &str = "6Rwcmkz9yiYVM5EzyMcr4JsQPGEAWhcUvLvfBperYnUt";
    const PAIR: &str = "A8nPhpCJqtqHdqUk35Uj9Hy2YsGXFkCZGuNwvkD3k7VC";

    fn map(value: Value) -> ActionParameters {
        value
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let err = validate_parameters::<TokenAddressParams>(
            &map(json!({ "other": 1 })),
            &["tokenAddress", "pairAddress"],
        )
        .unwrap_err();

        match err {
            MoralisError::MissingParameter { fields } => {
                assert_eq!(fields, vec!["tokenAddress", "pairAddress"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_null_string_counts_as_missing() {
        let err = validate_parameters::<TokenAddressParams>(
            &map(json!({ "tokenAddress": "null" })),
            &["tokenAddress"],
        )
        .unwrap_err();
        assert!(matches!(err, MoralisError::MissingParameter { .. }));
    }

    #[test]
    fn test_token_address_validated() {
        let ok = validate_parameters::<TokenAddressParams>(
            &map(json!({ "tokenAddress": format!(" {TOKEN} ") })),
            &["tokenAddress"],
        )
        .unwrap();
        assert_eq!(ok.token_address, TOKEN);

        let err = validate_parameters::<TokenAddressParams>(
            &map(json!({ "tokenAddress": "0xdeadbeef" })),
            &["tokenAddress"],
        )
        .unwrap_err();
        assert!(matches!(err, MoralisError::InvalidParameter { .. }));
    }

    #[test]
    fn test_wrong_type_is_invalid_parameter() {
        let err = validate_parameters::<TokenAddressParams>(
            &map(json!({ "tokenAddress": 42 })),
            &["tokenAddress"],
        )
        .unwrap_err();
        assert!(matches!(err, MoralisError::InvalidParameter { .. }));
    }

    #[test]
    fn test_token_pairs_limit_clamped() {
        let params = validate_parameters::<TokenPairsParams>(
            &map(json!({ "tokenAddress": TOKEN, "limit": "500" })),
            &["tokenAddress"],
        )
        .unwrap();
        assert_eq!(params.limit(), MAX_TOKEN_PAIRS_LIMIT);

        let params = validate_parameters::<TokenPairsParams>(
            &map(json!({ "tokenAddress": TOKEN })),
            &["tokenAddress"],
        )
        .unwrap();
        assert_eq!(params.limit(), DEFAULT_TOKEN_PAIRS_LIMIT);
    }

    #[test]
    fn test_ohlcv_normalises_options() {
        let params = validate_parameters::<OhlcvParams>(
            &map(json!({
                "pairAddress": PAIR,
                "timeframe": "1H",
                "currency": "USD",
                "fromDate": "2025-01-01",
                "toDate": "2025-01-02"
            })),
            &["pairAddress"],
        )
        .unwrap();

        assert_eq!(params.timeframe.as_deref(), Some("1h"));
        assert_eq!(params.currency.as_deref(), Some("usd"));
    }

    #[test]
    fn test_ohlcv_month_timeframe_kept() {
        let params = validate_parameters::<OhlcvParams>(
            &map(json!({ "pairAddress": PAIR, "timeframe": "1M" })),
            &["pairAddress"],
        )
        .unwrap();
        assert_eq!(params.timeframe.as_deref(), Some("1M"));
    }

    #[test]
    fn test_ohlcv_minute_shorthand_is_not_monthly() {
        for (input, expected) in [("1m", "1min"), ("5m", "5min"), ("30M", "30min"), ("1MIN", "1min")] {
            let params = validate_parameters::<OhlcvParams>(
                &map(json!({ "pairAddress": PAIR, "timeframe": input })),
                &["pairAddress"],
            )
            .unwrap();
            assert_eq!(params.timeframe.as_deref(), Some(expected), "input {input:?}");
        }
    }

    #[test]
    fn test_ohlcv_month_aliases() {
        assert_eq!(normalize_timeframe("1M"), Some("1M"));
        assert_eq!(normalize_timeframe("1mo"), Some("1M"));
        assert_eq!(normalize_timeframe("1Month"), Some("1M"));
        assert_eq!(normalize_timeframe("1m"), Some("1min"));
        assert_eq!(normalize_timeframe("2m"), None);
    }

    #[test]
    fn test_ohlcv_rejects_unknown_timeframe() {
        let err = validate_parameters::<OhlcvParams>(
            &map(json!({ "pairAddress": PAIR, "timeframe": "3h" })),
            &["pairAddress"],
        )
        .unwrap_err();
        assert!(matches!(err, MoralisError::InvalidParameter { field, .. } if field == "timeframe"));
    }

    #[test]
    fn test_ohlcv_resolve_defaults_from_reference_time() {
        let params = OhlcvParams {
            pair_address: PAIR.to_string(),
            timeframe: None,
            currency: None,
            from_date: None,
            to_date: None,
            limit: Some(1000),
        };
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let query = params.resolve(now).unwrap();

        assert_eq!(query.timeframe, "1h");
        assert_eq!(query.currency, "usd");
        assert_eq!(query.from_date, "2025-03-09T12:00:00Z");
        assert_eq!(query.to_date, "2025-03-10T12:00:00Z");
        assert_eq!(query.limit, MAX_OHLCV_LIMIT);
    }

    #[test]
    fn test_ohlcv_resolve_rejects_inverted_window() {
        let params = OhlcvParams {
            pair_address: PAIR.to_string(),
            timeframe: None,
            currency: None,
            from_date: Some("2025-02-02".to_string()),
            to_date: Some("2025-02-01".to_string()),
            limit: None,
        };
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        assert!(params.resolve(now).is_err());
    }
}
