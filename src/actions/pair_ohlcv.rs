//! GET_SOLANA_PAIR_OHLCV action implementation.
//!
//! Unlike the other actions this one has optional parameters with defaults
//! (timeframe, currency, window, limit). Defaults that depend on the current
//! time are resolved against the invocation's reference time so identical
//! input produces identical output.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use super::MoralisAction;
use crate::client::MoralisClient;
use crate::error::Result;
use crate::format::{format_change, format_price, format_timestamp, format_usd, or_na};
use crate::params::{OhlcvParams, OhlcvQuery};
use crate::prompts::PAIR_OHLCV_TEMPLATE;
use crate::types::{ActionDefinition, ActionExample, Candle, FormattedResult, OhlcvResponse, Payload};

static DEFINITION: ActionDefinition = ActionDefinition {
    name: "GET_SOLANA_PAIR_OHLCV",
    similes: &[
        "CHECK_SOLANA_PAIR_OHLCV",
        "SOLANA_PAIR_CANDLES",
        "GET_SOLANA_CANDLESTICKS",
        "SOLANA_PRICE_HISTORY",
    ],
    description: "Get OHLCV candlestick data for a Solana trading pair over a time window.",
    template: PAIR_OHLCV_TEMPLATE,
    required_fields: &["pairAddress"],
    missing_hint: "I need a valid Solana pair address to fetch candlestick data. Please provide one.",
    subject: "candlestick data",
    examples: &[ActionExample {
        user: "Show hourly candles for Solana pair A8nPhpCJqtqHdqUk35Uj9Hy2YsGXFkCZGuNwvkD3k7VC",
        agent: "I'll fetch the hourly OHLCV data for that pair.",
    }],
};

/// The resolved query together with what the API returned for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OhlcvReport {
    pub query: OhlcvQuery,
    pub response: Payload<OhlcvResponse>,
}

pub struct PairOhlcvAction;

#[async_trait]
impl MoralisAction for PairOhlcvAction {
    type Params = OhlcvParams;
    type Response = OhlcvReport;

    fn definition(&self) -> &'static ActionDefinition {
        &DEFINITION
    }

    async fn fetch(
        &self,
        client: &MoralisClient,
        params: &OhlcvParams,
        now: DateTime<Utc>,
    ) -> Result<OhlcvReport> {
        let query = params.resolve(now)?;
        let response = client.get_pair_ohlcv(&query).await?;
        Ok(OhlcvReport { query, response })
    }

    fn format(&self, _params: &OhlcvParams, report: &OhlcvReport) -> FormattedResult {
        format_pair_ohlcv(report)
    }
}

fn price_in(currency: &str, value: f64) -> String {
    if currency == "usd" {
        format!("${}", format_price(value))
    } else {
        format_price(value)
    }
}

fn volume_in(currency: &str, value: f64) -> String {
    if currency == "usd" {
        format_usd(value)
    } else {
        format!("{value:.2}")
    }
}

fn candle_line(currency: &str, candle: &Candle) -> String {
    let price = |v: Option<f64>| or_na(v, |v| price_in(currency, v));
    let mut line = format!(
        "{}: O {} H {} L {} C {} | Vol {}",
        format_timestamp(&candle.timestamp),
        price(candle.open),
        price(candle.high),
        price(candle.low),
        price(candle.close),
        or_na(candle.volume, |v| volume_in(currency, v)),
    );
    if let Some(trades) = candle.trades {
        line.push_str(&format!(" | Trades {trades}"));
    }
    line
}

/// Candles sorted oldest first; the API returns newest first.
fn chronological(candles: &[Candle]) -> Vec<&Candle> {
    let mut sorted: Vec<&Candle> = candles.iter().collect();
    sorted.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    sorted
}

pub fn format_pair_ohlcv(report: &OhlcvReport) -> FormattedResult {
    let query = &report.query;
    let content = json!({
        "pairAddress": query.pair_address,
        "query": query,
        "ohlcv": report.response,
    });

    let from = format_timestamp(&query.from_date);
    let to = format_timestamp(&query.to_date);

    if report.response.result.is_empty() {
        return FormattedResult {
            text: format!(
                "No OHLCV data found for pair {} between {from} and {to} ({} candles).",
                query.pair_address, query.timeframe
            ),
            content,
        };
    }

    let currency = query.currency.as_str();
    let candles = chronological(&report.response.result);

    let mut lines = vec![format!(
        "OHLCV for pair {} ({} candles, {}) from {from} to {to}:",
        query.pair_address,
        query.timeframe,
        currency.to_uppercase()
    )];

    let high = candles.iter().filter_map(|c| c.high).fold(None, |acc: Option<f64>, h| {
        Some(acc.map_or(h, |a| a.max(h)))
    });
    let low = candles.iter().filter_map(|c| c.low).fold(None, |acc: Option<f64>, l| {
        Some(acc.map_or(l, |a| a.min(l)))
    });
    let first_open = candles.first().and_then(|c| c.open);
    let last_close = candles.last().and_then(|c| c.close);

    lines.push(format!(
        "Range: high {} / low {}",
        or_na(high, |v| price_in(currency, v)),
        or_na(low, |v| price_in(currency, v)),
    ));

    if let (Some(open), Some(close)) = (first_open, last_close) {
        if open != 0.0 {
            lines.push(format!(
                "Change: {} -> {} ({})",
                price_in(currency, open),
                price_in(currency, close),
                format_change((close - open) / open * 100.0)
            ));
        }
    }

    lines.push(String::new());
    lines.extend(candles.iter().map(|c| candle_line(currency, c)));

    FormattedResult {
        text: lines.join("\n"),
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAIR: &str = "A8nPhpCJqtqHdqUk35Uj9Hy2YsGXFkCZGuNwvkD3k7VC";

    fn query() -> OhlcvQuery {
        OhlcvQuery {
            pair_address: PAIR.to_string(),
            timeframe: "1h".to_string(),
            currency: "usd".to_string(),
            from_date: "2025-01-01T00:00:00Z".to_string(),
            to_date: "2025-01-02T00:00:00Z".to_string(),
            limit: 24,
        }
    }

    fn candle(timestamp: &str, open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            timestamp: timestamp.to_string(),
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(1500.5),
            trades: Some(42),
        }
    }

    #[test]
    fn test_format_ohlcv() {
        let report = OhlcvReport {
            query: query(),
            response: Payload::from_data(OhlcvResponse {
                result: vec![
                    candle("2025-01-01T01:00:00.000Z", 2.0, 2.5, 1.9, 2.2),
                    candle("2025-01-01T00:00:00.000Z", 1.0, 2.1, 0.9, 2.0),
                ],
                ..Default::default()
            }),
        };

        let result = format_pair_ohlcv(&report);
        let lines: Vec<&str> = result.text.lines().collect();

        assert_eq!(
            lines[0],
            format!("OHLCV for pair {PAIR} (1h candles, USD) from 2025-01-01 00:00 UTC to 2025-01-02 00:00 UTC:")
        );
        assert_eq!(lines[1], "Range: high $2.5000 / low $0.9000");
        assert_eq!(lines[2], "Change: $1.0000 -> $2.2000 (+120.00%)");
        assert_eq!(
            lines[4],
            "2025-01-01 00:00 UTC: O $1.0000 H $2.1000 L $0.9000 C $2.0000 | Vol $1,500.50 | Trades 42"
        );
        assert!(lines[5].starts_with("2025-01-01 01:00 UTC"));
        assert_eq!(result.content["query"]["limit"], 24);
    }

    #[test]
    fn test_format_native_currency() {
        let mut q = query();
        q.currency = "native".to_string();
        let report = OhlcvReport {
            query: q,
            response: Payload::from_data(OhlcvResponse {
                result: vec![candle("2025-01-01T00:00:00.000Z", 1.0, 1.0, 1.0, 1.0)],
                ..Default::default()
            }),
        };
        let text = format_pair_ohlcv(&report).text;
        assert!(text.contains("O 1.0000 H 1.0000"));
        assert!(text.contains("Vol 1500.50"));
    }

    #[test]
    fn test_format_no_candles() {
        let report = OhlcvReport {
            query: query(),
            response: Payload::from_data(OhlcvResponse::default()),
        };
        assert_eq!(
            format_pair_ohlcv(&report).text,
            format!(
                "No OHLCV data found for pair {PAIR} between 2025-01-01 00:00 UTC and 2025-01-02 00:00 UTC (1h candles)."
            )
        );
    }

    #[test]
    fn test_content_keeps_candles_as_sent() {
        let body = serde_json::json!({
            "page": "1",
            "pairAddress": PAIR,
            "result": [{
                "timestamp": "2025-01-01T00:00:00.000Z",
                "open": "0.00001234567890123456",
                "high": 2,
                "low": 0.5,
                "close": 1.5,
                "volume": "1000.123456789",
                "trades": 7
            }]
        });
        let report = OhlcvReport {
            query: query(),
            response: Payload::from_value(body.clone()).unwrap(),
        };

        let result = format_pair_ohlcv(&report);
        assert_eq!(result.content["ohlcv"], body);
        assert_eq!(result.content["ohlcv"]["result"][0]["open"], "0.00001234567890123456");
    }
}
