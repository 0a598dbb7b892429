use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;

use super::MoralisAction;
use crate::client::MoralisClient;
use crate::error::Result;
use crate::format::{format_count, format_usd, or_na};
use crate::params::TokenAddressParams;
use crate::prompts::TOKEN_ADDRESS_TEMPLATE;
use crate::types::{ActionDefinition, ActionExample, FormattedResult, Payload, TimeWindows, TokenPairStats};

static DEFINITION: ActionDefinition = ActionDefinition {
    name: "GET_SOLANA_TOKEN_PAIR_STATS",
    similes: &[
        "CHECK_SOLANA_TOKEN_PAIR_STATS",
        "SOLANA_TOKEN_LIQUIDITY",
        "GET_SOLANA_TOKEN_MARKET_STATS",
        "SOLANA_TOKEN_AGGREGATE_STATS",
    ],
    description: "Get aggregated liquidity, volume and trader statistics across all pairs of a Solana token.",
    template: TOKEN_ADDRESS_TEMPLATE,
    required_fields: &["tokenAddress"],
    missing_hint: "I need a valid Solana token address to look up its pair statistics. Please provide one.",
    subject: "token pair statistics",
    examples: &[ActionExample {
        user: "How much liquidity does Solana token EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v have across pairs?",
        agent: "I'll aggregate the pair statistics for that token.",
    }],
};

pub struct TokenPairStatsAction;

#[async_trait]
impl MoralisAction for TokenPairStatsAction {
    type Params = TokenAddressParams;
    type Response = Payload<TokenPairStats>;

    fn definition(&self) -> &'static ActionDefinition {
        &DEFINITION
    }

    async fn fetch(
        &self,
        client: &MoralisClient,
        params: &TokenAddressParams,
        _now: DateTime<Utc>,
    ) -> Result<Payload<TokenPairStats>> {
        client.get_token_pair_stats(&params.token_address).await
    }

    fn format(&self, params: &TokenAddressParams, response: &Payload<TokenPairStats>) -> FormattedResult {
        format_token_pair_stats(&params.token_address, response)
    }
}

fn windows_line(label: &str, windows: &TimeWindows, f: fn(f64) -> String) -> String {
    format!(
        "{label}: 5m {} | 1h {} | 4h {} | 24h {}",
        or_na(windows.five_min, f),
        or_na(windows.one_hour, f),
        or_na(windows.four_hours, f),
        or_na(windows.one_day, f),
    )
}

fn count(value: f64) -> String {
    format_count(value as u64)
}

pub fn format_token_pair_stats(token_address: &str, stats: &Payload<TokenPairStats>) -> FormattedResult {
    let content = json!({
        "tokenAddress": token_address,
        "stats": stats,
    });

    if stats.is_empty() {
        return FormattedResult {
            text: format!("No pair statistics found for token {token_address}."),
            content,
        };
    }

    let name = match (&stats.token_name, &stats.token_symbol) {
        (Some(name), Some(symbol)) => format!("{name} ({symbol})"),
        (Some(name), None) => name.clone(),
        (None, Some(symbol)) => symbol.clone(),
        (None, None) => "token".to_string(),
    };

    let lines = [
        format!("Pair statistics for {name} {token_address}:"),
        format!(
            "Total Liquidity: {}",
            or_na(stats.total_liquidity_usd, format_usd)
        ),
        format!(
            "Active Pairs: {} across {} DEXes",
            or_na(stats.total_active_pairs, format_count),
            or_na(stats.total_active_dexes, format_count),
        ),
        windows_line("Volume", &stats.total_volume, format_usd),
        windows_line("Buy Volume", &stats.total_buy_volume, format_usd),
        windows_line("Sell Volume", &stats.total_sell_volume, format_usd),
        windows_line("Buyers", &stats.total_buyers, count),
        windows_line("Sellers", &stats.total_sellers, count),
    ];

    FormattedResult {
        text: lines.join("\n"),
        content,
    }
}
