use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;

use super::MoralisAction;
use crate::client::MoralisClient;
use crate::error::Result;
use crate::format::{format_change, format_count, format_price, format_timestamp, format_usd, or_na};
use crate::params::PairAddressParams;
use crate::prompts::PAIR_ADDRESS_TEMPLATE;
use crate::types::{ActionDefinition, ActionExample, FormattedResult, Payload, PairStats, TimeWindows};

static DEFINITION: ActionDefinition = ActionDefinition {
    name: "GET_SOLANA_PAIR_STATS",
    similes: &[
        "CHECK_SOLANA_PAIR_STATS",
        "SOLANA_PAIR_STATS",
        "GET_SOLANA_POOL_STATS",
        "SOLANA_LIQUIDITY_POOL_STATS",
    ],
    description: "Get price, liquidity, volume and trader statistics for a Solana trading pair.",
    template: PAIR_ADDRESS_TEMPLATE,
    required_fields: &["pairAddress"],
    missing_hint: "I need a valid Solana pair address to look up its stats. Please provide one.",
    subject: "pair stats",
    examples: &[ActionExample {
        user: "Get stats for Solana pair A8nPhpCJqtqHdqUk35Uj9Hy2YsGXFkCZGuNwvkD3k7VC",
        agent: "Let me pull the latest stats for that pair.",
    }],
};

pub struct PairStatsAction;

#[async_trait]
impl MoralisAction for PairStatsAction {
    type Params = PairAddressParams;
    type Response = Payload<PairStats>;

    fn definition(&self) -> &'static ActionDefinition {
        &DEFINITION
    }

    async fn fetch(
        &self,
        client: &MoralisClient,
        params: &PairAddressParams,
        _now: DateTime<Utc>,
    ) -> Result<Payload<PairStats>> {
        client.get_pair_stats(&params.pair_address).await
    }

    fn format(&self, params: &PairAddressParams, response: &Payload<PairStats>) -> FormattedResult {
        format_pair_stats(&params.pair_address, response)
    }
}

fn change_line(label: &str, windows: &TimeWindows) -> String {
    format!(
        "{label}: 5m {} | 1h {} | 4h {} | 24h {}",
        or_na(windows.five_min, format_change),
        or_na(windows.one_hour, format_change),
        or_na(windows.four_hours, format_change),
        or_na(windows.one_day, format_change),
    )
}

pub fn format_pair_stats(pair_address: &str, stats: &Payload<PairStats>) -> FormattedResult {
    let content = json!({
        "pairAddress": pair_address,
        "stats": stats,
    });

    if stats.is_empty() {
        return FormattedResult {
            text: format!("No statistics found for pair {pair_address}."),
            content,
        };
    }

    let label = stats.pair_label.as_deref().unwrap_or("Unknown pair");
    let mut lines = vec![format!("Pair stats for {label} ({pair_address}):")];

    if let Some(exchange) = &stats.exchange {
        lines.push(format!("Exchange: {exchange}"));
    }
    if let Some(created) = &stats.pair_created {
        lines.push(format!("Created: {}", format_timestamp(created)));
    }

    lines.push(format!(
        "Price: {}",
        or_na(stats.current_usd_price, |p| format!("${}", format_price(p)))
    ));
    if let Some(native) = stats.current_native_price {
        lines.push(format!("Native Price: {}", format_price(native)));
    }
    lines.push(format!(
        "Liquidity: {}",
        or_na(stats.total_liquidity_usd, format_usd)
    ));

    lines.push(change_line("Price Change", &stats.price_percent_change));
    lines.push(change_line("Liquidity Change", &stats.liquidity_percent_change));

    lines.push(format!(
        "24h Volume: {} (buys {} / sells {})",
        or_na(stats.total_volume.one_day, format_usd),
        or_na(stats.buy_volume.one_day, format_usd),
        or_na(stats.sell_volume.one_day, format_usd),
    ));
    lines.push(format!(
        "24h Trades: {} buys / {} sells",
        or_na(stats.buys.one_day, |v| format_count(v as u64)),
        or_na(stats.sells.one_day, |v| format_count(v as u64)),
    ));
    lines.push(format!(
        "24h Traders: {} buyers / {} sellers",
        or_na(stats.buyers.one_day, |v| format_count(v as u64)),
        or_na(stats.sellers.one_day, |v| format_count(v as u64)),
    ));

    FormattedResult {
        text: lines.join("\n"),
        content,
    }
}
