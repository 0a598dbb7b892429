use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;

use super::MoralisAction;
use crate::client::MoralisClient;
use crate::error::Result;
use crate::format::{format_change, format_quote_price, format_usd, or_na};
use crate::params::TokenPairsParams;
use crate::prompts::TOKEN_PAIRS_TEMPLATE;
use crate::types::{ActionDefinition, ActionExample, FormattedResult, Payload, TokenPair, TokenPairsResponse};

static DEFINITION: ActionDefinition = ActionDefinition {
    name: "GET_SOLANA_TOKEN_PAIRS",
    similes: &[
        "CHECK_SOLANA_TOKEN_PAIRS",
        "SOLANA_TOKEN_PAIRS",
        "LIST_SOLANA_TOKEN_PAIRS",
        "SOLANA_TOKEN_MARKETS",
    ],
    description: "List the trading pairs (liquidity pools) for a Solana token with price, volume and liquidity.",
    template: TOKEN_PAIRS_TEMPLATE,
    required_fields: &["tokenAddress"],
    missing_hint: "I need a valid Solana token address to list its trading pairs. Please provide one.",
    subject: "token pairs",
    examples: &[ActionExample {
        user: "What pairs trade So11111111111111111111111111111111111111112 on Solana?",
        agent: "Let me list the trading pairs for that token.",
    }],
};

pub struct TokenPairsAction;

#[async_trait]
impl MoralisAction for TokenPairsAction {
    type Params = TokenPairsParams;
    type Response = Payload<TokenPairsResponse>;

    fn definition(&self) -> &'static ActionDefinition {
        &DEFINITION
    }

    async fn fetch(
        &self,
        client: &MoralisClient,
        params: &TokenPairsParams,
        _now: DateTime<Utc>,
    ) -> Result<Payload<TokenPairsResponse>> {
        client
            .get_token_pairs(&params.token_address, params.limit())
            .await
    }

    fn format(&self, params: &TokenPairsParams, response: &Payload<TokenPairsResponse>) -> FormattedResult {
        format_token_pairs(&params.token_address, response)
    }
}

fn pair_line(index: usize, pair: &TokenPair) -> String {
    let label = pair.pair_label.as_deref().unwrap_or("Unknown pair");
    let exchange = pair.exchange_name.as_deref().unwrap_or("unknown exchange");
    let mut line = format!(
        "{}. {label} on {exchange}\n   Price: {} ({} 24h) | Volume 24h: {} | Liquidity: {}",
        index + 1,
        or_na(pair.usd_price, |p| format!("${}", format_quote_price(p))),
        or_na(pair.usd_price_24hr_percent_change, format_change),
        or_na(pair.volume_24hr_usd, format_usd),
        or_na(pair.liquidity_usd, format_usd),
    );
    if let Some(address) = &pair.pair_address {
        line.push_str(&format!("\n   Pair: {address}"));
    }
    if pair.inactive_pair == Some(true) {
        line.push_str(" (inactive)");
    }
    line
}

pub fn format_token_pairs(token_address: &str, response: &Payload<TokenPairsResponse>) -> FormattedResult {
    let content = json!({
        "tokenAddress": token_address,
        "pairs": response.raw()["pairs"],
        "cursor": response.raw()["cursor"],
    });

    if response.pairs.is_empty() {
        return FormattedResult {
            text: format!("No trading pairs found for token {token_address}."),
            content,
        };
    }

    let mut lines = vec![format!(
        "Found {} trading pair{} for token {token_address}:",
        response.pairs.len(),
        if response.pairs.len() == 1 { "" } else { "s" }
    )];
    lines.extend(
        response
            .pairs
            .iter()
            .enumerate()
            .map(|(i, pair)| pair_line(i, pair)),
    );

    FormattedResult {
        text: lines.join("\n"),
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOL: &str = "So11111111111111111111111111111111111111112";
    const POOL: &str = "58oQChx4yWmvKdwLLZzBi4ChoCc2fqCUWBkwMihLYQo2";

    #[test]
    fn test_format_token_pairs() {
        let response = Payload::from_data(TokenPairsResponse {
            pairs: vec![TokenPair {
                pair_label: Some("SOL/USDC".to_string()),
                exchange_name: Some("Raydium AMM v4".to_string()),
                pair_address: Some(POOL.to_string()),
                usd_price: Some(145.5),
                usd_price_24hr_percent_change: Some(-2.5),
                volume_24hr_usd: Some(1_250_000.0),
                liquidity_usd: Some(25_000_000.0),
                ..Default::default()
            }],
            ..Default::default()
        });

        let result = format_token_pairs(SOL, &response);
        assert_eq!(
            result.text,
            format!(
                "Found 1 trading pair for token {SOL}:\n\
                 1. SOL/USDC on Raydium AMM v4\n   \
                 Price: $145.5000 (-2.50% 24h) | Volume 24h: $1,250,000.00 | Liquidity: $25,000,000.00\n   \
                 Pair: {POOL}"
            )
        );
        assert_eq!(result.content["pairs"][0]["pairLabel"], "SOL/USDC");
    }

    #[test]
    fn test_format_inactive_pair() {
        let response = Payload::from_data(TokenPairsResponse {
            pairs: vec![
                TokenPair::default(),
                TokenPair {
                    inactive_pair: Some(true),
                    ..Default::default()
                },
            ],
            ..Default::default()
        });
        let text = format_token_pairs(SOL, &response).text;
        assert!(text.starts_with("Found 2 trading pairs"));
        assert!(text.contains("2. Unknown pair on unknown exchange"));
        assert!(text.ends_with("(inactive)"));
    }

    #[test]
    fn test_format_no_pairs() {
        let result = format_token_pairs(SOL, &Payload::from_data(TokenPairsResponse::default()));
        assert_eq!(result.text, format!("No trading pairs found for token {SOL}."));
    }

    #[test]
    fn test_content_keeps_pairs_as_sent() {
        let response = Payload::<TokenPairsResponse>::from_value(json!({
            "cursor": "next-page",
            "pairs": [{
                "pairLabel": "SOL/USDC",
                "usdPrice": "145.123456789012345",
                "baseToken": "So11111111111111111111111111111111111111112"
            }]
        }))
        .unwrap();

        let result = format_token_pairs(SOL, &response);
        assert!(result.text.contains("Price: $145.123457"));
        assert_eq!(result.content["pairs"][0]["usdPrice"], "145.123456789012345");
        assert_eq!(result.content["pairs"][0]["baseToken"], SOL);
        assert_eq!(result.content["cursor"], "next-page");
    }
}
