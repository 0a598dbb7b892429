//! GET_SOLANA_TOKEN_PRICE action implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;

use super::MoralisAction;
use crate::client::MoralisClient;
use crate::error::Result;
use crate::format::{format_change, format_quote_price, format_token_amount, NOT_AVAILABLE};
use crate::params::TokenAddressParams;
use crate::prompts::TOKEN_ADDRESS_TEMPLATE;
use crate::types::{ActionDefinition, ActionExample, FormattedResult, Payload, TokenPrice};

static DEFINITION: ActionDefinition = ActionDefinition {
    name: "GET_SOLANA_TOKEN_PRICE",
    similes: &[
        "CHECK_SOLANA_TOKEN_PRICE",
        "SOLANA_TOKEN_PRICE",
        "GET_SOL_TOKEN_PRICE",
        "TOKEN_PRICE_SOLANA",
    ],
    description: "Get the current USD and native price of a Solana token by its mint address.",
    template: TOKEN_ADDRESS_TEMPLATE,
    required_fields: &["tokenAddress"],
    missing_hint: "I need a valid Solana token address to look up its price. Please provide one.",
    subject: "token price",
    examples: &[ActionExample {
        user: "Get current price of Solana token 6Rwcmkz9yiYVM5EzyMcr4JsQPGEAWhcUvLvfBperYnUt",
        agent: "Let me check the current price of that token.",
    }],
};

/// Current price of a Solana token.
pub struct TokenPriceAction;

#[async_trait]
impl MoralisAction for TokenPriceAction {
    type Params = TokenAddressParams;
    type Response = Payload<TokenPrice>;

    fn definition(&self) -> &'static ActionDefinition {
        &DEFINITION
    }

    async fn fetch(
        &self,
        client: &MoralisClient,
        params: &TokenAddressParams,
        _now: DateTime<Utc>,
    ) -> Result<Payload<TokenPrice>> {
        client.get_token_price(&params.token_address).await
    }

    fn format(&self, params: &TokenAddressParams, response: &Payload<TokenPrice>) -> FormattedResult {
        format_token_price(&params.token_address, response)
    }
}

pub fn format_token_price(token_address: &str, price: &Payload<TokenPrice>) -> FormattedResult {
    let content = json!({
        "tokenAddress": token_address,
        "price": price,
    });

    let Some(usd_price) = price.usd_price else {
        return FormattedResult {
            text: format!("No price data is available for token {token_address}."),
            content,
        };
    };

    let mut lines = vec![
        format!("Price information for token {token_address}:"),
        format!("USD Price: ${}", format_quote_price(usd_price)),
    ];

    if let Some(native) = &price.native_price {
        if let Some(value) = &native.value {
            let amount = match u32::try_from(native.decimals.unwrap_or(0)) {
                Ok(decimals) => format_token_amount(value, decimals),
                Err(_) => value.clone(),
            };
            let symbol = native.symbol.as_deref().unwrap_or("");
            lines.push(format!("Native Price: {amount} {symbol}").trim_end().to_string());
        }
    }

    if let Some(change) = price.usd_price_24hr_percent_change {
        lines.push(format!("24h Change: {}", format_change(change)));
    }

    let exchange = price.exchange_name.as_deref().unwrap_or(NOT_AVAILABLE);
    match &price.exchange_address {
        Some(address) => lines.push(format!("Exchange: {exchange} ({address})")),
        None => lines.push(format!("Exchange: {exchange}")),
    }

    if let Some(pair) = &price.pair_address {
        lines.push(format!("Pair: {pair}"));
    }

    FormattedResult {
        text: lines.join("\n"),
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NativePrice;
    use pretty_assertions::assert_eq;

    const TOKEN: &str = "6Rwcmkz9yiYVM5EzyMcr4JsQPGEAWhcUvLvfBperYnUt";

    #[test]
    fn test_action_metadata() {
        let definition = TokenPriceAction.definition();
        assert_eq!(definition.name, "GET_SOLANA_TOKEN_PRICE");
        assert!(!definition.description.is_empty());
        assert!(!definition.similes.is_empty());
        assert_eq!(definition.required_fields, &["tokenAddress"]);
    }

    #[test]
    fn test_format_token_price() {
        let price = Payload::from_data(TokenPrice {
            usd_price: Some(1.234567),
            native_price: Some(NativePrice {
                value: Some("1000000000".to_string()),
                decimals: Some(9),
                name: Some("Wrapped Solana".to_string()),
                symbol: Some("SOL".to_string()),
            }),
            exchange_name: Some("Raydium".to_string()),
            exchange_address: Some("ExAddr".to_string()),
            ..Default::default()
        });

        let result = format_token_price(TOKEN, &price);
        assert_eq!(
            result.text,
            format!(
                "Price information for token {TOKEN}:\nUSD Price: $1.234567\nNative Price: 1 SOL\nExchange: Raydium (ExAddr)"
            )
        );
        assert_eq!(result.content["price"]["usdPrice"], 1.234567);
        assert_eq!(result.content["tokenAddress"], TOKEN);
    }

    #[test]
    fn test_format_zero_price() {
        let price = Payload::from_data(TokenPrice {
            usd_price: Some(0.0),
            usd_price_24hr_percent_change: Some(0.0),
            ..Default::default()
        });
        let text = format_token_price(TOKEN, &price).text;
        assert!(text.contains("USD Price: $0.0000"));
        assert!(text.contains("24h Change: 0.00%"));
        assert!(text.contains("Exchange: N/A"));
    }

    #[test]
    fn test_format_missing_price() {
        let result = format_token_price(TOKEN, &Payload::from_data(TokenPrice::default()));
        assert_eq!(
            result.text,
            format!("No price data is available for token {TOKEN}.")
        );
    }

    #[test]
    fn test_content_keeps_api_body() {
        let body = json!({
            "usdPrice": "0.000012345678901234567890",
            "usdPriceFormatted": "0.0000123"
        });
        let price = Payload::<TokenPrice>::from_value(body.clone()).unwrap();

        let result = format_token_price(TOKEN, &price);
        assert!(result.text.contains("USD Price: $0.000012"));
        assert_eq!(result.content["price"], body);
        assert_eq!(result.content["price"]["usdPrice"], "0.000012345678901234567890");
        assert_eq!(result.content["price"]["usdPriceFormatted"], "0.0000123");
    }

    #[test]
    fn test_native_price_with_oversized_decimals() {
        let price = Payload::<TokenPrice>::from_value(json!({
            "usdPrice": 1.5,
            "nativePrice": { "value": "123456", "decimals": 4294967305u64, "symbol": "SOL" }
        }))
        .unwrap();

        let text = format_token_price(TOKEN, &price).text;
        assert!(text.contains("Native Price: 123456 SOL"));
    }
}
