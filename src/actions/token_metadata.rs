use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;

use super::MoralisAction;
use crate::client::MoralisClient;
use crate::error::Result;
use crate::format::{format_usd, or_na};
use crate::params::TokenAddressParams;
use crate::prompts::TOKEN_ADDRESS_TEMPLATE;
use crate::types::{ActionDefinition, ActionExample, FormattedResult, Payload, TokenMetadata};

static DEFINITION: ActionDefinition = ActionDefinition {
    name: "GET_SOLANA_TOKEN_METADATA",
    similes: &[
        "CHECK_SOLANA_TOKEN_METADATA",
        "SOLANA_TOKEN_INFO",
        "GET_SOLANA_TOKEN_INFO",
        "SOLANA_TOKEN_DETAILS",
    ],
    description: "Get name, symbol, supply and Metaplex metadata for a Solana token.",
    template: TOKEN_ADDRESS_TEMPLATE,
    required_fields: &["tokenAddress"],
    missing_hint: "I need a valid Solana token address to look up its metadata. Please provide one.",
    subject: "token metadata",
    examples: &[ActionExample {
        user: "Show me the metadata for Solana token EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
        agent: "I'll fetch the metadata for that token.",
    }],
};

pub struct TokenMetadataAction;

#[async_trait]
impl MoralisAction for TokenMetadataAction {
    type Params = TokenAddressParams;
    type Response = Payload<TokenMetadata>;

    fn definition(&self) -> &'static ActionDefinition {
        &DEFINITION
    }

    async fn fetch(
        &self,
        client: &MoralisClient,
        params: &TokenAddressParams,
        _now: DateTime<Utc>,
    ) -> Result<Payload<TokenMetadata>> {
        client.get_token_metadata(&params.token_address).await
    }

    fn format(&self, params: &TokenAddressParams, response: &Payload<TokenMetadata>) -> FormattedResult {
        format_token_metadata(&params.token_address, response)
    }
}

pub fn format_token_metadata(token_address: &str, metadata: &Payload<TokenMetadata>) -> FormattedResult {
    let content = json!({
        "tokenAddress": token_address,
        "metadata": metadata,
    });

    if metadata.is_empty() {
        return FormattedResult {
            text: format!("No metadata found for token {token_address}."),
            content,
        };
    }

    let mut lines = vec![
        format!("Token metadata for {token_address}:"),
        format!("Name: {}", or_na(metadata.name.as_deref(), str::to_string)),
        format!("Symbol: {}", or_na(metadata.symbol.as_deref(), str::to_string)),
        format!("Decimals: {}", or_na(metadata.decimals, |d| d.to_string())),
    ];

    if let Some(standard) = &metadata.standard {
        lines.push(format!("Standard: {standard}"));
    }

    let supply = metadata
        .total_supply_formatted
        .as_deref()
        .or(metadata.total_supply.as_deref());
    lines.push(format!("Total Supply: {}", or_na(supply, str::to_string)));

    if let Some(fdv) = metadata.fully_diluted_value {
        lines.push(format!("Fully Diluted Value: {}", format_usd(fdv)));
    }

    if let Some(metaplex) = &metadata.metaplex {
        if let Some(mutable) = metaplex.is_mutable {
            lines.push(format!("Mutable: {}", if mutable { "yes" } else { "no" }));
        }
        if let Some(authority) = &metaplex.update_authority {
            lines.push(format!("Update Authority: {authority}"));
        }
        if let Some(uri) = &metaplex.metadata_uri {
            lines.push(format!("Metadata URI: {uri}"));
        }
    }

    FormattedResult {
        text: lines.join("\n"),
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Metaplex;

    const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    #[test]
    fn test_format_token_metadata() {
        let metadata = Payload::from_data(TokenMetadata {
            mint: Some(USDC.to_string()),
            standard: Some("metaplex".to_string()),
            name: Some("USD Coin".to_string()),
            symbol: Some("USDC".to_string()),
            decimals: Some(6),
            total_supply_formatted: Some("9000000000".to_string()),
            fully_diluted_value: Some(9_000_000_000.0),
            metaplex: Some(Metaplex {
                is_mutable: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        });

        let result = format_token_metadata(USDC, &metadata);
        assert!(result.text.starts_with(&format!("Token metadata for {USDC}:")));
        assert!(result.text.contains("Name: USD Coin"));
        assert!(result.text.contains("Symbol: USDC"));
        assert!(result.text.contains("Decimals: 6"));
        assert!(result.text.contains("Fully Diluted Value: $9,000,000,000.00"));
        assert!(result.text.contains("Mutable: yes"));
        assert_eq!(result.content["metadata"]["symbol"], "USDC");
    }

    #[test]
    fn test_format_missing_fields() {
        let metadata = Payload::from_data(TokenMetadata {
            mint: Some(USDC.to_string()),
            ..Default::default()
        });
        let text = format_token_metadata(USDC, &metadata).text;
        assert!(text.contains("Name: N/A"));
        assert!(text.contains("Total Supply: N/A"));
    }

    #[test]
    fn test_format_empty_metadata() {
        let result = format_token_metadata(USDC, &Payload::from_data(TokenMetadata::default()));
        assert_eq!(result.text, format!("No metadata found for token {USDC}."));
    }
}
