//! Extraction prompt templates.
//!
//! Each template asks the model for a single JSON object. Unknown values must
//! be `null` so the validator can tell "not provided" from a guess.

pub const TOKEN_ADDRESS_TEMPLATE: &str = r#"Given the recent messages below, extract the Solana token address the user is asking about.

{{recentMessages}}

The latest message is:
{{userMessage}}

Solana addresses are base58 strings of 32 to 44 characters. Do not invent an
address; if none is present, use null.

Respond with a JSON markdown block containing only the extracted value:

```json
{
    "tokenAddress": string | null
}
```"#;

pub const PAIR_ADDRESS_TEMPLATE: &str = r#"Given the recent messages below, extract the Solana trading pair (liquidity pool) address the user is asking about.

{{recentMessages}}

The latest message is:
{{userMessage}}

Solana addresses are base58 strings of 32 to 44 characters. Do not invent an
address; if none is present, use null.

Respond with a JSON markdown block containing only the extracted value:

```json
{
    "pairAddress": string | null
}
```"#;

pub const PAIR_OHLCV_TEMPLATE: &str = r#"Given the recent messages below, extract the parameters for a Solana pair OHLCV (candlestick) request.

{{recentMessages}}

The latest message is:
{{userMessage}}

Extract:
- pairAddress: the Solana pair (liquidity pool) address, base58, 32 to 44 characters
- timeframe: one of 1s, 10s, 30s, 1min, 5min, 10min, 30min, 1h, 4h, 12h, 1d, 1w, 1M
- currency: "usd" or "native"
- fromDate / toDate: ISO dates (YYYY-MM-DD) bounding the period
- limit: number of candles

Use null for anything the user did not specify. Do not invent an address.

Respond with a JSON markdown block containing only the extracted values:

```json
{
    "pairAddress": string | null,
    "timeframe": string | null,
    "currency": string | null,
    "fromDate": string | null,
    "toDate": string | null,
    "limit": number | null
}
```"#;

pub const TOKEN_PAIRS_TEMPLATE: &str = r#"Given the recent messages below, extract the Solana token address whose trading pairs the user wants to see.

{{recentMessages}}

The latest message is:
{{userMessage}}

Extract:
- tokenAddress: the Solana token mint address, base58, 32 to 44 characters
- limit: how many pairs to list, if the user said

Use null for anything the user did not specify. Do not invent an address.

Respond with a JSON markdown block containing only the extracted values:

```json
{
    "tokenAddress": string | null,
    "limit": number | null
}
```"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::render_template;
    use serde_json::json;

    #[test]
    fn test_templates_render() {
        let data = json!({ "recentMessages": "user: hi", "userMessage": "hi" });
        for template in [
            TOKEN_ADDRESS_TEMPLATE,
            PAIR_ADDRESS_TEMPLATE,
            PAIR_OHLCV_TEMPLATE,
            TOKEN_PAIRS_TEMPLATE,
        ] {
            let rendered = render_template(template, &data).unwrap();
            assert!(rendered.contains("user: hi"));
            assert!(!rendered.contains("{{"));
        }
    }
}
