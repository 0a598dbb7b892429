#![allow(missing_docs)]
//! elizaOS Moralis Plugin - Rust Implementation
//!
//! Solana market data for elizaOS agents via the Moralis Solana gateway:
//! token prices and metadata, pair statistics, OHLCV candles, and the
//! trading pairs of a token.
//!
//! Each action turns a chat message into one gateway request:
//! the model extracts the parameters, they are validated, a single GET is
//! issued, and the response is formatted into chat text plus structured
//! content delivered through the host's callback.
//!
//! # Example
//!
//! ```rust,ignore
//! use elizaos_plugin_moralis::plugin::MoralisPlugin;
//! use elizaos_plugin_moralis::runtime::{Memory, State};
//!
//! let plugin = MoralisPlugin::from_settings(&settings)?;
//! let message = Memory::new("Price of 6Rwcmkz9yiYVM5EzyMcr4JsQPGEAWhcUvLvfBperYnUt?");
//! let result = plugin
//!     .handle("GET_SOLANA_TOKEN_PRICE", &runtime, &message, &State::default(), Some(&callback))
//!     .await;
//! ```

#![deny(unsafe_code)]

pub mod actions;
pub mod client;
pub mod config;
pub mod error;
pub mod extraction;
pub mod format;
pub mod params;
pub mod plugin;
pub mod prompts;
pub mod runtime;
pub mod template;
pub mod types;

use client::MoralisClient;
use config::MoralisConfig;
use error::Result;

// Import directly from submodules:
// - plugin::MoralisPlugin
// - client::MoralisClient
// - config::MoralisConfig
// - error::{MoralisError, Result}
// - runtime::{ModelRuntime, Memory, State, ActionResult, HandlerCallback}

/// Create a Moralis client from environment variables.
///
/// # Errors
///
/// Returns an error if `MORALIS_API_KEY` is not set or other settings are invalid.
pub fn create_client_from_env() -> Result<MoralisClient> {
    let config = MoralisConfig::from_env()?;
    MoralisClient::new(config)
}

/// Plugin metadata
pub const PLUGIN_NAME: &str = "moralis";
/// Plugin description
pub const PLUGIN_DESCRIPTION: &str =
    "Moralis integration for elizaOS - Solana token prices, pair stats and OHLCV data";
/// Plugin version
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration constants
pub mod defaults {
    /// Moralis Solana gateway
    pub const SOLANA_GATEWAY_URL: &str = "https://solana-gateway.moralis.io";
    /// Request timeout in seconds
    pub const TIMEOUT_SECS: u64 = 30;
}
