//! Plugin entry point: configuration, shared client and action registry.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::actions::{
    ActionHandler, ActionPipeline, PairOhlcvAction, PairStatsAction, TokenMetadataAction,
    TokenPairStatsAction, TokenPairsAction, TokenPriceAction,
};
use crate::client::MoralisClient;
use crate::config::MoralisConfig;
use crate::error::Result;
use crate::runtime::{ActionResult, HandlerCallback, Memory, ModelRuntime, RuntimeSettings, State};
use crate::{PLUGIN_DESCRIPTION, PLUGIN_NAME};

/// The Moralis plugin with every action bound to one client.
pub struct MoralisPlugin {
    client: Arc<MoralisClient>,
    actions: Vec<Box<dyn ActionHandler>>,
}

impl MoralisPlugin {
    /// Build the plugin from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key is missing or any setting is invalid.
    pub fn new(config: MoralisConfig) -> Result<Self> {
        let client = Arc::new(MoralisClient::new(config)?);

        let actions: Vec<Box<dyn ActionHandler>> = vec![
            Box::new(ActionPipeline::new(TokenPriceAction, Arc::clone(&client))),
            Box::new(ActionPipeline::new(TokenMetadataAction, Arc::clone(&client))),
            Box::new(ActionPipeline::new(PairStatsAction, Arc::clone(&client))),
            Box::new(ActionPipeline::new(PairOhlcvAction, Arc::clone(&client))),
            Box::new(ActionPipeline::new(TokenPairsAction, Arc::clone(&client))),
            Box::new(ActionPipeline::new(TokenPairStatsAction, Arc::clone(&client))),
        ];

        info!(
            plugin = PLUGIN_NAME,
            base_url = %client.config().base_url(),
            actions = actions.len(),
            "Moralis plugin initialized"
        );

        Ok(Self { client, actions })
    }

    /// Resolve configuration from runtime settings (environment as fallback).
    pub fn from_settings(settings: &dyn RuntimeSettings) -> Result<Self> {
        Self::new(MoralisConfig::from_settings(settings)?)
    }

    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn description(&self) -> &'static str {
        PLUGIN_DESCRIPTION
    }

    pub fn config(&self) -> &MoralisConfig {
        self.client.config()
    }

    pub fn actions(&self) -> &[Box<dyn ActionHandler>] {
        &self.actions
    }

    pub fn action_names(&self) -> Vec<&'static str> {
        self.actions.iter().map(|a| a.definition().name).collect()
    }

    /// Look up an action by name or simile, ignoring case.
    pub fn find_action(&self, name: &str) -> Option<&dyn ActionHandler> {
        self.actions
            .iter()
            .find(|a| a.definition().matches(name))
            .map(|a| a.as_ref())
    }

    pub async fn handle(
        &self,
        action: &str,
        runtime: &dyn ModelRuntime,
        message: &Memory,
        state: &State,
        callback: Option<&HandlerCallback>,
    ) -> ActionResult {
        self.handle_at(action, runtime, message, state, callback, Utc::now())
            .await
    }

    /// Dispatch to the named action with an explicit reference time.
    pub async fn handle_at(
        &self,
        action: &str,
        runtime: &dyn ModelRuntime,
        message: &Memory,
        state: &State,
        callback: Option<&HandlerCallback>,
        now: DateTime<Utc>,
    ) -> ActionResult {
        match self.find_action(action) {
            Some(handler) => {
                handler
                    .handle_at(runtime, message, state, callback, now)
                    .await
            }
            None => {
                warn!(action, "Unknown Moralis action");
                ActionResult::failure(
                    format!("Unknown action: {action}"),
                    format!("no action named {action}"),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::API_KEY_SETTING;
    use crate::error::MoralisError;
    use std::collections::HashMap;

    fn plugin() -> MoralisPlugin {
        MoralisPlugin::new(MoralisConfig::new("test-key")).unwrap()
    }

    #[test]
    fn test_plugin_registers_all_actions() {
        let plugin = plugin();
        assert_eq!(plugin.name(), "moralis");
        assert_eq!(
            plugin.action_names(),
            vec![
                "GET_SOLANA_TOKEN_PRICE",
                "GET_SOLANA_TOKEN_METADATA",
                "GET_SOLANA_PAIR_STATS",
                "GET_SOLANA_PAIR_OHLCV",
                "GET_SOLANA_TOKEN_PAIRS",
                "GET_SOLANA_TOKEN_PAIR_STATS",
            ]
        );
    }

    #[test]
    fn test_find_action_by_simile() {
        let plugin = plugin();
        let action = plugin.find_action("solana_token_price").unwrap();
        assert_eq!(action.definition().name, "GET_SOLANA_TOKEN_PRICE");
        assert!(plugin.find_action("GET_ETH_PRICE").is_none());
    }

    #[test]
    fn test_action_names_and_similes_are_unique() {
        let plugin = plugin();
        let mut seen = std::collections::HashSet::new();
        for action in plugin.actions() {
            let definition = action.definition();
            assert!(seen.insert(definition.name.to_ascii_uppercase()), "{}", definition.name);
            for simile in definition.similes {
                assert!(seen.insert(simile.to_ascii_uppercase()), "{simile}");
            }
            assert!(!definition.examples.is_empty());
        }
    }

    #[test]
    fn test_plugin_requires_api_key() {
        let err = match MoralisPlugin::new(MoralisConfig::new("  ")) {
            Ok(_) => panic!("plugin built without an API key"),
            Err(e) => e,
        };
        assert!(matches!(err, MoralisError::Config(_)));
    }

    #[test]
    fn test_plugin_from_settings() {
        let settings: HashMap<String, String> =
            [(API_KEY_SETTING.to_string(), "from-settings".to_string())]
                .into_iter()
                .collect();
        let plugin = MoralisPlugin::from_settings(&settings).unwrap();
        assert_eq!(plugin.config().api_key, "from-settings");
    }
}
