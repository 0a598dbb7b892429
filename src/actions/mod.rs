#![allow(missing_docs)]
//! Actions for the Moralis plugin.
//!
//! Every action runs the same pipeline:
//!
//! ```text
//! VALIDATING_CONFIG -> EXTRACTING -> VALIDATING_PARAMS -> CALLING_API -> FORMATTING -> EMITTING
//! ```
//!
//! Any stage may fail; failures are logged with full detail, turned into a
//! short user-facing message, and emitted through the same callback as a
//! success. Nothing is retried and no error escapes the handler.

mod pair_ohlcv;
mod pair_stats;
mod token_metadata;
mod token_pair_stats;
mod token_pairs;
mod token_price;

pub use pair_ohlcv::{format_pair_ohlcv, OhlcvReport, PairOhlcvAction};
pub use pair_stats::{format_pair_stats, PairStatsAction};
pub use token_metadata::{format_token_metadata, TokenMetadataAction};
pub use token_pair_stats::{format_token_pair_stats, TokenPairStatsAction};
pub use token_pairs::{format_token_pairs, TokenPairsAction};
pub use token_price::{format_token_price, TokenPriceAction};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::client::MoralisClient;
use crate::error::{MoralisError, Result};
use crate::extraction::extract_parameters;
use crate::params::{validate_parameters, ActionParams};
use crate::runtime::{ActionResult, Content, HandlerCallback, Memory, ModelRuntime, State};
use crate::types::{ActionDefinition, FormattedResult};

/// Per-invocation pipeline stage, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ValidatingConfig,
    Extracting,
    ValidatingParams,
    CallingApi,
    Formatting,
    Emitting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::ValidatingConfig => "VALIDATING_CONFIG",
            Stage::Extracting => "EXTRACTING",
            Stage::ValidatingParams => "VALIDATING_PARAMS",
            Stage::CallingApi => "CALLING_API",
            Stage::Formatting => "FORMATTING",
            Stage::Emitting => "EMITTING",
        })
    }
}

/// What a single Moralis action contributes to the shared pipeline.
#[async_trait]
pub trait MoralisAction: Send + Sync + 'static {
    type Params: ActionParams;
    type Response: Serialize + Send + Sync;

    fn definition(&self) -> &'static ActionDefinition;

    /// Issue the API call. `now` is the invocation's reference time.
    async fn fetch(
        &self,
        client: &MoralisClient,
        params: &Self::Params,
        now: DateTime<Utc>,
    ) -> Result<Self::Response>;

    /// Pure mapping from the API payload to chat text and structured content.
    fn format(&self, params: &Self::Params, response: &Self::Response) -> FormattedResult;
}

/// Object-safe handler interface the plugin registers with the host.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    fn definition(&self) -> &'static ActionDefinition;

    /// Whether the action can run at all (configuration is usable).
    async fn validate(&self, message: &Memory) -> bool;

    /// Run the pipeline with an explicit reference time.
    async fn handle_at(
        &self,
        runtime: &dyn ModelRuntime,
        message: &Memory,
        state: &State,
        callback: Option<&HandlerCallback>,
        now: DateTime<Utc>,
    ) -> ActionResult;

    async fn handle(
        &self,
        runtime: &dyn ModelRuntime,
        message: &Memory,
        state: &State,
        callback: Option<&HandlerCallback>,
    ) -> ActionResult {
        self.handle_at(runtime, message, state, callback, Utc::now())
            .await
    }
}

/// Binds a [`MoralisAction`] to the shared client.
pub struct ActionPipeline<A> {
    action: A,
    client: Arc<MoralisClient>,
}

impl<A: MoralisAction> ActionPipeline<A> {
    pub fn new(action: A, client: Arc<MoralisClient>) -> Self {
        Self { action, client }
    }

    async fn run(
        &self,
        runtime: &dyn ModelRuntime,
        message: &Memory,
        state: &State,
        now: DateTime<Utc>,
    ) -> std::result::Result<FormattedResult, (Stage, MoralisError)> {
        let definition = self.action.definition();

        self.client
            .config()
            .validate()
            .map_err(|e| (Stage::ValidatingConfig, e))?;

        let extracted = extract_parameters(runtime, definition.template, message, state)
            .await
            .map_err(|e| (Stage::Extracting, e))?;
        debug!(action = definition.name, fields = ?extracted.keys().collect::<Vec<_>>(), "Parameters extracted");

        let params: A::Params = validate_parameters(&extracted, definition.required_fields)
            .map_err(|e| (Stage::ValidatingParams, e))?;

        let response = self
            .action
            .fetch(&self.client, &params, now)
            .await
            .map_err(|e| (Stage::CallingApi, e))?;

        Ok(self.action.format(&params, &response))
    }
}

async fn emit(callback: Option<&HandlerCallback>, content: Content) {
    if let Some(callback) = callback {
        callback(content).await;
    }
}

#[async_trait]
impl<A: MoralisAction> ActionHandler for ActionPipeline<A> {
    fn definition(&self) -> &'static ActionDefinition {
        self.action.definition()
    }

    async fn validate(&self, _message: &Memory) -> bool {
        self.client.config().validate().is_ok()
    }

    async fn handle_at(
        &self,
        runtime: &dyn ModelRuntime,
        message: &Memory,
        state: &State,
        callback: Option<&HandlerCallback>,
        now: DateTime<Utc>,
    ) -> ActionResult {
        let definition = self.action.definition();

        match self.run(runtime, message, state, now).await {
            Ok(FormattedResult { text, content }) => {
                info!(action = definition.name, stage = %Stage::Emitting, "Action completed");
                emit(
                    callback,
                    Content {
                        text: text.clone(),
                        content: Some(content.clone()),
                        actions: vec![definition.name.to_string()],
                        source: None,
                    },
                )
                .await;
                ActionResult::success(text, content).with_value("action", definition.name)
            }
            Err((stage, err)) => {
                if err.is_user_recoverable() {
                    warn!(action = definition.name, stage = %stage, error = %err, "Action needs more input");
                } else {
                    error!(
                        action = definition.name,
                        stage = %stage,
                        status = ?err.status_code(),
                        rate_limited = err.is_rate_limit(),
                        error = %err,
                        "Action failed"
                    );
                }

                let text = err.user_message(definition.missing_hint, definition.subject);
                emit(
                    callback,
                    Content {
                        text: text.clone(),
                        content: Some(json!({ "error": err.kind(), "stage": stage.to_string() })),
                        actions: vec![definition.name.to_string()],
                        source: None,
                    },
                )
                .await;
                ActionResult::failure(text, err.to_string()).with_value("action", definition.name)
            }
        }
    }
}
