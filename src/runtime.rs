#![allow(missing_docs)]
//! Host runtime seams.
//!
//! The plugin never owns the language model, the settings store or the
//! message bus. These traits and types are the narrow surface it needs from
//! the elizaOS agent runtime.

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub type ActionParameters = HashMap<String, Value>;

/// Read access to agent settings (character secrets, runtime overrides).
pub trait RuntimeSettings: Send + Sync {
    fn get_setting(&self, key: &str) -> Option<String>;
}

impl RuntimeSettings for HashMap<String, String> {
    fn get_setting(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModelType {
    TextSmall,
    TextLarge,
    ObjectSmall,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::TextSmall => "TEXT_SMALL",
            ModelType::TextLarge => "TEXT_LARGE",
            ModelType::ObjectSmall => "OBJECT_SMALL",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelParams {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ModelParams {
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Language model access provided by the host.
///
/// Retry policy, if any, belongs to the implementation; the plugin calls it
/// once per invocation.
#[async_trait]
pub trait ModelRuntime: Send + Sync {
    async fn use_model(&self, model_type: ModelType, params: ModelParams) -> anyhow::Result<String>;
}

/// An inbound chat message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    #[serde(default)]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
}

impl Memory {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Conversation state composed by the host before an action runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    #[serde(default)]
    pub recent_messages: Vec<String>,
    #[serde(default)]
    pub values: HashMap<String, Value>,
}

impl State {
    pub fn with_recent_messages<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            recent_messages: messages.into_iter().map(Into::into).collect(),
            values: HashMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

/// Payload delivered through the handler callback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

pub type HandlerCallback = Arc<dyn Fn(Content) -> BoxFuture<'static, ()> + Send + Sync>;

/// Outcome of one handler invocation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<ActionParameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    pub fn success(text: impl Into<String>, data: Value) -> Self {
        ActionResult {
            success: true,
            text: Some(text.into()),
            values: None,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(text: impl Into<String>, error: impl Into<String>) -> Self {
        ActionResult {
            success: false,
            text: Some(text.into()),
            values: None,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}
