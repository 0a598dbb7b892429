//! Prompt template rendering.
//!
//! Extraction templates use Handlebars syntax (`{{recentMessages}}`,
//! `{{userMessage}}`). Rendering is strict about the template itself but
//! lenient about data: a missing value renders as an empty string.

use handlebars::Handlebars;
use serde_json::{json, Map, Value};

use crate::error::{MoralisError, Result};
use crate::runtime::{Memory, State};

/// Render a Handlebars template string using the provided JSON data.
pub fn render_template(template: &str, data: &Value) -> Result<String> {
    let mut h = Handlebars::new();
    // Prompts are plain text; HTML escaping would mangle addresses and quotes.
    h.register_escape_fn(handlebars::no_escape);
    h.register_template_string("t", template)
        .map_err(|e| MoralisError::Template(e.to_string()))?;
    h.render("t", data)
        .map_err(|e| MoralisError::Template(e.to_string()))
}

/// Build the render context for an extraction prompt.
///
/// State values are exposed under their own keys; `recentMessages` and
/// `userMessage` always win over state values of the same name.
pub fn compose_context(message: &Memory, state: &State) -> Value {
    let mut data: Map<String, Value> = state
        .values
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let recent = if state.recent_messages.is_empty() {
        message.text.clone()
    } else {
        state.recent_messages.join("\n")
    };

    data.insert("recentMessages".to_string(), json!(recent));
    data.insert("userMessage".to_string(), json!(message.text));
    Value::Object(data)
}

/// Compose the prompt for one invocation.
pub fn compose_prompt(template: &str, message: &Memory, state: &State) -> Result<String> {
    render_template(template, &compose_context(message, state))
}
