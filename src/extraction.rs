#![allow(missing_docs)]
//! Turning free text into a parameter map via the model.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{MoralisError, Result};
use crate::runtime::{ActionParameters, Memory, ModelParams, ModelRuntime, ModelType, State};
use crate::template::compose_prompt;

/// The balanced `{...}` opening at byte `start`, ignoring braces inside strings.
fn balanced_object_at(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse a model response into a JSON object.
///
/// Accepts bare JSON, fenced ```json blocks and JSON surrounded by prose.
/// Each `{` is tried in turn, so stray braces in the prose before the object
/// are skipped.
pub fn parse_json_object(text: &str) -> Result<Map<String, Value>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(MoralisError::extraction("model returned an empty response"));
    }

    let mut last_error = None;
    for (start, _) in trimmed.match_indices('{') {
        let Some(candidate) = balanced_object_at(trimmed, start) else {
            continue;
        };
        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(map)) => return Ok(map),
            Ok(_) => {}
            Err(e) => last_error = Some(e),
        }
    }

    Err(match last_error {
        Some(e) => MoralisError::extraction(format!("model response is not valid JSON: {e}")),
        None => MoralisError::extraction("no JSON object in model response"),
    })
}

/// Whether an extracted value counts as "not provided".
pub fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => {
            let s = s.trim();
            s.is_empty() || s.eq_ignore_ascii_case("null") || s.eq_ignore_ascii_case("none")
        }
        _ => false,
    }
}

/// Render the template, ask the model, and parse what it says.
pub async fn extract_parameters(
    runtime: &dyn ModelRuntime,
    template: &str,
    message: &Memory,
    state: &State,
) -> Result<ActionParameters> {
    let prompt = compose_prompt(template, message, state)?;

    let response = runtime
        .use_model(ModelType::TextSmall, ModelParams::with_prompt(prompt).temperature(0.0))
        .await
        .map_err(|e| MoralisError::Model(e.to_string()))?;

    debug!(response_len = response.len(), "Model responded to extraction prompt");

    let map = parse_json_object(&response)?;
    Ok(map
        .into_iter()
        .filter(|(_, v)| !is_absent(Some(v)))
        .collect())
}
