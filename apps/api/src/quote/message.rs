//! The quoted chat message as received from clients.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// A chat message to be drawn as a bubble.
///
/// Only `from` and `text` are inspected here. Every other field (avatar,
/// entities, reply info, ...) belongs to the renderer's contract and is
/// forwarded untouched through `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub from: Value,
    #[serde(default)]
    pub text: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    /// Rejects messages whose `from` or `text` is missing or falsy.
    pub fn validate(&self) -> Result<(), AppError> {
        if !is_truthy(&self.from) {
            return Err(AppError::Validation("`from` is missing".into()));
        }
        if !is_truthy(&self.text) {
            return Err(AppError::Validation("`text` is missing".into()));
        }
        Ok(())
    }

    /// The message text, or `""` when `text` is not a string.
    pub fn text_str(&self) -> &str {
        self.text.as_str().unwrap_or("")
    }
}

/// JavaScript truthiness over JSON: null, false, 0 and "" are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
