//! The `{help, success, result, error}` wrapper around every action response

use ckan_common::{CkanError, Result, UNKNOWN_API_ERROR};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response envelope shared by every CKAN action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Link to the action's documentation
    #[serde(default)]
    pub help: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<EnvelopeError>,
}

/// Failure details carried by an unsuccessful envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvelopeError {
    #[serde(default)]
    pub message: Option<String>,
    /// Error class, e.g. "Not Found Error" or "Validation Error"
    #[serde(default, rename = "__type")]
    pub kind: Option<String>,
    /// Per-field validation messages and anything else the portal adds
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Envelope {
    /// The action's result, or the failure it reported
    pub fn into_result(self) -> Result<Value> {
        if self.success {
            return Ok(self.result);
        }

        let error = self.error.unwrap_or_default();
        Err(CkanError::Api {
            message: error.message.unwrap_or_else(|| UNKNOWN_API_ERROR.to_string()),
            kind: error.kind,
        })
    }
}
