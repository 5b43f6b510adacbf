//! Application fault envelope
//!
//! A well-formed response body may carry a top-level `Fault` object with a
//! non-empty `Error` array even when the transport call itself succeeded.
//! Such a body is an application-level error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fault payload decoded from a response body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "Error", default)]
    pub errors: Vec<FaultError>,
}

/// One entry of a fault's `Error` array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultError {
    #[serde(rename = "Message", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "Detail", default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(rename = "code", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "element", default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
}

impl Fault {
    /// Extract a fault from a decoded response body.
    ///
    /// Returns `Some` only when the body carries a `Fault` object with a
    /// non-empty `Error` array.
    pub fn from_body(body: &Value) -> Option<Self> {
        let fault = body.get("Fault")?;
        let fault: Self = serde_json::from_value(fault.clone()).ok()?;
        if fault.errors.is_empty() {
            None
        } else {
            Some(fault)
        }
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(kind) = &self.kind {
            write!(f, "{kind}: ")?;
        }
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::fmt::Display for FaultError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(code) = &self.code {
            write!(f, "[{code}] ")?;
        }
        f.write_str(self.message.as_deref().unwrap_or("unknown error"))?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}
