//! Assertion steps shared by the probes
//!
//! Each step returns a `Result` so probes chain them with `?`.

use serde_json::Value;

use super::traits::ProbeError;
use crate::client::Reply;

/// Maximum number of body characters quoted in a failure message
const MAX_QUOTED_CHARS: usize = 200;

/// Require an exact status code
pub fn expect_status(reply: &Reply, expected: u16) -> Result<(), ProbeError> {
    if reply.status == expected {
        Ok(())
    } else {
        Err(ProbeError::StatusMismatch {
            expected,
            actual: reply.status,
        })
    }
}

/// Require a JSON object body with a top-level `field`; returns the parsed body
pub fn expect_json_field(reply: &Reply, field: &str) -> Result<Value, ProbeError> {
    let body = reply.json()?;
    if body.get(field).is_some() {
        Ok(body)
    } else {
        Err(ProbeError::MissingField {
            field: field.to_string(),
        })
    }
}

/// Require `expected` somewhere in `text`
pub fn expect_text(text: &str, expected: &str) -> Result<(), ProbeError> {
    if text.contains(expected) {
        Ok(())
    } else {
        Err(ProbeError::MissingSubstring {
            expected: expected.to_string(),
            actual: quote(text),
        })
    }
}

/// Require `expected` in either the reason phrase or the body
///
/// Protocol errors may be reported in the status line only.
pub fn expect_reason_or_body(reply: &Reply, expected: &str) -> Result<(), ProbeError> {
    if reply.reason.contains(expected) {
        return Ok(());
    }
    expect_text(&reply.body, expected).map_err(|_| ProbeError::MissingSubstring {
        expected: expected.to_string(),
        actual: quote(&format!("{} {}", reply.reason, reply.body)),
    })
}

fn quote(text: &str) -> String {
    let mut quoted: String = text.chars().take(MAX_QUOTED_CHARS).collect();
    if text.chars().count() > MAX_QUOTED_CHARS {
        quoted.push_str("...");
    }
    quoted
}
