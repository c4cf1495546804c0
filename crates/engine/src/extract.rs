//! Payload extraction from engine stdout
//!
//! The engine interleaves free-form diagnostics with exactly one JSON
//! block bracketed by literal marker tokens. Everything outside the first
//! marker pair is ignored.

use broll_common::{EngineError, Plan, Result};

/// Literal token opening the embedded JSON payload
pub const PLAN_START_MARKER: &str = "JSON_PLAN_START";
/// Literal token closing the embedded JSON payload
pub const PLAN_END_MARKER: &str = "JSON_PLAN_END";

/// Isolate the text strictly between the first marker pair.
///
/// Returns `None` when either marker is missing, or when the closing
/// marker appears before the opening one.
#[must_use]
pub fn isolate(output: &str) -> Option<&str> {
    let start = output.find(PLAN_START_MARKER)? + PLAN_START_MARKER.len();
    let end = output.find(PLAN_END_MARKER)?;
    output.get(start..end)
}

/// Parse the payload embedded in `output` into a [`Plan`].
///
/// Distinguishes an absent payload ([`EngineError::MarkersNotFound`]) from
/// a present but malformed one ([`EngineError::PlanParse`]); the two point
/// at different engine bugs.
pub fn extract_plan(output: &str) -> Result<Plan> {
    let payload = isolate(output).ok_or(EngineError::MarkersNotFound)?;
    serde_json::from_str(payload.trim()).map_err(|e| EngineError::PlanParse(e.to_string()))
}
