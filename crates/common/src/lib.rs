/// Common types shared across the b-roll planning pipeline
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while driving the analysis engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine process: {0}")]
    Spawn(String),

    #[error("engine exited with code {code}: {stderr}")]
    EngineFailed { code: i32, stderr: String },

    #[error("plan markers not found in engine output")]
    MarkersNotFound,

    #[error("failed to parse plan payload: {0}")]
    PlanParse(String),

    #[error("engine timed out after {0}s")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// A single b-roll insertion proposed by the engine.
///
/// The engine's reasoning layer controls the exact fields, so every field
/// is optional; an entry is accepted as long as it is a JSON object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insertion {
    /// Timestamp in the a-roll where the overlay starts, in seconds
    pub start_sec: Option<f64>,
    /// Overlay duration in seconds
    pub duration_sec: Option<f64>,
    /// Identifier of the matched b-roll clip (e.g. "broll_0")
    pub broll_id: Option<String>,
    /// Engine's explanation for the match
    pub reason: Option<String>,
    /// Match confidence in [0.0, 1.0]
    pub confidence: Option<f64>,
}

/// Analysis plan emitted by the engine between the stdout markers.
///
/// Only ever constructed from a successfully isolated and parsed payload;
/// never partially populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Proposed insertions; empty when the engine found no matches
    #[serde(default)]
    pub insertions: Vec<Insertion>,
}

impl Plan {
    /// Check whether the engine proposed any insertions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty()
    }
}
