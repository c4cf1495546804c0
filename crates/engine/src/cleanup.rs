//! Transient upload removal

use std::path::PathBuf;
use tracing::{info, warn};

/// Delete every uploaded input belonging to one invocation.
///
/// Best effort: a path that cannot be removed is logged and skipped, and
/// the invocation's outcome is never affected.
pub async fn remove_uploads(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!("Failed to remove upload {}: {}", path.display(), e);
        }
    }
    info!("Cleaned up uploaded files.");
}
