// Job definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Payload handed from the upload handler to the worker pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessFileJob {
    pub file_id: String,
    pub file_path: PathBuf,
}
