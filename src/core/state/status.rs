//! Export status record
//!
//! The persisted `{ version, outDirectory, success }` document that lets
//! external tooling detect an export which started but never finished.

use serde::{Deserialize, Serialize};

/// File name of the status record inside the build directory
pub const EXPORT_DETAIL: &str = "export-detail.json";

/// Current status record version
pub const STATUS_VERSION: u32 = 1;

/// Persisted export status
///
/// # Examples
///
/// ```
/// use pagex::core::state::ExportStatus;
///
/// let status = ExportStatus::started("/srv/site/out");
/// assert!(!status.success);
/// assert_eq!(status.version, 1);
///
/// let done = status.completed();
/// assert!(done.success);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStatus {
    /// Record format version
    pub version: u32,

    /// Output directory of the export this record describes
    pub out_directory: String,

    /// Whether the export finished successfully
    pub success: bool,
}

impl ExportStatus {
    /// Record written before any output
    pub fn started(out_directory: impl Into<String>) -> Self {
        Self {
            version: STATUS_VERSION,
            out_directory: out_directory.into(),
            success: false,
        }
    }

    /// The same record, marked successful
    pub fn completed(mut self) -> Self {
        self.success = true;
        self
    }

    /// An export that started and never reached the success write
    pub fn is_incomplete(&self) -> bool {
        !self.success
    }
}
