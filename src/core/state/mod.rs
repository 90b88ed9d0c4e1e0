// Export status record and its persistence

pub mod manager;
pub mod status;

pub use manager::StatusPersister;
pub use status::{ExportStatus, EXPORT_DETAIL, STATUS_VERSION};
