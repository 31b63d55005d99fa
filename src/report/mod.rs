//! Report submission endpoint.
//!
//! Users flag URLs as malicious, safe or false positives. Reports are
//! validated, normalized and appended to a document store. This module
//! never touches the application store.

pub mod error;
pub mod router;
pub mod server;
pub mod store;
pub mod types;

pub use error::{ErrorResponse, ReportError, ServerError};
pub use router::build_router;
pub use server::{ReportServer, ReportServerHandle};
pub use store::{JsonlReportStore, MemoryReportStore, ReportStore};
pub use types::{normalize_url, ReportDocument, ReportRequest, ReportType, RequestMeta};
