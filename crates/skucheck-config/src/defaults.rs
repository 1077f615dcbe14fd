//! Default endpoints and identifiers.
//!
//! # Design
//! - Centralize defaults so the loader, docs, and tests agree.
//! - Every value can be overridden from the environment or a config file.

/// Record store REST root.
pub const DEFAULT_AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";
/// Base holding the inventory tables.
pub const DEFAULT_BASE_ID: &str = "apptD8GSxN3vhhivI";
/// Product (inventory) table.
pub const DEFAULT_PRODUCT_TABLE: &str = "tblddAcLcQAyk050u";
/// Linked raw-data table used for the folder fallback.
pub const DEFAULT_LINKED_TABLE: &str = "tblUWMOM3HKCCEwu6";
/// File storage REST root.
pub const DEFAULT_DRIVE_API_URL: &str = "https://www.googleapis.com";
/// Maximum number of files returned by one folder listing.
pub const DEFAULT_PAGE_SIZE: u32 = 100;
/// Per-request HTTP timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Upper bound accepted for the page size.
pub(crate) const MAX_PAGE_SIZE: u32 = 1_000;
