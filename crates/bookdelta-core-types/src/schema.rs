//! Canonical schema constants for structured logging
//!
//! Every crate logs through these keys so that a cycle can be followed in
//! the JSON output with a single `cycle_id` filter.

// Canonical field keys
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_CYCLE_ID: &str = "cycle_id";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Files and records
pub const FIELD_PATH: &str = "path";
pub const FIELD_RECORD_ID: &str = "record_id";
pub const FIELD_ROW_COUNT: &str = "row_count";

// Change counts
pub const FIELD_ADDED_COUNT: &str = "added_count";
pub const FIELD_CHANGED_COUNT: &str = "changed_count";
pub const FIELD_DUPLICATE_COUNT: &str = "duplicate_count";
pub const FIELD_PRUNED_COUNT: &str = "pruned_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
