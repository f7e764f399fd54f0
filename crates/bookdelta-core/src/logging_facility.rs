//! Structured logging facility
//!
//! - Single initialization point via `init(profile)` or `init_to_file(..)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use bookdelta_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, init_to_file, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
