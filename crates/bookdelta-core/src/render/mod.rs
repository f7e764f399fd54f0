//! Rendering of snapshot records into retrieval documents.

pub mod record_text;

pub use record_text::{render_record_text, render_record_texts};
