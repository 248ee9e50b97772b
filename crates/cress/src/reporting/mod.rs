//! Renderers for run results.
//!
//! Both renderers work from a finished [`TotalResult`](crate::TotalResult)
//! and write to any [`std::io::Write`]; neither prints on its own.

/// Machine-readable JSON report.
pub mod json;
/// Plain-text end-of-run summary and snippet block.
pub mod summary;
