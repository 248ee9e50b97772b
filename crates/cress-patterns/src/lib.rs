//! Text-level helpers for the cress feature runner.
//!
//! Everything here works on plain strings and carries no run state: locale
//! keyword tables, tag lines and tag filters, pipe-delimited table rows,
//! outline placeholder substitution, capture extraction, and snippet
//! proposals for undefined steps. The runtime crate builds on these pieces.

mod capture;
mod errors;
mod language;
mod placeholder;
mod snippet;
mod table;
mod tags;

pub use capture::{StepArguments, extract_arguments};
pub use errors::PatternError;
pub use language::{KeywordField, LANGUAGES, Language, first_alternative};
pub use placeholder::{has_placeholder, substitute_placeholders};
pub use snippet::SnippetProposal;
pub use table::{escape_cell, is_table_row, render_table, split_row};
pub use tags::{TagFilter, TagTerm, steal_tags_from_line};
