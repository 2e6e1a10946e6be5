//! Input readers - parse source text into a [`Document`](crate::document::Document).

pub mod typescript;

pub use typescript::{parse_document, parse_document_with_max_depth};
