//! Document readers.

pub mod document;

pub use document::parse_document_graph;
