//! spectab Model
//!
//! Value types for tabular product specification documents.
//!
//! # Core Concepts
//!
//! - [`Cell`]: resolved table cell with value, alignment and spans
//! - [`Span`]: row/column extent of a cell, never below one
//! - [`Table`]: header block and body rows of a `grid` or `matrix` document
//! - [`SpecificationDraft`]: document as a client submits it
//! - [`SpecificationDocument`]: normalized document, ready to persist
//!
//! # Example
//!
//! ```rust
//! use spectab_model::{Align, Cell, CellDraft};
//!
//! let draft: CellDraft = serde_json::from_str(r#"{"value": "Pressure", "rowSpan": 2}"#).unwrap();
//! let cell = Cell::from_draft(draft, Align::Left).unwrap();
//! assert_eq!(cell.row_span().get(), 2);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cell;
pub mod document;
pub mod table;

// Re-exports
pub use cell::{Align, Cell, CellDraft, CellError, CellValue, Span, SpanAxis};
pub use document::{
    ContentType, DocumentContent, SpecificationDocument, SpecificationDraft, SpecificationPatch,
    UnknownContentType,
};
pub use table::{CanonicalCell, NormalizedTable, Section, Table, TableDraft};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
