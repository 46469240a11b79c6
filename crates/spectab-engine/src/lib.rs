//! spectab Engine
//!
//! Validation and normalization of tabular product specification documents.
//!
//! # Overview
//!
//! A document flows through three stages:
//! - **Dispatch**: the `type` discriminant picks the rules (`grid`/`matrix`
//!   tables or opaque `chart` payloads)
//! - **Occupancy**: table cells must tile the grid exactly, row spans and
//!   column spans included
//! - **Normalization**: ids, defaults and the column count become explicit
//!
//! Every stage is a pure function; nothing here performs I/O or holds state.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use spectab_engine::SpecEngine;
//! use spectab_model::SpecificationDraft;
//!
//! let draft = SpecificationDraft::new(
//!     "Maximum Recommended Length of Run",
//!     "matrix",
//!     json!({
//!         "headers": [
//!             [{"value": "Pressure", "rowSpan": 2}, {"value": "Nominal Dia. 12mm", "colSpan": 2}],
//!             [{"value": "20 cm"}, {"value": "30 cm"}]
//!         ],
//!         "rows": [[{"value": "2 LPH", "isHeader": true}, {"value": 18}, {"value": 26}]]
//!     }),
//! );
//!
//! let doc = SpecEngine::default().validate_and_normalize(&draft).unwrap();
//! assert_eq!(doc.column_count(), Some(3));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod normalize;
pub mod occupancy;

// Re-exports
pub use config::EngineConfig;
pub use dispatch::{
    resolve_content_type, AcceptAnyChart, ChartSchema, Dispatcher, DocumentMeta, ValidatedContent,
    ValidatedDocument,
};
pub use engine::{validate_and_normalize, SpecEngine};
pub use error::{ConfigError, ValidationError};
pub use lifecycle::{display_sequence, merge_patch, toggle_active};
pub use normalize::normalize;
pub use occupancy::{OccupancyValidator, SectionLayout, TableLayout};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for engine callers
    pub use crate::{
        validate_and_normalize, ChartSchema, EngineConfig, SpecEngine, ValidationError,
    };
    pub use spectab_model::{
        ContentType, SpecificationDocument, SpecificationDraft, SpecificationPatch,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
