//! Error types for the specification engine
//!
//! Every failure is a [`ValidationError`] value carrying the offending
//! section, row, column or span. Errors serialize with a `kind` tag so the
//! route layer can attach them to a client-facing rejection as-is.

use serde::Serialize;
use spectab_model::{CellError, Section, SpanAxis};

/// Structured rejection of a specification document
///
/// Row indices are 0-based within their section. Columns are resolved grid
/// columns, except for [`ValidationError::InvalidSpan`] whose `index` is the
/// cell's position in the declared row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum ValidationError {
    /// Declared span below one
    #[error("invalid {axis} {value} at {section} row {row}, cell {index}")]
    InvalidSpan {
        /// Header block or body
        section: Section,
        /// 0-based row within the section
        row: usize,
        /// Position of the cell in its declared row
        index: usize,
        /// Which span was bad
        axis: SpanAxis,
        /// Declared value
        value: serde_json::Number,
    },

    /// Nothing to derive a column count from
    #[error("table has no header or body row to derive a column count from")]
    EmptyTable,

    /// Declared cell collides with a row span opened above it
    #[error("{section} row {row} declares a cell over column {column}, which a row span above already covers")]
    SpanOverlap {
        /// Header block or body
        section: Section,
        /// 0-based row within the section
        row: usize,
        /// Resolved grid column
        column: usize,
    },

    /// Row resolves to the wrong width
    #[error("{section} row {row} covers {actual} columns, expected {expected}")]
    ColumnCountMismatch {
        /// Header block or body
        section: Section,
        /// 0-based row within the section
        row: usize,
        /// Derived column count
        expected: usize,
        /// Columns the row resolves to
        actual: usize,
    },

    /// Row span runs past the last row of its section
    #[error("rowSpan {row_span} at {section} row {row}, column {column} runs {remaining} row(s) past the end of the {section}")]
    UnterminatedSpan {
        /// Header block or body
        section: Section,
        /// 0-based row within the section
        row: usize,
        /// Resolved grid column
        column: usize,
        /// Declared row span
        row_span: u32,
        /// Rows still reserved after the last one
        remaining: usize,
    },

    /// Discriminant not in {grid, matrix, chart}
    #[error("unknown content type '{value}'")]
    UnknownContentType {
        /// Discriminant as submitted
        value: String,
    },

    /// Required document field absent
    #[error("missing required field '{field}'")]
    MissingField {
        /// Wire name of the field
        field: &'static str,
    },

    /// Title blank or too long
    #[error("invalid title: {reason}")]
    InvalidTitle {
        /// What is wrong with it
        reason: String,
    },

    /// Display order longer than the stored column allows
    #[error("displayOrder '{value}' is {len} characters, limit is {limit}")]
    InvalidDisplayOrder {
        /// Declared display order
        value: String,
        /// Length in characters
        len: usize,
        /// Configured maximum
        limit: usize,
    },

    /// Content does not have the table shape
    #[error("malformed content: {reason}")]
    MalformedContent {
        /// Decoder or shape message
        reason: String,
    },

    /// Two cells declare the same id
    #[error("duplicate cell id '{id}'")]
    DuplicateCellId {
        /// The repeated id
        id: String,
    },

    /// Table exceeds a configured size limit
    #[error("table has {actual} {dimension}, limit is {limit}")]
    TableTooLarge {
        /// `"cells"` or `"columns"`
        dimension: &'static str,
        /// Size found
        actual: usize,
        /// Configured maximum
        limit: usize,
    },

    /// Chart payload refused by the chart schema
    #[error("chart content rejected: {reason}")]
    ChartRejected {
        /// Reason given by the chart schema
        reason: String,
    },
}

impl ValidationError {
    /// Variant name, as serialized in the `kind` tag
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidSpan { .. } => "InvalidSpan",
            Self::EmptyTable => "EmptyTable",
            Self::SpanOverlap { .. } => "SpanOverlap",
            Self::ColumnCountMismatch { .. } => "ColumnCountMismatch",
            Self::UnterminatedSpan { .. } => "UnterminatedSpan",
            Self::UnknownContentType { .. } => "UnknownContentType",
            Self::MissingField { .. } => "MissingField",
            Self::InvalidTitle { .. } => "InvalidTitle",
            Self::InvalidDisplayOrder { .. } => "InvalidDisplayOrder",
            Self::MalformedContent { .. } => "MalformedContent",
            Self::DuplicateCellId { .. } => "DuplicateCellId",
            Self::TableTooLarge { .. } => "TableTooLarge",
            Self::ChartRejected { .. } => "ChartRejected",
        }
    }

    /// Check if error is retryable
    ///
    /// Malformed input stays malformed, so never.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// True for errors raised by the occupancy rules
    #[inline]
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::EmptyTable
                | Self::SpanOverlap { .. }
                | Self::ColumnCountMismatch { .. }
                | Self::UnterminatedSpan { .. }
        )
    }

    /// Attach a position to a cell construction error
    pub(crate) fn from_cell(err: CellError, section: Section, row: usize, index: usize) -> Self {
        match err {
            CellError::InvalidSpan { axis, value } => Self::InvalidSpan {
                section,
                row,
                index,
                axis,
                value,
            },
            err @ CellError::FractionalSpan { .. } => Self::MalformedContent {
                reason: format!("{section} row {row}, cell {index}: {err}"),
            },
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading a config file
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that failed
        path: std::path::PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or unknown key
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}
