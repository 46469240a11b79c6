//! Table content for `grid` and `matrix` documents

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::cell::{Align, Cell, CellDraft, CellValue, Span};

/// Part of a table a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Header block
    Header,
    /// Body rows
    Body,
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => f.write_str("header"),
            Self::Body => f.write_str("body"),
        }
    }
}

/// Table content as declared on the wire
///
/// A missing `headers` or `rows` list decodes as empty. `columnCount` is
/// accepted so normalized documents decode again, but it is always derived
/// anew.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDraft {
    /// Header rows, as declared
    #[serde(default)]
    pub headers: Vec<Vec<CellDraft>>,
    /// Body rows, as declared
    #[serde(default)]
    pub rows: Vec<Vec<CellDraft>>,
    /// Client-supplied width; ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_count: Option<u64>,
}

impl TableDraft {
    /// Number of declared cells across headers and body
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.headers
            .iter()
            .chain(self.rows.iter())
            .map(Vec::len)
            .sum()
    }
}

/// Table with resolved cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Header block, possibly several merged rows
    pub headers: Vec<Vec<Cell>>,
    /// Body rows
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Rows of one section
    #[inline]
    #[must_use]
    pub fn section(&self, section: Section) -> &[Vec<Cell>] {
        match section {
            Section::Header => &self.headers,
            Section::Body => &self.rows,
        }
    }

    /// True when neither headers nor body declare a row
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// All cells, headers first, in declaration order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.headers.iter().chain(self.rows.iter()).flatten()
    }
}

/// Cell in canonical form: every field explicit, id assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalCell {
    /// Explicit or position-derived id, unique in the document
    pub id: String,
    pub value: CellValue,
    /// Row or column label
    pub is_header: bool,
    pub align: Align,
    pub row_span: Span,
    pub col_span: Span,
}

impl From<&CanonicalCell> for CellDraft {
    fn from(cell: &CanonicalCell) -> Self {
        Self {
            id: Some(cell.id.clone()),
            value: cell.value.clone(),
            is_header: Some(cell.is_header),
            align: Some(cell.align),
            row_span: Some(serde_json::Number::from(cell.row_span.get())),
            col_span: Some(serde_json::Number::from(cell.col_span.get())),
        }
    }
}

/// Normalized table content with its derived column count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTable {
    /// Header block
    pub headers: Vec<Vec<CanonicalCell>>,
    /// Body rows
    pub rows: Vec<Vec<CanonicalCell>>,
    /// Width every row resolves to
    pub column_count: usize,
}

impl NormalizedTable {
    /// Look up a cell by id
    #[must_use]
    pub fn find_cell(&self, id: &str) -> Option<&CanonicalCell> {
        self.headers
            .iter()
            .chain(self.rows.iter())
            .flatten()
            .find(|c| c.id == id)
    }
}

impl From<&NormalizedTable> for TableDraft {
    fn from(table: &NormalizedTable) -> Self {
        let convert = |rows: &[Vec<CanonicalCell>]| -> Vec<Vec<CellDraft>> {
            rows.iter()
                .map(|row| row.iter().map(CellDraft::from).collect())
                .collect()
        };

        Self {
            headers: convert(&table.headers),
            rows: convert(&table.rows),
            column_count: u64::try_from(table.column_count).ok(),
        }
    }
}
