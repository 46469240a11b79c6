//! Occupancy validation
//!
//! Places every declared cell of a table on its grid and proves that the
//! cells tile it exactly: no holes, no overlaps, no row wider or narrower
//! than the derived column count, no row span outliving its section.
//!
//! Rows list only the cells that *start* in them. A cell with `rowSpan > 1`
//! reserves its columns in the rows below, and those rows leave the
//! reserved columns out of their declared cells:
//!
//! ```text
//! header row 0:  [Pressure rowSpan=2] [Nominal Dia. colSpan=5      ]
//! header row 1:  (reserved)           [20cm][30cm][40cm][50cm][60cm]
//! ```

use spectab_model::{Cell, Section, Span, Table};

use crate::error::ValidationError;

/// Resolved start column of every declared cell in one section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionLayout {
    starts: Vec<Vec<usize>>,
}

impl SectionLayout {
    /// Start column of the `index`-th declared cell of `row`
    #[inline]
    #[must_use]
    pub fn start_column(&self, row: usize, index: usize) -> Option<usize> {
        self.starts.get(row).and_then(|r| r.get(index)).copied()
    }

    /// Start columns, row by row
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Vec<usize>] {
        &self.starts
    }
}

/// Resolved geometry of a whole table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    /// Width every row resolves to
    pub column_count: usize,
    /// Header block placements
    pub headers: SectionLayout,
    /// Body placements
    pub body: SectionLayout,
}

impl TableLayout {
    /// Placements of one section
    #[inline]
    #[must_use]
    pub fn section(&self, section: Section) -> &SectionLayout {
        match section {
            Section::Header => &self.headers,
            Section::Body => &self.body,
        }
    }
}

/// Columns held by a cell declared in an earlier row
#[derive(Debug, Clone, Copy)]
struct Reservation {
    /// Rows still covered below the current one
    remaining: usize,
    origin_row: usize,
    origin_column: usize,
    row_span: u32,
}

/// Grid tiling check for `grid` and `matrix` tables
///
/// Runs once over the header block and once over the body, each with its
/// own pending-span map, against one derived column count.
///
/// # Performance
/// O(cells + rows × columns); `max_columns` bounds the second term.
#[derive(Debug, Clone, Copy)]
pub struct OccupancyValidator {
    max_columns: usize,
}

impl OccupancyValidator {
    /// Create validator rejecting tables wider than `max_columns`
    #[inline]
    #[must_use]
    pub fn new(max_columns: usize) -> Self {
        Self { max_columns }
    }

    /// Resolve the whole table
    ///
    /// # Errors
    /// Any structural error of [`ValidationError`], with the header block
    /// checked before the body.
    pub fn resolve(&self, table: &Table) -> Result<TableLayout, ValidationError> {
        let column_count = self.derive_column_count(table)?;
        tracing::debug!(column_count, "derived table width");

        let headers = self.resolve_section(Section::Header, &table.headers, column_count)?;
        let body = self.resolve_section(Section::Body, &table.rows, column_count)?;

        Ok(TableLayout {
            column_count,
            headers,
            body,
        })
    }

    /// Width of the first header row, or of the first body row when the
    /// table has no header
    ///
    /// Nothing is reserved yet in a section's first row, so its declared
    /// width is unambiguous.
    ///
    /// # Errors
    /// - [`ValidationError::EmptyTable`] with no rows or a zero width
    /// - [`ValidationError::TableTooLarge`] past `max_columns`
    pub fn derive_column_count(&self, table: &Table) -> Result<usize, ValidationError> {
        let first = table
            .headers
            .first()
            .or_else(|| table.rows.first())
            .ok_or(ValidationError::EmptyTable)?;

        let width = declared_width(first);
        if width == 0 {
            return Err(ValidationError::EmptyTable);
        }
        if width > self.max_columns {
            return Err(ValidationError::TableTooLarge {
                dimension: "columns",
                actual: width,
                limit: self.max_columns,
            });
        }
        Ok(width)
    }

    /// Place every cell of one section
    ///
    /// # Errors
    /// - [`ValidationError::SpanOverlap`] when a declared cell lands on a
    ///   reserved column
    /// - [`ValidationError::ColumnCountMismatch`] when a row resolves to the
    ///   wrong width
    /// - [`ValidationError::UnterminatedSpan`] when a row span outlives the
    ///   section
    pub fn resolve_section(
        &self,
        section: Section,
        rows: &[Vec<Cell>],
        column_count: usize,
    ) -> Result<SectionLayout, ValidationError> {
        let mut pending: Vec<Option<Reservation>> = vec![None; column_count];
        let mut starts = Vec::with_capacity(rows.len());

        for (row_idx, row) in rows.iter().enumerate() {
            let reserved = pending.iter().filter(|slot| slot.is_some()).count();
            let declared = declared_width(row);
            let resolved = declared.saturating_add(reserved);

            if resolved > column_count {
                // Cells that would fit without the reservation were declared
                // over it
                if declared <= column_count {
                    if let Some(column) = pending.iter().position(Option::is_some) {
                        return Err(ValidationError::SpanOverlap {
                            section,
                            row: row_idx,
                            column,
                        });
                    }
                }
                return Err(ValidationError::ColumnCountMismatch {
                    section,
                    row: row_idx,
                    expected: column_count,
                    actual: resolved,
                });
            }

            let mut cursor = 0;
            let mut row_starts = Vec::with_capacity(row.len());
            let mut opened: Vec<(usize, usize, Span)> = Vec::new();

            for cell in row {
                cursor = skip_reserved(&pending, cursor);

                let end = cursor + cell.col_span().width();
                if let Some(column) =
                    (cursor..end.min(column_count)).find(|&c| pending[c].is_some())
                {
                    return Err(ValidationError::SpanOverlap {
                        section,
                        row: row_idx,
                        column,
                    });
                }
                if end > column_count {
                    return Err(ValidationError::ColumnCountMismatch {
                        section,
                        row: row_idx,
                        expected: column_count,
                        actual: resolved,
                    });
                }

                row_starts.push(cursor);
                if cell.row_span().is_merged() {
                    opened.push((cursor, end, cell.row_span()));
                }
                cursor = end;
            }

            cursor = skip_reserved(&pending, cursor);
            if cursor != column_count {
                return Err(ValidationError::ColumnCountMismatch {
                    section,
                    row: row_idx,
                    expected: column_count,
                    actual: resolved,
                });
            }

            // This row consumed one row of every open reservation
            for slot in &mut pending {
                if let Some(res) = slot {
                    res.remaining -= 1;
                    if res.remaining == 0 {
                        *slot = None;
                    }
                }
            }

            for (start, end, span) in opened {
                let reservation = Reservation {
                    remaining: span.width() - 1,
                    origin_row: row_idx,
                    origin_column: start,
                    row_span: span.get(),
                };
                for slot in &mut pending[start..end] {
                    *slot = Some(reservation);
                }
            }

            starts.push(row_starts);
        }

        if let Some(res) = pending.iter().flatten().next() {
            return Err(ValidationError::UnterminatedSpan {
                section,
                row: res.origin_row,
                column: res.origin_column,
                row_span: res.row_span,
                remaining: res.remaining,
            });
        }

        Ok(SectionLayout { starts })
    }
}

impl Default for OccupancyValidator {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Sum of declared column spans
fn declared_width(row: &[Cell]) -> usize {
    row.iter()
        .fold(0usize, |acc, cell| acc.saturating_add(cell.col_span().width()))
}

/// First column at or after `cursor` not held by a reservation
fn skip_reserved(pending: &[Option<Reservation>], mut cursor: usize) -> usize {
    while cursor < pending.len() && pending[cursor].is_some() {
        cursor += 1;
    }
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain(n: usize) -> Vec<Cell> {
        (0..n).map(|i| Cell::new(format!("c{i}"))).collect()
    }

    fn spanned(row_span: i64, col_span: i64) -> Cell {
        Cell::new("merged").with_spans(row_span, col_span).unwrap()
    }

    fn table(headers: Vec<Vec<Cell>>, rows: Vec<Vec<Cell>>) -> Table {
        Table { headers, rows }
    }

    fn merged_header(second_row_cells: usize) -> Vec<Vec<Cell>> {
        vec![
            vec![spanned(2, 1), spanned(1, 5)],
            plain(second_row_cells),
        ]
    }

    #[test]
    fn flat_grid_resolves() {
        let t = table(vec![plain(3)], vec![plain(3), plain(3)]);
        let layout = OccupancyValidator::default().resolve(&t).unwrap();

        assert_eq!(layout.column_count, 3);
        assert_eq!(layout.body.rows(), &[vec![0, 1, 2], vec![0, 1, 2]]);
    }

    #[test]
    fn merged_header_derives_six_columns() {
        let t = table(merged_header(5), vec![plain(6)]);
        let layout = OccupancyValidator::default().resolve(&t).unwrap();

        assert_eq!(layout.column_count, 6);
        assert_eq!(layout.headers.rows(), &[vec![0, 1], vec![1, 2, 3, 4, 5]]);
    }

    #[test]
    fn cell_declared_over_reserved_column_overlaps() {
        let t = table(merged_header(6), vec![plain(6)]);
        let err = OccupancyValidator::default().resolve(&t).unwrap_err();

        assert_eq!(
            err,
            ValidationError::SpanOverlap {
                section: Section::Header,
                row: 1,
                column: 0,
            }
        );
    }

    #[test]
    fn row_span_category_column_is_skipped() {
        let rows = vec![
            vec![spanned(3, 1), Cell::new("Flow Rate"), Cell::new("2 LPH")],
            plain(2),
            plain(2),
            vec![spanned(2, 1), Cell::new("Material"), Cell::new("PE")],
            plain(2),
        ];
        let t = table(vec![plain(3)], rows);
        let layout = OccupancyValidator::default().resolve(&t).unwrap();

        assert_eq!(layout.body.start_column(1, 0), Some(1));
        assert_eq!(layout.body.start_column(3, 0), Some(0));
        assert_eq!(layout.body.start_column(4, 1), Some(2));
    }

    #[test]
    fn reserved_trailing_column_counts_toward_width() {
        let rows = vec![vec![Cell::new("a"), spanned(2, 1)], plain(1)];
        let t = table(vec![plain(2)], rows);
        let layout = OccupancyValidator::default().resolve(&t).unwrap();

        assert_eq!(layout.body.rows(), &[vec![0, 1], vec![0]]);
    }

    #[test]
    fn col_span_crossing_reservation_overlaps() {
        // Column 1 is held by the rowSpan cell; a colSpan=2 cell at column 0
        // would run through it.
        let rows = vec![
            vec![Cell::new("a"), spanned(2, 1), Cell::new("c")],
            vec![spanned(1, 2)],
        ];
        let t = table(vec![plain(3)], rows);
        let err = OccupancyValidator::default().resolve(&t).unwrap_err();

        assert_eq!(
            err,
            ValidationError::SpanOverlap {
                section: Section::Body,
                row: 1,
                column: 1,
            }
        );
    }

    #[test]
    fn short_row_is_a_mismatch() {
        let t = table(vec![plain(3)], vec![plain(3), plain(2)]);
        let err = OccupancyValidator::default().resolve(&t).unwrap_err();

        assert_eq!(
            err,
            ValidationError::ColumnCountMismatch {
                section: Section::Body,
                row: 1,
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn long_row_without_spans_is_a_mismatch() {
        let t = table(vec![plain(3)], vec![plain(4)]);
        let err = OccupancyValidator::default().resolve(&t).unwrap_err();

        assert!(matches!(
            err,
            ValidationError::ColumnCountMismatch {
                expected: 3,
                actual: 4,
                ..
            }
        ));
    }

    #[test]
    fn too_many_cells_beside_a_reservation_is_a_mismatch() {
        // Four declared columns would not fit even without the reservation.
        let rows = vec![vec![spanned(2, 1), Cell::new("b"), Cell::new("c")], plain(4)];
        let t = table(vec![plain(3)], rows);
        let err = OccupancyValidator::default().resolve(&t).unwrap_err();

        assert!(matches!(
            err,
            ValidationError::ColumnCountMismatch {
                row: 1,
                actual: 5,
                ..
            }
        ));
    }

    #[test]
    fn span_past_last_row_is_unterminated() {
        let headers = vec![vec![spanned(3, 1), spanned(1, 2)], plain(2)];
        let t = table(headers, vec![plain(3)]);
        let err = OccupancyValidator::default().resolve(&t).unwrap_err();

        assert_eq!(
            err,
            ValidationError::UnterminatedSpan {
                section: Section::Header,
                row: 0,
                column: 0,
                row_span: 3,
                remaining: 1,
            }
        );
    }

    #[test]
    fn header_span_does_not_reach_body() {
        let t = table(vec![vec![spanned(2, 1), Cell::new("b")]], vec![plain(1)]);
        let err = OccupancyValidator::default().resolve(&t).unwrap_err();

        assert!(matches!(
            err,
            ValidationError::UnterminatedSpan {
                section: Section::Header,
                ..
            }
        ));
    }

    #[test]
    fn fully_reserved_row_may_be_empty() {
        let rows = vec![vec![spanned(2, 2)], vec![]];
        let t = table(vec![plain(2)], rows);
        let layout = OccupancyValidator::default().resolve(&t).unwrap();

        assert_eq!(layout.body.rows(), &[vec![0], vec![]]);
    }

    #[test]
    fn rectangle_span_reserves_every_column() {
        let rows = vec![
            vec![spanned(2, 2), Cell::new("c")],
            vec![Cell::new("c2")],
            plain(3),
        ];
        let t = table(vec![plain(3)], rows);
        let layout = OccupancyValidator::default().resolve(&t).unwrap();

        assert_eq!(layout.body.start_column(1, 0), Some(2));
    }

    #[test]
    fn body_only_table_derives_width_from_first_row() {
        let t = table(vec![], vec![vec![spanned(1, 2), Cell::new("c")], plain(3)]);
        assert_eq!(OccupancyValidator::default().resolve(&t).unwrap().column_count, 3);
    }

    #[test]
    fn empty_tables_are_rejected() {
        let validator = OccupancyValidator::default();
        assert_eq!(
            validator.resolve(&Table::default()).unwrap_err(),
            ValidationError::EmptyTable
        );
        assert_eq!(
            validator.resolve(&table(vec![vec![]], vec![plain(2)])).unwrap_err(),
            ValidationError::EmptyTable
        );
    }

    #[test]
    fn wide_tables_are_rejected_before_allocation() {
        let t = table(vec![vec![spanned(1, 1_000_000)]], vec![]);
        let err = OccupancyValidator::new(64).resolve(&t).unwrap_err();

        assert_eq!(
            err,
            ValidationError::TableTooLarge {
                dimension: "columns",
                actual: 1_000_000,
                limit: 64,
            }
        );
    }
}
