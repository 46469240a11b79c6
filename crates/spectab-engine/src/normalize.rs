//! Normalization into the canonical stored form
//!
//! The canonical form relies on no implicit default: every cell carries an
//! id, alignment, header flag and both spans, and table content carries its
//! derived `columnCount`. Normalizing a normalized document changes nothing.

use std::collections::HashSet;

use spectab_model::{
    CanonicalCell, Cell, DocumentContent, NormalizedTable, SpecificationDocument, Table,
};

use crate::config::EngineConfig;
use crate::dispatch::{ValidatedContent, ValidatedDocument};
use crate::occupancy::{SectionLayout, TableLayout};

/// Display order given to documents that declare none
pub const DEFAULT_DISPLAY_ORDER: &str = "0";

/// Produce the canonical document
#[must_use]
pub fn normalize(doc: ValidatedDocument, config: &EngineConfig) -> SpecificationDocument {
    let content = match doc.content {
        ValidatedContent::Table { table, layout } => {
            DocumentContent::Table(normalize_table(table, &layout, config))
        }
        ValidatedContent::Chart(payload) => DocumentContent::Chart(payload),
    };

    let meta = doc.meta;
    SpecificationDocument {
        id: meta.id,
        product_id: meta.product_id,
        title: meta.title,
        content_type: doc.content_type,
        content,
        display_order: meta
            .display_order
            .filter(|order| !order.is_empty())
            .unwrap_or_else(|| DEFAULT_DISPLAY_ORDER.to_string()),
        is_active: meta.is_active.unwrap_or(true),
        created_at: meta.created_at,
        updated_at: meta.updated_at,
    }
}

/// Canonicalize a table with the layout the occupancy check resolved for it
#[must_use]
pub(crate) fn normalize_table(table: Table, layout: &TableLayout, config: &EngineConfig) -> NormalizedTable {
    let mut ids = IdAllocator::new(table.cells().filter_map(Cell::id));

    let headers = canonical_rows(
        table.headers,
        &layout.headers,
        &config.header_id_prefix,
        &mut ids,
    );
    let rows = canonical_rows(table.rows, &layout.body, &config.body_id_prefix, &mut ids);

    NormalizedTable {
        headers,
        rows,
        column_count: layout.column_count,
    }
}

fn canonical_rows(
    rows: Vec<Vec<Cell>>,
    layout: &SectionLayout,
    prefix: &str,
    ids: &mut IdAllocator,
) -> Vec<Vec<CanonicalCell>> {
    rows.into_iter()
        .zip(layout.rows())
        .enumerate()
        .map(|(row_idx, (cells, starts))| {
            debug_assert_eq!(cells.len(), starts.len(), "layout out of step with row");
            cells
                .into_iter()
                .zip(starts)
                .map(|(cell, &column)| {
                    let (id, value, is_header, align, row_span, col_span) = cell.into_parts();
                    let id = id.unwrap_or_else(|| {
                        ids.claim(format!("{prefix}{}c{}", row_idx + 1, column + 1))
                    });
                    CanonicalCell {
                        id,
                        value,
                        is_header,
                        align,
                        row_span,
                        col_span,
                    }
                })
                .collect()
        })
        .collect()
}

/// Hands out position-derived ids that avoid every explicit id
#[derive(Debug, Default)]
struct IdAllocator {
    taken: HashSet<String>,
}

impl IdAllocator {
    fn new<'a>(explicit: impl Iterator<Item = &'a str>) -> Self {
        Self {
            taken: explicit.map(str::to_string).collect(),
        }
    }

    /// `base`, or `base-2`, `base-3`, … if taken
    fn claim(&mut self, base: String) -> String {
        let mut candidate = base.clone();
        let mut n = 1;
        while self.taken.contains(&candidate) {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}
