//! Content-type dispatch
//!
//! Reads the `type` discriminant and routes a draft either through the
//! occupancy rules (`grid`, `matrix`, unset) or to the [`ChartSchema`]
//! collaborator (`chart`). Document-level fields are checked here too.

use std::collections::HashSet;
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use spectab_model::{
    Align, Cell, CellDraft, ContentType, Section, SpecificationDraft, Table, TableDraft,
    UnknownContentType,
};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::ValidationError;
use crate::occupancy::{OccupancyValidator, TableLayout};

/// Validation of `chart` payloads, owned outside this crate
pub trait ChartSchema: Send + Sync + Debug {
    /// Accept or refuse a chart payload
    ///
    /// # Errors
    /// A human-readable reason, surfaced as
    /// [`ValidationError::ChartRejected`].
    fn validate(&self, payload: &serde_json::Value) -> Result<(), String>;
}

/// Chart schema accepting every payload
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAnyChart;

impl ChartSchema for AcceptAnyChart {
    fn validate(&self, _payload: &serde_json::Value) -> Result<(), String> {
        Ok(())
    }
}

/// Document metadata carried through validation unchanged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    /// Document id, owned by the persistence layer
    pub id: Option<Uuid>,
    /// Owning product
    pub product_id: Option<Uuid>,
    /// Checked title
    pub title: String,
    /// Declared display order, defaulted on normalization
    pub display_order: Option<String>,
    /// Declared active flag, defaulted on normalization
    pub is_active: Option<bool>,
    /// Creation time, passed through
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time, passed through
    pub updated_at: Option<DateTime<Utc>>,
}

/// Content that passed the rules for its shape
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedContent {
    /// Table whose cells tile the grid
    Table {
        /// Resolved cells
        table: Table,
        /// Start column of every cell in `table`
        layout: TableLayout,
    },
    /// Chart payload accepted by the chart schema
    Chart(serde_json::Value),
}

/// Document that passed validation and awaits normalization
///
/// Only [`Dispatcher::validate`] builds one, so a table reaching
/// [`normalize`](crate::normalize()) always comes with its own layout:
///
/// ```compile_fail
/// use spectab_engine::{ValidatedContent, ValidatedDocument};
///
/// let doc = ValidatedDocument {
///     meta: todo!(),
///     content_type: spectab_model::ContentType::Grid,
///     content: ValidatedContent::Chart(serde_json::json!({})),
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDocument {
    pub(crate) meta: DocumentMeta,
    pub(crate) content_type: ContentType,
    pub(crate) content: ValidatedContent,
}

impl ValidatedDocument {
    /// Metadata as submitted
    #[inline]
    #[must_use]
    pub fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    /// Resolved discriminant
    #[inline]
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Checked content
    #[inline]
    #[must_use]
    pub fn content(&self) -> &ValidatedContent {
        &self.content
    }
}

/// Resolve the `type` discriminant; unset or empty means `grid`
///
/// # Errors
/// Returns [`ValidationError::UnknownContentType`] for anything else.
pub fn resolve_content_type(raw: Option<&str>) -> Result<ContentType, ValidationError> {
    match raw {
        None | Some("") => Ok(ContentType::Grid),
        Some(s) => s
            .parse()
            .map_err(|UnknownContentType(value)| ValidationError::UnknownContentType { value }),
    }
}

/// Routes drafts to the rules of their content shape
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    config: &'a EngineConfig,
    chart_schema: &'a dyn ChartSchema,
}

impl<'a> Dispatcher<'a> {
    /// Create dispatcher over borrowed configuration and chart schema
    #[inline]
    #[must_use]
    pub fn new(config: &'a EngineConfig, chart_schema: &'a dyn ChartSchema) -> Self {
        Self {
            config,
            chart_schema,
        }
    }

    /// Validate a whole draft
    ///
    /// The discriminant is checked first, so an unknown type is reported
    /// before the title, display order or content are looked at.
    ///
    /// # Errors
    /// Any [`ValidationError`].
    pub fn validate(&self, draft: &SpecificationDraft) -> Result<ValidatedDocument, ValidationError> {
        let content_type = resolve_content_type(draft.content_type.as_deref())?;
        let title = self.check_title(draft.title.as_deref())?;
        self.check_display_order(draft.display_order.as_deref())?;
        let content = draft
            .content
            .as_ref()
            .ok_or(ValidationError::MissingField { field: "content" })?;

        tracing::debug!(%content_type, title, "dispatching specification document");
        let content = self.dispatch(content_type, content)?;

        Ok(ValidatedDocument {
            meta: DocumentMeta {
                id: draft.id,
                product_id: draft.product_id,
                title: title.to_string(),
                display_order: draft.display_order.clone(),
                is_active: draft.is_active,
                created_at: draft.created_at,
                updated_at: draft.updated_at,
            },
            content_type,
            content,
        })
    }

    /// Apply the rules of `content_type` to raw content
    ///
    /// # Errors
    /// Structural errors for tables, [`ValidationError::ChartRejected`] for
    /// charts.
    pub fn dispatch(
        &self,
        content_type: ContentType,
        content: &serde_json::Value,
    ) -> Result<ValidatedContent, ValidationError> {
        match content_type {
            ContentType::Grid | ContentType::Matrix => self.validate_table(content),
            ContentType::Chart => {
                self.chart_schema
                    .validate(content)
                    .map_err(|reason| ValidationError::ChartRejected { reason })?;
                Ok(ValidatedContent::Chart(content.clone()))
            }
        }
    }

    fn check_title<'t>(&self, title: Option<&'t str>) -> Result<&'t str, ValidationError> {
        let title = title.ok_or(ValidationError::MissingField { field: "title" })?;
        if title.trim().is_empty() {
            return Err(ValidationError::InvalidTitle {
                reason: "title must not be blank".to_string(),
            });
        }
        let len = title.chars().count();
        if len > self.config.max_title_len {
            return Err(ValidationError::InvalidTitle {
                reason: format!(
                    "title is {len} characters, limit is {}",
                    self.config.max_title_len
                ),
            });
        }
        Ok(title)
    }

    fn check_display_order(&self, order: Option<&str>) -> Result<(), ValidationError> {
        let Some(order) = order else {
            return Ok(());
        };
        let len = order.chars().count();
        if len > self.config.max_display_order_len {
            return Err(ValidationError::InvalidDisplayOrder {
                value: order.to_string(),
                len,
                limit: self.config.max_display_order_len,
            });
        }
        Ok(())
    }

    fn validate_table(&self, content: &serde_json::Value) -> Result<ValidatedContent, ValidationError> {
        let draft = TableDraft::deserialize(content).map_err(|e| {
            ValidationError::MalformedContent {
                reason: e.to_string(),
            }
        })?;

        let cells = draft.cell_count();
        if cells > self.config.max_cells {
            return Err(ValidationError::TableTooLarge {
                dimension: "cells",
                actual: cells,
                limit: self.config.max_cells,
            });
        }

        let table = resolve_cells(draft, self.config.default_align)?;
        check_unique_ids(&table)?;

        let layout = OccupancyValidator::new(self.config.max_columns).resolve(&table)?;
        Ok(ValidatedContent::Table { table, layout })
    }
}

/// Turn wire cells into resolved cells, keeping positions for errors
fn resolve_cells(draft: TableDraft, default_align: Align) -> Result<Table, ValidationError> {
    let resolve = |section: Section, rows: Vec<Vec<CellDraft>>| {
        rows.into_iter()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .into_iter()
                    .enumerate()
                    .map(|(index, cell)| {
                        Cell::from_draft(cell, default_align)
                            .map_err(|e| ValidationError::from_cell(e, section, row, index))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()
    };

    Ok(Table {
        headers: resolve(Section::Header, draft.headers)?,
        rows: resolve(Section::Body, draft.rows)?,
    })
}

/// Explicit ids must be unique across headers and body
fn check_unique_ids(table: &Table) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for id in table.cells().filter_map(Cell::id) {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateCellId { id: id.to_string() });
        }
    }
    Ok(())
}
