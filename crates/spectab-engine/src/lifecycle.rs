//! Document lifecycle helpers
//!
//! Pure counterparts of the catalog's specification routes: partial
//! update, active toggle and public listing order. Persistence, locking and
//! audit stay with the caller.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use spectab_model::{SpecificationDocument, SpecificationDraft, SpecificationPatch};

use crate::error::ValidationError;

/// Build the full draft an update must pass
///
/// Absent patch fields fall back to the stored document, so the result is
/// always re-validated as a whole. A patch that only changes `type` thereby
/// re-checks the stored content against the new shape. An empty `type`
/// string counts as absent.
///
/// # Errors
/// Returns [`ValidationError::MalformedContent`] if the stored content
/// cannot be re-encoded.
pub fn merge_patch(
    existing: &SpecificationDocument,
    patch: &SpecificationPatch,
) -> Result<SpecificationDraft, ValidationError> {
    let content = match &patch.content {
        Some(content) => content.clone(),
        None => serde_json::to_value(&existing.content).map_err(|e| {
            ValidationError::MalformedContent {
                reason: e.to_string(),
            }
        })?,
    };

    let content_type = patch
        .content_type
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| existing.content_type.as_str().to_string());

    Ok(SpecificationDraft {
        id: existing.id,
        product_id: existing.product_id,
        title: Some(patch.title.clone().unwrap_or_else(|| existing.title.clone())),
        content_type: Some(content_type),
        content: Some(content),
        display_order: Some(
            patch
                .display_order
                .clone()
                .unwrap_or_else(|| existing.display_order.clone()),
        ),
        is_active: Some(patch.is_active.unwrap_or(existing.is_active)),
        created_at: existing.created_at,
        updated_at: existing.updated_at,
    })
}

/// Flip `isActive`, stamping `updatedAt`
#[must_use]
pub fn toggle_active(existing: &SpecificationDocument, now: DateTime<Utc>) -> SpecificationDocument {
    let mut doc = existing.clone();
    doc.is_active = !doc.is_active;
    doc.updated_at = Some(now);
    tracing::debug!(is_active = doc.is_active, title = %doc.title, "toggled specification");
    doc
}

/// Public listing order of a product's specifications
///
/// Inactive documents are dropped unless `include_inactive`. Display orders
/// are strings and sort lexically, so `"10"` lists before `"2"`; ties keep
/// their input order.
#[must_use]
pub fn display_sequence(
    documents: &[SpecificationDocument],
    include_inactive: bool,
) -> Vec<&SpecificationDocument> {
    let mut listed: Vec<&SpecificationDocument> = documents
        .iter()
        .filter(|doc| include_inactive || doc.is_active)
        .collect();
    listed.sort_by(|a, b| compare_display_order(&a.display_order, &b.display_order));
    listed
}

/// Listing order of two display order strings
#[inline]
#[must_use]
pub fn compare_display_order(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}
