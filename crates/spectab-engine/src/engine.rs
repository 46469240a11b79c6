//! Engine facade
//!
//! [`SpecEngine`] is what the route/persistence layer holds: configuration
//! plus the chart-schema collaborator, shared freely across request tasks.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use spectab_model::{SpecificationDocument, SpecificationDraft, SpecificationPatch};

use crate::config::EngineConfig;
use crate::dispatch::{AcceptAnyChart, ChartSchema, Dispatcher, ValidatedDocument};
use crate::error::ValidationError;
use crate::lifecycle;
use crate::normalize::normalize;

/// Validation and normalization entry point
///
/// Holds no mutable state; clone it or share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SpecEngine {
    config: EngineConfig,
    chart_schema: Arc<dyn ChartSchema>,
}

impl SpecEngine {
    /// Create engine accepting any chart payload
    ///
    /// The configuration is used as given; configs read through
    /// [`EngineConfig::from_toml_str`] are already range-checked.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            chart_schema: Arc::new(AcceptAnyChart),
        }
    }

    /// Replace the chart-schema collaborator
    #[must_use]
    pub fn with_chart_schema(mut self, chart_schema: Arc<dyn ChartSchema>) -> Self {
        self.chart_schema = chart_schema;
        self
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Check a draft without normalizing it
    ///
    /// # Errors
    /// Any [`ValidationError`].
    pub fn validate(&self, draft: &SpecificationDraft) -> Result<ValidatedDocument, ValidationError> {
        Dispatcher::new(&self.config, self.chart_schema.as_ref()).validate(draft)
    }

    /// Validate a draft and return its canonical form
    ///
    /// This is the write path: the caller persists the result verbatim, or
    /// writes nothing when an error comes back.
    ///
    /// # Errors
    /// Any [`ValidationError`].
    pub fn validate_and_normalize(
        &self,
        draft: &SpecificationDraft,
    ) -> Result<SpecificationDocument, ValidationError> {
        match self.validate(draft) {
            Ok(validated) => {
                let doc = normalize(validated, &self.config);
                tracing::info!(
                    title = %doc.title,
                    content_type = %doc.content_type,
                    columns = doc.column_count(),
                    "specification document accepted"
                );
                Ok(doc)
            }
            Err(e) => {
                tracing::warn!(kind = e.kind(), "specification document rejected: {}", e);
                Err(e)
            }
        }
    }

    /// Apply a partial update to a stored document
    ///
    /// The merged document is validated in full; `updatedAt` becomes `now`.
    ///
    /// # Errors
    /// Any [`ValidationError`]; `existing` is left untouched.
    pub fn apply_update(
        &self,
        existing: &SpecificationDocument,
        patch: &SpecificationPatch,
        now: DateTime<Utc>,
    ) -> Result<SpecificationDocument, ValidationError> {
        let draft = lifecycle::merge_patch(existing, patch)?;
        let mut doc = self.validate_and_normalize(&draft)?;
        doc.updated_at = Some(now);
        Ok(doc)
    }
}

impl Default for SpecEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Validate and normalize with the default configuration
///
/// # Errors
/// Any [`ValidationError`].
pub fn validate_and_normalize(
    draft: &SpecificationDraft,
) -> Result<SpecificationDocument, ValidationError> {
    SpecEngine::default().validate_and_normalize(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use spectab_model::ContentType;

    #[derive(Debug)]
    struct RejectAll;

    impl ChartSchema for RejectAll {
        fn validate(&self, _payload: &serde_json::Value) -> Result<(), String> {
            Err("charts disabled".to_string())
        }
    }

    fn grid() -> SpecificationDraft {
        SpecificationDraft::new(
            "Specs",
            "grid",
            json!({"headers": [[{"value": "k"}, {"value": "v"}]], "rows": [[{"value": "a"}, {"value": 1}]]}),
        )
    }

    #[test]
    fn engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SpecEngine>();
    }

    #[test]
    fn custom_chart_schema_is_used() {
        let engine = SpecEngine::default().with_chart_schema(Arc::new(RejectAll));
        let draft = SpecificationDraft::new("Curve", "chart", json!({}));

        assert_eq!(
            engine.validate_and_normalize(&draft).unwrap_err().kind(),
            "ChartRejected"
        );
        assert!(engine.validate_and_normalize(&grid()).is_ok());
    }

    #[test]
    fn update_stamps_and_revalidates() {
        let engine = SpecEngine::default();
        let existing = engine.validate_and_normalize(&grid()).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

        let patch = SpecificationPatch {
            content: Some(json!({"rows": [[{"value": 1}], [{"value": 2}, {"value": 3}]]})),
            ..SpecificationPatch::default()
        };
        assert_eq!(
            engine.apply_update(&existing, &patch, now).unwrap_err().kind(),
            "ColumnCountMismatch"
        );

        let patch = SpecificationPatch {
            display_order: Some("5".to_string()),
            ..SpecificationPatch::default()
        };
        let updated = engine.apply_update(&existing, &patch, now).unwrap();
        assert_eq!(updated.display_order, "5");
        assert_eq!(updated.updated_at, Some(now));
        assert_eq!(updated.content, existing.content);
    }

    #[test]
    fn type_change_rechecks_stored_content() {
        let engine = SpecEngine::default();
        let chart = engine
            .validate_and_normalize(&SpecificationDraft::new("Curve", "chart", json!({"series": [1, 2]})))
            .unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

        let patch = SpecificationPatch {
            content_type: Some("grid".to_string()),
            ..SpecificationPatch::default()
        };
        assert_eq!(
            engine.apply_update(&chart, &patch, now).unwrap_err().kind(),
            "EmptyTable"
        );

        let table = engine.validate_and_normalize(&grid()).unwrap();
        let patch = SpecificationPatch {
            content_type: Some("matrix".to_string()),
            ..SpecificationPatch::default()
        };
        let updated = engine.apply_update(&table, &patch, now).unwrap();
        assert_eq!(updated.content_type, ContentType::Matrix);
    }

    #[test]
    fn free_function_uses_defaults() {
        let doc = validate_and_normalize(&grid()).unwrap();
        assert_eq!(doc.column_count(), Some(2));
    }
}
