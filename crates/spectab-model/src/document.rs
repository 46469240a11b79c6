//! Specification documents
//!
//! [`SpecificationDraft`] is what a client submits, [`SpecificationDocument`]
//! is the normalized form handed back for persistence, and
//! [`SpecificationPatch`] carries a partial update.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::table::NormalizedTable;

/// Discriminant selecting which structural rules apply to `content`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Standard table
    #[default]
    Grid,
    /// Table with merged, multi-row headers
    Matrix,
    /// Chart payload, validated elsewhere
    Chart,
}

impl ContentType {
    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Matrix => "matrix",
            Self::Chart => "chart",
        }
    }

    /// True for the shapes checked by the occupancy rules
    #[inline]
    #[must_use]
    pub fn is_tabular(self) -> bool {
        matches!(self, Self::Grid | Self::Matrix)
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized content type discriminant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown content type '{0}'")]
pub struct UnknownContentType(pub String);

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grid" => Ok(Self::Grid),
            "matrix" => Ok(Self::Matrix),
            "chart" => Ok(Self::Chart),
            other => Err(UnknownContentType(other.to_string())),
        }
    }
}

/// Document as submitted by a client
///
/// `content` stays raw JSON until the discriminant has been checked, since a
/// chart payload has no fixed shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificationDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SpecificationDraft {
    /// Draft with the three fields every write needs
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        content_type: impl Into<String>,
        content: serde_json::Value,
    ) -> Self {
        Self {
            title: Some(title.into()),
            content_type: Some(content_type.into()),
            content: Some(content),
            ..Self::default()
        }
    }
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl SpecificationPatch {
    /// True when the patch changes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content_type.is_none()
            && self.content.is_none()
            && self.display_order.is_none()
            && self.is_active.is_none()
    }
}

/// Normalized content, one variant per shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DocumentContent {
    /// `grid` or `matrix` table
    Table(NormalizedTable),
    /// Opaque chart payload
    Chart(serde_json::Value),
}

impl DocumentContent {
    /// Table content, if any
    #[inline]
    #[must_use]
    pub fn as_table(&self) -> Option<&NormalizedTable> {
        match self {
            Self::Table(t) => Some(t),
            Self::Chart(_) => None,
        }
    }
}

/// Normalized specification document, safe to persist verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificationDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Uuid>,
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub content: DocumentContent,
    pub display_order: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SpecificationDocument {
    /// Derived column count for table documents
    #[inline]
    #[must_use]
    pub fn column_count(&self) -> Option<usize> {
        self.content.as_table().map(|t| t.column_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_round_trips_names() {
        for ty in [ContentType::Grid, ContentType::Matrix, ContentType::Chart] {
            assert_eq!(ty.as_str().parse::<ContentType>().unwrap(), ty);
        }
        assert_eq!(
            "banana".parse::<ContentType>(),
            Err(UnknownContentType("banana".to_string()))
        );
    }

    #[test]
    fn draft_reads_type_field() {
        let draft: SpecificationDraft = serde_json::from_str(
            r#"{"title":"Specs","type":"matrix","content":{},"displayOrder":"2"}"#,
        )
        .unwrap();
        assert_eq!(draft.content_type.as_deref(), Some("matrix"));
        assert_eq!(draft.display_order.as_deref(), Some("2"));
        assert!(draft.product_id.is_none());
    }

    #[test]
    fn empty_patch() {
        assert!(SpecificationPatch::default().is_empty());
        let patch = SpecificationPatch {
            is_active: Some(false),
            ..SpecificationPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
