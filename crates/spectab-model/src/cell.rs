//! Cell and span primitives
//!
//! Provides [`Cell`], the atomic unit every specification table is built
//! from, together with its value, alignment and span types.
//!
//! Two shapes exist for a cell:
//! - [`CellDraft`]: the wire form, every field optional, spans as raw JSON
//!   numbers
//! - [`Cell`]: the resolved form, defaults applied, spans checked

use std::fmt::{self, Display, Formatter};
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Number;

/// Value held by a cell
///
/// Booleans mark a feature as present or absent; they are data, not a
/// checkbox widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Feature-present marker
    Bool(bool),
    /// Numeric value, kept in its JSON representation
    Number(serde_json::Number),
    /// Free text
    Text(String),
}

impl CellValue {
    /// Short name of the value kind, used in diagnostics
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Horizontal alignment of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl Display for Align {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which span a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpanAxis {
    #[serde(rename = "rowSpan")]
    Row,
    #[serde(rename = "colSpan")]
    Col,
}

impl Display for SpanAxis {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row => f.write_str("rowSpan"),
            Self::Col => f.write_str("colSpan"),
        }
    }
}

/// Number of grid rows or columns a cell occupies, always at least one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span(NonZeroU32);

impl Span {
    /// Span of a single row or column
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Check a declared span value
    ///
    /// # Errors
    /// Returns [`CellError::InvalidSpan`] when `value < 1` or it does not
    /// fit in 32 bits.
    pub fn new(axis: SpanAxis, value: i64) -> Result<Self, CellError> {
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or_else(|| CellError::InvalidSpan {
                axis,
                value: Number::from(value),
            })
    }

    /// Check a span as it appeared in JSON
    ///
    /// Integral floats such as `2.0` are accepted.
    ///
    /// # Errors
    /// - [`CellError::InvalidSpan`] for any value below one, fractional or
    ///   not, and for integers past 32 bits
    /// - [`CellError::FractionalSpan`] for a non-integral value of one or more
    pub fn from_number(axis: SpanAxis, value: &Number) -> Result<Self, CellError> {
        if let Some(int) = value.as_i64() {
            return Self::new(axis, int);
        }
        let invalid = || CellError::InvalidSpan {
            axis,
            value: value.clone(),
        };

        // Past i64::MAX, or a float
        let float = value.as_f64().ok_or_else(invalid)?;
        if float.is_nan() || float < 1.0 {
            return Err(invalid());
        }
        if float.fract() != 0.0 {
            return Err(CellError::FractionalSpan {
                axis,
                value: value.clone(),
            });
        }
        if float > f64::from(u32::MAX) {
            return Err(invalid());
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let int = float as u32;
        NonZeroU32::new(int).map(Self).ok_or_else(invalid)
    }

    /// Resolve an optional declared span, defaulting to one
    ///
    /// # Errors
    /// Same as [`Span::from_number`].
    pub fn resolve(axis: SpanAxis, declared: Option<&Number>) -> Result<Self, CellError> {
        declared.map_or(Ok(Self::ONE), |v| Self::from_number(axis, v))
    }

    /// Raw span count
    #[inline]
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Span count as an index width
    #[inline]
    #[must_use]
    pub fn width(self) -> usize {
        self.0.get() as usize
    }

    /// True when the span covers more than one row or column
    #[inline]
    #[must_use]
    pub fn is_merged(self) -> bool {
        self.0.get() > 1
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::ONE
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Span {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.get())
    }
}

/// Errors constructing a [`Cell`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CellError {
    /// Span below one
    #[error("{axis} must be a positive integer, got {value}")]
    InvalidSpan { axis: SpanAxis, value: Number },

    /// Span of one or more that is not a whole number
    #[error("{axis} must be a whole number, got {value}")]
    FractionalSpan { axis: SpanAxis, value: Number },
}

/// Cell as declared on the wire
///
/// Every field except `value` may be omitted. Spans stay raw JSON numbers
/// so that a zero, negative or fractional span reaches validation with its
/// position instead of failing in the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub value: CellValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_header: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_span: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_span: Option<Number>,
}

impl CellDraft {
    /// Draft holding only a value
    #[must_use]
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            id: None,
            value: value.into(),
            is_header: None,
            align: None,
            row_span: None,
            col_span: None,
        }
    }
}

/// Resolved table cell
///
/// All defaults are applied. `id` stays optional until normalization
/// assigns one from the cell's grid position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    id: Option<String>,
    value: CellValue,
    is_header: bool,
    align: Align,
    row_span: Span,
    col_span: Span,
}

impl Cell {
    /// Data cell with default alignment and unit spans
    #[must_use]
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            id: None,
            value: value.into(),
            is_header: false,
            align: Align::default(),
            row_span: Span::ONE,
            col_span: Span::ONE,
        }
    }

    /// Resolve a wire draft
    ///
    /// Blank ids count as absent. `default_align` applies when the draft
    /// carries no alignment.
    ///
    /// # Errors
    /// Any [`CellError`] from [`Span::from_number`].
    pub fn from_draft(draft: CellDraft, default_align: Align) -> Result<Self, CellError> {
        let row_span = Span::resolve(SpanAxis::Row, draft.row_span.as_ref())?;
        let col_span = Span::resolve(SpanAxis::Col, draft.col_span.as_ref())?;

        Ok(Self {
            id: draft.id.filter(|id| !id.trim().is_empty()),
            value: draft.value,
            is_header: draft.is_header.unwrap_or(false),
            align: draft.align.unwrap_or(default_align),
            row_span,
            col_span,
        })
    }

    /// Set explicit id
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Mark as row/column label
    #[must_use]
    pub fn header(mut self) -> Self {
        self.is_header = true;
        self
    }

    /// Set alignment
    #[must_use]
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Set both spans
    ///
    /// # Errors
    /// Returns [`CellError::InvalidSpan`] for a span below one.
    pub fn with_spans(mut self, row_span: i64, col_span: i64) -> Result<Self, CellError> {
        self.row_span = Span::new(SpanAxis::Row, row_span)?;
        self.col_span = Span::new(SpanAxis::Col, col_span)?;
        Ok(self)
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> &CellValue {
        &self.value
    }

    #[inline]
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.is_header
    }

    #[inline]
    #[must_use]
    pub fn align(&self) -> Align {
        self.align
    }

    #[inline]
    #[must_use]
    pub fn row_span(&self) -> Span {
        self.row_span
    }

    #[inline]
    #[must_use]
    pub fn col_span(&self) -> Span {
        self.col_span
    }

    /// Split into owned parts: id, value, header flag, alignment, row span, column span
    #[must_use]
    pub fn into_parts(self) -> (Option<String>, CellValue, bool, Align, Span, Span) {
        (
            self.id,
            self.value,
            self.is_header,
            self.align,
            self.row_span,
            self.col_span,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn draft_defaults_resolve() {
        let cell = Cell::from_draft(CellDraft::new("Flow Rate"), Align::Left).unwrap();

        assert_eq!(cell.id(), None);
        assert!(!cell.is_header());
        assert_eq!(cell.align(), Align::Left);
        assert_eq!(cell.row_span(), Span::ONE);
        assert_eq!(cell.col_span(), Span::ONE);
    }

    #[test]
    fn draft_uses_configured_default_align() {
        let cell = Cell::from_draft(CellDraft::new(18), Align::Right).unwrap();
        assert_eq!(cell.align(), Align::Right);

        let mut draft = CellDraft::new(18);
        draft.align = Some(Align::Center);
        let cell = Cell::from_draft(draft, Align::Right).unwrap();
        assert_eq!(cell.align(), Align::Center);
    }

    #[test]
    fn zero_span_is_rejected() {
        let mut draft = CellDraft::new("x");
        draft.row_span = Some(Number::from(0));

        let err = Cell::from_draft(draft, Align::Left).unwrap_err();
        assert_eq!(
            err,
            CellError::InvalidSpan {
                axis: SpanAxis::Row,
                value: Number::from(0)
            }
        );
    }

    fn number(json: &str) -> Number {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn fractional_spans_below_one_are_invalid() {
        for raw in ["0.5", "-1.5", "0.0", "-7"] {
            let err = Span::from_number(SpanAxis::Col, &number(raw)).unwrap_err();
            assert_eq!(
                err,
                CellError::InvalidSpan {
                    axis: SpanAxis::Col,
                    value: number(raw)
                },
                "span {raw}"
            );
        }
    }

    #[test]
    fn fractional_span_of_one_or_more_is_not_whole() {
        assert!(matches!(
            Span::from_number(SpanAxis::Row, &number("1.5")),
            Err(CellError::FractionalSpan { axis: SpanAxis::Row, .. })
        ));
        assert_eq!(Span::from_number(SpanAxis::Row, &number("2.0")).unwrap().get(), 2);
        assert!(matches!(
            Span::from_number(SpanAxis::Row, &number("1e12")),
            Err(CellError::InvalidSpan { .. })
        ));
    }

    #[test]
    fn negative_and_oversized_spans_are_rejected() {
        assert!(Span::new(SpanAxis::Col, -3).is_err());
        assert!(Span::new(SpanAxis::Col, i64::from(u32::MAX) + 1).is_err());
        assert_eq!(Span::new(SpanAxis::Col, 5).unwrap().get(), 5);
    }

    #[test]
    fn blank_id_counts_as_absent() {
        let mut draft = CellDraft::new("x");
        draft.id = Some("   ".to_string());
        let cell = Cell::from_draft(draft, Align::Left).unwrap();
        assert_eq!(cell.id(), None);
    }

    #[test]
    fn builder_rejects_bad_spans() {
        assert!(Cell::new("x").with_spans(1, 0).is_err());
        let cell = Cell::new("x").with_spans(2, 3).unwrap();
        assert_eq!(cell.row_span().get(), 2);
        assert_eq!(cell.col_span().get(), 3);
    }

    #[test]
    fn values_decode_by_json_kind() {
        let v: Vec<CellValue> = serde_json::from_str(r#"[true, 18, 2.5, "2-4"]"#).unwrap();
        assert_eq!(v[0], CellValue::Bool(true));
        assert_eq!(v[1], CellValue::from(18));
        assert_eq!(v[2].kind(), "number");
        assert_eq!(v[3], CellValue::from("2-4"));
    }

    #[test]
    fn integer_values_stay_integers() {
        let v: CellValue = serde_json::from_str("18").unwrap();
        assert_eq!(serde_json::to_string(&v).unwrap(), "18");
    }

    #[test]
    fn draft_wire_names_are_camel_case() {
        let draft: CellDraft = serde_json::from_str(
            r#"{"id":"h1","value":"Pressure","isHeader":true,"rowSpan":2,"colSpan":1}"#,
        )
        .unwrap();
        assert_eq!(draft.row_span, Some(Number::from(2)));
        assert_eq!(draft.is_header, Some(true));
    }
}
