//! Row/column span (merged cell) resolution.
//!
//! A span resolver may hand back a `[rowSpan, colSpan]` pair, a
//! `{rowspan, colspan}` object, or nothing at all. [`RawSpan`] models those shapes
//! and [`CellSpan::normalize`] is the single place they are interpreted.

use serde::{Deserialize, Serialize};

use super::{ColumnDefinition, Row};

/// Raw value returned by a span resolver, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum RawSpan {
    /// `[rowSpan, colSpan]`
    Pair(Vec<serde_json::Value>),
    /// `{ rowspan, colspan }`
    Object {
        #[serde(default)]
        rowspan: serde_json::Value,
        #[serde(default)]
        colspan: serde_json::Value,
    },
    /// No merge information for this cell.
    #[default]
    None,
}

impl RawSpan {
    /// Convenience for resolvers written in Rust.
    pub fn pair(row_span: u32, col_span: u32) -> Self {
        Self::Pair(vec![row_span.into(), col_span.into()])
    }
}

/// Normalized merge information for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    pub row_span: u32,
    pub col_span: u32,
}

impl Default for CellSpan {
    fn default() -> Self {
        Self::SINGLE
    }
}

impl CellSpan {
    /// An ordinary, unmerged cell.
    pub const SINGLE: Self = Self {
        row_span: 1,
        col_span: 1,
    };

    /// Interpret a resolver result.
    ///
    /// Array and object shapes coerce each component with `max(0, number or 0)`;
    /// any other shape means "no merge" and yields `1 x 1`.
    pub fn normalize(raw: &RawSpan) -> Self {
        match raw {
            RawSpan::Pair(values) => Self {
                row_span: coerce_span(values.first()),
                col_span: coerce_span(values.get(1)),
            },
            RawSpan::Object { rowspan, colspan } => Self {
                row_span: coerce_span(Some(rowspan)),
                col_span: coerce_span(Some(colspan)),
            },
            RawSpan::None => Self::SINGLE,
        }
    }

    /// A zero in either dimension means a neighbouring merge covers this cell.
    pub fn is_covered(self) -> bool {
        self.row_span == 0 || self.col_span == 0
    }

    pub fn is_merged(self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }
}

/// Numeric coercion of one span component: numbers and numeric strings are
/// truncated toward zero, everything else becomes 0, negatives clamp to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_span(value: Option<&serde_json::Value>) -> u32 {
    let number = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(serde_json::Value::Bool(true)) => 1.0,
        _ => 0.0,
    };
    if !number.is_finite() || number <= 0.0 {
        return 0;
    }
    number.trunc().min(f64::from(u32::MAX)) as u32
}

/// Arguments handed to a span resolver.
#[derive(Debug, Clone, Copy)]
pub struct SpanContext<'a> {
    pub row: &'a Row,
    pub column: &'a ColumnDefinition,
    /// Index of the row in the displayed sequence
    pub row_index: usize,
    /// Index of the column in the original (unpartitioned) column list
    pub col_index: usize,
}

/// Host callback deciding merges.
pub type SpanResolver = Box<dyn Fn(&SpanContext<'_>) -> RawSpan>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: serde_json::Value) -> RawSpan {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn pair_and_object_shapes_agree() {
        assert_eq!(
            CellSpan::normalize(&parse(json!([2, 3]))),
            CellSpan::normalize(&parse(json!({"rowspan": 2, "colspan": 3})))
        );
    }

    #[test]
    fn null_means_single_cell() {
        assert_eq!(CellSpan::normalize(&parse(json!(null))), CellSpan::SINGLE);
    }

    #[test]
    fn invalid_components_coerce_to_zero() {
        let span = CellSpan::normalize(&parse(json!(["x", -4])));
        assert_eq!(span.row_span, 0);
        assert_eq!(span.col_span, 0);
        assert!(span.is_covered());
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let span = CellSpan::normalize(&parse(json!(["2", 1.9])));
        assert_eq!(span, CellSpan { row_span: 2, col_span: 1 });
        assert!(span.is_merged());
    }

    #[test]
    fn short_pair_covers_cell() {
        let span = CellSpan::normalize(&parse(json!([1])));
        assert!(span.is_covered());
    }
}
