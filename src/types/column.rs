use serde::{Deserialize, Serialize};

/// Which band a column is pinned to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Fixed {
    Left,
    Right,
}

/// Horizontal text alignment inside a cell.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment inside a cell.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Value kind of a column. Only `Number` changes behavior (summary rules).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ColumnType {
    Number,
    #[default]
    #[serde(other)]
    Text,
}

/// Synthetic column name that displays the 1-based row number.
pub const INDEX_COLUMN: &str = "__index__";

/// One data column of the grid.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    /// Key into row records (unique across the grid)
    pub column_name: String,
    /// Width in pixels; `None` means auto width
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Pinned band (`None` = scrollable center)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<Fixed>,
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub vertical_align: VerticalAlign,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub column_type: ColumnType,
    /// Header caption; falls back to `column_name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl ColumnDefinition {
    /// Create a center column with an explicit width.
    pub fn new(column_name: impl Into<String>, width: f64) -> Self {
        Self {
            column_name: column_name.into(),
            width: Some(width),
            ..Self::default()
        }
    }

    /// Builder: pin the column to a band.
    #[must_use]
    pub fn fixed(mut self, fixed: Fixed) -> Self {
        self.fixed = Some(fixed);
        self
    }

    /// Builder: enable the sort indicator.
    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Builder: enable the filter icon.
    #[must_use]
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Builder: mark as numeric.
    #[must_use]
    pub fn numeric(mut self) -> Self {
        self.column_type = ColumnType::Number;
        self
    }

    /// Builder: set text alignment.
    #[must_use]
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Declared width, missing widths count as 0.
    pub fn width_or_zero(&self) -> f64 {
        self.width.unwrap_or(0.0)
    }

    /// Caption shown in the header.
    pub fn caption(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.column_name)
    }

    pub fn is_index(&self) -> bool {
        self.column_name == INDEX_COLUMN
    }
}
