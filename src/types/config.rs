use serde::{Deserialize, Serialize};

use super::{ColumnDefinition, Row};
use crate::error::Result;

const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";

/// How clicks on sort indicators combine.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortMode {
    /// One sort key at a time, cycling unsorted -> asc -> desc -> unsorted.
    Single,
    /// A priority list of keys; clicks append, flip or remove.
    #[default]
    Multi,
}

/// Full styling palette, one entry per region.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GridStyle {
    pub highlight_cell_background: String,
    pub highlight_row_background: String,
    pub highlight_col_background: String,

    pub header_row_height: f64,
    pub header_background: String,
    pub header_text_color: String,
    pub header_font_family: String,
    pub header_font_size: f64,

    pub body_row_height: f64,
    /// Fill for rows with an even index (the first, third, ... visible record)
    #[serde(alias = "bodyBackgroundOdd")]
    pub body_background: String,
    /// Fill for rows with an odd index
    #[serde(alias = "bodyBackgroundEven")]
    pub body_background_alt: String,
    pub body_text_color: String,
    pub body_font_family: String,
    pub body_font_size: f64,

    pub border_color: String,

    pub summary_row_height: f64,
    pub summary_background: String,
    pub summary_text_color: String,
    pub summary_font_family: String,
    pub summary_font_size: f64,

    pub scrollbar_size: f64,
    pub scrollbar_background: String,
    pub scrollbar_thumb_background: String,
    pub scrollbar_thumb_hover_background: String,

    pub sort_active_color: String,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            highlight_cell_background: "rgba(24, 144, 255, 1)".to_string(),
            highlight_row_background: "rgba(64, 158, 255, 0.1)".to_string(),
            highlight_col_background: "rgba(64, 158, 255, 0.08)".to_string(),
            header_row_height: 32.0,
            header_background: "#f7f7f9".to_string(),
            header_text_color: "#303133".to_string(),
            header_font_family: DEFAULT_FONT_FAMILY.to_string(),
            header_font_size: 13.0,
            body_row_height: 30.0,
            body_background: "#ffffff".to_string(),
            body_background_alt: "#fafafa".to_string(),
            body_text_color: "#303133".to_string(),
            body_font_family: DEFAULT_FONT_FAMILY.to_string(),
            body_font_size: 13.0,
            border_color: "#dcdfe6".to_string(),
            summary_row_height: 30.0,
            summary_background: "#f7f7f9".to_string(),
            summary_text_color: "#303133".to_string(),
            summary_font_family: DEFAULT_FONT_FAMILY.to_string(),
            summary_font_size: 14.0,
            scrollbar_size: 16.0,
            scrollbar_background: "#f1f1f1".to_string(),
            scrollbar_thumb_background: "#c1c1c1".to_string(),
            scrollbar_thumb_hover_background: "#a8a8a8".to_string(),
            sort_active_color: "#409EFF".to_string(),
        }
    }
}

/// Behavioral configuration supplied by the host.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Extra rows materialized above and below the viewport
    pub buffer_rows: usize,
    /// Lower bound for auto-sized columns
    pub min_auto_col_width: f64,
    pub enable_summary: bool,
    pub sort_mode: SortMode,
    pub style: GridStyle,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            buffer_rows: 50,
            min_auto_col_width: 100.0,
            enable_summary: false,
            sort_mode: SortMode::Multi,
            style: GridStyle::default(),
        }
    }
}

impl GridConfig {
    /// Parse a config object; unknown keys are ignored and missing keys take defaults.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Height reserved by the summary row (0 when disabled).
    pub fn summary_height(&self) -> f64 {
        if self.enable_summary {
            self.style.summary_row_height
        } else {
            0.0
        }
    }
}

/// Everything needed to stand up a grid: configuration, the two column groups and
/// the dataset.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GridSpec {
    pub config: GridConfig,
    /// Grouping columns (rendered first)
    pub group_columns: Vec<ColumnDefinition>,
    /// Measure columns (rendered after the grouping columns)
    pub value_columns: Vec<ColumnDefinition>,
    pub data: Vec<Row>,
}

impl GridSpec {
    /// # Errors
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Grouping columns followed by measure columns, in declaration order.
    pub fn columns(&self) -> Vec<ColumnDefinition> {
        self.group_columns
            .iter()
            .chain(self.value_columns.iter())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = GridConfig::from_json("{}").unwrap();
        assert_eq!(config, GridConfig::default());
        assert_eq!(config.buffer_rows, 50);
        assert_eq!(config.style.body_row_height, 30.0);
    }

    #[test]
    fn partial_style_overrides_merge_with_defaults() {
        let config =
            GridConfig::from_json(r#"{"enableSummary":true,"style":{"headerRowHeight":40}}"#)
                .unwrap();
        assert!(config.enable_summary);
        assert_eq!(config.style.header_row_height, 40.0);
        assert_eq!(config.style.scrollbar_size, 16.0);
        assert_eq!(config.summary_height(), 30.0);
    }

    #[test]
    fn legacy_row_background_names_are_accepted() {
        let config =
            GridConfig::from_json(r##"{"style":{"bodyBackgroundOdd":"#000000"}}"##).unwrap();
        assert_eq!(config.style.body_background, "#000000");
    }

    #[test]
    fn spec_concatenates_column_groups() {
        let spec = GridSpec::from_json(
            r#"{"groupColumns":[{"columnName":"a","fixed":"left"}],
                "valueColumns":[{"columnName":"b","width":80,"columnType":"number"}],
                "data":[{"a":"x","b":1}]}"#,
        )
        .unwrap();
        let names: Vec<_> = spec.columns().into_iter().map(|c| c.column_name).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(spec.data.len(), 1);
    }
}
