//! Summary band: rule selection, placeholder drawing and patching results in.

use std::collections::HashMap;

use tracing::debug;

use super::{band, GridEngine};
use crate::layout::PartitionedColumn;
use crate::render::{draw_summary_part, patch_summary_text, LayerKind, Region};
use crate::summary::{SummaryRequest, PLACEHOLDER};
use crate::types::{ColumnType, SummaryRule};

impl GridEngine {
    /// Rules offered for `column`, based on its declared type.
    pub fn summary_rules_for(&self, column: &str) -> &'static [SummaryRule] {
        let numeric = self
            .columns
            .iter()
            .find(|c| c.column_name == column)
            .is_some_and(|c| c.column_type == ColumnType::Number);
        if numeric {
            &SummaryRule::NUMERIC
        } else {
            &SummaryRule::TEXT
        }
    }

    pub fn summary_rule(&self, column: &str) -> SummaryRule {
        self.summaries.rule(column)
    }

    /// Select the summary rule for `column` and redraw the summary bands.
    pub fn set_summary_rule(&mut self, column: &str, rule: SummaryRule) {
        self.summaries.set_rule(column, rule);
        debug!(column, ?rule, "summary rule changed");
        self.draw_summary_bands();
        self.compositor.request_redraw(&[LayerKind::Summary]);
    }

    /// Text currently drawn in `column`'s summary cell.
    pub fn summary_text(&self, column: &str) -> Option<&str> {
        let cell = self.summary_cells.iter().find(|c| c.column == column)?;
        self.scene.text(cell.text).map(|t| t.text.as_str())
    }

    pub fn has_pending_summaries(&self) -> bool {
        self.summaries.has_pending()
    }

    /// Rebuild all three summary bands. Columns whose reduction is in flight
    /// show the placeholder until [`GridEngine::poll_aggregations`] patches them.
    pub(crate) fn draw_summary_bands(&mut self) {
        self.summary_cells.clear();
        let Some(groups) = self.groups else {
            return;
        };
        if !self.config.enable_summary {
            return;
        }

        let mut texts: HashMap<String, String> = HashMap::new();
        for column in &self.columns {
            let name = column.column_name.as_str();
            let values = self
                .display
                .iter()
                .map(|i| self.source.get(*i).and_then(|row| row.get(name)));
            let text = match self
                .summaries
                .request(name, values, self.executor.as_mut())
            {
                SummaryRequest::Ready(text) => text,
                SummaryRequest::Pending(_) => PLACEHOLDER.to_string(),
            };
            texts.insert(column.column_name.clone(), text);
        }

        let mut initial = |c: &PartitionedColumn| {
            texts.remove(&c.column.column_name).unwrap_or_default()
        };
        for region in Region::ALL {
            let cells = draw_summary_part(
                &mut self.scene,
                groups.summary(region),
                band(&self.partition, region),
                &self.config.style,
                &mut initial,
                self.measurer.as_mut(),
            );
            self.summary_cells.extend(cells);
        }
    }

    /// Collect finished aggregations and patch their text into the summary
    /// cells. Stale results are dropped. Returns the number of cells patched.
    pub fn poll_aggregations(&mut self) -> usize {
        let mut patched = 0;
        for response in self.executor.take_completed() {
            let Some((column, text)) = self.summaries.resolve(response) else {
                continue;
            };
            let Some(cell) = self.summary_cells.iter().find(|c| c.column == column) else {
                continue;
            };
            if patch_summary_text(&mut self.scene, cell.text, &text, self.measurer.as_mut()) {
                patched += 1;
            }
        }
        if patched > 0 {
            self.compositor.request_redraw(&[LayerKind::Summary]);
        }
        patched
    }
}
