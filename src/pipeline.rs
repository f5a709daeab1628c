//! Sort and filter pipeline.
//!
//! The source dataset is never reordered or mutated. [`derive_display_rows`]
//! returns a fresh list of source indices in display order, and everything
//! downstream (row window, renderer, summary) reads rows through it.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::types::{CellValue, FilterSpec, Row, SortColumn, SortMode, SortOrder, SortSpec};

/// Case-aware lexical comparison.
///
/// Letters compare case-insensitively first; when two strings differ only by case,
/// the lowercase form sorts first.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca != cb {
            // lowercase before uppercase
            return match (ca.is_lowercase(), cb.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => ca.cmp(&cb),
            };
        }
    }
    a.chars().count().cmp(&b.chars().count())
}

/// Compare two field values: numerically when both are finite numbers (or parse as
/// such), otherwise by their display strings.
pub fn compare_values(a: Option<&CellValue>, b: Option<&CellValue>) -> Ordering {
    let an = a.and_then(CellValue::as_number);
    let bn = b.and_then(CellValue::as_number);
    if let (Some(x), Some(y)) = (an, bn) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    let sa = a.map(ToString::to_string).unwrap_or_default();
    let sb = b.map(ToString::to_string).unwrap_or_default();
    locale_compare(&sa, &sb)
}

/// Whether `row` passes every active column filter.
pub fn row_passes(row: &Row, filter: &FilterSpec) -> bool {
    filter
        .active()
        .all(|(column, allowed)| allowed.contains(&row.display_value(column)))
}

/// Filter then sort `source`, returning source indices in display order.
///
/// Sorting is stable: rows equal on every key keep their source order.
pub fn derive_display_rows(source: &[Row], filter: &FilterSpec, sort: &[SortColumn]) -> Vec<usize> {
    let mut indices: Vec<usize> = source
        .iter()
        .enumerate()
        .filter(|(_, row)| row_passes(row, filter))
        .map(|(i, _)| i)
        .collect();

    if !sort.is_empty() {
        indices.sort_by(|&a, &b| {
            let (Some(ra), Some(rb)) = (source.get(a), source.get(b)) else {
                return Ordering::Equal;
            };
            for key in sort {
                let cmp = compare_values(ra.get(&key.column_name), rb.get(&key.column_name));
                if cmp != Ordering::Equal {
                    return match key.order {
                        SortOrder::Asc => cmp,
                        SortOrder::Desc => cmp.reverse(),
                    };
                }
            }
            Ordering::Equal
        });
    }
    indices
}

/// Distinct display values of `column` across the displayed rows, followed by any
/// currently selected values that no longer appear. First-appearance order.
pub fn distinct_values(
    source: &[Row],
    display: &[usize],
    column: &str,
    selected: Option<&BTreeSet<String>>,
) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut values = Vec::new();
    let displayed = display
        .iter()
        .filter_map(|&i| source.get(i))
        .map(|row| row.display_value(column));
    let kept = selected.into_iter().flatten().cloned();
    for value in displayed.chain(kept) {
        if seen.insert(value.clone()) {
            values.push(value);
        }
    }
    values
}

/// Current sort keys plus the rules for changing them from header clicks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortState {
    mode: SortMode,
    columns: SortSpec,
}

impl SortState {
    pub fn new(mode: SortMode) -> Self {
        Self {
            mode,
            columns: Vec::new(),
        }
    }

    pub fn mode(&self) -> SortMode {
        self.mode
    }

    /// Switch modes. Leaving multi mode keeps only the primary key.
    pub fn set_mode(&mut self, mode: SortMode) {
        self.mode = mode;
        if mode == SortMode::Single {
            self.columns.truncate(1);
        }
    }

    pub fn columns(&self) -> &[SortColumn] {
        &self.columns
    }

    pub fn set_columns(&mut self, columns: SortSpec) {
        self.columns = columns;
        if self.mode == SortMode::Single {
            self.columns.truncate(1);
        }
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }

    pub fn order_of(&self, column: &str) -> Option<SortOrder> {
        self.columns
            .iter()
            .find(|c| c.column_name == column)
            .map(|c| c.order)
    }

    /// Apply a click on the `order` arrow of `column`.
    ///
    /// Multi mode: an unsorted column is appended, clicking the active direction
    /// removes the key, and the other direction flips it in place. Single mode
    /// cycles the column and replaces any other key.
    pub fn click(&mut self, column: &str, order: SortOrder) {
        match self.mode {
            SortMode::Multi => self.click_multi(column, order),
            SortMode::Single => self.cycle(column),
        }
    }

    fn click_multi(&mut self, column: &str, order: SortOrder) {
        let Some(pos) = self.columns.iter().position(|c| c.column_name == column) else {
            self.columns.push(SortColumn::new(column, order));
            return;
        };
        let same = self.columns.get(pos).is_some_and(|c| c.order == order);
        if same {
            self.columns.remove(pos);
        } else if let Some(entry) = self.columns.get_mut(pos) {
            entry.order = order;
        }
    }

    /// Advance `column` through unsorted -> asc -> desc -> unsorted, dropping any
    /// other key.
    pub fn cycle(&mut self, column: &str) {
        let next = match self.order_of(column) {
            None => Some(SortOrder::Asc),
            Some(SortOrder::Asc) => Some(SortOrder::Desc),
            Some(SortOrder::Desc) => None,
        };
        self.columns.clear();
        if let Some(order) = next {
            self.columns.push(SortColumn::new(column, order));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_sorts_before_uppercase_on_tie() {
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("ab", "a"), Ordering::Greater);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn numeric_strings_compare_as_numbers() {
        let a = CellValue::from("10");
        let b = CellValue::from(9.0);
        assert_eq!(compare_values(Some(&a), Some(&b)), Ordering::Greater);
        let c = CellValue::from("x");
        assert_eq!(compare_values(Some(&b), Some(&c)), Ordering::Less);
    }

    #[test]
    fn multi_click_appends_flips_and_removes() {
        let mut state = SortState::new(SortMode::Multi);
        state.click("a", SortOrder::Asc);
        state.click("b", SortOrder::Desc);
        assert_eq!(state.columns().len(), 2);

        state.click("a", SortOrder::Desc);
        assert_eq!(state.columns()[0], SortColumn::new("a", SortOrder::Desc));

        state.click("a", SortOrder::Desc);
        assert_eq!(state.columns(), [SortColumn::new("b", SortOrder::Desc)]);
    }

    #[test]
    fn single_mode_cycles() {
        let mut state = SortState::new(SortMode::Single);
        state.click("a", SortOrder::Desc);
        assert_eq!(state.order_of("a"), Some(SortOrder::Asc));
        state.click("b", SortOrder::Asc);
        assert_eq!(state.order_of("a"), None);
        assert_eq!(state.order_of("b"), Some(SortOrder::Asc));
        state.cycle("b");
        assert_eq!(state.order_of("b"), Some(SortOrder::Desc));
        state.cycle("b");
        assert!(state.columns().is_empty());
    }

    #[test]
    fn distinct_values_keep_selection() {
        let rows = vec![
            Row::new().with("k", "x"),
            Row::new().with("k", "y"),
            Row::new().with("k", "x"),
        ];
        let selected: BTreeSet<String> = ["z".to_string()].into();
        let values = distinct_values(&rows, &[0, 1, 2], "k", Some(&selected));
        assert_eq!(values, ["x", "y", "z"]);
    }
}
