use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Sort direction.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One sort key.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SortColumn {
    pub column_name: String,
    pub order: SortOrder,
}

impl SortColumn {
    pub fn new(column_name: impl Into<String>, order: SortOrder) -> Self {
        Self {
            column_name: column_name.into(),
            order,
        }
    }
}

/// Sort keys in priority order (first = primary).
pub type SortSpec = Vec<SortColumn>;

/// Allowed stringified values per column. Columns with an empty set do not filter.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct FilterSpec(pub BTreeMap<String, BTreeSet<String>>);

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: allow `values` for `column`.
    #[must_use]
    pub fn with<I, S>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(column, values);
        self
    }

    /// Replace the allowed set of `column`; an empty set clears the filter.
    pub fn set<I, S>(&mut self, column: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        let column = column.into();
        if set.is_empty() {
            self.0.remove(&column);
        } else {
            self.0.insert(column, set);
        }
    }

    pub fn clear(&mut self, column: &str) {
        self.0.remove(column);
    }

    /// Whether `column` currently restricts rows.
    pub fn is_active(&self, column: &str) -> bool {
        self.0.get(column).is_some_and(|set| !set.is_empty())
    }

    pub fn allowed(&self, column: &str) -> Option<&BTreeSet<String>> {
        self.0.get(column)
    }

    /// Columns with a non-empty allowed set.
    pub fn active(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.0.iter().filter(|(_, set)| !set.is_empty())
    }
}
