//! Column partitioning into left-fixed, center and right-fixed bands.

use crate::types::{ColumnDefinition, Fixed};

/// A column together with its position in the full column list.
///
/// The original index is what span resolvers and hit tests refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionedColumn {
    pub column: ColumnDefinition,
    pub index: usize,
}

impl PartitionedColumn {
    pub fn width(&self) -> f64 {
        self.column.width_or_zero()
    }
}

/// The three column bands and their widths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnPartition {
    pub left_columns: Vec<PartitionedColumn>,
    pub center_columns: Vec<PartitionedColumn>,
    pub right_columns: Vec<PartitionedColumn>,
    pub left_width: f64,
    pub center_width: f64,
    pub right_width: f64,
    pub total_width: f64,
}

impl ColumnPartition {
    /// Left edge of every column in `columns`, relative to the band origin.
    pub fn offsets(columns: &[PartitionedColumn]) -> Vec<f64> {
        let mut x = 0.0;
        columns
            .iter()
            .map(|c| {
                let at = x;
                x += c.width();
                at
            })
            .collect()
    }

    /// Column under `x` within a band, with that column's left edge.
    pub fn column_at(columns: &[PartitionedColumn], x: f64) -> Option<(&PartitionedColumn, f64)> {
        if x < 0.0 {
            return None;
        }
        let mut left = 0.0;
        for column in columns {
            let right = left + column.width();
            if x >= left && x < right {
                return Some((column, left));
            }
            left = right;
        }
        None
    }

    /// Look up a partitioned column by its original index.
    pub fn by_index(&self, index: usize) -> Option<&PartitionedColumn> {
        self.left_columns
            .iter()
            .chain(&self.center_columns)
            .chain(&self.right_columns)
            .find(|c| c.index == index)
    }
}

fn sum_width(columns: &[PartitionedColumn]) -> f64 {
    columns.iter().map(PartitionedColumn::width).sum()
}

/// Split `columns` by their `fixed` attribute, preserving declaration order.
///
/// Missing widths count as 0 here; see [`resolve_auto_widths`] for sizing them.
pub fn partition_columns(columns: &[ColumnDefinition]) -> ColumnPartition {
    let mut partition = ColumnPartition::default();
    for (index, column) in columns.iter().enumerate() {
        let entry = PartitionedColumn {
            column: column.clone(),
            index,
        };
        match column.fixed {
            Some(Fixed::Left) => partition.left_columns.push(entry),
            Some(Fixed::Right) => partition.right_columns.push(entry),
            None => partition.center_columns.push(entry),
        }
    }
    partition.left_width = sum_width(&partition.left_columns);
    partition.center_width = sum_width(&partition.center_columns);
    partition.right_width = sum_width(&partition.right_columns);
    partition.total_width = partition.left_width + partition.center_width + partition.right_width;
    partition
}

/// Assign a width to every column declared without one.
///
/// The space left after explicitly sized columns and a vertical scrollbar is split
/// evenly, never going below `min_width`. Columns that already have a width are
/// returned unchanged.
pub fn resolve_auto_widths(
    columns: &[ColumnDefinition],
    viewport_width: f64,
    scrollbar_size: f64,
    min_width: f64,
) -> Vec<ColumnDefinition> {
    let auto_count = columns.iter().filter(|c| c.width.is_none()).count();
    if auto_count == 0 {
        return columns.to_vec();
    }
    let sized: f64 = columns.iter().filter_map(|c| c.width).sum();
    let remaining = (viewport_width - scrollbar_size - sized).max(0.0);
    #[allow(clippy::cast_precision_loss)]
    let auto_width = (remaining / auto_count as f64).max(min_width);

    columns
        .iter()
        .map(|c| {
            let mut c = c.clone();
            if c.width.is_none() {
                c.width = Some(auto_width);
            }
            c
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn widths_add_up_to_total() {
        let columns = vec![
            ColumnDefinition::new("a", 80.0).fixed(Fixed::Right),
            ColumnDefinition::new("b", 120.0),
            ColumnDefinition::new("c", 60.0).fixed(Fixed::Left),
            ColumnDefinition {
                column_name: "d".into(),
                ..Default::default()
            },
        ];
        let p = partition_columns(&columns);
        assert_eq!(p.left_width, 60.0);
        assert_eq!(p.center_width, 120.0);
        assert_eq!(p.right_width, 80.0);
        assert_eq!(p.total_width, 260.0);
        assert_eq!(p.left_columns[0].index, 2);
        assert_eq!(p.right_columns[0].index, 0);
        let center: Vec<_> = p.center_columns.iter().map(|c| c.index).collect();
        assert_eq!(center, [1, 3]);
    }

    #[test]
    fn auto_width_splits_remaining_space() {
        let columns = vec![
            ColumnDefinition::new("a", 100.0),
            ColumnDefinition {
                column_name: "b".into(),
                ..Default::default()
            },
            ColumnDefinition {
                column_name: "c".into(),
                ..Default::default()
            },
        ];
        let resolved = resolve_auto_widths(&columns, 716.0, 16.0, 100.0);
        assert_eq!(resolved[0].width, Some(100.0));
        assert_eq!(resolved[1].width, Some(300.0));
        assert_eq!(resolved[2].width, Some(300.0));

        let narrow = resolve_auto_widths(&columns, 200.0, 16.0, 100.0);
        assert_eq!(narrow[1].width, Some(100.0));
    }

    #[test]
    fn column_at_walks_band() {
        let p = partition_columns(&[
            ColumnDefinition::new("a", 50.0),
            ColumnDefinition::new("b", 70.0),
        ]);
        let (hit, left) = ColumnPartition::column_at(&p.center_columns, 60.0).unwrap();
        assert_eq!(hit.column.column_name, "b");
        assert_eq!(left, 50.0);
        assert!(ColumnPartition::column_at(&p.center_columns, 120.0).is_none());
        assert_eq!(ColumnPartition::offsets(&p.center_columns), [0.0, 50.0]);
    }
}
