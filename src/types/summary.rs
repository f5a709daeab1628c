use serde::{Deserialize, Serialize};

/// Summary-row rule selected for a column.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SummaryRule {
    /// Nothing is computed and the cell stays empty. Hosts that want a
    /// "not displayed" caption draw it from their own rule menu.
    #[default]
    #[serde(alias = "nodisplay")]
    None,
    Max,
    Min,
    Avg,
    Sum,
    Filled,
    #[serde(alias = "nofilled")]
    Unfilled,
}

impl SummaryRule {
    /// Rules offered for numeric columns.
    pub const NUMERIC: [Self; 5] = [Self::None, Self::Max, Self::Min, Self::Avg, Self::Sum];
    /// Rules offered for text columns.
    pub const TEXT: [Self; 3] = [Self::None, Self::Filled, Self::Unfilled];

    /// Caption used as the prefix of the summary text.
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Max => "Max",
            Self::Min => "Min",
            Self::Avg => "Avg",
            Self::Sum => "Sum",
            Self::Filled => "Filled",
            Self::Unfilled => "Unfilled",
        }
    }

    /// Whether the rule makes sense for a column of the given kind.
    pub fn applies_to(self, numeric: bool) -> bool {
        match self {
            Self::None => true,
            Self::Max | Self::Min | Self::Avg | Self::Sum => numeric,
            Self::Filled | Self::Unfilled => !numeric,
        }
    }
}
