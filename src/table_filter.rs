//! Table filter configuration for the data view.
//!
//! Builds the option object handed to the table-filter widget: a fixed base
//! plus one `col_{i}` entry per column whose filter is not a plain text box.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Normal,
    Checklist,
    Select,
    None,
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FilterType::Normal => "normal",
            FilterType::Checklist => "checklist",
            FilterType::Select => "select",
            FilterType::None => "none",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub filter: FilterType,
}

const fn col(name: &'static str, filter: FilterType) -> Column {
    Column { name, filter }
}

pub const FULL_COLUMNS: &[Column] = &[
    col("Name", FilterType::Checklist),
    col("Match", FilterType::Normal),
    col("Team", FilterType::Checklist),
    col("Auto Coral", FilterType::Normal),
    col("Auto Algae", FilterType::Normal),
    col("Auto Leave", FilterType::Select),
    col("Algae Clear", FilterType::Select),
    col("L1", FilterType::Normal),
    col("L2", FilterType::Normal),
    col("L3", FilterType::Normal),
    col("L4", FilterType::Normal),
    col("Dropped", FilterType::Normal),
    col("Algae Barge", FilterType::Normal),
    col("Algae Floor Hole", FilterType::Normal),
    col("Climb", FilterType::Checklist),
    col("Defense", FilterType::Select),
    col("Notes", FilterType::None),
];

pub const REDUCED_COLUMNS: &[Column] = &[
    col("Match", FilterType::Normal),
    col("Team", FilterType::Checklist),
    col("Auto Coral", FilterType::Normal),
    col("Auto Leave", FilterType::Select),
    col("Algae Clear", FilterType::Select),
    col("Teleop Coral", FilterType::Normal),
    col("Teleop Algae", FilterType::Normal),
    col("Climb", FilterType::Checklist),
    col("Defense", FilterType::Select),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSet {
    Full,
    Reduced,
}

impl ColumnSet {
    pub fn columns(self) -> &'static [Column] {
        match self {
            ColumnSet::Full => FULL_COLUMNS,
            ColumnSet::Reduced => REDUCED_COLUMNS,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ColumnSet::Full => ColumnSet::Reduced,
            ColumnSet::Reduced => ColumnSet::Full,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FilterTheme {
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TableFilterOptions {
    pub base_path: &'static str,
    pub sticky_headers: bool,
    pub rows_counter: bool,
    pub flt_css_class: &'static str,
    pub div_checklist_css_class: &'static str,
    pub checklist_css_class: &'static str,
    pub clear_filter_text: &'static str,
    pub enable_checklist_reset_filter: bool,
    pub themes: Vec<FilterTheme>,
    #[serde(flatten)]
    pub col_filter_defs: BTreeMap<String, FilterType>,
}

impl TableFilterOptions {
    pub fn base() -> Self {
        Self {
            base_path: "tablefilter/",
            sticky_headers: true,
            rows_counter: true,
            flt_css_class: "input input-primary",
            div_checklist_css_class: "card bg-base-100 border-primary",
            checklist_css_class: "m-1",
            clear_filter_text: "None",
            enable_checklist_reset_filter: false,
            themes: vec![FilterTheme {
                name: "transparent",
            }],
            col_filter_defs: BTreeMap::new(),
        }
    }

    pub fn for_columns(set: ColumnSet) -> Self {
        let mut options = Self::base();
        options.col_filter_defs = set
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.filter != FilterType::Normal)
            .map(|(i, c)| (format!("col_{i}"), c.filter))
            .collect();
        options
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_has_no_column_defs() {
        let json = TableFilterOptions::base().to_json();
        assert_eq!(json["base_path"], "tablefilter/");
        assert_eq!(json["themes"][0]["name"], "transparent");
        assert_eq!(json["enable_checklist_reset_filter"], false);
        assert!(json.get("col_0").is_none());
    }

    #[test]
    fn test_reduced_column_defs() {
        let json = TableFilterOptions::for_columns(ColumnSet::Reduced).to_json();
        assert!(json.get("col_0").is_none());
        assert_eq!(json["col_1"], "checklist");
        assert_eq!(json["col_3"], "select");
        assert_eq!(json["col_7"], "checklist");
        assert!(json.get("col_5").is_none());
    }

    #[test]
    fn test_full_column_defs_cover_non_normal_columns() {
        let options = TableFilterOptions::for_columns(ColumnSet::Full);
        let expected = FULL_COLUMNS
            .iter()
            .filter(|c| c.filter != FilterType::Normal)
            .count();
        assert_eq!(options.col_filter_defs.len(), expected);
        assert_eq!(options.col_filter_defs["col_16"], FilterType::None);
    }
}
