//! Grade Table Module
//! Normalized, immutable records plus the group index.

use super::normalize::{categorize, convert_score, Category};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column names and score fields expected in the grade sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSchema {
    pub email_col: String,
    pub name_col: String,
    pub group_col: String,
    /// Numeric columns coerced and categorized at load time
    pub score_fields: Vec<String>,
    /// Field whose sentinel value marks an absence from the exam
    pub absence_field: String,
    pub absence_sentinel: f64,
}

impl Default for SheetSchema {
    fn default() -> Self {
        Self {
            email_col: "Email".to_string(),
            name_col: "Name".to_string(),
            group_col: "GR".to_string(),
            score_fields: ["DS", "TP", "TPEX", "D", "B"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            absence_field: "DS".to_string(),
            absence_sentinel: -1.0,
        }
    }
}

/// One score cell: the trimmed source text and its coerced value.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub raw: Option<String>,
    pub value: Option<f64>,
    pub category: Category,
}

impl Score {
    pub fn from_raw(raw: Option<&str>) -> Self {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        let value = raw.and_then(convert_score);
        Self {
            raw: raw.map(str::to_string),
            value,
            category: categorize(value),
        }
    }

    pub fn missing() -> Self {
        Self::from_raw(None)
    }
}

/// One student's row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub email: Option<String>,
    pub name: Option<String>,
    pub group: Option<String>,
    pub scores: BTreeMap<String, Score>,
}

impl Record {
    pub fn score(&self, field: &str) -> Option<&Score> {
        self.scores.get(field)
    }

    pub fn value(&self, field: &str) -> Option<f64> {
        self.score(field).and_then(|s| s.value)
    }
}

/// Which identity columns the source sheet carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnPresence {
    pub email: bool,
    pub name: bool,
    pub group: bool,
}

/// Full normalized table. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub schema: SheetSchema,
    pub columns: ColumnPresence,
    /// Configured score fields that exist in the sheet, in schema order
    pub score_fields: Vec<String>,
    records: Vec<Record>,
    groups: BTreeMap<String, Vec<usize>>,
}

impl Table {
    /// Build the table and its group index from normalized records.
    pub fn new(
        schema: SheetSchema,
        columns: ColumnPresence,
        score_fields: Vec<String>,
        records: Vec<Record>,
    ) -> Self {
        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, record) in records.iter().enumerate() {
            if let Some(group) = &record.group {
                groups.entry(group.clone()).or_default().push(i);
            }
        }

        Self {
            schema,
            columns,
            score_fields,
            records,
            groups,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.score_fields.iter().any(|f| f == field)
    }

    /// Sorted, de-duplicated group labels.
    pub fn group_labels(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }

    /// Records of one group in source order, or `None` for unknown labels.
    pub fn group_records(&self, label: &str) -> Option<Vec<&Record>> {
        self.groups
            .get(label)
            .map(|rows| rows.iter().map(|&i| &self.records[i]).collect())
    }
}
