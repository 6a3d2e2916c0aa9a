//! Student Lookup Module
//! Finds a student's row by email and formats it for display.

use crate::data::{normalize_email, Category, Record, Table};
use log::{debug, info};
use thiserror::Error;

/// Shown for identity columns or cells with nothing to display.
pub const NOT_AVAILABLE: &str = "Not available";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("Column '{0}' not found in the grade sheet")]
    ColumnMissing(String),
    #[error("Email '{0}' not found")]
    NotFound(String),
}

/// One score as shown to the student.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreView {
    pub field: String,
    pub display: String,
    pub category: Category,
}

/// Display-ready results of one student.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentView {
    pub email: String,
    pub name: String,
    pub group: String,
    pub scores: Vec<ScoreView>,
    /// Raw absence-field value equals the sentinel
    pub absent: bool,
}

/// Look up a student by email. The first matching row in source order wins.
pub fn find_student(table: &Table, email_input: &str) -> Result<StudentView, LookupError> {
    if !table.columns.email {
        return Err(LookupError::ColumnMissing(table.schema.email_col.clone()));
    }

    let email = normalize_email(email_input);
    let Some(record) = table
        .records()
        .iter()
        .find(|r| r.email.as_deref() == Some(email.as_str()))
    else {
        info!("Lookup miss for '{}'", email);
        return Err(LookupError::NotFound(email));
    };

    debug!("Lookup hit for '{}'", email);
    Ok(build_view(table, record, email))
}

fn build_view(table: &Table, record: &Record, email: String) -> StudentView {
    let identity = |present: bool, value: &Option<String>| {
        if present {
            value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
        } else {
            NOT_AVAILABLE.to_string()
        }
    };

    let scores = table
        .score_fields
        .iter()
        .map(|field| {
            let score = record.score(field);
            let display = match score {
                Some(s) => match (s.value, s.raw.as_deref()) {
                    (Some(v), _) => format!("{:.2}", v),
                    (None, Some(raw)) => raw.to_string(),
                    (None, None) => NOT_AVAILABLE.to_string(),
                },
                None => NOT_AVAILABLE.to_string(),
            };
            ScoreView {
                field: field.clone(),
                display,
                category: score.map(|s| s.category).unwrap_or(Category::Undefined),
            }
        })
        .collect();

    let absent = record.value(&table.schema.absence_field) == Some(table.schema.absence_sentinel);

    StudentView {
        email,
        name: identity(table.columns.name, &record.name),
        group: identity(table.columns.group, &record.group),
        scores,
        absent,
    }
}
