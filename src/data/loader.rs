//! Grade Sheet Loader Module
//! Reads the semicolon-delimited sheet with Polars and normalizes it into a `Table`.

use super::normalize::{normalize_email, normalize_group, normalize_header};
use super::table::{ColumnPresence, Record, Score, SheetSchema, Table};
use log::{debug, info, warn};
use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Grade sheet not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read grade sheet: {0}")]
    CsvError(#[from] PolarsError),
}

/// Raw text columns keyed by cleaned header name.
type TextColumns = HashMap<String, Vec<Option<String>>>;

/// Loads and normalizes the grade sheet.
pub struct TableLoader;

impl TableLoader {
    /// Load a `;`-delimited UTF-8 grade sheet.
    pub fn load(path: &Path, schema: &SheetSchema) -> Result<Table, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        info!("Loading grade sheet from {}", path.display());

        // Every column is read as text; coercion happens per configured field
        let df = LazyCsvReader::new(path)
            .with_separator(b';')
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_encoding(CsvEncoding::Utf8)
            .with_truncate_ragged_lines(true)
            .finish()?
            .collect()?;

        let (columns, height) = Self::text_columns(&df)?;
        let table = Self::normalize(columns, height, schema);

        info!(
            "Loaded {} records, {} groups, score fields {:?}",
            table.len(),
            table.group_labels().len(),
            table.score_fields
        );
        Ok(table)
    }

    /// Extract each column as optional strings, with trimmed headers.
    fn text_columns(df: &DataFrame) -> Result<(TextColumns, usize), LoadError> {
        let mut columns = TextColumns::new();

        for column in df.get_columns() {
            let header = normalize_header(column.name().as_str());
            if columns.contains_key(&header) {
                warn!("Duplicate column '{}' after trimming, keeping the first", header);
                continue;
            }

            let text = column.cast(&DataType::String)?;
            let values: Vec<Option<String>> = text
                .str()?
                .into_iter()
                .map(|v| v.map(str::to_string))
                .collect();
            columns.insert(header, values);
        }

        Ok((columns, df.height()))
    }

    /// Build records from raw text columns. Never fails: bad cells become missing.
    pub fn normalize(columns: TextColumns, height: usize, schema: &SheetSchema) -> Table {
        let presence = ColumnPresence {
            email: columns.contains_key(&schema.email_col),
            name: columns.contains_key(&schema.name_col),
            group: columns.contains_key(&schema.group_col),
        };
        if !presence.email {
            warn!("Column '{}' not found, lookup disabled", schema.email_col);
        }
        if !presence.group {
            warn!("Column '{}' not found, group statistics disabled", schema.group_col);
        }

        let score_fields: Vec<String> = schema
            .score_fields
            .iter()
            .filter(|f| columns.contains_key(f.as_str()))
            .cloned()
            .collect();
        debug!("Numeric fields present: {:?}", score_fields);

        let cell = |col: &str, row: usize| -> Option<&str> {
            columns
                .get(col)
                .and_then(|values| values.get(row))
                .and_then(|v| v.as_deref())
        };

        let records = (0..height)
            .map(|row| {
                let scores: BTreeMap<String, Score> = score_fields
                    .iter()
                    .map(|field| (field.clone(), Score::from_raw(cell(field, row))))
                    .collect();

                Record {
                    email: cell(&schema.email_col, row).map(normalize_email),
                    name: cell(&schema.name_col, row).map(|n| n.trim().to_string()),
                    group: cell(&schema.group_col, row).and_then(normalize_group),
                    scores,
                }
            })
            .collect();

        Table::new(schema.clone(), presence, score_fields, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Category;
    use std::io::Write;

    fn write_sheet(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_normalizes_sheet() {
        let file = write_sheet(
            " Email ;Name;GR;DS;TP\n\
             jane@doe.com;Jane Doe;G1;15,5;12\n\
             \x20 John@Doe.COM ;John Doe; G2 ;-1;ABS\n\
             amélie@école.fr;Amélie;;9,75;\n",
        );

        let table = TableLoader::load(file.path(), &SheetSchema::default()).unwrap();

        assert_eq!(table.len(), 3);
        assert!(table.columns.email);
        assert!(table.columns.name);
        assert!(table.columns.group);
        assert_eq!(table.score_fields, vec!["DS", "TP"]);

        let jane = &table.records()[0];
        assert_eq!(jane.email.as_deref(), Some("jane@doe.com"));
        assert_eq!(jane.value("DS"), Some(15.5));
        assert_eq!(jane.score("DS").unwrap().category, Category::Good);
        assert_eq!(jane.value("TP"), Some(12.0));
        assert_eq!(jane.score("TP").unwrap().category, Category::FairlyGood);

        let john = &table.records()[1];
        assert_eq!(john.email.as_deref(), Some("john@doe.com"));
        assert_eq!(john.group.as_deref(), Some("G2"));
        assert_eq!(john.value("DS"), Some(-1.0));
        assert_eq!(john.value("TP"), None);
        assert_eq!(john.score("TP").unwrap().raw.as_deref(), Some("ABS"));

        let amelie = &table.records()[2];
        assert_eq!(amelie.name.as_deref(), Some("Amélie"));
        assert_eq!(amelie.group, None);
        assert_eq!(amelie.value("DS"), Some(9.75));

        // Rows without a group stay in the table but not in the index
        assert_eq!(table.group_labels(), vec!["G1", "G2"]);
    }

    #[test]
    fn test_load_trailing_extra_field() {
        let file = write_sheet("Email;Name;GR;DS;TP\njane@doe.com;Jane Doe;G1;15,5;12;-\n");
        let table = TableLoader::load(file.path(), &SheetSchema::default()).unwrap();

        let jane = &table.records()[0];
        assert_eq!(jane.email.as_deref(), Some("jane@doe.com"));
        assert_eq!(jane.value("DS"), Some(15.5));
        assert_eq!(jane.value("TP"), Some(12.0));
    }

    #[test]
    fn test_load_missing_email_column() {
        let file = write_sheet("Name;GR;DS\nJane;G1;12\n");
        let table = TableLoader::load(file.path(), &SheetSchema::default()).unwrap();

        assert!(!table.columns.email);
        assert_eq!(table.records()[0].email, None);
    }

    #[test]
    fn test_load_missing_file() {
        let result = TableLoader::load(
            Path::new("/nonexistent/grades.csv"),
            &SheetSchema::default(),
        );
        assert!(matches!(result, Err(LoadError::NotFound(_))));
    }

    #[test]
    fn test_load_is_idempotent() {
        let file = write_sheet("Email;Name;GR;DS;TP\na@x.fr;A;G1;10;11\nb@x.fr;B;G1;14,5;\n");
        let schema = SheetSchema::default();

        let first = TableLoader::load(file.path(), &schema).unwrap();
        let second = TableLoader::load(file.path(), &schema).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_without_polars() {
        let mut columns = TextColumns::new();
        columns.insert(
            "Email".to_string(),
            vec![Some(" A@X.FR ".to_string()), None],
        );
        columns.insert(
            "DS".to_string(),
            vec![Some("12,25".to_string()), Some("".to_string())],
        );

        let table = TableLoader::normalize(columns, 2, &SheetSchema::default());

        assert_eq!(table.records()[0].email.as_deref(), Some("a@x.fr"));
        assert_eq!(table.records()[0].value("DS"), Some(12.25));
        assert_eq!(table.records()[1].email, None);
        assert_eq!(table.records()[1].value("DS"), None);
        assert!(!table.columns.group);
        assert!(table.group_labels().is_empty());
    }
}
