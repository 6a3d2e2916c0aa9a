//! Table Cache Module
//! Load-once, then frozen, access to the session's grade table.

use super::loader::{LoadError, TableLoader};
use super::table::{SheetSchema, Table};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Lazily loaded, immutable snapshot of the grade sheet.
///
/// The first successful load is published and every later call returns the
/// same `Arc<Table>`. Failed loads are not cached.
pub struct TableCache {
    path: PathBuf,
    schema: SheetSchema,
    table: OnceLock<Arc<Table>>,
}

impl TableCache {
    pub fn new(path: impl Into<PathBuf>, schema: SheetSchema) -> Self {
        Self {
            path: path.into(),
            schema,
            table: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the table, loading it on first access.
    pub fn get(&self) -> Result<Arc<Table>, LoadError> {
        if let Some(table) = self.table.get() {
            debug!("Grade table served from cache");
            return Ok(Arc::clone(table));
        }

        let loaded = TableLoader::load(&self.path, &self.schema)?;

        // A concurrent loader may have won; everyone sees the published table
        Ok(Arc::clone(self.table.get_or_init(|| Arc::new(loaded))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cache_returns_same_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Email;GR;DS\na@x.fr;G1;12").unwrap();
        file.flush().unwrap();

        let cache = TableCache::new(file.path(), SheetSchema::default());
        let first = cache.get().unwrap();

        // Later edits are not observed once the snapshot is frozen
        writeln!(file, "b@x.fr;G1;14").unwrap();
        file.flush().unwrap();

        let second = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_cache_does_not_keep_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grades.csv");
        let cache = TableCache::new(&path, SheetSchema::default());

        assert!(matches!(cache.get(), Err(LoadError::NotFound(_))));

        std::fs::write(&path, "Email;GR;DS\na@x.fr;G1;12\n").unwrap();
        let table = cache.get().unwrap();
        assert_eq!(table.len(), 1);
    }
}
