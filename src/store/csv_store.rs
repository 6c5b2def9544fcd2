use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::model::{AuditEntry, LeaveRequest, leave_balance, user};
use crate::store::{Dataset, Record, StoreError, TableStore, decode, encode};

/// Datasets kept as CSV files in a single directory.
#[derive(Debug, Clone)]
pub struct CsvStore {
    data_dir: PathBuf,
}

impl CsvStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_of(&self, dataset: Dataset) -> PathBuf {
        self.data_dir.join(dataset.file_name())
    }

    fn seed<T: Record>(&self, rows: &[T]) -> Result<(), StoreError> {
        let path = self.path_of(T::DATASET);
        if path.exists() {
            return Ok(());
        }
        self.save(rows)?;
        info!(dataset = %T::DATASET, rows = rows.len(), "Created dataset");
        Ok(())
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl TableStore for CsvStore {
    fn load<T: Record>(&self) -> Result<Vec<T>, StoreError> {
        let path = self.path_of(T::DATASET);
        let bytes = fs::read(&path).map_err(io_err(&path))?;
        decode(&bytes).map_err(|source| StoreError::Csv { path, source })
    }

    fn save<T: Record>(&self, rows: &[T]) -> Result<(), StoreError> {
        let path = self.path_of(T::DATASET);
        let bytes = encode(rows).map_err(|source| StoreError::Csv {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, bytes).map_err(io_err(&path))
    }

    fn seed_defaults(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(io_err(&self.data_dir))?;
        self.seed(&user::default_users())?;
        self.seed(&leave_balance::default_balances())?;
        self.seed::<LeaveRequest>(&[])?;
        self.seed::<AuditEntry>(&[])
    }
}
