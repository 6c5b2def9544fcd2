use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use crate::model::{AuditEntry, LeaveRequest, leave_balance, user};
use crate::store::{Dataset, Record, StoreError, TableStore, decode, encode};

/// In-memory backend holding each dataset as encoded CSV.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RefCell<HashMap<Dataset, Vec<u8>>>,
    failing: Cell<Option<Dataset>>,
}

impl MemoryStore {
    pub fn seeded() -> Self {
        let store = Self::default();
        store
            .seed_defaults()
            .expect("seeding memory store cannot fail");
        store
    }

    /// Makes every save of `dataset` fail until cleared.
    pub fn fail_saves_of(&self, dataset: Option<Dataset>) {
        self.failing.set(dataset);
    }

    pub fn put_raw(&self, dataset: Dataset, raw: &str) {
        self.tables
            .borrow_mut()
            .insert(dataset, raw.as_bytes().to_vec());
    }
}

impl TableStore for MemoryStore {
    fn load<T: Record>(&self) -> Result<Vec<T>, StoreError> {
        let path = PathBuf::from(T::DATASET.file_name());
        let tables = self.tables.borrow();
        let bytes = tables.get(&T::DATASET).ok_or_else(|| StoreError::Io {
            path: path.clone(),
            source: io::Error::from(io::ErrorKind::NotFound),
        })?;
        decode(bytes).map_err(|source| StoreError::Csv { path, source })
    }

    fn save<T: Record>(&self, rows: &[T]) -> Result<(), StoreError> {
        let path = PathBuf::from(T::DATASET.file_name());
        if self.failing.get() == Some(T::DATASET) {
            return Err(StoreError::Io {
                path,
                source: io::Error::other("disk full"),
            });
        }
        let bytes = encode(rows).map_err(|source| StoreError::Csv { path, source })?;
        self.tables.borrow_mut().insert(T::DATASET, bytes);
        Ok(())
    }

    fn seed_defaults(&self) -> Result<(), StoreError> {
        self.save(&user::default_users())?;
        self.save(&leave_balance::default_balances())?;
        self.save::<LeaveRequest>(&[])?;
        self.save::<AuditEntry>(&[])
    }
}
