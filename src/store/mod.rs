//! Flat-file persistence for the four leave datasets.

mod csv_store;
pub mod documents;
#[cfg(test)]
mod memory;

use std::io;
use std::path::PathBuf;

use derive_more::Display;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use csv_store::CsvStore;
pub use documents::DocumentStore;
#[cfg(test)]
pub use memory::MemoryStore;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
pub enum Dataset {
    Users,
    LeaveBalance,
    LeaveRequests,
    AuditTrail,
}

impl Dataset {
    pub fn file_name(&self) -> &'static str {
        match self {
            Dataset::Users => "users.csv",
            Dataset::LeaveBalance => "leave_balance.csv",
            Dataset::LeaveRequests => "leave_requests.csv",
            Dataset::AuditTrail => "audit_trail.csv",
        }
    }
}

/// A row type that lives in one dataset with a fixed column order.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const DATASET: Dataset;
    const HEADERS: &'static [&'static str];
}

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "i/o error on {}: {}", "path.display()", source)]
    Io { path: PathBuf, source: io::Error },
    #[display(fmt = "malformed data in {}: {}", "path.display()", source)]
    Csv { path: PathBuf, source: csv::Error },
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Csv { source, .. } => Some(source),
        }
    }
}

/// Storage backend for the datasets. Every save is a full rewrite.
pub trait TableStore {
    fn load<T: Record>(&self) -> Result<Vec<T>, StoreError>;
    fn save<T: Record>(&self, rows: &[T]) -> Result<(), StoreError>;
    /// Creates any dataset that does not exist yet, seeding users and balances.
    fn seed_defaults(&self) -> Result<(), StoreError>;
}

/// Header row first, then one line per record, even when `rows` is empty.
pub fn encode<T: Record>(rows: &[T]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(T::HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

pub fn decode<T: Record>(bytes: &[u8]) -> Result<Vec<T>, csv::Error> {
    csv::Reader::from_reader(bytes).deserialize().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuditAction, AuditEntry, LeaveRequest, LeaveStatus, LeaveType, dates};

    #[test]
    fn empty_table_still_has_header() {
        let bytes = encode::<AuditEntry>(&[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Timestamp,Action,Employee,Details,ManagerComments\n"
        );
    }

    #[test]
    fn reads_rows_with_mixed_date_formats() {
        let raw = "Employee,Department,LeaveType,StartDate,EndDate,Status,Reason,Document\n\
                   Mary Brown,HR,Sick,2024-03-04,2024-03-05 00:00:00,Pending,flu,\n\
                   Mary Brown,HR,Study,not a date,2024-04-01,Approved,exam,uploads/x.pdf\n";
        let rows: Vec<LeaveRequest> = decode(raw.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].leave_type, LeaveType::Sick);
        assert_eq!(rows[0].end_date, dates::parse_date("2024-03-05"));
        assert_eq!(rows[0].document, None);
        assert_eq!(rows[1].start_date, None);
        assert_eq!(rows[1].status, LeaveStatus::Approved);
        assert_eq!(rows[1].document.as_deref(), Some("uploads/x.pdf"));
    }

    #[test]
    fn accepts_short_action_names() {
        let raw = "Timestamp,Action,Employee,Details,ManagerComments\n\
                   2024-01-02 10:00:00,Approve,John Doe,ok,\n";
        let rows: Vec<AuditEntry> = decode(raw.as_bytes()).unwrap();
        assert_eq!(rows[0].action, AuditAction::Approve);

        let written = String::from_utf8(encode(&rows).unwrap()).unwrap();
        assert!(written.contains("Approve Leave"));
    }

    #[test]
    fn wrong_columns_are_an_error() {
        let raw = "Name,Dept\nJohn,HR\n";
        assert!(decode::<crate::model::User>(raw.as_bytes()).is_err());
    }
}
