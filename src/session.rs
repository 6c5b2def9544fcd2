use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::model::{AuditEntry, LeaveBalance, LeaveRequest, User};
use crate::store::{DocumentStore, Record, TableStore};

/// A dataset that could not be loaded and was replaced by an empty table.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoadWarning {
    #[schema(example = "LeaveBalance")]
    pub dataset: String,
    #[schema(example = "malformed data in data/leave_balance.csv: ...")]
    pub message: String,
}

/// Cached copy of the four datasets plus the store that persists them.
///
/// Workflow operations stage their changes on copies, flush them, and only
/// then replace the cached tables.
pub struct Session<S> {
    pub(crate) store: S,
    pub(crate) documents: DocumentStore,
    pub(crate) users: Vec<User>,
    pub(crate) balances: Vec<LeaveBalance>,
    pub(crate) requests: Vec<LeaveRequest>,
    pub(crate) audit: Vec<AuditEntry>,
    warnings: Vec<LoadWarning>,
}

fn load_or_empty<S: TableStore, T: Record>(store: &S, warnings: &mut Vec<LoadWarning>) -> Vec<T> {
    match store.load::<T>() {
        Ok(rows) => rows,
        Err(e) => {
            warn!(dataset = %T::DATASET, error = %e, "Dataset unreadable, starting empty");
            warnings.push(LoadWarning {
                dataset: T::DATASET.to_string(),
                message: e.to_string(),
            });
            Vec::new()
        }
    }
}

impl<S: TableStore> Session<S> {
    pub fn init(store: S, documents: DocumentStore) -> Self {
        let mut warnings = Vec::new();
        let users = load_or_empty(&store, &mut warnings);
        let balances = load_or_empty(&store, &mut warnings);
        let requests = load_or_empty(&store, &mut warnings);
        let audit = load_or_empty(&store, &mut warnings);

        let session = Self {
            store,
            documents,
            users,
            balances,
            requests,
            audit,
            warnings,
        };
        info!(
            users = session.users.len(),
            requests = session.requests.len(),
            audit_entries = session.audit.len(),
            "Session initialized"
        );
        session
    }

    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn requests(&self) -> &[LeaveRequest] {
        &self.requests
    }

    pub fn balances(&self) -> &[LeaveBalance] {
        &self.balances
    }

    pub fn audit_trail(&self) -> &[AuditEntry] {
        &self.audit
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn find_user(&self, employee: &str) -> Option<&User> {
        self.users.iter().find(|u| u.employee == employee)
    }

    pub fn balance_for(&self, employee: &str) -> Option<&LeaveBalance> {
        self.balances.iter().find(|b| b.employee == employee)
    }

    pub fn request(&self, id: u64) -> Option<&LeaveRequest> {
        usize::try_from(id).ok().and_then(|i| self.requests.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Dataset, MemoryStore};

    #[test]
    fn loads_seeded_tables() {
        let session = Session::init(MemoryStore::seeded(), DocumentStore::new("unused"));
        assert!(session.warnings().is_empty());
        assert_eq!(session.users().len(), 6);
        assert_eq!(session.balance_for("Mary Brown").map(|b| b.annual), Some(20));
        assert!(session.requests().is_empty());
    }

    #[test]
    fn corrupt_dataset_becomes_empty_with_warning() {
        let store = MemoryStore::seeded();
        store.put_raw(Dataset::LeaveBalance, "Employee,Annual,Sick\nJohn Doe,lots,10\n");

        let session = Session::init(store, DocumentStore::new("unused"));
        assert!(session.balances().is_empty());
        assert_eq!(session.users().len(), 6);
        assert_eq!(session.warnings().len(), 1);
        assert_eq!(session.warnings()[0].dataset, "LeaveBalance");
    }

    #[test]
    fn unparsable_dates_load_as_none() {
        let store = MemoryStore::seeded();
        store.put_raw(
            Dataset::LeaveRequests,
            "Employee,Department,LeaveType,StartDate,EndDate,Status,Reason,Document\n\
             Peter Jones,Finance,Annual,someday,2024-01-02,Pending,trip,\n",
        );

        let session = Session::init(store, DocumentStore::new("unused"));
        assert!(session.warnings().is_empty());
        let request = session.request(0).unwrap();
        assert_eq!(request.start_date, None);
        assert!(request.end_date.is_some());
    }
}
