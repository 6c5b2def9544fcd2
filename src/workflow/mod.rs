//! Leave workflow rules: submit, approve, reject.
//!
//! Every mutation follows the same shape: validate, stage the new rows on
//! copies of the affected tables, flush each of them to the store, then
//! commit the copies to the session. A failed flush leaves the cached tables
//! as they were and rewrites the tables already flushed from the cache.

mod queries;

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::{error, info, warn};

pub use queries::{AuditFilter, DashboardStats};

use crate::error::WorkflowError;
use crate::model::{AuditAction, AuditEntry, LeaveRequest, LeaveStatus, LeaveType};
use crate::session::Session;
use crate::store::{Dataset, Record, TableStore, documents};

/// A leave request together with its row id.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveRecord {
    pub id: u64,
    pub request: LeaveRequest,
}

/// Raw bytes of a supporting document as uploaded.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct NewLeave {
    pub employee: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub document: Option<Upload>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Approval {
    pub record: LeaveRecord,
    pub days_taken: Option<u32>,
    /// Days left in the deducted column, if a balance was touched.
    pub remaining: Option<u32>,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl<S: TableStore> Session<S> {
    /// Saves one staged table. On failure the tables in `written` are put
    /// back to their cached state.
    fn flush<T: Record>(
        &self,
        rows: &[T],
        written: &mut Vec<Dataset>,
    ) -> Result<(), WorkflowError> {
        match self.store.save(rows) {
            Ok(()) => {
                written.push(T::DATASET);
                Ok(())
            }
            Err(e) => {
                error!(dataset = %T::DATASET, error = %e, "Failed to flush dataset");
                self.restore(written);
                Err(WorkflowError::Storage(e))
            }
        }
    }

    fn restore(&self, written: &[Dataset]) {
        for &dataset in written {
            let result = match dataset {
                Dataset::Users => self.store.save(&self.users),
                Dataset::LeaveBalance => self.store.save(&self.balances),
                Dataset::LeaveRequests => self.store.save(&self.requests),
                Dataset::AuditTrail => self.store.save(&self.audit),
            };
            match result {
                Ok(()) => warn!(%dataset, "Dataset restored after failed flush"),
                Err(e) => error!(%dataset, error = %e, "Failed to restore dataset"),
            }
        }
    }

    /// Index of a request that can still be decided.
    fn open_request(&self, id: u64) -> Result<usize, WorkflowError> {
        usize::try_from(id)
            .ok()
            .filter(|&i| {
                self.requests
                    .get(i)
                    .is_some_and(|r| !r.status.is_terminal())
            })
            .ok_or(WorkflowError::NotFound(id))
    }

    pub fn submit_leave(&mut self, new: NewLeave) -> Result<LeaveRecord, WorkflowError> {
        if new.end_date < new.start_date {
            return Err(WorkflowError::InvalidRange);
        }
        let department = match self.find_user(&new.employee) {
            Some(user) => user.department.clone(),
            None => return Err(WorkflowError::UnknownEmployee(new.employee)),
        };
        if let Some(doc) = &new.document {
            if !documents::is_allowed(&doc.file_name) {
                return Err(WorkflowError::UnsupportedDocument(doc.file_name.clone()));
            }
        }

        let timestamp = now();
        let document = match &new.document {
            Some(doc) => Some(
                self.documents
                    .store(&new.employee, &doc.file_name, &doc.bytes, timestamp)
                    .map_err(|e| {
                        error!(employee = %new.employee, error = %e, "Failed to store document");
                        WorkflowError::Storage(e)
                    })?
                    .display()
                    .to_string(),
            ),
            None => None,
        };

        let request = LeaveRequest {
            employee: new.employee.clone(),
            department: department.clone(),
            leave_type: new.leave_type,
            start_date: Some(new.start_date),
            end_date: Some(new.end_date),
            status: LeaveStatus::Pending,
            reason: new.reason,
            document,
        };
        let entry = AuditEntry {
            timestamp: Some(timestamp),
            action: AuditAction::Submit,
            employee: new.employee.clone(),
            details: format!(
                "{} leave submitted ({} to {})",
                new.leave_type, new.start_date, new.end_date
            ),
            manager_comments: String::new(),
        };

        let id = self.requests.len() as u64;
        let mut requests = self.requests.clone();
        requests.push(request.clone());
        let mut audit = self.audit.clone();
        audit.push(entry);

        let mut written = Vec::new();
        let flushed = self
            .flush(&requests, &mut written)
            .and_then(|()| self.flush(&audit, &mut written));
        if let Err(e) = flushed {
            if let Some(path) = &request.document {
                if let Err(e) = self.documents.remove(path) {
                    error!(path = %path, error = %e, "Failed to remove orphaned document");
                }
            }
            return Err(e);
        }
        self.requests = requests;
        self.audit = audit;

        info!(id, employee = %new.employee, leave_type = %new.leave_type, "Leave request submitted");
        let managers: Vec<&str> = self
            .users
            .iter()
            .filter(|u| u.department == department && u.role.is_manager())
            .map(|u| u.employee.as_str())
            .collect();
        info!(
            department = %department,
            ?managers,
            "Simulated email: manager notified of new leave request from {}",
            new.employee
        );

        Ok(LeaveRecord { id, request })
    }

    /// Approves a pending request and draws annual or sick days from the
    /// employee's balance. An insufficient balance caps at zero.
    pub fn approve_leave(&mut self, id: u64) -> Result<Approval, WorkflowError> {
        let idx = self.open_request(id)?;

        let mut requests = self.requests.clone();
        let request = &mut requests[idx];
        request.status = LeaveStatus::Approved;
        let request = request.clone();

        let days_taken = request.days_taken();
        let mut balances = self.balances.clone();
        let mut remaining = None;
        if request.leave_type.tracks_balance() {
            match days_taken {
                Some(days) => {
                    remaining = balances
                        .iter_mut()
                        .find(|b| b.employee == request.employee)
                        .and_then(|b| b.deduct(request.leave_type, days));
                }
                None => warn!(id, "Leave dates unreadable, balance left unchanged"),
            }
        }

        let mut audit = self.audit.clone();
        audit.push(AuditEntry {
            timestamp: Some(now()),
            action: AuditAction::Approve,
            employee: request.employee.clone(),
            details: format!("Manager approved {} leave", request.leave_type),
            manager_comments: String::new(),
        });

        let mut written = Vec::new();
        self.flush(&requests, &mut written)?;
        self.flush(&balances, &mut written)?;
        self.flush(&audit, &mut written)?;
        self.requests = requests;
        self.balances = balances;
        self.audit = audit;

        info!(id, employee = %request.employee, ?days_taken, ?remaining, "Leave approved");
        Ok(Approval {
            record: LeaveRecord { id, request },
            days_taken,
            remaining,
        })
    }

    pub fn reject_leave(&mut self, id: u64, reason: &str) -> Result<LeaveRecord, WorkflowError> {
        if reason.trim().is_empty() {
            return Err(WorkflowError::EmptyReason);
        }
        let idx = self.open_request(id)?;

        let mut requests = self.requests.clone();
        let request = &mut requests[idx];
        request.status = LeaveStatus::Rejected;
        request.reason = reason.to_string();
        let request = request.clone();

        let mut audit = self.audit.clone();
        audit.push(AuditEntry {
            timestamp: Some(now()),
            action: AuditAction::Reject,
            employee: request.employee.clone(),
            details: format!("Manager rejected {} leave", request.leave_type),
            manager_comments: reason.to_string(),
        });

        let mut written = Vec::new();
        self.flush(&requests, &mut written)?;
        self.flush(&audit, &mut written)?;
        self.requests = requests;
        self.audit = audit;

        info!(id, employee = %request.employee, "Leave rejected");
        Ok(LeaveRecord { id, request })
    }

    /// Bytes of the document attached to a request.
    pub fn document_of(&self, id: u64) -> Result<(String, Vec<u8>), WorkflowError> {
        let path = self
            .request(id)
            .ok_or(WorkflowError::NotFound(id))?
            .document
            .clone()
            .ok_or(WorkflowError::DocumentMissing)?;
        match self.documents.read(&path)? {
            Some(bytes) => Ok((path, bytes)),
            None => {
                warn!(id, path = %path, "Supporting document missing on disk");
                Err(WorkflowError::DocumentMissing)
            }
        }
    }
}
