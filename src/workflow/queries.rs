use std::collections::HashSet;

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{AuditEntry, LeaveBalance, LeaveRequest, LeaveStatus};
use crate::session::Session;
use crate::store::TableStore;
use crate::workflow::LeaveRecord;

/// Most audit rows a manager sees at once.
pub const AUDIT_LIMIT: usize = 20;

#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub employee: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardStats {
    #[schema(example = 2)]
    pub pending: usize,
    #[schema(example = 5)]
    pub approved: usize,
    #[schema(example = 1)]
    pub rejected: usize,
}

impl DashboardStats {
    fn count<'a>(requests: impl Iterator<Item = &'a LeaveRequest>) -> Self {
        requests.fold(Self::default(), |mut stats, r| {
            match r.status {
                LeaveStatus::Pending => stats.pending += 1,
                LeaveStatus::Approved => stats.approved += 1,
                LeaveStatus::Rejected => stats.rejected += 1,
            }
            stats
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeOverview {
    pub balance: Option<LeaveBalance>,
    pub stats: DashboardStats,
}

fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
    match needle.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
    }
}

impl<S: TableStore> Session<S> {
    fn records(&self) -> impl Iterator<Item = LeaveRecord> + '_ {
        self.requests.iter().enumerate().map(|(i, r)| LeaveRecord {
            id: i as u64,
            request: r.clone(),
        })
    }

    /// Pending requests of one department, in store order.
    pub fn pending_by_department(&self, department: &str) -> Vec<LeaveRecord> {
        self.records()
            .filter(|r| r.request.status == LeaveStatus::Pending && r.request.department == department)
            .collect()
    }

    /// An employee's requests, latest start date first.
    pub fn requests_of(&self, employee: &str) -> Vec<LeaveRecord> {
        let mut records: Vec<_> = self
            .records()
            .filter(|r| r.request.employee == employee)
            .collect();
        records.sort_by(|a, b| b.request.start_date.cmp(&a.request.start_date));
        records
    }

    /// Audit entries about members of `department`, newest first, at most
    /// [`AUDIT_LIMIT`] of them.
    pub fn audit_by_department(&self, department: &str, filter: &AuditFilter) -> Vec<AuditEntry> {
        let members: HashSet<&str> = self
            .users
            .iter()
            .filter(|u| u.department == department)
            .map(|u| u.employee.as_str())
            .collect();

        let mut entries: Vec<AuditEntry> = self
            .audit
            .iter()
            .filter(|e| members.contains(e.employee.as_str()))
            .filter(|e| contains_ci(&e.employee, &filter.employee))
            .filter(|e| contains_ci(e.action.as_ref(), &filter.action))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(AUDIT_LIMIT);
        entries
    }

    pub fn dashboard_stats(&self, department: &str) -> DashboardStats {
        DashboardStats::count(self.requests.iter().filter(|r| r.department == department))
    }

    pub fn employee_overview(&self, employee: &str) -> EmployeeOverview {
        EmployeeOverview {
            balance: self.balance_for(employee).cloned(),
            stats: DashboardStats::count(self.requests.iter().filter(|r| r.employee == employee)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dates::{parse_date, parse_datetime};
    use crate::model::{AuditAction, LeaveType};
    use crate::store::{DocumentStore, MemoryStore};

    fn session() -> Session<MemoryStore> {
        Session::init(MemoryStore::seeded(), DocumentStore::new("unused"))
    }

    fn request(employee: &str, department: &str, start: &str, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            employee: employee.into(),
            department: department.into(),
            leave_type: LeaveType::Annual,
            start_date: parse_date(start),
            end_date: parse_date(start),
            status,
            reason: String::new(),
            document: None,
        }
    }

    fn entry(ts: &str, action: AuditAction, employee: &str) -> AuditEntry {
        AuditEntry {
            timestamp: parse_datetime(ts),
            action,
            employee: employee.into(),
            details: String::new(),
            manager_comments: String::new(),
        }
    }

    #[test]
    fn pending_is_scoped_to_department() {
        let mut s = session();
        s.requests = vec![
            request("Peter Jones", "Finance", "2024-01-01", LeaveStatus::Pending),
            request("Mary Brown", "HR", "2024-01-01", LeaveStatus::Pending),
            request("Peter Jones", "Finance", "2024-02-01", LeaveStatus::Approved),
            request("John Doe", "Finance", "2024-03-01", LeaveStatus::Pending),
        ];

        let ids: Vec<u64> = s.pending_by_department("Finance").iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 3]);
        assert!(s.pending_by_department("Legal").is_empty());
    }

    #[test]
    fn employee_history_is_latest_first() {
        let mut s = session();
        s.requests = vec![
            request("Peter Jones", "Finance", "2024-01-01", LeaveStatus::Approved),
            request("Peter Jones", "Finance", "garbled", LeaveStatus::Pending),
            request("Mary Brown", "HR", "2024-06-01", LeaveStatus::Pending),
            request("Peter Jones", "Finance", "2024-03-01", LeaveStatus::Rejected),
        ];

        let ids: Vec<u64> = s.requests_of("Peter Jones").iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 0, 1]);
    }

    #[test]
    fn audit_stays_inside_department_and_sorts_newest_first() {
        let mut s = session();
        s.audit = vec![
            entry("2024-01-01 09:00:00", AuditAction::Submit, "Peter Jones"),
            entry("2024-01-03 09:00:00", AuditAction::Submit, "Mary Brown"),
            entry("2024-01-02 09:00:00", AuditAction::Approve, "Peter Jones"),
            entry("not a time", AuditAction::Reject, "John Doe"),
        ];

        let rows = s.audit_by_department("Finance", &AuditFilter::default());
        let got: Vec<(&str, AuditAction)> = rows.iter().map(|e| (e.employee.as_str(), e.action)).collect();
        assert_eq!(
            got,
            vec![
                ("Peter Jones", AuditAction::Approve),
                ("Peter Jones", AuditAction::Submit),
                ("John Doe", AuditAction::Reject),
            ]
        );
    }

    #[test]
    fn audit_is_capped() {
        let mut s = session();
        s.audit = (0..45)
            .map(|i| entry(&format!("2024-01-01 10:{:02}:00", i), AuditAction::Submit, "Susan Davis"))
            .collect();

        let rows = s.audit_by_department("IT", &AuditFilter::default());
        assert_eq!(rows.len(), AUDIT_LIMIT);
        assert_eq!(rows[0].timestamp, parse_datetime("2024-01-01 10:44:00"));
    }

    #[test]
    fn audit_filters_are_case_insensitive_substrings() {
        let mut s = session();
        s.audit = vec![
            entry("2024-01-01 09:00:00", AuditAction::Submit, "Peter Jones"),
            entry("2024-01-02 09:00:00", AuditAction::Approve, "Peter Jones"),
            entry("2024-01-03 09:00:00", AuditAction::Reject, "John Doe"),
        ];

        let by_employee = AuditFilter {
            employee: Some("PETER".into()),
            action: None,
        };
        assert_eq!(s.audit_by_department("Finance", &by_employee).len(), 2);

        let by_action = AuditFilter {
            employee: None,
            action: Some("approve".into()),
        };
        let rows = s.audit_by_department("Finance", &by_action);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].action, AuditAction::Approve);

        let blank = AuditFilter {
            employee: Some("  ".into()),
            action: Some("leave".into()),
        };
        assert_eq!(s.audit_by_department("Finance", &blank).len(), 3);
    }

    #[test]
    fn stats_count_each_status() {
        let mut s = session();
        s.requests = vec![
            request("Peter Jones", "Finance", "2024-01-01", LeaveStatus::Pending),
            request("Peter Jones", "Finance", "2024-01-02", LeaveStatus::Approved),
            request("John Doe", "Finance", "2024-01-03", LeaveStatus::Approved),
            request("Mary Brown", "HR", "2024-01-04", LeaveStatus::Rejected),
        ];

        assert_eq!(
            s.dashboard_stats("Finance"),
            DashboardStats {
                pending: 1,
                approved: 2,
                rejected: 0
            }
        );

        let overview = s.employee_overview("Peter Jones");
        assert_eq!(overview.balance.map(|b| b.annual), Some(20));
        assert_eq!(overview.stats.pending, 1);
        assert_eq!(overview.stats.approved, 1);
    }
}
