use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::model::dates;
use crate::store::{Dataset, Record};

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, EnumIter, ToSchema,
)]
pub enum LeaveType {
    Annual,
    Sick,
    Maternity,
    Paternity,
    Study,
}

impl LeaveType {
    /// Only annual and sick leave are drawn from a balance.
    pub fn tracks_balance(&self) -> bool {
        matches!(self, LeaveType::Annual | LeaveType::Sick)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    #[serde(rename = "Employee")]
    pub employee: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "LeaveType")]
    pub leave_type: LeaveType,
    #[serde(rename = "StartDate", with = "dates::date")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "EndDate", with = "dates::date")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "Status")]
    pub status: LeaveStatus,
    #[serde(rename = "Reason")]
    pub reason: String,
    #[serde(rename = "Document")]
    pub document: Option<String>,
}

impl LeaveRequest {
    /// Inclusive number of days covered, or `None` if either date failed to parse.
    pub fn days_taken(&self) -> Option<u32> {
        let (start, end) = (self.start_date?, self.end_date?);
        let days = (end - start).num_days() + 1;
        u32::try_from(days).ok()
    }
}

impl Record for LeaveRequest {
    const DATASET: Dataset = Dataset::LeaveRequests;
    const HEADERS: &'static [&'static str] = &[
        "Employee",
        "Department",
        "LeaveType",
        "StartDate",
        "EndDate",
        "Status",
        "Reason",
        "Document",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: &str, end: &str) -> LeaveRequest {
        LeaveRequest {
            employee: "Susan Davis".into(),
            department: "IT".into(),
            leave_type: LeaveType::Annual,
            start_date: dates::parse_date(start),
            end_date: dates::parse_date(end),
            status: LeaveStatus::Pending,
            reason: String::new(),
            document: None,
        }
    }

    #[test]
    fn days_taken_is_inclusive() {
        assert_eq!(request("2024-01-01", "2024-01-03").days_taken(), Some(3));
        assert_eq!(request("2024-01-01", "2024-01-01").days_taken(), Some(1));
    }

    #[test]
    fn days_taken_needs_both_dates() {
        assert_eq!(request("2024-01-01", "soon").days_taken(), None);
    }

    #[test]
    fn only_pending_is_open() {
        assert!(!LeaveStatus::Pending.is_terminal());
        assert!(LeaveStatus::Approved.is_terminal());
        assert!(LeaveStatus::Rejected.is_terminal());
    }
}
