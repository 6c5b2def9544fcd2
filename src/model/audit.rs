use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};
use utoipa::ToSchema;

use crate::model::dates;
use crate::store::{Dataset, Record};

/// Workflow action recorded in the audit trail.
///
/// The long labels are what ends up in `audit_trail.csv`; the short ones are
/// accepted on load as well.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, AsRefStr, ToSchema)]
pub enum AuditAction {
    #[serde(rename = "Submit Leave", alias = "Submit")]
    #[strum(serialize = "Submit Leave")]
    Submit,
    #[serde(rename = "Approve Leave", alias = "Approve")]
    #[strum(serialize = "Approve Leave")]
    Approve,
    #[serde(rename = "Reject Leave", alias = "Reject")]
    #[strum(serialize = "Reject Leave")]
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    #[serde(rename = "Timestamp", with = "dates::timestamp")]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(rename = "Action")]
    pub action: AuditAction,
    #[serde(rename = "Employee")]
    pub employee: String,
    #[serde(rename = "Details")]
    pub details: String,
    #[serde(rename = "ManagerComments")]
    pub manager_comments: String,
}

impl Record for AuditEntry {
    const DATASET: Dataset = Dataset::AuditTrail;
    const HEADERS: &'static [&'static str] =
        &["Timestamp", "Action", "Employee", "Details", "ManagerComments"];
}
