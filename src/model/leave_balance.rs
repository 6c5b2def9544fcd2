use serde::{Deserialize, Serialize};

use crate::model::leave_request::LeaveType;
use crate::model::user::default_users;
use crate::store::{Dataset, Record};

pub const DEFAULT_ANNUAL_DAYS: u32 = 20;
pub const DEFAULT_SICK_DAYS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveBalance {
    #[serde(rename = "Employee")]
    pub employee: String,
    #[serde(rename = "Annual")]
    pub annual: u32,
    #[serde(rename = "Sick")]
    pub sick: u32,
}

impl LeaveBalance {
    /// Deducts `days` from the column tracked for `leave_type`, floored at zero.
    ///
    /// Returns the remaining days, or `None` when the leave type carries no
    /// balance (maternity, paternity, study).
    pub fn deduct(&mut self, leave_type: LeaveType, days: u32) -> Option<u32> {
        let column = match leave_type {
            LeaveType::Annual => &mut self.annual,
            LeaveType::Sick => &mut self.sick,
            _ => return None,
        };
        *column = column.saturating_sub(days);
        Some(*column)
    }
}

impl Record for LeaveBalance {
    const DATASET: Dataset = Dataset::LeaveBalance;
    const HEADERS: &'static [&'static str] = &["Employee", "Annual", "Sick"];
}

pub fn default_balances() -> Vec<LeaveBalance> {
    default_users()
        .into_iter()
        .map(|u| LeaveBalance {
            employee: u.employee,
            annual: DEFAULT_ANNUAL_DAYS,
            sick: DEFAULT_SICK_DAYS,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance(annual: u32, sick: u32) -> LeaveBalance {
        LeaveBalance {
            employee: "Peter Jones".into(),
            annual,
            sick,
        }
    }

    #[test]
    fn deduct_floors_at_zero() {
        let mut b = balance(1, 10);
        assert_eq!(b.deduct(LeaveType::Annual, 3), Some(0));
        assert_eq!(b.annual, 0);
        assert_eq!(b.sick, 10);
    }

    #[test]
    fn untracked_types_leave_balance_alone() {
        let mut b = balance(20, 10);
        for t in [LeaveType::Maternity, LeaveType::Paternity, LeaveType::Study] {
            assert_eq!(b.deduct(t, 5), None);
        }
        assert_eq!(b, balance(20, 10));
    }
}
