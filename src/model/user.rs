use serde::{Deserialize, Serialize};

use crate::model::role::Role;
use crate::store::{Dataset, Record};

/// A person who can log in. Seeded once, never mutated by the workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "Employee")]
    pub employee: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Role")]
    pub role: Role,
}

impl User {
    pub fn new(employee: &str, department: &str, role: Role) -> Self {
        Self {
            employee: employee.to_string(),
            department: department.to_string(),
            role,
        }
    }
}

impl Record for User {
    const DATASET: Dataset = Dataset::Users;
    const HEADERS: &'static [&'static str] = &["Employee", "Department", "Role"];
}

/// Rows written to `users.csv` on first run.
pub fn default_users() -> Vec<User> {
    vec![
        User::new("John Doe", "Finance", Role::Manager),
        User::new("Jane Smith", "HR", Role::Manager),
        User::new("Peter Jones", "Finance", Role::Employee),
        User::new("Mary Brown", "HR", Role::Employee),
        User::new("David Williams", "IT", Role::Manager),
        User::new("Susan Davis", "IT", Role::Employee),
    ]
}
