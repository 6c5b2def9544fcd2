pub mod audit;
pub mod dates;
pub mod leave_balance;
pub mod leave_request;
pub mod role;
pub mod user;

pub use audit::{AuditAction, AuditEntry};
pub use leave_balance::LeaveBalance;
pub use leave_request::{LeaveRequest, LeaveStatus, LeaveType};
pub use role::Role;
pub use user::User;
