use crate::api::dashboard::{AuditResponse, DashboardResponse, StatusResponse};
use crate::api::leave_request::{CreateLeave, LeaveResponse, RejectLeave};
use crate::api::user::{ProfileResponse, UserResponse};
use crate::auth::auth::USER_HEADER;
use crate::model::{AuditAction, LeaveStatus, LeaveType, Role};
use crate::session::LoadWarning;
use crate::workflow::DashboardStats;
use utoipa::Modify;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "E-Leave API",
        version = "0.1.0",
        description = r#"
## E-Leave Management

Employees submit leave applications, managers of the same department approve
or reject them, and balances and the audit trail are tracked and exported.

### Identity
Pick a user from `GET /api/users` and send the name in the `X-User` header.
This is an identity pick, not authentication.

### Storage
All data lives in four CSV files (`users.csv`, `leave_balance.csv`,
`leave_requests.csv`, `audit_trail.csv`) that are rewritten on every change.
"#,
    ),
    paths(
        crate::api::user::list_users,
        crate::api::user::me,

        crate::api::leave_request::leave_types,
        crate::api::leave_request::my_leaves,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::create_leave_with_document,
        crate::api::leave_request::pending_leaves,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::get_document,

        crate::api::dashboard::dashboard,
        crate::api::dashboard::audit_trail,
        crate::api::dashboard::export_report,
        crate::api::dashboard::status
    ),
    components(
        schemas(
            UserResponse,
            ProfileResponse,
            Role,
            CreateLeave,
            RejectLeave,
            LeaveResponse,
            LeaveType,
            LeaveStatus,
            AuditAction,
            AuditResponse,
            DashboardStats,
            DashboardResponse,
            LoadWarning,
            StatusResponse
        )
    ),
    modifiers(&UserPick),
    tags(
        (name = "User", description = "User pick and profile"),
        (name = "Leave", description = "Leave application and approval APIs"),
        (name = "Dashboard", description = "Statistics, audit trail and export"),
    )
)]
pub struct ApiDoc;

struct UserPick;

impl Modify for UserPick {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "user_pick",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(USER_HEADER))),
            );
        }
    }
}
