use crate::api::{AppSession, lock};
use crate::auth::auth::AuthUser;
use crate::error::WorkflowError;
use crate::export::{self, REPORT_FILE_NAME};
use crate::model::AuditAction;
use crate::session::LoadWarning;
use crate::workflow::{AuditFilter, DashboardStats};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    #[schema(example = "Finance")]
    pub department: String,
    pub stats: DashboardStats,
}

#[derive(Deserialize, IntoParams)]
pub struct AuditQuery {
    /// Case-insensitive substring of the employee name
    pub employee: Option<String>,
    /// Case-insensitive substring of the action, e.g. "approve"
    pub action: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AuditResponse {
    #[schema(example = "2026-01-01 09:30:00")]
    pub timestamp: Option<String>,
    pub action: AuditAction,
    #[schema(example = "Peter Jones")]
    pub employee: String,
    #[schema(example = "Annual leave submitted (2026-01-01 to 2026-01-03)")]
    pub details: String,
    #[schema(example = "")]
    pub manager_comments: String,
}

#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    pub warnings: Vec<LoadWarning>,
}

/// Request counts per status for the manager's department
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Department statistics", body = DashboardResponse),
        (status = 401, description = "Missing or unknown X-User"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("user_pick" = [])
    ),
    tag = "Dashboard"
)]
pub async fn dashboard(
    auth: AuthUser,
    session: web::Data<AppSession>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let session = lock(&session)?;
    let stats = session.dashboard_stats(&auth.department);
    Ok(HttpResponse::Ok().json(DashboardResponse {
        department: auth.department,
        stats,
    }))
}

/// Recent audit trail of the manager's department, newest first, at most 20 rows
#[utoipa::path(
    get,
    path = "/api/audit",
    params(AuditQuery),
    responses(
        (status = 200, description = "Audit entries", body = [AuditResponse]),
        (status = 401, description = "Missing or unknown X-User"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("user_pick" = [])
    ),
    tag = "Dashboard"
)]
pub async fn audit_trail(
    auth: AuthUser,
    session: web::Data<AppSession>,
    query: web::Query<AuditQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let query = query.into_inner();
    let filter = AuditFilter {
        employee: query.employee,
        action: query.action,
    };

    let session = lock(&session)?;
    let entries: Vec<AuditResponse> = session
        .audit_by_department(&auth.department, &filter)
        .into_iter()
        .map(|e| AuditResponse {
            timestamp: e
                .timestamp
                .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string()),
            action: e.action,
            employee: e.employee,
            details: e.details,
            manager_comments: e.manager_comments,
        })
        .collect();

    Ok(HttpResponse::Ok().json(entries))
}

/// Workbook with the LeaveRequests, AuditTrail and LeaveBalance sheets
#[utoipa::path(
    get,
    path = "/api/export",
    responses(
        (status = 200, description = "xlsx report (E-Leave_Report.xlsx)"),
        (status = 401, description = "Missing or unknown X-User")
    ),
    security(
        ("user_pick" = [])
    ),
    tag = "Dashboard"
)]
pub async fn export_report(
    auth: AuthUser,
    session: web::Data<AppSession>,
) -> actix_web::Result<impl Responder> {
    let session = lock(&session)?;
    let bytes = export::export_all(&*session).map_err(|e| {
        tracing::error!(error = %e, "Export failed");
        WorkflowError::Export(e)
    })?;
    info!(requested_by = %auth.employee, size = bytes.len(), "Report exported");

    Ok(HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", REPORT_FILE_NAME),
        ))
        .body(bytes))
}

/// Datasets that could not be loaded at startup
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Load warnings", body = StatusResponse)
    ),
    tag = "Dashboard"
)]
pub async fn status(session: web::Data<AppSession>) -> actix_web::Result<impl Responder> {
    let session = lock(&session)?;
    Ok(HttpResponse::Ok().json(StatusResponse {
        warnings: session.warnings().to_vec(),
    }))
}
