use crate::api::{AppSession, lock};
use crate::auth::auth::AuthUser;
use crate::error::WorkflowError;
use crate::model::{LeaveStatus, LeaveType};
use crate::store::documents;
use crate::workflow::{LeaveRecord, NewLeave, Upload};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "Annual")]
    pub leave_type: LeaveType, // enum ensures Swagger dropdown
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family trip")]
    #[serde(default)]
    pub reason: String,
}

/// Form fields of a submission that carries a supporting document in the body
#[derive(Deserialize, IntoParams)]
pub struct CreateLeaveWithDocument {
    /// Annual, Sick, Maternity, Paternity or Study
    pub leave_type: LeaveType,
    /// leave start date (YYYY-MM-DD)
    #[param(value_type = String)]
    pub start_date: NaiveDate,
    /// leave end date (YYYY-MM-DD)
    #[param(value_type = String)]
    pub end_date: NaiveDate,
    /// reason for leave
    pub reason: Option<String>,
    /// original name of the uploaded file (pdf, png, jpg, jpeg); required with a non-empty body
    pub file_name: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct RejectLeave {
    #[schema(example = "Quarter-end close, please pick another week")]
    #[serde(default)]
    pub reason: String,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveResponse {
    #[schema(example = 0)]
    /// leave application id
    pub id: u64,
    #[schema(example = "Peter Jones")]
    pub employee: String,
    #[schema(example = "Finance")]
    pub department: String,
    pub leave_type: LeaveType,
    #[schema(example = "2026-01-01", format = "date", value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2026-01-03", format = "date", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    pub status: LeaveStatus,
    #[schema(example = "Family trip")]
    pub reason: String,
    /// whether a supporting document is attached
    pub has_document: bool,
}

impl From<LeaveRecord> for LeaveResponse {
    fn from(record: LeaveRecord) -> Self {
        let r = record.request;
        Self {
            id: record.id,
            employee: r.employee,
            department: r.department,
            leave_type: r.leave_type,
            start_date: r.start_date,
            end_date: r.end_date,
            status: r.status,
            reason: r.reason,
            has_document: r.document.is_some(),
        }
    }
}

fn to_responses(records: Vec<LeaveRecord>) -> Vec<LeaveResponse> {
    records.into_iter().map(LeaveResponse::from).collect()
}

fn submitted(record: LeaveRecord) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request submitted",
        "status": "pending",
        "id": record.id
    }))
}

/* =========================
Submit leave request
========================= */
/// Submit a leave request for the picked user
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted successfully",
         body = Object,
         example = json!({
            "message": "Leave request submitted",
            "status": "pending",
            "id": 0
         })
        ),
        (status = 400, description = "End date before start date"),
        (status = 401, description = "Missing or unknown X-User")
    ),
    security(
        ("user_pick" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    session: web::Data<AppSession>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();
    let mut session = lock(&session)?;

    let record = session.submit_leave(NewLeave {
        employee: auth.employee,
        leave_type: payload.leave_type,
        start_date: payload.start_date,
        end_date: payload.end_date,
        reason: payload.reason,
        document: None,
    })?;

    Ok(submitted(record))
}

/// Submit a leave request with a supporting document as the raw request body
#[utoipa::path(
    post,
    path = "/api/leave/document",
    params(CreateLeaveWithDocument),
    request_body(
        content = String,
        description = "Document bytes",
        content_type = "application/octet-stream"
    ),
    responses(
        (status = 200, description = "Leave request submitted successfully", body = Object),
        (status = 400, description = "Invalid dates, unsupported document or missing file name"),
        (status = 401, description = "Missing or unknown X-User")
    ),
    security(
        ("user_pick" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave_with_document(
    auth: AuthUser,
    session: web::Data<AppSession>,
    query: web::Query<CreateLeaveWithDocument>,
    body: web::Bytes,
) -> actix_web::Result<impl Responder> {
    let form = query.into_inner();
    let document = match (body.is_empty(), form.file_name) {
        (true, _) => None,
        (false, Some(file_name)) => Some(Upload {
            file_name,
            bytes: body.to_vec(),
        }),
        (false, None) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "file_name is required when a document is attached"
            })));
        }
    };

    let mut session = lock(&session)?;
    let record = session.submit_leave(NewLeave {
        employee: auth.employee,
        leave_type: form.leave_type,
        start_date: form.start_date,
        end_date: form.end_date,
        reason: form.reason.unwrap_or_default(),
        document,
    })?;

    Ok(submitted(record))
}

/// Leave types an employee can apply for
#[utoipa::path(
    get,
    path = "/api/leave/types",
    responses(
        (status = 200, description = "Leave types", body = [LeaveType])
    ),
    tag = "Leave"
)]
pub async fn leave_types() -> impl Responder {
    HttpResponse::Ok().json(LeaveType::iter().collect::<Vec<_>>())
}

/// Leave history of the picked user, latest start date first
#[utoipa::path(
    get,
    path = "/api/leave",
    responses(
        (status = 200, description = "Own leave requests", body = [LeaveResponse]),
        (status = 401, description = "Missing or unknown X-User")
    ),
    security(
        ("user_pick" = [])
    ),
    tag = "Leave"
)]
pub async fn my_leaves(
    auth: AuthUser,
    session: web::Data<AppSession>,
) -> actix_web::Result<impl Responder> {
    let session = lock(&session)?;
    Ok(HttpResponse::Ok().json(to_responses(session.requests_of(&auth.employee))))
}

/// Pending requests of the manager's department
#[utoipa::path(
    get,
    path = "/api/leave/pending",
    responses(
        (status = 200, description = "Pending requests", body = [LeaveResponse]),
        (status = 401, description = "Missing or unknown X-User"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("user_pick" = [])
    ),
    tag = "Leave"
)]
pub async fn pending_leaves(
    auth: AuthUser,
    session: web::Data<AppSession>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let session = lock(&session)?;
    Ok(HttpResponse::Ok().json(to_responses(session.pending_by_department(&auth.department))))
}

/// Details of one leave application
#[utoipa::path(
    get,
    path = "/api/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveResponse),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    security(
        ("user_pick" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    session: web::Data<AppSession>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();
    let session = lock(&session)?;

    match session.request(leave_id) {
        Some(r) if auth.can_view(&r.employee, &r.department) => {
            Ok(HttpResponse::Ok().json(LeaveResponse::from(LeaveRecord {
                id: leave_id,
                request: r.clone(),
            })))
        }
        _ => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        }))),
    }
}

/* =========================
Approve leave (manager)
========================= */
/// Approve a pending leave request and deduct the balance
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved successfully", body = Object, example = json!({
            "message": "Leave approved",
            "id": 0,
            "days_taken": 3,
            "remaining": 17
        })),
        (status = 404, description = "Leave request not found or already processed", body = Object, example = json!({
            "message": "Leave request 7 not found or already processed"
        })),
        (status = 401, description = "Missing or unknown X-User"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("user_pick" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    session: web::Data<AppSession>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let leave_id = path.into_inner();
    let mut session = lock(&session)?;
    if let Some(r) = session.request(leave_id) {
        auth.require_department(&r.department)?;
    }

    let approval = session.approve_leave(leave_id)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave approved",
        "id": approval.record.id,
        "days_taken": approval.days_taken,
        "remaining": approval.remaining
    })))
}

/* =========================
Reject leave (manager)
========================= */
/// Reject a pending leave request with a reason
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    request_body = RejectLeave,
    responses(
        (status = 200, description = "Leave rejected successfully", body = Object, example = json!({
            "message": "Leave rejected"
        })),
        (status = 400, description = "Rejection reason missing"),
        (status = 404, description = "Leave request not found or already processed"),
        (status = 401, description = "Missing or unknown X-User"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("user_pick" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    session: web::Data<AppSession>,
    path: web::Path<u64>,
    payload: web::Json<RejectLeave>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager()?;

    let leave_id = path.into_inner();
    let mut session = lock(&session)?;
    if let Some(r) = session.request(leave_id) {
        auth.require_department(&r.department)?;
    }

    let record = session.reject_leave(leave_id, &payload.reason)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave rejected",
        "id": record.id
    })))
}

/// Download the supporting document of a leave request
#[utoipa::path(
    get,
    path = "/api/leave/{leave_id}/document",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request")
    ),
    responses(
        (status = 200, description = "Document bytes"),
        (status = 404, description = "No document or document missing", body = Object, example = json!({
            "message": "Document not found"
        }))
    ),
    security(
        ("user_pick" = [])
    ),
    tag = "Leave"
)]
pub async fn get_document(
    auth: AuthUser,
    session: web::Data<AppSession>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();
    let session = lock(&session)?;

    match session.request(leave_id) {
        Some(r) if auth.can_view(&r.employee, &r.department) => {}
        _ => return Err(WorkflowError::NotFound(leave_id).into()),
    }

    let (stored, bytes) = session.document_of(leave_id)?;
    let file_name = std::path::Path::new(&stored)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document");

    Ok(HttpResponse::Ok()
        .content_type(documents::content_type(&stored))
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", file_name),
        ))
        .body(bytes))
}
