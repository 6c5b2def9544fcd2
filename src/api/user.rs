use crate::api::{AppSession, lock};
use crate::auth::auth::AuthUser;
use crate::model::role::Role;
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "Peter Jones")]
    pub employee: String,
    #[schema(example = "Finance")]
    pub department: String,
    pub role: Role,
}

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    #[schema(example = "Peter Jones")]
    pub employee: String,
    #[schema(example = "Finance")]
    pub department: String,
    pub role: Role,
    /// Remaining annual days, absent when the employee has no balance row
    #[schema(example = 17)]
    pub annual_remaining: Option<u32>,
    /// Remaining sick days
    #[schema(example = 10)]
    pub sick_remaining: Option<u32>,
    #[schema(example = 1)]
    pub pending: usize,
    #[schema(example = 2)]
    pub approved: usize,
    #[schema(example = 0)]
    pub rejected: usize,
}

/// Users available for the login pick
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = [UserResponse])
    ),
    tag = "User"
)]
pub async fn list_users(session: web::Data<AppSession>) -> actix_web::Result<impl Responder> {
    let session = lock(&session)?;
    let users: Vec<UserResponse> = session
        .users()
        .iter()
        .map(|u| UserResponse {
            employee: u.employee.clone(),
            department: u.department.clone(),
            role: u.role,
        })
        .collect();

    Ok(HttpResponse::Ok().json(users))
}

/// Profile, balances and personal status breakdown of the picked user
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current user", body = ProfileResponse),
        (status = 401, description = "Missing or unknown X-User")
    ),
    security(
        ("user_pick" = [])
    ),
    tag = "User"
)]
pub async fn me(auth: AuthUser, session: web::Data<AppSession>) -> actix_web::Result<impl Responder> {
    let session = lock(&session)?;
    let overview = session.employee_overview(&auth.employee);

    Ok(HttpResponse::Ok().json(ProfileResponse {
        annual_remaining: overview.balance.as_ref().map(|b| b.annual),
        sick_remaining: overview.balance.as_ref().map(|b| b.sick),
        pending: overview.stats.pending,
        approved: overview.stats.approved,
        rejected: overview.stats.rejected,
        employee: auth.employee,
        department: auth.department,
        role: auth.role,
    }))
}
