use crate::api::{AppSession, lock};
use crate::model::role::Role;
use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data};
use futures::future::{Ready, ready};

/// Header carrying the picked user. This is an identity pick, not a login.
pub const USER_HEADER: &str = "X-User";

pub struct AuthUser {
    pub employee: String,
    pub department: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let name = match req
            .headers()
            .get(USER_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|h| !h.is_empty())
        {
            Some(n) => n,
            None => return ready(Err(ErrorUnauthorized("Missing X-User header"))),
        };

        let session = match req.app_data::<Data<AppSession>>() {
            Some(s) => s,
            None => {
                return ready(Err(
                    actix_web::error::ErrorInternalServerError("Session missing"),
                ))
            }
        };

        let session = match lock(session) {
            Ok(s) => s,
            Err(e) => return ready(Err(e)),
        };

        match session.find_user(name) {
            Some(user) => ready(Ok(AuthUser {
                employee: user.employee.clone(),
                department: user.department.clone(),
                role: user.role,
            })),
            None => ready(Err(ErrorUnauthorized("Unknown user"))),
        }
    }
}

impl AuthUser {
    pub fn require_manager(&self) -> actix_web::Result<()> {
        if self.role.is_manager() {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("Managers only"))
        }
    }

    /// Managers act only on their own department.
    pub fn require_department(&self, department: &str) -> actix_web::Result<()> {
        if self.department == department {
            Ok(())
        } else {
            Err(actix_web::error::ErrorForbidden("Request belongs to another department"))
        }
    }

    /// Owners see their own requests; managers see their department's.
    pub fn can_view(&self, employee: &str, department: &str) -> bool {
        self.employee == employee || (self.role.is_manager() && self.department == department)
    }
}
