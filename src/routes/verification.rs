use crate::models::{
    ActionResponse, ErrorResponse, VerificationDecisionRequest, VerificationRequestsResponse,
    VerificationStatus,
};
use crate::routes::swipes::AppState;
use crate::services::is_admin;
use actix_web::{web, HttpResponse, Responder};

/// Configure verification workflow routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/verification/request", web::post().to(request_verification))
        .route(
            "/admin/verification/requests",
            web::get().to(list_requests),
        )
        .route(
            "/admin/verification/decision",
            web::post().to(decide_request),
        );
}

/// File a verification request for the caller
///
/// POST /api/v1/verification/request
///
/// A user has at most one request; repeat submissions are no-ops.
async fn request_verification(
    state: web::Data<AppState>,
    http_req: actix_web::HttpRequest,
) -> impl Responder {
    let user = match state.sessions.authenticate(&http_req) {
        Ok(user) => user,
        Err(e) => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Not authenticated".to_string(),
                message: e.to_string(),
                status_code: 401,
            });
        }
    };

    match state.supabase.create_verification_request(&user.id).await {
        Ok(()) => HttpResponse::Ok().json(ActionResponse::ok()),
        Err(e) => {
            tracing::error!("Failed to create verification request for {}: {}", user.id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to create verification request".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// List all verification requests (admin only)
///
/// GET /api/v1/admin/verification/requests
async fn list_requests(
    state: web::Data<AppState>,
    http_req: actix_web::HttpRequest,
) -> impl Responder {
    let user = match state.sessions.authenticate(&http_req) {
        Ok(user) => user,
        Err(e) => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Not authenticated".to_string(),
                message: e.to_string(),
                status_code: 401,
            });
        }
    };

    if !is_admin(&user, &state.admin_emails) {
        return HttpResponse::Forbidden().json(ErrorResponse {
            error: "Not authorized".to_string(),
            message: "Admin access required".to_string(),
            status_code: 403,
        });
    }

    match state.supabase.list_verification_requests().await {
        Ok(requests) => HttpResponse::Ok().json(VerificationRequestsResponse { requests }),
        Err(e) => {
            tracing::error!("Failed to list verification requests: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to list verification requests".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Approve or reject a verification request (admin only)
///
/// POST /api/v1/admin/verification/decision
///
/// Approval sets the subject profile's verified flag; rejection clears it
/// even if it was previously set.
async fn decide_request(
    state: web::Data<AppState>,
    req: web::Json<VerificationDecisionRequest>,
    http_req: actix_web::HttpRequest,
) -> impl Responder {
    let user = match state.sessions.authenticate(&http_req) {
        Ok(user) => user,
        Err(e) => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Not authenticated".to_string(),
                message: e.to_string(),
                status_code: 401,
            });
        }
    };

    if !is_admin(&user, &state.admin_emails) {
        return HttpResponse::Forbidden().json(ErrorResponse {
            error: "Not authorized".to_string(),
            message: "Admin access required".to_string(),
            status_code: 403,
        });
    }

    let status = match req.status.to_lowercase().as_str() {
        "approved" => VerificationStatus::Approved,
        "rejected" => VerificationStatus::Rejected,
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid payload".to_string(),
                message: "Status must be one of: approved, rejected".to_string(),
                status_code: 400,
            });
        }
    };

    let subject = match state
        .supabase
        .decide_verification(req.request_id, status)
        .await
    {
        Ok(Some(user_id)) => user_id,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Request not found".to_string(),
                message: format!("No verification request with id {}", req.request_id),
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to update verification request {}: {}", req.request_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to update verification request".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let verified = status == VerificationStatus::Approved;
    if let Err(e) = state.supabase.set_profile_verified(&subject, verified).await {
        tracing::error!("Failed to update verified flag for {}: {}", subject, e);
        return HttpResponse::InternalServerError().json(ErrorResponse {
            error: "Failed to update profile".to_string(),
            message: e.to_string(),
            status_code: 500,
        });
    }

    tracing::info!(
        "Verification request {} for {} {}",
        req.request_id,
        subject,
        if verified { "approved" } else { "rejected" }
    );

    HttpResponse::Ok().json(ActionResponse::ok())
}
