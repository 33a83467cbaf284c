use crate::models::{ActionResponse, DiscoverResponse, ErrorResponse, UpdateProfileRequest};
use crate::routes::swipes::AppState;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure profile and discovery routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profiles/me", web::get().to(get_own_profile))
        .route("/profiles/me", web::put().to(update_own_profile))
        .route("/discover", web::get().to(discover));
}

/// The caller's own profile
///
/// GET /api/v1/profiles/me
async fn get_own_profile(
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

    match state.supabase.get_profile(&user.id).await {
        Ok(Some(profile)) => HttpResponse::Ok().json(profile),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Profile not found".to_string(),
            message: format!("No profile for user {}", user.id),
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", user.id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Update the caller's profile
///
/// PUT /api/v1/profiles/me
///
/// Upserts the provided fields and marks the profile onboarded.
async fn update_own_profile(
    state: web::Data<AppState>,
    req: web::Json<UpdateProfileRequest>,
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

    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state.supabase.upsert_profile(&user.id, &req).await {
        Ok(()) => HttpResponse::Ok().json(ActionResponse::ok()),
        Err(e) => {
            tracing::error!("Failed to update profile for {}: {}", user.id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to update profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Next swipe candidates for the caller
///
/// GET /api/v1/discover
///
/// Ranking and filtering happen in the remote procedure; this endpoint
/// only relays its result.
async fn discover(state: web::Data<AppState>, http_req: actix_web::HttpRequest) -> impl Responder {
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

    match state.supabase.get_next_profiles(&user.id).await {
        Ok(profiles) => {
            tracing::debug!("Returning {} discover cards for {}", profiles.len(), user.id);
            HttpResponse::Ok().json(DiscoverResponse { profiles })
        }
        Err(e) => {
            tracing::error!("Failed to fetch discover cards for {}: {}", user.id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch profiles".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
