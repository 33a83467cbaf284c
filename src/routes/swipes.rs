use crate::core::{choose_rewind_target, rewinds_remaining};
use crate::models::{
    ActionResponse, ErrorResponse, HealthResponse, RewindResponse, RewindStatusResponse,
    SwipeKind, SwipeRequest, SwipeResponse,
};
use crate::services::{SessionVerifier, StripeClient, SupabaseClient};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub supabase: Arc<SupabaseClient>,
    pub stripe: Arc<StripeClient>,
    pub sessions: Arc<SessionVerifier>,
    pub admin_emails: Arc<Vec<String>>,
    pub monthly_price_id: String,
    pub site_url: String,
}

/// Configure swipe-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/swipes/like", web::post().to(like))
        .route("/swipes/pass", web::post().to(pass))
        .route("/swipes/rewind", web::post().to(rewind))
        .route("/swipes/rewind/status", web::get().to(rewind_status));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.supabase.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Like endpoint
///
/// POST /api/v1/swipes/like
///
/// Records the like and reports whether it completed a mutual match.
async fn like(
    state: web::Data<AppState>,
    req: web::Json<SwipeRequest>,
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

    if req.target_user_id == user.id {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid target".to_string(),
            message: "Cannot like yourself".to_string(),
            status_code: 400,
        });
    }

    // Insert the edge; the store ignores a duplicate pair
    if let Err(e) = state.supabase.record_like(&user.id, &req.target_user_id).await {
        tracing::error!("Failed to record like {} -> {}: {}", user.id, req.target_user_id, e);
        return HttpResponse::InternalServerError().json(ErrorResponse {
            error: "Failed to record like".to_string(),
            message: e.to_string(),
            status_code: 500,
        });
    }

    // Reciprocal like present means this swipe completed a match
    let matched = match state
        .supabase
        .reciprocal_like_exists(&user.id, &req.target_user_id)
        .await
    {
        Ok(reciprocal) => reciprocal,
        Err(e) => {
            tracing::error!("Failed to check reciprocal like for {}: {}", user.id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to check reciprocal like".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    if matched {
        if let Err(e) = state
            .supabase
            .record_match(&user.id, &req.target_user_id)
            .await
        {
            tracing::error!("Failed to record match for {}: {}", user.id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to record match".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
        tracing::info!("New match: {} <-> {}", user.id, req.target_user_id);
    }

    HttpResponse::Ok().json(SwipeResponse { matched })
}

/// Pass endpoint
///
/// POST /api/v1/swipes/pass
async fn pass(
    state: web::Data<AppState>,
    req: web::Json<SwipeRequest>,
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

    if req.target_user_id == user.id {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid target".to_string(),
            message: "Cannot pass yourself".to_string(),
            status_code: 400,
        });
    }

    match state.supabase.record_pass(&user.id, &req.target_user_id).await {
        Ok(()) => HttpResponse::Ok().json(ActionResponse::ok()),
        Err(e) => {
            tracing::error!("Failed to record pass {} -> {}: {}", user.id, req.target_user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to record pass".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Rewind endpoint
///
/// POST /api/v1/swipes/rewind
///
/// Consumes one rewind from the remote quota, then undoes the caller's
/// most recent swipe. Undoing a like also removes the match it created.
async fn rewind(state: web::Data<AppState>, http_req: actix_web::HttpRequest) -> impl Responder {
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

    // Quota gate first; denial leaves all state untouched
    let allowed = state
        .supabase
        .use_rewind_if_available(&user.id)
        .await
        .unwrap_or(false);
    if !allowed {
        return HttpResponse::Ok().json(RewindResponse {
            success: false,
            undone_type: None,
            message: Some("No rewinds available.".to_string()),
        });
    }

    let last_like = match state.supabase.latest_like(&user.id).await {
        Ok(like) => like,
        Err(e) => {
            tracing::error!("Failed to fetch latest like for {}: {}", user.id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch swipe history".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };
    let last_pass = match state.supabase.latest_pass(&user.id).await {
        Ok(pass) => pass,
        Err(e) => {
            tracing::error!("Failed to fetch latest pass for {}: {}", user.id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch swipe history".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let undone_type = match choose_rewind_target(last_like.as_ref(), last_pass.as_ref()) {
        Some((SwipeKind::Pass, record)) => {
            if let Err(e) = state.supabase.delete_pass(record.id).await {
                tracing::error!("Failed to delete pass {}: {}", record.id, e);
                return HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to undo pass".to_string(),
                    message: e.to_string(),
                    status_code: 500,
                });
            }
            Some(SwipeKind::Pass)
        }
        Some((SwipeKind::Like, record)) => {
            if let Err(e) = state.supabase.delete_like(record.id).await {
                tracing::error!("Failed to delete like {}: {}", record.id, e);
                return HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to undo like".to_string(),
                    message: e.to_string(),
                    status_code: 500,
                });
            }
            // Only the match for this exact pair is cleaned up
            match state
                .supabase
                .find_match_between(&user.id, &record.target_user_id)
                .await
            {
                Ok(Some(existing)) => {
                    if let Err(e) = state.supabase.delete_match(existing.id).await {
                        tracing::error!("Failed to delete match {}: {}", existing.id, e);
                        return HttpResponse::InternalServerError().json(ErrorResponse {
                            error: "Failed to remove match".to_string(),
                            message: e.to_string(),
                            status_code: 500,
                        });
                    }
                    tracing::info!("Rewind removed match {} for {}", existing.id, user.id);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!("Failed to look up match for {}: {}", user.id, e);
                    return HttpResponse::InternalServerError().json(ErrorResponse {
                        error: "Failed to look up match".to_string(),
                        message: e.to_string(),
                        status_code: 500,
                    });
                }
            }
            Some(SwipeKind::Like)
        }
        None => None,
    };

    tracing::debug!("Rewind for {}: undone {:?}", user.id, undone_type);

    HttpResponse::Ok().json(RewindResponse {
        success: true,
        undone_type,
        message: None,
    })
}

/// Rewind status endpoint
///
/// GET /api/v1/swipes/rewind/status
async fn rewind_status(
    state: web::Data<AppState>,
    http_req: actix_web::HttpRequest,
) -> impl Responder {
    let user = match state.sessions.authenticate(&http_req) {
        // Unauthenticated callers simply have no rewinds
        Err(_) => {
            return HttpResponse::Ok().json(RewindStatusResponse {
                rewinds_available: 0,
            });
        }
        Ok(user) => user,
    };

    let subscribed = match state.supabase.has_active_subscription(&user.id).await {
        Ok(subscribed) => subscribed,
        Err(e) => {
            tracing::error!("Failed to check subscription for {}: {}", user.id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to check subscription".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let used_today = if subscribed {
        match state.supabase.premium_usage_today(&user.id, "rewind").await {
            Ok(used) => used,
            Err(e) => {
                tracing::error!("Failed to fetch premium usage for {}: {}", user.id, e);
                return HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to fetch usage".to_string(),
                    message: e.to_string(),
                    status_code: 500,
                });
            }
        }
    } else {
        0
    };

    HttpResponse::Ok().json(RewindStatusResponse {
        rewinds_available: rewinds_remaining(subscribed, used_today),
    })
}
