use crate::models::{ActionResponse, ErrorResponse, MessagesResponse, SendMessageRequest};
use crate::routes::swipes::AppState;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure chat routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/chat/{match_id}/messages", web::get().to(list_messages))
        .route("/chat/{match_id}/messages", web::post().to(send_message));
}

/// Fetch the match and confirm the caller is one of its members.
/// Returns the error response to send when they are not.
async fn authorize_member(
    state: &AppState,
    match_id: i64,
    user_id: &str,
) -> Result<(), HttpResponse> {
    let record = match state.supabase.get_match(match_id).await {
        Ok(record) => record,
        Err(e) => {
            tracing::error!("Failed to fetch match {}: {}", match_id, e);
            return Err(HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch match".to_string(),
                message: e.to_string(),
                status_code: 500,
            }));
        }
    };

    match record {
        None => Err(HttpResponse::NotFound().json(ErrorResponse {
            error: "Match not found".to_string(),
            message: format!("No match with id {}", match_id),
            status_code: 404,
        })),
        Some(record) if !record.involves(user_id) => {
            Err(HttpResponse::Forbidden().json(ErrorResponse {
                error: "Not authorized".to_string(),
                message: "You are not a member of this match".to_string(),
                status_code: 403,
            }))
        }
        Some(_) => Ok(()),
    }
}

/// Chat history for a match, oldest first
///
/// GET /api/v1/chat/{matchId}/messages
async fn list_messages(
    state: web::Data<AppState>,
    path: web::Path<i64>,
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

    let match_id = path.into_inner();
    if let Err(response) = authorize_member(&state, match_id, &user.id).await {
        return response;
    }

    match state.supabase.messages_for_match(match_id).await {
        Ok(messages) => HttpResponse::Ok().json(MessagesResponse { messages }),
        Err(e) => {
            tracing::error!("Failed to fetch messages for match {}: {}", match_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch messages".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Send a message to a match
///
/// POST /api/v1/chat/{matchId}/messages
///
/// Sending is gated by the remote rate-limit procedure; a denial is a
/// normal response, not an error.
async fn send_message(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<SendMessageRequest>,
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
    let content = req.content.trim();
    if content.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: "Message content must not be empty".to_string(),
            status_code: 400,
        });
    }

    let match_id = path.into_inner();
    if let Err(response) = authorize_member(&state, match_id, &user.id).await {
        return response;
    }

    let can_send = match state.supabase.can_send_message(&user.id).await {
        Ok(allowed) => allowed,
        Err(e) => {
            tracing::error!("Failed to check message limit for {}: {}", user.id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to check message limit".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };
    if !can_send {
        return HttpResponse::Ok().json(ActionResponse::denied(
            "Message limit reached. Try again later.",
        ));
    }

    match state
        .supabase
        .insert_message(match_id, &user.id, content)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(ActionResponse::ok()),
        Err(e) => {
            tracing::error!("Failed to send message in match {}: {}", match_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to send message".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
