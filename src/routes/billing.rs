use crate::core::{action_for_event, SubscriptionAction};
use crate::models::{ActionResponse, CheckoutSessionResponse, ErrorResponse};
use crate::routes::swipes::AppState;
use crate::services::CheckoutSessionParams;
use actix_web::{web, HttpResponse, Responder};

/// Configure billing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/billing/checkout-session",
        web::post().to(create_checkout_session),
    )
    .route("/billing/webhook", web::post().to(stripe_webhook));
}

/// Create a subscription checkout session for the caller
///
/// POST /api/v1/billing/checkout-session
async fn create_checkout_session(
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

    let params = CheckoutSessionParams {
        user_id: user.id.clone(),
        email: user.email.clone(),
        price_id: state.monthly_price_id.clone(),
        success_url: format!("{}/dashboard?success=1", state.site_url),
        cancel_url: format!("{}/dashboard?canceled=1", state.site_url),
    };

    match state.stripe.create_checkout_session(&params).await {
        Ok(url) => HttpResponse::Ok().json(CheckoutSessionResponse { url }),
        Err(e) => {
            tracing::error!("Failed to create checkout session for {}: {}", user.id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to create checkout session".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Payment-processor webhook
///
/// POST /api/v1/billing/webhook
///
/// Unauthenticated; the raw body signature is verified before anything
/// else touches the store. Replayed events overwrite with the same data.
async fn stripe_webhook(
    state: web::Data<AppState>,
    body: web::Bytes,
    http_req: actix_web::HttpRequest,
) -> impl Responder {
    let signature = match http_req
        .headers()
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
    {
        Some(sig) => sig,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Missing signature".to_string(),
                message: "Stripe-Signature header is required".to_string(),
                status_code: 400,
            });
        }
    };

    let event = match state.stripe.parse_event(&body, signature) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Webhook rejected: {}", e);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Webhook signature verification failed".to_string(),
                message: e.to_string(),
                status_code: 400,
            });
        }
    };

    let subscription = &event.data.object;
    match action_for_event(&event.event_type) {
        SubscriptionAction::Upsert => {
            // Events from checkouts outside this app carry no user id;
            // acknowledge and skip them
            let user_id = match subscription.user_id() {
                Some(id) => id,
                None => {
                    tracing::debug!(
                        "Skipping {} for {} without user metadata",
                        event.event_type,
                        subscription.id
                    );
                    return HttpResponse::Ok().json(ActionResponse::ok());
                }
            };

            let status = subscription.status.as_deref().unwrap_or("active");
            if let Err(e) = state
                .supabase
                .upsert_subscription(
                    user_id,
                    subscription.customer.as_deref(),
                    &subscription.id,
                    status,
                    subscription.period_end(),
                )
                .await
            {
                tracing::error!("Failed to upsert subscription {}: {}", subscription.id, e);
                return HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to sync subscription".to_string(),
                    message: e.to_string(),
                    status_code: 500,
                });
            }
            tracing::info!(
                "Synced subscription {} ({}) for {}",
                subscription.id,
                status,
                user_id
            );
        }
        SubscriptionAction::Cancel => {
            if subscription.user_id().is_none() {
                return HttpResponse::Ok().json(ActionResponse::ok());
            }
            if let Err(e) = state
                .supabase
                .cancel_subscription(&subscription.id, subscription.period_end())
                .await
            {
                tracing::error!("Failed to cancel subscription {}: {}", subscription.id, e);
                return HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to sync subscription".to_string(),
                    message: e.to_string(),
                    status_code: 500,
                });
            }
            tracing::info!("Marked subscription {} canceled", subscription.id);
        }
        SubscriptionAction::Ignore => {
            tracing::debug!("Ignoring webhook event type {}", event.event_type);
        }
    }

    HttpResponse::Ok().json(ActionResponse::ok())
}
