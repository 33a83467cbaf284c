// Route exports
pub mod billing;
pub mod chat;
pub mod profiles;
pub mod swipes;
pub mod verification;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(swipes::configure)
            .configure(chat::configure)
            .configure(profiles::configure)
            .configure(verification::configure)
            .configure(billing::configure),
    );
}
