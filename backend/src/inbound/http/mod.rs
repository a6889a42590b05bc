//! HTTP inbound adapter exposing the form endpoints and the JSON API.

pub mod auth;
pub mod error;
pub mod forms;
pub mod houses;
pub mod hypermedia;
pub mod notes;
pub mod session;
pub mod state;

pub use error::ApiResult;
pub use state::{HttpState, HttpStatePorts};

use actix_web::web;

/// Register every route on an actix `App` or test service.
///
/// The roommate-search route precedes the parameterised house routes so the
/// literal segment is never captured as an id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(auth::sign_in)
            .service(auth::sign_out)
            .service(auth::register_account),
    )
    .service(auth::home)
    .service(auth::login_page)
    .service(auth::login_submit)
    .service(auth::register_page)
    .service(auth::register_submit)
    .service(houses::roommate_search)
    .service(houses::create_house)
    .service(houses::replace_house)
    .service(houses::delete_house)
    .service(notes::create_note)
    .service(notes::update_note)
    .service(notes::delete_note);
}
