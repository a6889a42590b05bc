//! Hypermedia-aware response helpers.
//!
//! Partial-page fetches announce themselves with the `HX-Request` header.
//! For those, a redirect must travel as an `HX-Redirect` response header on
//! a 200 so the client-side library performs the navigation; a plain `303
//! See Other` would be swallowed by the fetch that loaded the fragment.

use actix_web::http::header::LOCATION;
use actix_web::{HttpRequest, HttpResponse};

/// Request header marking a partial-page fetch.
pub const HX_REQUEST: &str = "HX-Request";

/// Response header instructing the client library to navigate.
pub const HX_REDIRECT: &str = "HX-Redirect";

/// Whether the request came from the partial-page client library.
pub fn is_hypermedia_request(req: &HttpRequest) -> bool {
    req.headers()
        .get(HX_REQUEST)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("true"))
}

/// Redirect in the way the caller can actually follow.
pub fn redirect(req: &HttpRequest, target: &str) -> HttpResponse {
    if is_hypermedia_request(req) {
        HttpResponse::Ok()
            .insert_header((HX_REDIRECT, target))
            .finish()
    } else {
        HttpResponse::SeeOther()
            .insert_header((LOCATION, target))
            .finish()
    }
}
