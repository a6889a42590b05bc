//! House handlers: form-driven aggregate mutation plus roommate search.

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};

use crate::domain::forms::{Form, HouseForm};
use crate::domain::{Error, UserMatch};
use crate::inbound::http::forms::{parse_path_uuid, FormEnvelope, FormPairs};
use crate::inbound::http::hypermedia::{is_hypermedia_request, redirect};
use crate::inbound::http::session::{acting_user, require_identity, AuthToken};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// `POST /houses`: create a house made by the signed-in user.
#[post("/houses")]
pub async fn create_house(
    req: HttpRequest,
    state: web::Data<HttpState>,
    token: AuthToken,
    pairs: FormPairs,
) -> ApiResult<HttpResponse> {
    let (_, identity) = require_identity(&state, token).await?;

    let mut form = HouseForm::from_pairs(pairs.as_slice());
    let (valid, messages) = form.is_valid();
    if !valid {
        return Ok(FormEnvelope::new(form.view(), messages, form.state()).into_response());
    }

    let filter = form.filter_roommate_ids();
    let house_id = state
        .houses
        .create(acting_user(&identity), &form.name, &filter.ids)
        .await?;

    if filter.dropped {
        // Re-render with the warning instead of navigating away, so the
        // user sees which entries survived.
        return Ok(FormEnvelope::new(form.view(), Vec::new(), form.state()).into_response());
    }
    Ok(redirect(&req, &format!("/houses/{house_id}")))
}

/// `PUT /houses/{id}`: replace name and membership; maker only.
#[put("/houses/{id}")]
pub async fn replace_house(
    req: HttpRequest,
    state: web::Data<HttpState>,
    token: AuthToken,
    path: web::Path<String>,
    pairs: FormPairs,
) -> ApiResult<HttpResponse> {
    let house_id = parse_path_uuid(&path)?;
    let (_, identity) = require_identity(&state, token).await?;

    let mut form = HouseForm::from_pairs(pairs.as_slice());
    let (valid, messages) = form.is_valid();
    if !valid {
        return Ok(FormEnvelope::new(form.view(), messages, form.state()).into_response());
    }

    let filter = form.filter_roommate_ids();
    state
        .houses
        .replace(acting_user(&identity), house_id, &form.name, &filter.ids)
        .await?;

    if filter.dropped {
        return Ok(FormEnvelope::new(form.view(), Vec::new(), form.state()).into_response());
    }
    Ok(redirect(&req, &format!("/houses/{house_id}")))
}

/// `DELETE /houses/{id}`: maker only; memberships cascade.
#[delete("/houses/{id}")]
pub async fn delete_house(
    req: HttpRequest,
    state: web::Data<HttpState>,
    token: AuthToken,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let house_id = parse_path_uuid(&path)?;
    let (_, identity) = require_identity(&state, token).await?;
    state.houses.delete(acting_user(&identity), house_id).await?;
    Ok(redirect(&req, "/"))
}

/// `GET /houses/roommate-search?searched_user=...`: username suggestions
/// for the house form, excluding labels already on it.
///
/// Only answers partial-page fetches; the suggestion box has no standalone
/// page.
#[get("/houses/roommate-search")]
pub async fn roommate_search(
    req: HttpRequest,
    state: web::Data<HttpState>,
    token: AuthToken,
) -> ApiResult<web::Json<Vec<UserMatch>>> {
    require_identity(&state, token).await?;
    if !is_hypermedia_request(&req) {
        return Err(Error::forbidden("hypermedia request required"));
    }

    let query = FormPairs::parse(req.query_string().as_bytes());
    let searched = query
        .as_slice()
        .iter()
        .rev()
        .find(|(k, _)| k == "searched_user")
        .map(|(_, v)| v.clone())
        .unwrap_or_default();
    let exclude: Vec<String> = query
        .as_slice()
        .iter()
        .filter(|(k, _)| k == "roommates_labels[]")
        .map(|(_, v)| v.clone())
        .collect();

    if searched.is_empty() {
        return Ok(web::Json(Vec::new()));
    }
    let matches = state.accounts.search_usernames(&searched, &exclude).await?;
    Ok(web::Json(matches))
}
