//! Note handlers: lifecycle mutations under a house.

use actix_web::{delete, post, put, web, HttpRequest, HttpResponse};

use crate::domain::forms::{Form, NoteForm};
use crate::inbound::http::forms::{parse_path_uuid, FormEnvelope, FormPairs};
use crate::inbound::http::hypermedia::redirect;
use crate::inbound::http::session::{acting_user, require_identity, AuthToken};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// `POST /houses/{id}/notes`: create a note under an existing house.
#[post("/houses/{id}/notes")]
pub async fn create_note(
    req: HttpRequest,
    state: web::Data<HttpState>,
    token: AuthToken,
    path: web::Path<String>,
    pairs: FormPairs,
) -> ApiResult<HttpResponse> {
    let house_id = parse_path_uuid(&path)?;
    let (_, identity) = require_identity(&state, token).await?;

    let mut form = NoteForm::from_pairs(pairs.as_slice());
    let (valid, messages) = form.is_valid();
    if !valid {
        return Ok(FormEnvelope::new(form.view(), messages, form.state()).into_response());
    }

    state
        .notes
        .create(acting_user(&identity), house_id, &form.title, &form.content)
        .await?;
    Ok(redirect(&req, &format!("/houses/{house_id}")))
}

/// `PUT /notes/{id}`: update title and content; maker only.
#[put("/notes/{id}")]
pub async fn update_note(
    req: HttpRequest,
    state: web::Data<HttpState>,
    token: AuthToken,
    path: web::Path<String>,
    pairs: FormPairs,
) -> ApiResult<HttpResponse> {
    let note_id = parse_path_uuid(&path)?;
    let (_, identity) = require_identity(&state, token).await?;

    let mut form = NoteForm::from_pairs(pairs.as_slice());
    let (valid, messages) = form.is_valid();
    if !valid {
        return Ok(FormEnvelope::new(form.view(), messages, form.state()).into_response());
    }

    state
        .notes
        .update(acting_user(&identity), note_id, &form.title, &form.content)
        .await?;
    Ok(redirect(&req, "/"))
}

/// `DELETE /notes/{id}`: maker only; no body required.
#[delete("/notes/{id}")]
pub async fn delete_note(
    req: HttpRequest,
    state: web::Data<HttpState>,
    token: AuthToken,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let note_id = parse_path_uuid(&path)?;
    let (_, identity) = require_identity(&state, token).await?;
    state.notes.delete(acting_user(&identity), note_id).await?;
    Ok(redirect(&req, "/"))
}
