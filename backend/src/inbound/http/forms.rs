//! Form-submission plumbing: urlencoded bodies, path ids, and the JSON
//! envelope re-rendered forms travel in.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use url::form_urlencoded;
use uuid::Uuid;

use crate::domain::forms::FormState;
use crate::domain::{Error, Message};

/// Ordered key/value pairs from an `application/x-www-form-urlencoded`
/// body.
///
/// Order matters: repeated-key array fields (`roommates[]`,
/// `roommates_labels[]`) are index-aligned by submission order.
#[derive(Debug, Clone, Default)]
pub struct FormPairs(pub Vec<(String, String)>);

impl FormPairs {
    /// Parse a raw urlencoded byte string.
    pub fn parse(raw: &[u8]) -> Self {
        Self(
            form_urlencoded::parse(raw)
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        self.0.as_slice()
    }
}

impl FromRequest for FormPairs {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Bytes::from_request(req, payload);
        Box::pin(async move { body.await.map(|bytes| Self::parse(&bytes)) })
    }
}

/// Parse a primary-resource id from a path segment.
///
/// Malformed ids answer 403 with the parse failure, matching the behaviour
/// clients already rely on. Roommate-list ids are handled differently: they
/// are filtered with a warning, never rejected here.
pub fn parse_path_uuid(raw: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|err| Error::forbidden(format!("invalid identifier: {err}")))
}

/// JSON envelope wrapping a re-rendered form.
///
/// The progressive-enhancement layer consumes this instead of server-side
/// HTML: the bound field values, the validation messages, and the one
/// form-level error, if set.
#[derive(Debug, Serialize)]
pub struct FormEnvelope {
    pub form: serde_json::Value,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FormEnvelope {
    pub fn new(form: serde_json::Value, messages: Vec<Message>, state: &FormState) -> Self {
        Self {
            form,
            messages,
            error: state.error.clone(),
        }
    }

    /// Envelope for a pristine form: no messages, no error.
    pub fn pristine(form: serde_json::Value) -> Self {
        Self {
            form,
            messages: Vec::new(),
            error: None,
        }
    }

    /// Render as a 200 response; the form travels back for re-rendering
    /// whether or not it validated.
    pub fn into_response(self) -> HttpResponse {
        HttpResponse::Ok().json(self)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::MessageKey;

    #[test]
    fn parsing_preserves_repeated_key_order() {
        let pairs = FormPairs::parse(b"name=Sea+House&roommates%5B%5D=a&roommates%5B%5D=b");
        assert_eq!(
            pairs.as_slice(),
            &[
                ("name".to_owned(), "Sea House".to_owned()),
                ("roommates[]".to_owned(), "a".to_owned()),
                ("roommates[]".to_owned(), "b".to_owned()),
            ]
        );
    }

    #[test]
    fn malformed_path_ids_answer_forbidden() {
        let err = parse_path_uuid("not-a-uuid").expect_err("must fail");
        assert_eq!(err.code(), crate::domain::ErrorCode::Forbidden);
    }

    #[test]
    fn envelope_omits_an_absent_error() {
        let envelope = FormEnvelope::new(
            serde_json::json!({"name": ""}),
            vec![Message::new(MessageKey::NameEmpty)],
            &FormState::submitted(),
        );
        let value = serde_json::to_value(&envelope).expect("serialise");
        assert!(value.get("error").is_none());
        assert_eq!(
            value
                .get("messages")
                .and_then(serde_json::Value::as_array)
                .map(Vec::len),
            Some(1)
        );
    }
}
