//! End-to-end flows over the HTTP surface with in-memory adapters.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use uuid::Uuid;

use roomboard::domain::ports::{
    HouseRepository, InMemoryHouseRepository, InMemoryNoteRepository, InMemorySessionStore,
    InMemoryUserRepository, NoteRepository, SessionStore, UserRepository,
};
use roomboard::inbound::http::{self, HttpState, HttpStatePorts};

struct Fixture {
    houses: Arc<InMemoryHouseRepository>,
    state: web::Data<HttpState>,
}

fn fixture() -> Fixture {
    let sessions = Arc::new(InMemorySessionStore::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let houses = Arc::new(InMemoryHouseRepository::new());
    let notes = Arc::new(InMemoryNoteRepository::new());
    let state = web::Data::new(HttpState::from(HttpStatePorts {
        sessions: sessions as Arc<dyn SessionStore>,
        users: users as Arc<dyn UserRepository>,
        houses: Arc::clone(&houses) as Arc<dyn HouseRepository>,
        notes: notes as Arc<dyn NoteRepository>,
    }));
    Fixture { houses, state }
}

macro_rules! app {
    ($fixture:expr) => {
        test::init_service(
            App::new()
                .app_data($fixture.state.clone())
                .configure(http::configure),
        )
        .await
    };
}

async fn register_and_sign_in<S>(app: &S, email: &str, username: &str) -> String
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register-account")
            .set_json(serde_json::json!({
                "email": email,
                "username": username,
                "password": "Proper-pass",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(response).await;
    body.get("token")
        .and_then(serde_json::Value::as_str)
        .expect("token in body")
        .to_owned()
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn pristine_login_form_renders_without_messages() {
    let fixture = fixture();
    let app = app!(fixture);

    let response =
        test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["messages"].as_array().map(Vec::len), Some(0));
    assert!(body.get("error").is_none());
}

#[actix_web::test]
async fn submitted_login_form_reports_field_messages() {
    let fixture = fixture();
    let app = app!(fixture);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
            .set_payload("email=nope&password=short")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(response).await;
    let keys: Vec<&str> = body["messages"]
        .as_array()
        .expect("messages array")
        .iter()
        .filter_map(|m| m["key"].as_str())
        .collect();
    assert!(keys.contains(&"forms.email.invalid"));
    assert!(keys.contains(&"forms.password.too_short"));
}

#[actix_web::test]
async fn registration_conflicts_surface_as_a_form_message() {
    let fixture = fixture();
    let app = app!(fixture);
    register_and_sign_in(&app, "ryan@example.com", "ryan").await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/register")
            .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
            .set_payload(
                "email=ryan%40example.com&username=someone&password=Proper-pass&password_2=Proper-pass",
            )
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(response).await;
    let keys: Vec<&str> = body["messages"]
        .as_array()
        .expect("messages array")
        .iter()
        .filter_map(|m| m["key"].as_str())
        .collect();
    assert_eq!(keys, vec!["forms.errors.account_already_exists"]);
}

#[actix_web::test]
async fn bearer_token_authenticates_and_sign_out_revokes_it() {
    let fixture = fixture();
    let app = app!(fixture);
    let token = register_and_sign_in(&app, "ryan@example.com", "ryan").await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/auth/sign-out")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn unauthenticated_house_mutations_are_rejected() {
    let fixture = fixture();
    let app = app!(fixture);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/houses")
            .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
            .set_payload("name=Sea+House")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn house_creation_always_includes_the_maker() {
    let fixture = fixture();
    let app = app!(fixture);
    let token = register_and_sign_in(&app, "ryan@example.com", "ryan").await;
    let roommate = Uuid::new_v4();

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/houses")
            .insert_header(bearer(&token))
            .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
            .set_payload(format!(
                "name=Sea+House&roommates%5B%5D={roommate}&roommates_labels%5B%5D=alice"
            ))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = response
        .headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect location");
    let house_id: Uuid = location
        .rsplit('/')
        .next()
        .and_then(|raw| raw.parse().ok())
        .expect("house id in location");

    let stored = fixture.houses.stored(house_id).expect("house present");
    assert!(stored.members.contains(&roommate));
    assert!(stored.members.contains(stored.maker_id.as_uuid()));
}

#[actix_web::test]
async fn invalid_roommate_ids_are_dropped_with_a_warning() {
    let fixture = fixture();
    let app = app!(fixture);
    let token = register_and_sign_in(&app, "ryan@example.com", "ryan").await;
    let valid = Uuid::new_v4();

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/houses")
            .insert_header(bearer(&token))
            .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
            .set_payload(format!(
                "name=Sea+House\
                 &roommates%5B%5D={valid}&roommates_labels%5B%5D=alice\
                 &roommates%5B%5D=not-a-uuid&roommates_labels%5B%5D=ghost"
            ))
            .to_request(),
    )
    .await;
    // The house is created, but the form re-renders with the warning.
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(
        body["error"].as_str(),
        Some("forms.house.some_roommates_invalid")
    );
    let surviving: Vec<&str> = body["form"]["roommates"]
        .as_array()
        .expect("roommates array")
        .iter()
        .filter_map(serde_json::Value::as_str)
        .collect();
    assert_eq!(surviving, vec![valid.to_string().as_str()]);
}

#[actix_web::test]
async fn non_maker_house_mutations_answer_403_without_mutating() {
    let fixture = fixture();
    let app = app!(fixture);
    let maker_token = register_and_sign_in(&app, "maker@example.com", "maker").await;
    let other_token = register_and_sign_in(&app, "other@example.com", "other").await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/houses")
            .insert_header(bearer(&maker_token))
            .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
            .set_payload("name=Sea+House")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .expect("redirect location")
        .to_owned();
    let house_id: Uuid = location
        .rsplit('/')
        .next()
        .and_then(|raw| raw.parse().ok())
        .expect("house id");

    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/houses/{house_id}"))
            .insert_header(bearer(&other_token))
            .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
            .set_payload("name=Stolen+House")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        fixture.houses.stored(house_id).expect("house present").name,
        "Sea House"
    );

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/houses/{house_id}"))
            .insert_header(bearer(&other_token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(fixture.houses.stored(house_id).is_some());
}

#[actix_web::test]
async fn malformed_primary_resource_ids_answer_403() {
    let fixture = fixture();
    let app = app!(fixture);
    let token = register_and_sign_in(&app, "ryan@example.com", "ryan").await;

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/houses/not-a-uuid")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn note_lifecycle_under_a_house() {
    let fixture = fixture();
    let app = app!(fixture);
    let token = register_and_sign_in(&app, "ryan@example.com", "ryan").await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/houses")
            .insert_header(bearer(&token))
            .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
            .set_payload("name=Sea+House")
            .to_request(),
    )
    .await;
    let house_id: Uuid = response
        .headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .and_then(|loc| loc.rsplit('/').next())
        .and_then(|raw| raw.parse().ok())
        .expect("house id");

    // Create under an HX request: redirect travels as a header.
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/houses/{house_id}/notes"))
            .insert_header(bearer(&token))
            .insert_header(("HX-Request", "true"))
            .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
            .set_payload("title=Groceries&content=milk")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("HX-Redirect")
            .and_then(|v| v.to_str().ok()),
        Some(format!("/houses/{house_id}").as_str())
    );

    // Creating under a nonexistent house is a 404.
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/houses/{}/notes", Uuid::new_v4()))
            .insert_header(bearer(&token))
            .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
            .set_payload("title=Orphan&content=nothing")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // An empty title re-renders with messages instead of persisting.
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/houses/{house_id}/notes"))
            .insert_header(bearer(&token))
            .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
            .set_payload("title=&content=milk")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert!(body["messages"]
        .as_array()
        .expect("messages array")
        .iter()
        .any(|m| m["key"] == "forms.name.empty"));
}

#[actix_web::test]
async fn roommate_search_requires_the_hypermedia_header() {
    let fixture = fixture();
    let app = app!(fixture);
    let token = register_and_sign_in(&app, "alice@example.com", "alice").await;
    register_and_sign_in(&app, "alfred@example.com", "alfred").await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/houses/roommate-search?searched_user=al")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/houses/roommate-search?searched_user=al&roommates_labels%5B%5D=alice")
            .insert_header(bearer(&token))
            .insert_header(("HX-Request", "true"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .expect("matches array")
        .iter()
        .filter_map(|m| m["username"].as_str())
        .collect();
    assert_eq!(names, vec!["alfred"]);
}

#[actix_web::test]
async fn signed_in_users_are_redirected_away_from_login() {
    let fixture = fixture();
    let app = app!(fixture);
    let token = register_and_sign_in(&app, "ryan@example.com", "ryan").await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/login")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get("Location")
            .and_then(|v| v.to_str().ok()),
        Some("/")
    );
}
