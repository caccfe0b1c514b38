use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use contacts_core::{Contact, ContactId, ContactPatch, ContactRepository, MemoryContactRepository};
use contacts_web::{
    build_router,
    config::{Config, MEMORY_DB_PATH},
    state::{ContactStore, State},
};
use pretty_assertions::assert_eq;
use tower::ServiceExt;

fn test_config(db_path: &str) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_string(),
        log_level: "info".to_string(),
        log_dir: std::env::temp_dir(),
    }
}

fn contact(id: &str, first: &str, last: &str) -> Contact {
    let mut contact = Contact::with_id(ContactId::from(id));
    contact.first = Some(first.to_string());
    contact.last = Some(last.to_string());
    contact
}

fn app_with(contacts: Vec<Contact>) -> (Router, Arc<State>) {
    let store = ContactStore::Memory(MemoryContactRepository::with_contacts(contacts));
    let state = State::new(store);
    (build_router(Arc::clone(&state)), state)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("response")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .expect("request")
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    String::from_utf8_lossy(&bytes).to_string()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
}

fn stored(state: &State, id: &str) -> Option<Contact> {
    state
        .with_contacts(|service| Ok(service.get_contact(&ContactId::from(id))?))
        .expect("store read")
}

#[tokio::test]
async fn index_lists_contacts_and_renders_empty_search_without_null() {
    let (app, _) = app_with(vec![contact("a", "Ryan", "Florence"), Contact::with_id("b".into())]);

    let response = send(&app, get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;

    assert!(body.contains("Ryan Florence"));
    assert!(body.contains("<i>No Name</i>"));
    assert!(body.contains(r#"value="""#));
    assert!(!body.contains("null"));
}

#[tokio::test]
async fn search_filters_sidebar_and_echoes_query() {
    let (app, _) = app_with(vec![
        contact("a", "Ryan", "Florence"),
        contact("b", "Kent", "Dodds"),
    ]);

    let body = body_text(send(&app, get("/?q=dod")).await).await;
    assert!(body.contains("Kent Dodds"));
    assert!(!body.contains("Ryan Florence"));
    assert!(body.contains(r#"value="dod""#));
}

#[tokio::test]
async fn create_redirects_to_edit_view_of_fresh_contact() {
    let (app, state) = app_with(Vec::new());

    let response = send(&app, post_form("/", "")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response).to_string();

    let id = target
        .strip_prefix("/contacts/")
        .and_then(|rest| rest.strip_suffix("/edit"))
        .expect("edit redirect");
    let created = stored(&state, id).expect("created contact");
    assert!(!created.has_name());
    assert!(!created.favorite);

    let edit = send(&app, get(&target)).await;
    assert_eq!(edit.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_contact_renders_not_found_page() {
    let (app, _) = app_with(Vec::new());

    for uri in ["/contacts/missing", "/contacts/missing/edit"] {
        let response = send(&app, get(uri)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Not Found"));
    }

    let response = send(&app, post_form("/contacts/missing", "favorite=true")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn favorite_action_sets_flag_and_keeps_other_fields() {
    let mut original = contact("a", "Ryan", "Florence");
    original.notes = Some("notes".to_string());
    let (app, state) = app_with(vec![original.clone()]);

    let response = send(&app, post_form("/contacts/a", "favorite=true")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/contacts/a");
    assert_eq!(
        stored(&state, "a"),
        Some(Contact {
            favorite: true,
            ..original.clone()
        })
    );

    let body = body_text(send(&app, get("/contacts/a")).await).await;
    assert!(body.contains("Remove from favorites"));
    assert!(body.contains(r#"value="false""#));

    send(&app, post_form("/contacts/a", "favorite=false")).await;
    assert_eq!(stored(&state, "a"), Some(original));
}

#[tokio::test]
async fn edit_action_applies_form_and_redirects_to_detail() {
    let (app, state) = app_with(vec![contact("a", "Ryan", "Florence")]);

    let response = send(
        &app,
        post_form(
            "/contacts/a/edit",
            "first=Ry&last=&twitter=%40ryanflorence&avatar=&notes=Hello+there",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/contacts/a");

    let updated = stored(&state, "a").unwrap();
    assert_eq!(updated.first.as_deref(), Some("Ry"));
    assert_eq!(updated.last, None);
    assert_eq!(updated.twitter.as_deref(), Some("ryanflorence"));
    assert_eq!(updated.avatar, None);
    assert_eq!(updated.notes.as_deref(), Some("Hello there"));

    let body = body_text(send(&app, get("/contacts/a")).await).await;
    assert!(body.contains("ryanflorence"));
    assert!(!body.contains("@ryanflorence"));
    assert!(body.contains("Hello there"));
}

#[tokio::test]
async fn destroy_deletes_and_redirects_home() {
    let (app, state) = app_with(vec![contact("a", "Ryan", "Florence")]);

    let response = send(&app, post_form("/contacts/a/destroy", "")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(stored(&state, "a").is_none());

    let again = send(&app, post_form("/contacts/a/destroy", "")).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn detail_page_marks_active_link_and_confirms_delete() {
    let (app, _) = app_with(vec![contact("a", "Ryan", "Florence"), contact("b", "Kent", "Dodds")]);

    let body = body_text(send(&app, get("/contacts/a")).await).await;
    assert_eq!(body.matches(r#"class="active""#).count(), 1);
    assert_eq!(body.matches(r#"class="""#).count(), 1);
    assert!(body.contains("Please confirm you want to delete this record."));

    let index = body_text(send(&app, get("/")).await).await;
    assert!(!index.contains(r#"class="active""#));
}

#[tokio::test]
async fn sqlite_store_serves_the_same_routes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.sqlite3");
    let config = test_config(path.to_str().unwrap());
    let store = ContactStore::open(&config).unwrap();
    let state = State::new(store);
    let app = build_router(Arc::clone(&state));

    let created = send(&app, post_form("/", "")).await;
    let target = location(&created).to_string();
    let detail = target.trim_end_matches("/edit").to_string();
    send(&app, post_form(&target, "first=Ada&last=Lovelace")).await;

    let body = body_text(send(&app, get(&detail)).await).await;
    assert!(body.contains("Ada Lovelace"));

    let id = detail.trim_start_matches("/contacts/");
    state
        .with_contacts(|service| {
            Ok(service.update_contact(&ContactId::from(id), &ContactPatch::favorite(true))?)
        })
        .unwrap();
    let listed = state
        .with_contacts(|service| Ok(service.list_contacts(Some("love"))?))
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].favorite);
}

#[tokio::test]
async fn health_and_stylesheet_are_served() {
    let (app, _) = app_with(Vec::new());

    let health = send(&app, get("/healthz")).await;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(body_text(health).await, "pong");

    let css = send(&app, get("/app.css")).await;
    assert_eq!(css.status(), StatusCode::OK);
    assert_eq!(
        css.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/css; charset=utf-8"
    );
}

#[test]
fn memory_store_repository_is_usable_directly() {
    let repo = MemoryContactRepository::new();
    repo.create_contact(&contact("x", "A", "B")).unwrap();
    assert_eq!(repo.list_contacts(Some("a")).unwrap().len(), 1);
}

fn post_background(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("x-requested-with", "fetch")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn background_favorite_returns_confirmed_toggle_without_redirect() {
    let (app, state) = app_with(vec![contact("a", "Ryan", "Florence")]);

    let response = send(&app, post_background("/contacts/a", "favorite=true")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::LOCATION).is_none());
    let fragment = body_text(response).await;
    assert!(fragment.contains("data-favorite"));
    assert!(fragment.contains("Remove from favorites"));
    assert!(fragment.contains(r#"value="false""#));
    assert!(!fragment.contains("<html"));
    assert!(stored(&state, "a").unwrap().favorite);

    let response = send(&app, post_background("/contacts/a", "favorite=false")).await;
    assert!(body_text(response).await.contains("Add to favorites"));
    assert!(!stored(&state, "a").unwrap().favorite);
}

#[tokio::test]
async fn favorite_redirect_keeps_sidebar_query() {
    let (app, _) = app_with(vec![contact("a", "Ryan", "Florence")]);

    let response = send(&app, post_form("/contacts/a", "favorite=true&q=flo")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/contacts/a?q=flo");

    let response = send(&app, post_form("/contacts/a", "favorite=false&q=ry+fl")).await;
    assert_eq!(location(&response), "/contacts/a?q=ry%20fl");

    let body = body_text(send(&app, get("/contacts/a?q=flo")).await).await;
    assert!(body.contains(r#"<input type="hidden" name="q" value="flo" />"#));

    let body = body_text(send(&app, get("/contacts/a")).await).await;
    assert!(!body.contains(r#"type="hidden""#));
}

#[tokio::test]
async fn malformed_form_payload_is_a_bad_request() {
    let (app, state) = app_with(vec![contact("a", "Ryan", "Florence")]);

    let request = Request::builder()
        .uri("/contacts/a")
        .method("POST")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("favorite=true"))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!stored(&state, "a").unwrap().favorite);

    let request = Request::builder()
        .uri("/contacts/a/edit")
        .method("POST")
        .body(Body::from("first=Ada"))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(stored(&state, "a").unwrap().first.as_deref(), Some("Ryan"));
}

#[tokio::test]
async fn pages_load_the_enhancement_script() {
    let (app, _) = app_with(vec![contact("a", "Ryan", "Florence")]);

    let body = body_text(send(&app, get("/")).await).await;
    assert!(body.contains(r#"<script src="/app.js" defer></script>"#));

    let script = send(&app, get("/app.js")).await;
    assert_eq!(script.status(), StatusCode::OK);
    assert_eq!(
        script.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/javascript; charset=utf-8"
    );
    let source = body_text(script).await;
    assert!(source.contains("history.pushState"));
    assert!(source.contains("history.replaceState"));
    assert!(source.contains("data-favorite"));
}

#[test]
fn memory_db_path_opens_the_memory_store() {
    let store = ContactStore::open(&test_config(MEMORY_DB_PATH)).unwrap();
    assert!(matches!(store, ContactStore::Memory(_)));
}
