//! Route loaders and actions.
//!
//! Every page request re-runs the root loader (sidebar list filtered by `q`)
//! and, for detail routes, the contact loader.

use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{rejection::FormRejection, Form, Path, Query, State as StateExtractor},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
};
use contacts_core::{
    normalize_text, parse_favorite_field, Contact, ContactId, ContactPatch, Location, SEARCH_PARAM,
};
use log::info;
use serde::Deserialize;

use crate::{
    error::AppError,
    state::{ContactsService, State},
    views::{
        with_search_query, ContactPage, EditForm, EditPage, FavoriteButton, FavoriteFragment,
        IndexPage, Sidebar,
    },
};

const APP_CSS: &str = include_str!("../assets/app.css");
const APP_JS: &str = include_str!("../assets/app.js");

/// Header `app.js` sets on background requests.
pub const FETCH_HEADER: &str = "x-requested-with";
pub const FETCH_HEADER_VALUE: &str = "fetch";

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FavoriteForm {
    pub favorite: Option<String>,
    /// Sidebar query to restore after the redirect.
    pub q: Option<String>,
}

/// Fields posted by the edit form. A missing field leaves the contact
/// field untouched; a blank one clears it.
#[derive(Debug, Default, Deserialize)]
pub struct EditContactForm {
    pub first: Option<String>,
    pub last: Option<String>,
    pub twitter: Option<String>,
    pub avatar: Option<String>,
    pub notes: Option<String>,
}

impl EditContactForm {
    pub fn into_patch(self) -> ContactPatch {
        let field = |value: Option<String>| value.map(|raw| normalize_text(&raw));
        ContactPatch {
            first: field(self.first),
            last: field(self.last),
            twitter: field(self.twitter.map(|raw| raw.trim().trim_start_matches('@').to_string())),
            avatar: field(self.avatar),
            notes: field(self.notes),
            favorite: None,
        }
    }
}

/// Validates a required path parameter.
pub fn contact_id_param(raw: &str) -> Result<ContactId, AppError> {
    if raw.trim().is_empty() {
        return Err(AppError::MissingParameter("contactId"));
    }
    Ok(ContactId::from(raw))
}

fn current_location(path: String, params: &SearchParams) -> Location {
    match &params.q {
        Some(q) => Location::new(path).with_param(SEARCH_PARAM, q.clone()),
        None => Location::new(path),
    }
}

fn load_sidebar(
    service: &ContactsService<'_>,
    params: &SearchParams,
    current: &Location,
) -> Result<Sidebar, AppError> {
    let contacts = service.list_contacts(params.q.as_deref())?;
    Ok(Sidebar::new(&contacts, params.q.as_deref(), current))
}

fn is_fetch(headers: &HeaderMap) -> bool {
    headers
        .get(FETCH_HEADER)
        .is_some_and(|value| value.as_bytes() == FETCH_HEADER_VALUE.as_bytes())
}

fn require_contact(service: &ContactsService<'_>, id: &ContactId) -> Result<Contact, AppError> {
    Ok(service.require_contact(id)?)
}

pub async fn index_loader(
    StateExtractor(state): StateExtractor<Arc<State>>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    let current = current_location("/".to_string(), &params);
    let page = state.with_contacts(|service| {
        Ok(IndexPage {
            sidebar: load_sidebar(service, &params, &current)?,
        })
    })?;

    Ok(Html(page.render()?))
}

/// Creates an empty contact and sends the user straight to its edit form.
pub async fn create_action(
    StateExtractor(state): StateExtractor<Arc<State>>,
) -> Result<Redirect, AppError> {
    let contact = state.with_contacts(|service| Ok(service.create_empty_contact()?))?;
    info!("event=route_create module=web status=ok contact_id={}", contact.id);

    Ok(Redirect::to(&format!("/contacts/{}/edit", contact.id)))
}

pub async fn contact_loader(
    StateExtractor(state): StateExtractor<Arc<State>>,
    Path(raw_id): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    let id = contact_id_param(&raw_id)?;
    let current = current_location(format!("/contacts/{id}"), &params);

    let page = state.with_contacts(|service| {
        let contact = require_contact(service, &id)?;
        let sidebar = load_sidebar(service, &params, &current)?;
        Ok(ContactPage::new(sidebar, &contact))
    })?;

    Ok(Html(page.render()?))
}

/// Favorite action: sets exactly the submitted value, no other field.
///
/// Background requests get the re-rendered toggle for the confirmed value;
/// plain form posts are redirected back to the detail page.
pub async fn favorite_action(
    StateExtractor(state): StateExtractor<Arc<State>>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    form: Result<Form<FavoriteForm>, FormRejection>,
) -> Result<Response, AppError> {
    let id = contact_id_param(&raw_id)?;
    let Form(form) = form?;
    let favorite = parse_favorite_field(form.favorite.as_deref());
    let confirmed = state.with_contacts(|service| Ok(service.set_favorite(&id, favorite)?))?;

    if is_fetch(&headers) {
        let fragment = FavoriteFragment {
            favorite: FavoriteButton::new(&confirmed, form.q),
        };
        return Ok(Html(fragment.render()?).into_response());
    }

    let target = with_search_query(format!("/contacts/{id}"), form.q.as_deref());
    Ok(Redirect::to(&target).into_response())
}

pub async fn edit_loader(
    StateExtractor(state): StateExtractor<Arc<State>>,
    Path(raw_id): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, AppError> {
    let id = contact_id_param(&raw_id)?;
    let current = current_location(format!("/contacts/{id}/edit"), &params);

    let page = state.with_contacts(|service| {
        let contact = require_contact(service, &id)?;
        Ok(EditPage {
            sidebar: load_sidebar(service, &params, &current)?,
            form: EditForm::new(&contact),
        })
    })?;

    Ok(Html(page.render()?))
}

pub async fn edit_action(
    StateExtractor(state): StateExtractor<Arc<State>>,
    Path(raw_id): Path<String>,
    form: Result<Form<EditContactForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let id = contact_id_param(&raw_id)?;
    let Form(form) = form?;
    let patch = form.into_patch();
    state.with_contacts(|service| Ok(service.update_contact(&id, &patch)?))?;

    Ok(Redirect::to(&format!("/contacts/{id}")))
}

pub async fn destroy_action(
    StateExtractor(state): StateExtractor<Arc<State>>,
    Path(raw_id): Path<String>,
) -> Result<Redirect, AppError> {
    let id = contact_id_param(&raw_id)?;
    state.with_contacts(|service| Ok(service.delete_contact(&id)?))?;

    Ok(Redirect::to("/"))
}

pub async fn health_handler() -> &'static str {
    contacts_core::ping()
}

pub async fn stylesheet_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], APP_CSS)
}

pub async fn script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        APP_JS,
    )
}

#[cfg(test)]
mod tests {
    use super::{contact_id_param, is_fetch, EditContactForm, FETCH_HEADER};
    use crate::error::AppError;
    use axum::http::{HeaderMap, HeaderValue};

    #[test]
    fn blank_id_is_a_missing_parameter() {
        assert!(matches!(
            contact_id_param("  "),
            Err(AppError::MissingParameter("contactId"))
        ));
        assert_eq!(contact_id_param("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn edit_form_blank_fields_clear_and_missing_fields_skip() {
        let patch = EditContactForm {
            first: Some("  Ada ".to_string()),
            last: Some(String::new()),
            twitter: Some("@ada".to_string()),
            ..EditContactForm::default()
        }
        .into_patch();

        assert_eq!(patch.first, Some(Some("Ada".to_string())));
        assert_eq!(patch.last, Some(None));
        assert_eq!(patch.twitter, Some(Some("ada".to_string())));
        assert_eq!(patch.avatar, None);
        assert_eq!(patch.favorite, None);
    }

    #[test]
    fn only_the_fetch_marker_selects_the_fragment_response() {
        let mut headers = HeaderMap::new();
        assert!(!is_fetch(&headers));
        headers.insert(FETCH_HEADER, HeaderValue::from_static("XMLHttpRequest"));
        assert!(!is_fetch(&headers));
        headers.insert(FETCH_HEADER, HeaderValue::from_static("fetch"));
        assert!(is_fetch(&headers));
    }
}
