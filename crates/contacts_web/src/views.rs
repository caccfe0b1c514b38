//! Server-rendered pages.
//!
//! Templates live in `templates/`; every page except the not-found page
//! extends `layout.html`, which renders the sidebar and detail panel.

use askama::Template;
use contacts_core::{
    nav_link_state, Contact, FavoriteToggle, FavoriteView, Location, SearchView,
    DELETE_CONFIRMATION_PROMPT, SEARCH_PARAM,
};

const NO_NAME_LABEL: &str = "No Name";

/// One row of the sidebar contact list.
pub struct SidebarItem {
    pub href: String,
    pub label: String,
    pub named: bool,
    pub favorite: bool,
    pub class_name: &'static str,
}

pub struct Sidebar {
    pub search: SearchView,
    /// Resolved `q` of the request, `None` when absent.
    pub query: Option<String>,
    pub items: Vec<SidebarItem>,
}

impl Sidebar {
    /// Builds the sidebar for a request at `current` with query `q`.
    pub fn new(contacts: &[Contact], q: Option<&str>, current: &Location) -> Self {
        let items = contacts
            .iter()
            .map(|contact| {
                let href = contact_href(contact);
                let class_name = nav_link_state(&href, current, None).class_name();
                SidebarItem {
                    label: contact.full_name().unwrap_or_else(|| NO_NAME_LABEL.to_string()),
                    named: contact.has_name(),
                    favorite: contact.favorite,
                    class_name,
                    href,
                }
            })
            .collect();

        Self {
            search: SearchView::settled(q),
            query: q.map(str::to_string),
            items,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub sidebar: Sidebar,
}

/// Contact fields prepared for display.
pub struct ContactDetail {
    pub id: String,
    pub name: String,
    pub named: bool,
    pub avatar: String,
    pub twitter: String,
    pub notes: String,
}

impl ContactDetail {
    pub fn new(contact: &Contact) -> Self {
        Self {
            id: contact.id.to_string(),
            name: contact.full_name().unwrap_or_else(|| NO_NAME_LABEL.to_string()),
            named: contact.has_name(),
            avatar: contact.avatar.clone().unwrap_or_default(),
            twitter: contact.twitter.clone().unwrap_or_default(),
            notes: contact.notes.clone().unwrap_or_default(),
        }
    }
}

/// Favorite toggle form. Rendered inside the detail page and on its own as
/// the response to a background toggle.
pub struct FavoriteButton {
    pub action: String,
    pub view: FavoriteView,
    /// Search query carried through the non-JS redirect.
    pub query: Option<String>,
}

impl FavoriteButton {
    pub fn new(contact: &Contact, query: Option<String>) -> Self {
        Self {
            action: contact_href(contact),
            view: FavoriteToggle::new(contact).view(),
            query,
        }
    }
}

#[derive(Template)]
#[template(path = "favorite.html")]
pub struct FavoriteFragment {
    pub favorite: FavoriteButton,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactPage {
    pub sidebar: Sidebar,
    pub contact: ContactDetail,
    pub favorite: FavoriteButton,
    pub delete_prompt: &'static str,
}

impl ContactPage {
    pub fn new(sidebar: Sidebar, contact: &Contact) -> Self {
        let favorite = FavoriteButton::new(contact, sidebar.query.clone());
        Self {
            sidebar,
            contact: ContactDetail::new(contact),
            favorite,
            delete_prompt: DELETE_CONFIRMATION_PROMPT,
        }
    }
}

/// Edit form values; absent fields render as empty inputs.
pub struct EditForm {
    pub id: String,
    pub first: String,
    pub last: String,
    pub twitter: String,
    pub avatar: String,
    pub notes: String,
}

impl EditForm {
    pub fn new(contact: &Contact) -> Self {
        Self {
            id: contact.id.to_string(),
            first: contact.first.clone().unwrap_or_default(),
            last: contact.last.clone().unwrap_or_default(),
            twitter: contact.twitter.clone().unwrap_or_default(),
            avatar: contact.avatar.clone().unwrap_or_default(),
            notes: contact.notes.clone().unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditPage {
    pub sidebar: Sidebar,
    pub form: EditForm,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundPage;

pub fn render_not_found() -> askama::Result<String> {
    NotFoundPage.render()
}

pub fn contact_href(contact: &Contact) -> String {
    format!("/contacts/{}", contact.id)
}

/// Appends an encoded `q` parameter to `path` when a query is present.
pub fn with_search_query(path: String, query: Option<&str>) -> String {
    match query {
        Some(query) => format!("{path}?{SEARCH_PARAM}={}", urlencoding::encode(query)),
        None => path,
    }
}
