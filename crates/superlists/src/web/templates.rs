//! Page templates.
//!
//! Templates are compiled from `templates/` by askama. Every rendered page
//! carries a [`RenderedTemplate`] response extension naming the file it came
//! from.

use askama::Template;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::{Error, Result};
use crate::item::Item;
use crate::web::urls::Route;

/// A template together with its file name.
pub trait Page: Template {
    /// File name under `templates/`.
    const NAME: &'static str;
}

/// Response extension recording which template produced the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedTemplate(pub &'static str);

/// The home page: an empty list and the new item form.
#[derive(Debug, Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Where the new item form posts to.
    pub action: &'static str,
}

impl HomeTemplate {
    /// Build the home page.
    #[must_use]
    pub fn new() -> Self {
        Self {
            action: Route::Home.path(),
        }
    }
}

impl Default for HomeTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for HomeTemplate {
    const NAME: &'static str = "home.html";
}

/// The list page.
#[derive(Debug, Template)]
#[template(path = "list.html")]
pub struct ListTemplate<'a> {
    /// Where the new item form posts to.
    pub action: &'static str,
    /// Items in display order.
    pub items: &'a [Item],
}

impl<'a> ListTemplate<'a> {
    /// Build the list page for `items`.
    #[must_use]
    pub fn new(items: &'a [Item]) -> Self {
        Self {
            action: Route::Home.path(),
            items,
        }
    }
}

impl Page for ListTemplate<'_> {
    const NAME: &'static str = "list.html";
}

/// Render `page` to a string.
///
/// # Errors
///
/// Returns [`Error::Template`] if rendering fails.
pub fn render_to_string<P: Page>(page: &P) -> Result<String> {
    page.render().map_err(|source| Error::Template {
        name: P::NAME,
        source,
    })
}

/// Render `page` into an HTML response.
///
/// # Errors
///
/// Returns [`Error::Template`] if rendering fails.
pub fn render<P: Page>(page: &P) -> Result<Response> {
    let body = render_to_string(page)?;
    let mut response = (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        body,
    )
        .into_response();
    response.extensions_mut().insert(RenderedTemplate(P::NAME));
    Ok(response)
}
