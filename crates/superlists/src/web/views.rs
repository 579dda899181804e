//! Request handlers.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::storage::Storage;
use crate::web::templates::{render, HomeTemplate, ListTemplate};
use crate::web::urls::Route;
use crate::web::AppState;

/// Body of the new item form.
#[derive(Debug, Clone, Deserialize)]
pub struct NewItemForm {
    /// Text of the item to add.
    pub item_text: String,
}

/// `GET /`: the home page.
///
/// # Errors
///
/// Fails only if the template cannot be rendered.
pub async fn home_page() -> Result<Response> {
    render(&HomeTemplate::new())
}

/// `POST /`: save a new item, then redirect to the list.
///
/// # Errors
///
/// Returns a validation error for blank text, or a storage error.
pub async fn save_item(
    State(state): State<AppState>,
    Form(form): Form<NewItemForm>,
) -> Result<Response> {
    let item = state
        .with_storage(move |storage| storage.create(form.item_text))
        .await?;
    info!(id = ?item.id, "Saved new item");

    Ok(redirect(Route::List))
}

/// `GET /lists/the-only-list-in-the-world/`: every saved item.
///
/// # Errors
///
/// Returns a storage or template error.
pub async fn view_list(State(state): State<AppState>) -> Result<Response> {
    let items = state.with_storage(Storage::all).await?;
    render(&ListTemplate::new(&items))
}

/// A `302 Found` pointing at `route`.
#[must_use]
pub fn redirect(route: Route) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, route.path())]).into_response()
}
