pub mod lga_totals;
pub mod new_unit;
pub mod unit_results;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use log::error;

use crate::db::ResultsStore;
use crate::error::Error;
use crate::views;

const GENERIC_FAILURE: &str =
    "Something went wrong while reading from the database. Please try again.";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResultsStore>,
    pub state_id: i32,
    /// Units saved through this server whose success notice has not been shown yet.
    unannounced: Arc<Mutex<HashSet<i32>>>,
}

impl AppState {
    pub fn new(store: Arc<dyn ResultsStore>, state_id: i32) -> Self {
        Self {
            store,
            state_id,
            unannounced: Arc::default(),
        }
    }

    fn mark_saved(&self, uniqueid: i32) -> Result<(), Error> {
        self.unannounced
            .lock()
            .map_err(|_| Error::LockPoisoned)?
            .insert(uniqueid);
        Ok(())
    }

    // True once per saved unit; ids typed into the URL by hand never match
    fn take_saved(&self, uniqueid: i32) -> Result<bool, Error> {
        Ok(self
            .unannounced
            .lock()
            .map_err(|_| Error::LockPoisoned)?
            .remove(&uniqueid))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route(
            "/q1",
            get(unit_results::show).post(unit_results::submit),
        )
        .route("/q2", get(lga_totals::show).post(lga_totals::submit))
        .route("/q3", get(new_unit::show).post(new_unit::submit))
        .fallback(not_found)
        .with_state(state)
}

/// A storage failure while building a page. The detail goes to the log;
/// the user only sees a generic message.
#[derive(Debug)]
pub struct AppError(Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(views::error_page(GENERIC_FAILURE)),
        )
            .into_response()
    }
}

async fn index() -> Html<String> {
    Html(views::index())
}

async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(views::not_found()))
}
