use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use log::{error, info};
use serde::Deserialize;

use super::{AppError, AppState};
use crate::db::ResultsStore;
use crate::error::Result;
use crate::forms::{parse_id, NewUnitDraft};
use crate::views::{self, NewUnitPage, Notice};

pub const SAVE_FAILED: &str =
    "An error occurred while saving the polling unit. Nothing was stored; please try again.";

#[derive(Debug, Default, Deserialize)]
pub struct SavedQuery {
    pub created: Option<String>,
}

/// What became of a submitted form.
#[derive(Debug)]
pub enum Submission {
    Created { uniqueid: i32 },
    Rejected(NewUnitPage),
}

pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<SavedQuery>,
) -> std::result::Result<Html<String>, AppError> {
    let mut page = empty_form(state.store.as_ref(), state.state_id).await?;

    // Landing here from a successful save made through this server
    if let Some(uniqueid) = parse_id(query.created.as_deref()) {
        if state.take_saved(uniqueid)? {
            if let Some(unit) = state.store.polling_unit_details(uniqueid).await? {
                page.notices.push(Notice::success(format!(
                    "New polling unit '{}' (ID: {}) and its results saved successfully!",
                    unit.polling_unit_name, uniqueid
                )));
            }
        }
    }
    Ok(Html(views::new_unit(&page)))
}

pub async fn submit(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    Form(fields): Form<HashMap<String, String>>,
) -> std::result::Result<Response, AppError> {
    let ip = peer
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default();
    let draft = NewUnitDraft::from_fields(&fields);

    match submit_new_unit(state.store.as_ref(), state.state_id, draft, &ip).await? {
        Submission::Created { uniqueid } => {
            state.mark_saved(uniqueid)?;
            Ok(Redirect::to(&format!("/q3?created={}", uniqueid)).into_response())
        }
        Submission::Rejected(page) => {
            Ok((page.status, Html(views::new_unit(&page))).into_response())
        }
    }
}

pub async fn empty_form(store: &dyn ResultsStore, state_id: i32) -> Result<NewUnitPage> {
    Ok(NewUnitPage {
        status: StatusCode::OK,
        parties: store.parties().await?,
        lgas: store.lgas(state_id).await?,
        wards: store.wards().await?,
        draft: NewUnitDraft::default(),
        notices: Vec::new(),
    })
}

/// Validates and stores a new polling unit. Failing to load the form's own
/// lists is an `Err`; a bad form or a failed save comes back as a
/// `Rejected` page carrying the user's input.
pub async fn submit_new_unit(
    store: &dyn ResultsStore,
    state_id: i32,
    draft: NewUnitDraft,
    user_ip_address: &str,
) -> Result<Submission> {
    let mut page = empty_form(store, state_id).await?;

    let unit = match draft.validate(&page.parties, user_ip_address) {
        Ok(unit) => unit,
        Err(message) => {
            page.status = StatusCode::BAD_REQUEST;
            page.notices.push(Notice::error(message));
            page.draft = draft;
            return Ok(Submission::Rejected(page));
        }
    };

    match store.create_polling_unit(&unit).await {
        Ok(uniqueid) => {
            info!(
                "Saved polling unit '{}' as {} with {} result(s), entered by {}",
                unit.polling_unit_name,
                uniqueid,
                unit.scores.len(),
                unit.entered_by_user
            );
            Ok(Submission::Created { uniqueid })
        }
        Err(e) => {
            error!(
                "Failed to save polling unit '{}': {}",
                unit.polling_unit_name, e
            );
            page.status = StatusCode::INTERNAL_SERVER_ERROR;
            page.notices.push(Notice::error(SAVE_FAILED));
            page.draft = draft;
            Ok(Submission::Rejected(page))
        }
    }
}
