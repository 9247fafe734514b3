use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::Form;
use log::info;

use super::{AppError, AppState};
use crate::db::ResultsStore;
use crate::error::Result;
use crate::forms::{parse_id, UnitSelection};
use crate::views::{self, Notice, UnitResultsPage};

pub async fn show(State(state): State<AppState>) -> std::result::Result<Html<String>, AppError> {
    let page = unit_results_page(state.store.as_ref(), state.state_id, None).await?;
    Ok(Html(views::unit_results(&page)))
}

pub async fn submit(
    State(state): State<AppState>,
    Form(selection): Form<UnitSelection>,
) -> std::result::Result<(StatusCode, Html<String>), AppError> {
    let page = unit_results_page(
        state.store.as_ref(),
        state.state_id,
        Some(selection.polling_unit_uniqueid.as_deref().unwrap_or("")),
    )
    .await?;
    Ok((page.status, Html(views::unit_results(&page))))
}

/// Builds the results-by-unit page. `selection` is `None` for a plain visit
/// and the raw submitted value otherwise.
pub async fn unit_results_page(
    store: &dyn ResultsStore,
    state_id: i32,
    selection: Option<&str>,
) -> Result<UnitResultsPage> {
    let mut page = UnitResultsPage {
        status: StatusCode::OK,
        polling_units: store.polling_units_with_results(state_id).await?,
        selected: None,
        unit: None,
        results: Vec::new(),
        notices: Vec::new(),
    };

    let Some(raw) = selection else {
        return Ok(page);
    };
    let Some(uniqueid) = parse_id(Some(raw)) else {
        page.status = StatusCode::BAD_REQUEST;
        page.notices.push(Notice::error("Please select a Polling Unit."));
        return Ok(page);
    };

    page.selected = Some(uniqueid);
    page.unit = store.polling_unit_details(uniqueid).await?;
    page.results = store.polling_unit_results(uniqueid).await?;
    info!(
        "Polling unit {} has {} announced result(s)",
        uniqueid,
        page.results.len()
    );

    if page.results.is_empty() {
        page.notices.push(Notice::info(
            "No results found for this specific polling unit in the database.",
        ));
    }
    Ok(page)
}
