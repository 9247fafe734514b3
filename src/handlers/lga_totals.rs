use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::Form;
use log::{info, warn};

use super::{AppError, AppState};
use crate::db::ResultsStore;
use crate::error::Result;
use crate::forms::{parse_id, LgaSelection};
use crate::views::{self, LgaTotalsPage, Notice};

pub const LGA_NOT_FOUND: &str = "N/A (LGA not found)";

pub async fn show(State(state): State<AppState>) -> std::result::Result<Html<String>, AppError> {
    let page = lga_totals_page(state.store.as_ref(), state.state_id, None).await?;
    Ok(Html(views::lga_totals(&page)))
}

pub async fn submit(
    State(state): State<AppState>,
    Form(selection): Form<LgaSelection>,
) -> std::result::Result<(StatusCode, Html<String>), AppError> {
    let page = lga_totals_page(
        state.store.as_ref(),
        state.state_id,
        Some(selection.lga_id.as_deref().unwrap_or("")),
    )
    .await?;
    Ok((page.status, Html(views::lga_totals(&page))))
}

pub async fn lga_totals_page(
    store: &dyn ResultsStore,
    state_id: i32,
    selection: Option<&str>,
) -> Result<LgaTotalsPage> {
    let mut page = LgaTotalsPage {
        status: StatusCode::OK,
        lgas: store.lgas(state_id).await?,
        selected: None,
        lga_name: None,
        totals: Vec::new(),
        notices: Vec::new(),
    };

    let Some(raw) = selection else {
        return Ok(page);
    };
    let Some(lga_id) = parse_id(Some(raw)) else {
        page.status = StatusCode::BAD_REQUEST;
        page.notices.push(Notice::error("Please select an LGA."));
        return Ok(page);
    };
    page.selected = Some(lga_id);

    let Some(lga) = store.lga(lga_id).await? else {
        warn!("LGA {} was requested but does not exist", lga_id);
        page.status = StatusCode::NOT_FOUND;
        page.lga_name = Some(LGA_NOT_FOUND.to_string());
        page.notices.push(Notice::error("Selected LGA not found in database."));
        return Ok(page);
    };

    page.totals = store.lga_totals(lga_id).await?;
    info!(
        "LGA {} ({}) totals cover {} part(ies)",
        lga_id,
        lga.lga_name,
        page.totals.len()
    );
    if page.totals.is_empty() {
        page.notices.push(Notice::info(format!(
            "No results found for {} LGA.",
            lga.lga_name
        )));
    }
    page.lga_name = Some(lga.lga_name);
    Ok(page)
}
