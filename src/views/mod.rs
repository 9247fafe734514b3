//! Server-rendered HTML for every page.

use axum::http::StatusCode;

use crate::forms::NewUnitDraft;
use crate::models::{Lga, Party, PartyScore, PartyTotal, PollingUnitDetails, PollingUnitOption, Ward};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl NoticeLevel {
    fn css_class(self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

#[derive(Debug, Clone)]
pub struct UnitResultsPage {
    pub status: StatusCode,
    pub polling_units: Vec<PollingUnitOption>,
    pub selected: Option<i32>,
    pub unit: Option<PollingUnitDetails>,
    pub results: Vec<PartyScore>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone)]
pub struct LgaTotalsPage {
    pub status: StatusCode,
    pub lgas: Vec<Lga>,
    pub selected: Option<i32>,
    pub lga_name: Option<String>,
    pub totals: Vec<PartyTotal>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone)]
pub struct NewUnitPage {
    pub status: StatusCode,
    pub parties: Vec<Party>,
    pub lgas: Vec<Lga>,
    pub wards: Vec<Ward>,
    pub draft: NewUnitDraft,
    pub notices: Vec<Notice>,
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, notices: &[Notice], body: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(title)));
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n<nav><a href=\"/\">Home</a> | <a href=\"/q1\">Polling Unit Results</a> | <a href=\"/q2\">LGA Totals</a> | <a href=\"/q3\">New Polling Unit</a></nav>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape(title)));
    for notice in notices {
        html.push_str(&format!(
            "<p class=\"notice {}\">{}</p>\n",
            notice.level.css_class(),
            escape(&notice.message)
        ));
    }
    html.push_str(body);
    html.push_str("</body>\n</html>\n");
    html
}

const STYLE: &str = "<style>\
body{font-family:sans-serif;margin:2em;}\
table{border-collapse:collapse;}td,th{border:1px solid #ccc;padding:4px 8px;}\
.notice{padding:6px;}.info{background:#e7f1ff;}.success{background:#e6f7e6;}.error{background:#fde8e8;}\
</style>\n";

fn option_tag(value: &str, label: &str, selected: bool) -> String {
    format!(
        "<option value=\"{}\"{}>{}</option>",
        escape(value),
        if selected { " selected" } else { "" },
        escape(label)
    )
}

pub fn index() -> String {
    let body = "<ul>\n\
        <li><a href=\"/q1\">Question 1: Results for an individual polling unit</a></li>\n\
        <li><a href=\"/q2\">Question 2: Summed results for all polling units in an LGA</a></li>\n\
        <li><a href=\"/q3\">Question 3: Store results for a new polling unit</a></li>\n\
        </ul>\n";
    layout("Election Results", &[], body)
}

pub fn unit_results(page: &UnitResultsPage) -> String {
    let mut body = String::new();
    body.push_str("<form method=\"post\" action=\"/q1\">\n<label for=\"polling_unit_uniqueid\">Polling Unit</label>\n");
    body.push_str("<select name=\"polling_unit_uniqueid\" id=\"polling_unit_uniqueid\">\n");
    body.push_str(&option_tag("", "-- Select a Polling Unit --", page.selected.is_none()));
    body.push('\n');
    for unit in &page.polling_units {
        let label = format!("{} ({}, {})", unit.polling_unit_name, unit.ward_name, unit.lga_name);
        body.push_str(&option_tag(
            &unit.uniqueid.to_string(),
            &label,
            page.selected == Some(unit.uniqueid),
        ));
        body.push('\n');
    }
    body.push_str("</select>\n<button type=\"submit\">Show Results</button>\n</form>\n");

    if let Some(unit) = &page.unit {
        body.push_str(&format!(
            "<h2>{}</h2>\n<p>Ward: {} | LGA: {}</p>\n",
            escape(&unit.polling_unit_name),
            escape(&unit.ward_name),
            escape(&unit.lga_name)
        ));
    }

    if !page.results.is_empty() {
        body.push_str("<table>\n<tr><th>Party</th><th>Score</th></tr>\n");
        for row in &page.results {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td></tr>\n",
                escape(&row.party_abbreviation),
                row.party_score
            ));
        }
        body.push_str("</table>\n");
    }

    layout("Polling Unit Results", &page.notices, &body)
}

pub fn lga_totals(page: &LgaTotalsPage) -> String {
    let mut body = String::new();
    body.push_str("<form method=\"post\" action=\"/q2\">\n<label for=\"lga_id\">LGA</label>\n");
    body.push_str("<select name=\"lga_id\" id=\"lga_id\">\n");
    body.push_str(&option_tag("", "-- Select an LGA --", page.selected.is_none()));
    body.push('\n');
    for lga in &page.lgas {
        body.push_str(&option_tag(
            &lga.lga_id.to_string(),
            &lga.lga_name,
            page.selected == Some(lga.lga_id),
        ));
        body.push('\n');
    }
    body.push_str("</select>\n<button type=\"submit\">Show Totals</button>\n</form>\n");

    if let Some(name) = &page.lga_name {
        body.push_str(&format!("<h2>{} LGA</h2>\n", escape(name)));
    }

    if !page.totals.is_empty() {
        body.push_str("<table>\n<tr><th>Party</th><th>Total Score</th></tr>\n");
        for row in &page.totals {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td></tr>\n",
                escape(&row.party_abbreviation),
                row.total_score
            ));
        }
        body.push_str("</table>\n");
    }

    layout("LGA Result Totals", &page.notices, &body)
}

pub fn new_unit(page: &NewUnitPage) -> String {
    let draft = &page.draft;
    let mut body = String::new();
    body.push_str("<form method=\"post\" action=\"/q3\">\n");

    body.push_str(&format!(
        "<p><label for=\"polling_unit_name\">Polling Unit Name</label>\n\
         <input type=\"text\" name=\"polling_unit_name\" id=\"polling_unit_name\" value=\"{}\"></p>\n",
        escape(&draft.polling_unit_name)
    ));

    body.push_str("<p><label for=\"lga_id\">LGA</label>\n<select name=\"lga_id\" id=\"lga_id\">\n");
    body.push_str(&option_tag("", "-- Select an LGA --", draft.lga_id.is_empty()));
    body.push('\n');
    for lga in &page.lgas {
        let value = lga.lga_id.to_string();
        let selected = draft.lga_id.trim() == value;
        body.push_str(&option_tag(&value, &lga.lga_name, selected));
        body.push('\n');
    }
    body.push_str("</select></p>\n");

    body.push_str("<p><label for=\"ward_id\">Ward</label>\n<select name=\"ward_id\" id=\"ward_id\">\n");
    body.push_str(&option_tag("", "-- Select a Ward --", draft.ward_id.is_empty()));
    body.push('\n');
    for ward in &page.wards {
        let value = ward.ward_id.to_string();
        let selected = draft.ward_id.trim() == value;
        body.push_str(&format!(
            "<option value=\"{}\" data-lga=\"{}\"{}>{}</option>\n",
            value,
            ward.lga_id,
            if selected { " selected" } else { "" },
            escape(&ward.ward_name)
        ));
    }
    body.push_str("</select></p>\n");

    body.push_str(&format!(
        "<p><label for=\"entered_by_user\">Your Name</label>\n\
         <input type=\"text\" name=\"entered_by_user\" id=\"entered_by_user\" value=\"{}\"></p>\n",
        escape(&draft.entered_by_user)
    ));

    if !page.parties.is_empty() {
        body.push_str("<fieldset>\n<legend>Party Scores</legend>\n");
        for party in &page.parties {
            let field = format!("party_score_{}", party.party_id);
            body.push_str(&format!(
                "<p><label for=\"{field}\">{}</label>\n\
                 <input type=\"number\" name=\"{field}\" id=\"{field}\" value=\"{}\"></p>\n",
                escape(&party.party_name),
                escape(draft.score_for(&party.party_id)),
                field = escape(&field)
            ));
        }
        body.push_str("</fieldset>\n");
    }

    body.push_str("<button type=\"submit\">Save Polling Unit</button>\n</form>\n");
    layout("New Polling Unit Results", &page.notices, &body)
}

pub fn error_page(message: &str) -> String {
    layout("Something went wrong", &[Notice::error(message)], "")
}

pub fn not_found() -> String {
    layout(
        "Page not found",
        &[Notice::error("The page you asked for does not exist.")],
        "<p><a href=\"/\">Back to the start page</a></p>\n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn unit_results_escape_stored_names() {
        let page = UnitResultsPage {
            status: StatusCode::OK,
            polling_units: Vec::new(),
            selected: Some(1),
            unit: Some(PollingUnitDetails {
                polling_unit_name: "<script>".to_string(),
                lga_name: "A".to_string(),
                ward_name: "B".to_string(),
            }),
            results: Vec::new(),
            notices: vec![Notice::info("No results found")],
        };
        let html = unit_results(&page);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("class=\"notice info\""));
    }

    #[test]
    fn new_unit_form_keeps_draft_values() {
        let mut draft = NewUnitDraft {
            polling_unit_name: String::new(),
            ward_id: "10".to_string(),
            lga_id: "1".to_string(),
            entered_by_user: "ada".to_string(),
            ..Default::default()
        };
        draft.scores.insert("PDP".to_string(), "40".to_string());
        let page = NewUnitPage {
            status: StatusCode::BAD_REQUEST,
            parties: vec![Party {
                party_id: "PDP".to_string(),
                party_name: "PDP".to_string(),
            }],
            lgas: vec![Lga { lga_id: 1, lga_name: "Aniocha North".to_string() }],
            wards: vec![Ward { ward_id: 10, ward_name: "Ezi".to_string(), lga_id: 1 }],
            draft,
            notices: Vec::new(),
        };
        let html = new_unit(&page);
        assert!(html.contains("<option value=\"1\" selected>Aniocha North</option>"));
        assert!(html.contains("<option value=\"10\" data-lga=\"1\" selected>Ezi</option>"));
        assert!(html.contains("name=\"party_score_PDP\" id=\"party_score_PDP\" value=\"40\""));
        assert!(html.contains("value=\"ada\""));
    }
}
