use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDateTime};
use serde_json::{json, Value};

use crate::client::YardClient;
use crate::error::YardError;
use crate::types::{Appointment, SearchRequest, SearchResponse};

const APPOINTMENT_SEARCH_PATH: &str = "appointment/api/appointment/appointment/search";

/// Upstream page size for appointment searches.
pub const PAGE_SIZE: u32 = 1000;

/// Rendered when `PreferredDateTime` is missing or unparseable.
pub const DATE_PLACEHOLDER: &str = "\u{2014}";

const DISPLAY_DATE_FORMAT: &str = "%-m/%d %-I:%M %p";

/// The two observed search behaviors, unified behind one interface.
/// The mode picks both the query predicate and the pagination strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    /// Exact `AppointmentId` match, walking 1000-record pages until a
    /// short page comes back.
    SingleId(String),
    /// One upstream search per criterion, each an OR across the four
    /// matchable fields, single page of 1000.
    MultiCriteria(Vec<String>),
}

/// Merged, annotated search result.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: Vec<Appointment>,
    /// Raw pre-dedup upstream match count per input criterion; only
    /// populated in multi-criteria mode.
    pub per_criteria: Option<HashMap<String, usize>>,
}

/// Split free-text search input into criteria: any run of commas,
/// whitespace, or semicolons separates tokens; surrounding quotes are
/// stripped; empties are dropped.
pub fn tokenize_criteria(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(|token| token.trim().trim_matches(|c| c == '\'' || c == '"'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render an upstream timestamp for kiosk display: month/day hour:minute
/// with no leading zero on the month or hour.
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return DATE_PLACEHOLDER.to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DISPLAY_DATE_FORMAT).to_string();
    }
    // The upstream sometimes omits the offset entirely.
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format(DISPLAY_DATE_FORMAT).to_string();
    }

    DATE_PLACEHOLDER.to_string()
}

/// Map an upstream status code (string or numeric) to display text.
pub fn format_status(status: Option<&Value>) -> String {
    let code = match status {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    match code.as_str() {
        "1000" => "Requested",
        "2000" => "Countered",
        "3000" => "Scheduled",
        "4000" => "Checked In",
        "8000" => "Complete",
        "9000" => "Cancelled",
        _ => "Unknown",
    }
    .to_string()
}

/// Add the display annotations every search result carries.
fn annotate(records: &mut [Appointment]) {
    for record in records.iter_mut() {
        record.scheduled_date = Some(format_date(record.preferred_date_time.as_deref()));
        record.status_text = Some(format_status(record.appointment_status_id.as_ref()));
    }
}

/// Merge per-criterion result sets by `AppointmentId`: first occurrence
/// wins, insertion order is preserved, and each criterion's raw match
/// count is recorded before dedup. Records with no id never collide.
fn merge_by_id(
    sets: Vec<(String, Vec<Appointment>)>,
) -> (Vec<Appointment>, HashMap<String, usize>) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();
    let mut counts = HashMap::new();

    for (criterion, records) in sets {
        counts.insert(criterion, records.len());
        for record in records {
            match record.appointment_id.as_ref() {
                // Canonical JSON form as the key, so "123" and 123 stay distinct.
                Some(id) => {
                    if seen.insert(id.to_string()) {
                        merged.push(record);
                    }
                }
                None => merged.push(record),
            }
        }
    }

    (merged, counts)
}

fn or_predicate(criterion: &str) -> String {
    format!(
        "AppointmentId = '{c}' OR CarrierId = '{c}' OR TrailerId = '{c}' OR BillOfLadingNumber = '{c}'",
        c = criterion
    )
}

impl YardClient {
    /// Search appointments in either mode; see [`SearchMode`].
    ///
    /// Failures degrade per criterion (or per page): the failing unit
    /// contributes nothing and the search as a whole still answers.
    pub async fn search(
        &self,
        org: &str,
        token: &str,
        mode: SearchMode,
    ) -> Result<SearchOutcome, YardError> {
        match mode {
            SearchMode::SingleId(id) => {
                let query = format!("AppointmentId = '{id}'");
                let mut results = self.fetch_all_pages(org, token, &query, None).await;
                annotate(&mut results);
                Ok(SearchOutcome {
                    results,
                    per_criteria: None,
                })
            }
            SearchMode::MultiCriteria(criteria) => {
                if criteria.is_empty() {
                    return Err(YardError::InvalidInput);
                }

                let mut sets = Vec::with_capacity(criteria.len());
                for criterion in criteria {
                    let records = match self
                        .fetch_page(org, token, &or_predicate(&criterion), None, 0)
                        .await
                    {
                        Ok(records) => records,
                        Err(e) => {
                            tracing::warn!(%criterion, "criterion search failed: {e}");
                            Vec::new()
                        }
                    };
                    sets.push((criterion, records));
                }

                let (mut results, counts) = merge_by_id(sets);
                annotate(&mut results);
                Ok(SearchOutcome {
                    results,
                    per_criteria: Some(counts),
                })
            }
        }
    }

    /// All appointments still in Scheduled status, unannotated.
    pub async fn scheduled(&self, org: &str, token: &str) -> Result<Vec<Appointment>, YardError> {
        let template = json!({
            "AppointmentId": null,
            "ArrivalDateTime": null
        });
        Ok(self
            .fetch_all_pages(org, token, "AppointmentStatusId= 3000", Some(template))
            .await)
    }

    async fn fetch_page(
        &self,
        org: &str,
        token: &str,
        query: &str,
        template: Option<Value>,
        page: u32,
    ) -> Result<Vec<Appointment>, YardError> {
        let request = SearchRequest {
            query: query.to_string(),
            template,
            size: PAGE_SIZE,
            page: Some(page),
            need_total_count: None,
        };

        let response = self
            .org_headers(self.post(&self.api_url(APPOINTMENT_SEARCH_PATH)), token, org)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(YardError::UpstreamRejected(format!(
                "appointment search returned {status}"
            )));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.data)
    }

    /// Walk pages until a short page. A failed page ends the walk and keeps
    /// what was already fetched rather than aborting the whole operation.
    async fn fetch_all_pages(
        &self,
        org: &str,
        token: &str,
        query: &str,
        template: Option<Value>,
    ) -> Vec<Appointment> {
        let mut all = Vec::new();
        let mut page = 0;
        loop {
            match self
                .fetch_page(org, token, query, template.clone(), page)
                .await
            {
                Ok(records) => {
                    let short_page = (records.len() as u32) < PAGE_SIZE;
                    all.extend(records);
                    if short_page {
                        break;
                    }
                    page += 1;
                }
                Err(e) => {
                    tracing::warn!(query, page, "appointment page fetch failed: {e}");
                    break;
                }
            }
        }
        all
    }
}
