use chrono::DateTime;
use url::form_urlencoded;

use crate::error::{InsightError, Result};
use crate::model::{PollQueryParams, QueryLogsetByNameParams, QueryLogsetParams, DEFAULT_TIME_RANGE};

/// Parse an ISO 8601 / RFC 3339 timestamp into epoch milliseconds, the time
/// encoding the upstream API expects.
pub fn epoch_millis(input: &str) -> Result<i64> {
    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.timestamp_millis())
        .map_err(|_| InsightError::InvalidDatetime)
}

/// A `query` that is absent, empty, or all-whitespace is treated as no query
/// at all; it must not leave a stray `query=` segment in the URL.
pub fn trimmed_query(query: Option<&str>) -> Option<&str> {
    query.map(str::trim).filter(|q| !q.is_empty())
}

fn non_empty(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(InsightError::InvalidParams(format!(
            "'{field}' must be a non-empty string"
        )));
    }
    Ok(())
}

fn positive(value: u32, field: &str) -> Result<()> {
    if value == 0 {
        return Err(InsightError::InvalidParams(format!(
            "'{field}' must be a positive integer"
        )));
    }
    Ok(())
}

pub fn list_logsets_url(base: &str) -> String {
    format!("{base}/management/logsets")
}

pub fn query_logset_url(base: &str, params: &QueryLogsetParams) -> Result<String> {
    non_empty(&params.logset_id, "logsetId")?;
    positive(params.per_page, "perPage")?;
    let from = epoch_millis(&params.from)?;
    let to = epoch_millis(&params.to)?;

    let mut pairs = form_urlencoded::Serializer::new(String::new());
    pairs
        .append_pair("from", &from.to_string())
        .append_pair("to", &to.to_string())
        .append_pair("per_page", &params.per_page.to_string())
        .append_pair("kvp_info", "false");
    if let Some(q) = trimmed_query(params.query.as_deref()) {
        pairs.append_pair("query", q);
    }
    Ok(format!(
        "{base}/query/logsets/{}?{}",
        params.logset_id,
        pairs.finish()
    ))
}

pub fn query_logset_by_name_url(base: &str, params: &QueryLogsetByNameParams) -> Result<String> {
    non_empty(&params.logset_name, "logsetName")?;
    positive(params.per_page, "perPage")?;
    let from = epoch_millis(&params.from)?;
    let to = epoch_millis(&params.to)?;

    let mut pairs = form_urlencoded::Serializer::new(String::new());
    pairs
        .append_pair("logset_name", &params.logset_name)
        .append_pair("from", &from.to_string())
        .append_pair("to", &to.to_string())
        .append_pair("per_page", &params.per_page.to_string())
        .append_pair("kvp_info", "false");
    if let Some(q) = trimmed_query(params.query.as_deref()) {
        pairs.append_pair("query", q);
    }
    Ok(format!("{base}/query/logsets?{}", pairs.finish()))
}

pub fn poll_query_url(base: &str, params: &PollQueryParams) -> Result<String> {
    non_empty(&params.query_id, "queryId")?;
    // An explicitly empty time range falls back to the default, same as an
    // absent one. The value is opaque to us and percent-encoded whole.
    let range = if params.time_range.trim().is_empty() {
        DEFAULT_TIME_RANGE
    } else {
        params.time_range.as_str()
    };
    Ok(format!(
        "{base}/query/{}?time_range={}",
        params.query_id,
        urlencoding::encode(range)
    ))
}
