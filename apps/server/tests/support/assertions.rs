use anyhow::Context as _;
use axum::http::StatusCode;
use serde_json::Value;

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(
        actual, expected,
        "{context}: expected status {expected}, got {actual}"
    );
}

/// `results` array of a page response
pub fn page_results(page: &Value) -> anyhow::Result<&Vec<Value>> {
    page.get("results")
        .and_then(|v| v.as_array())
        .context("page.results is array")
}

pub fn page_total(page: &Value) -> anyhow::Result<i64> {
    page.get("totalCount")
        .and_then(|v| v.as_i64())
        .context("page.totalCount is integer")
}

/// Listing ids of a page, in response order
pub fn listing_ids(page: &Value) -> anyhow::Result<Vec<i64>> {
    page_results(page)?
        .iter()
        .map(|l| l.get("id").and_then(|v| v.as_i64()).context("listing id"))
        .collect()
}

/// Listing ids, sorted, for order-insensitive comparisons
pub fn sorted_listing_ids(page: &Value) -> anyhow::Result<Vec<i64>> {
    let mut ids = listing_ids(page)?;
    ids.sort_unstable();
    Ok(ids)
}

/// Error message of a `{status, error}` response body
pub fn error_message(body: &Value) -> anyhow::Result<&str> {
    body.get("error")
        .and_then(|v| v.as_str())
        .context("error message is string")
}

pub fn assert_error_mentions(body: &Value, needle: &str) -> anyhow::Result<()> {
    let message = error_message(body)?;
    assert!(
        message.contains(needle),
        "expected error to mention '{needle}', got '{message}'"
    );
    Ok(())
}
