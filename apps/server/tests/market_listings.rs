//! Market listing cards (POST /cards, GET /cards?section=...)

#![allow(unused)]

mod support;

use anyhow::Context as _;
use axum::http::{Method, StatusCode};
use chrono::{DateTime, Months, Utc};
use serde_json::{json, Value};
use support::*;

async fn create_card(app: &TestApp, card: Value) -> anyhow::Result<(StatusCode, Value)> {
    let (status, _headers, body) = app
        .request(Method::POST, "/cards", Some(to_json_body(&card)?))
        .await?;
    let body: Value = serde_json::from_slice(&body).context("decode create response")?;
    Ok((status, body))
}

fn card(section: &str, title: &str) -> Value {
    json!({
        "creatorId": 5,
        "section": section,
        "title": title,
        "description": "Barely used",
        "keywordIds": [3, 1, 3]
    })
}

#[tokio::test]
async fn create_returns_new_id() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, body) = create_card(&app, card("ForSale", "Old bike")).await?;
    assert_status(status, StatusCode::CREATED, "create card");
    assert_eq!(body["cardId"], 1);

    let (status, body) = create_card(&app, card("Wanted", "Lawn mower")).await?;
    assert_status(status, StatusCode::CREATED, "create second card");
    assert_eq!(body["cardId"], 2);
    Ok(())
}

#[tokio::test]
async fn list_by_section() -> anyhow::Result<()> {
    let app = TestApp::new();
    create_card(&app, card("ForSale", "Old bike")).await?;
    create_card(&app, card("Wanted", "Lawn mower")).await?;
    create_card(&app, card("ForSale", "Bookshelf")).await?;

    let page = app
        .get_json("/cards?section=ForSale", StatusCode::OK)
        .await?;
    assert_eq!(page_total(&page)?, 2);

    let results = page_results(&page)?;
    let titles: Vec<&str> = results
        .iter()
        .filter_map(|c| c["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Old bike", "Bookshelf"]);

    let first = &results[0];
    assert_eq!(first["section"], "ForSale");
    assert_eq!(first["creatorId"], 5);
    assert_eq!(first["keywordIds"], json!([1, 3]));

    let created: DateTime<Utc> = first["created"]
        .as_str()
        .context("created")?
        .parse()?;
    let display_end: DateTime<Utc> = first["displayPeriodEnd"]
        .as_str()
        .context("displayPeriodEnd")?
        .parse()?;
    assert_eq!(created.checked_add_months(Months::new(1)), Some(display_end));
    Ok(())
}

#[tokio::test]
async fn list_pages_and_sorts() -> anyhow::Result<()> {
    let app = TestApp::new();
    for title in ["Canoe", "Armchair", "Bicycle"] {
        create_card(&app, card("Exchange", title)).await?;
    }

    let page = app
        .get_json(
            "/cards?section=Exchange&sortBy=TITLE&pagStartIndex=0&pagEndIndex=1",
            StatusCode::OK,
        )
        .await?;
    let titles: Vec<&str> = page_results(&page)?
        .iter()
        .filter_map(|c| c["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Armchair", "Bicycle"]);
    assert_eq!(page_total(&page)?, 3);
    Ok(())
}

#[tokio::test]
async fn invalid_section_is_rejected() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, body) = create_card(&app, card("Jobs", "Gardener")).await?;
    assert_status(status, StatusCode::BAD_REQUEST, "create with bad section");
    assert_error_mentions(&body, "ForSale")?;

    app.get_json("/cards?section=Jobs", StatusCode::BAD_REQUEST)
        .await?;
    app.get_json("/cards", StatusCode::BAD_REQUEST).await?;
    Ok(())
}

#[tokio::test]
async fn repeated_query_keys_are_rejected() -> anyhow::Result<()> {
    let app = TestApp::new();
    create_card(&app, card("ForSale", "Old bike")).await?;

    let body = app
        .get_json("/cards?section=ForSale&section=Wanted", StatusCode::BAD_REQUEST)
        .await?;
    assert_error_mentions(&body, "section")?;

    let body = app
        .get_json(
            "/cards?section=ForSale&sortBy=TITLE&sortBy=ID",
            StatusCode::BAD_REQUEST,
        )
        .await?;
    assert_error_mentions(&body, "sortBy")?;
    Ok(())
}

#[tokio::test]
async fn invalid_title_is_rejected() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, _) = create_card(&app, card("ForSale", "")).await?;
    assert_status(status, StatusCode::BAD_REQUEST, "empty title");

    let (status, _) = create_card(&app, card("ForSale", "   ")).await?;
    assert_status(status, StatusCode::BAD_REQUEST, "blank title");

    let (status, _) = create_card(&app, card("ForSale", &"x".repeat(51))).await?;
    assert_status(status, StatusCode::BAD_REQUEST, "long title");

    let page = app
        .get_json("/cards?section=ForSale", StatusCode::OK)
        .await?;
    assert_eq!(page_total(&page)?, 0, "nothing stored");
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_rejected() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, _headers, _body) = app
        .request(
            Method::POST,
            "/cards",
            Some(axum::body::Bytes::from_static(b"{\"title\":")),
        )
        .await?;
    assert_status(status, StatusCode::BAD_REQUEST, "truncated JSON");

    let (status, _) = create_card(&app, json!({ "section": "ForSale", "title": "No creator" })).await?;
    assert_status(status, StatusCode::BAD_REQUEST, "missing creatorId");
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_json_not_found() -> anyhow::Result<()> {
    let app = TestApp::new();

    let body = app.get_json("/nowhere", StatusCode::NOT_FOUND).await?;
    assert_eq!(body["status"], 404);
    Ok(())
}
