// src/tests/router_tests/dashboard_tests.rs

use crate::analysis::AnalysisSummary;
use crate::config::FeedConfig;
use crate::feeds::FeedError;
use crate::router::handle;
use crate::tests::utils::{body_string, get, gviz_body, post_form, report_row, sample_report, test_app, StaticFeed};
use scraper::{Html, Selector};
use serde_json::json;
use std::io::Read;

fn reports_url() -> String {
    FeedConfig::default().reports_url()
}

fn reports_feed() -> StaticFeed {
    StaticFeed::default().with(
        reports_url(),
        Ok(gviz_body(vec![
            report_row("Oldest", "Al Haouz", "1", Some(31.0), Some(-8.0)),
            report_row("Newest", "Chichaoua", "4", Some(31.2), Some(-8.6)),
        ])),
    )
}

fn table_source(doc: &Html) -> String {
    doc.select(&Selector::parse("#dashboard-table").unwrap())
        .next()
        .and_then(|el| el.value().attr("data-source"))
        .unwrap_or_default()
        .to_string()
}

fn row_ids(doc: &Html) -> Vec<String> {
    doc.select(&Selector::parse("#dashboard-table tr[data-report-id]").unwrap())
        .filter_map(|el| el.value().attr("data-report-id"))
        .map(str::to_string)
        .collect()
}

#[test]
fn dashboard_shows_remote_reports_newest_first() {
    let app = test_app(reports_feed(), false, None);

    let resp = handle(get("/dashboard"), &app.state).unwrap();
    assert_eq!(resp.status(), 200);

    let doc = Html::parse_document(&body_string(resp));
    assert_eq!(table_source(&doc), "live");
    assert_eq!(row_ids(&doc), vec!["remote-1", "remote-0"]);

    let badges: Vec<_> = doc
        .select(&Selector::parse("#dashboard-table [data-level]").unwrap())
        .filter_map(|el| el.value().attr("data-level"))
        .collect();
    assert_eq!(badges, vec!["CRITICAL", "LOW"]);
}

#[test]
fn dashboard_falls_back_to_local_reports() {
    let app = test_app(StaticFeed::default(), false, None);
    app.state.store.add(sample_report("local-1", "Tikht")).unwrap();

    let resp = handle(get("/dashboard"), &app.state).unwrap();
    let doc = Html::parse_document(&body_string(resp));

    assert_eq!(table_source(&doc), "local");
    assert_eq!(row_ids(&doc), vec!["local-1"]);
    assert_eq!(
        doc.select(&Selector::parse("#dashboard-table .notice-error").unwrap()).count(),
        1
    );
    // the delete list always shows what is stored here
    assert_eq!(
        doc.select(&Selector::parse("#local-reports form[action='/reports/local-1/delete']").unwrap()).count(),
        1
    );
}

#[test]
fn failed_refresh_keeps_previous_rows() {
    let app = test_app(reports_feed(), false, None);
    handle(get("/dashboard"), &app.state).unwrap();

    app.feed.set(reports_url(), Err(FeedError::Status(503)));

    let resp = handle(get("/dashboard/table"), &app.state).unwrap();
    let doc = Html::parse_fragment(&body_string(resp));

    assert_eq!(table_source(&doc), "cached");
    assert_eq!(row_ids(&doc), vec!["remote-1", "remote-0"]);
    assert_eq!(
        doc.select(&Selector::parse(".notice-error").unwrap()).count(),
        1
    );
}

#[test]
fn export_returns_workbook() {
    let app = test_app(reports_feed(), false, None);
    handle(get("/dashboard"), &app.state).unwrap();

    let resp = handle(get("/dashboard/export"), &app.state).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = resp.headers().get("Content-Disposition").unwrap().to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"reports_"));

    let mut bytes = Vec::new();
    resp.into_body().reader().read_to_end(&mut bytes).unwrap();
    // xlsx is a zip archive
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn analysis_renders_summary() {
    let summary = AnalysisSummary {
        summary: "Two villages hit".to_string(),
        priorities: vec!["Shelter".to_string(), "Water".to_string()],
        recommendations: "Send tents to Chichaoua".to_string(),
    };
    let app = test_app(reports_feed(), false, Some(summary));
    handle(get("/dashboard"), &app.state).unwrap();

    let resp = handle(post_form("/analysis", "", true), &app.state).unwrap();
    let doc = Html::parse_fragment(&body_string(resp));

    let priorities: Vec<_> = doc
        .select(&Selector::parse(".analysis-result ol li").unwrap())
        .map(|el| el.text().collect::<String>())
        .collect();
    assert_eq!(priorities, vec!["Shelter", "Water"]);
}

#[test]
fn analysis_failure_offers_retry() {
    let app = test_app(reports_feed(), false, None);
    handle(get("/dashboard"), &app.state).unwrap();

    let resp = handle(post_form("/analysis", "", true), &app.state).unwrap();
    assert_eq!(resp.status(), 200);

    let doc = Html::parse_fragment(&body_string(resp));
    assert_eq!(
        doc.select(&Selector::parse(".notice-error button[hx-post='/analysis']").unwrap()).count(),
        1
    );
    assert_eq!(
        doc.select(&Selector::parse(".analysis-result").unwrap()).count(),
        0
    );
}

#[test]
fn analysis_with_no_reports_says_so() {
    let app = test_app(StaticFeed::default(), false, None);

    let resp = handle(post_form("/analysis", "", true), &app.state).unwrap();
    let body = body_string(resp);
    assert!(body.contains("nothing to analyse"));
}

#[test]
fn attachment_names_are_header_safe() {
    use crate::responses::xlsx::attachment_name;

    assert_eq!(attachment_name("reports_20230909_1000.xlsx"), "reports_20230909_1000.xlsx");
    assert_eq!(attachment_name("a\"b;c.xlsx"), "a_b_c.xlsx");
    assert_eq!(attachment_name("..."), "reports.xlsx");
}

fn row_with_link_and_region(village: &str, link: &str) -> serde_json::Value {
    json!({ "c": [
        { "v": "2024-01-01" },
        { "v": village },
        { "v": "Al Haouz" },
        { "v": "Asni" },
        { "v": "Collapse" },
        { "v": "3" },
        { "v": "Tents" },
        { "v": "0600000000" },
        { "v": link },
        null,
        null,
        { "v": "Marrakech-Safi" }
    ]})
}

#[test]
fn only_web_maps_links_become_hrefs() {
    let feed = StaticFeed::default().with(
        reports_url(),
        Ok(gviz_body(vec![
            row_with_link_and_region("Safe", "https://www.google.com/maps?q=31.1,-7.9"),
            row_with_link_and_region("Hostile", "javascript:alert(document.cookie)"),
            row_with_link_and_region("Sneaky", " JavaScript:alert(1)"),
        ])),
    );
    let app = test_app(feed, false, None);

    let body = body_string(handle(get("/dashboard"), &app.state).unwrap());
    assert!(!body.to_lowercase().contains("javascript:"));

    let doc = Html::parse_document(&body);
    let hrefs: Vec<_> = doc
        .select(&Selector::parse("#dashboard-table td a[target='_blank']").unwrap())
        .filter_map(|el| el.value().attr("href"))
        .collect();
    assert_eq!(hrefs, vec!["https://www.google.com/maps?q=31.1,-7.9"]);
}

#[test]
fn dashboard_rows_show_region() {
    let feed = StaticFeed::default().with(
        reports_url(),
        Ok(gviz_body(vec![row_with_link_and_region("Imlil", "")])),
    );
    let app = test_app(feed, false, None);

    let doc = Html::parse_document(&body_string(handle(get("/dashboard"), &app.state).unwrap()));
    let village_cell: String = doc
        .select(&Selector::parse("#dashboard-table td.village small").unwrap())
        .map(|el| el.text().collect::<String>())
        .collect();
    assert_eq!(village_cell, "Marrakech-Safi");
}
