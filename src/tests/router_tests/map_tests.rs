// src/tests/router_tests/map_tests.rs

use crate::config::FeedConfig;
use crate::domain::severity::DamageLevel;
use crate::router::handle;
use crate::templates::pages::{MapView, DEFAULT_CENTER, DEFAULT_ZOOM};
use crate::tests::utils::{body_string, get, gviz_body, report_row, sample_report, test_app, StaticFeed};
use scraper::{Html, Selector};
use serde_json::Value;

fn map_data(body: &str) -> Value {
    let doc = Html::parse_document(body);
    let script = doc
        .select(&Selector::parse("script#map-data").unwrap())
        .next()
        .expect("map data block");
    serde_json::from_str(&script.text().collect::<String>()).unwrap()
}

#[test]
fn only_reports_with_coordinates_become_markers() {
    let mut with_coords = sample_report("a", "Imlil");
    with_coords.latitude = Some(31.13);
    with_coords.longitude = Some(-7.92);
    let mut without = sample_report("b", "Tikht");
    without.latitude = None;
    without.longitude = None;
    let mut bogus = sample_report("c", "Nowhere");
    bogus.latitude = Some(95.0);

    let view = MapView::from_reports(&[with_coords, without, bogus]);

    assert_eq!(view.markers.len(), 1);
    assert_eq!(view.markers[0].lat, 31.13);
    assert!(view.markers[0].critical);
    assert!(view.markers[0].popup.contains("Imlil"));
    assert!(view.markers[0].popup.contains("4 - حرج جداً"));
}

#[test]
fn bounds_cover_every_marker() {
    let mut north = sample_report("a", "North");
    north.latitude = Some(32.0);
    north.longitude = Some(-9.0);
    let mut south = sample_report("b", "South");
    south.latitude = Some(30.5);
    south.longitude = Some(-7.0);
    south.damage_level = DamageLevel::Low;

    let view = MapView::from_reports(&[north, south]);
    let bounds = view.bounds.unwrap();

    assert_eq!(bounds.south_west, (30.5, -9.0));
    assert_eq!(bounds.north_east, (32.0, -7.0));
    assert!(!view.markers[1].critical);
}

#[test]
fn empty_map_keeps_default_view() {
    let view = MapView::from_reports(&[]);
    assert_eq!(view.center, DEFAULT_CENTER);
    assert_eq!(view.zoom, DEFAULT_ZOOM);
    assert!(view.bounds.is_none());
}

#[test]
fn map_page_embeds_markers_from_feed() {
    let feed = StaticFeed::default().with(
        FeedConfig::default().reports_url(),
        Ok(gviz_body(vec![
            report_row("Imlil", "Al Haouz", "4", Some(31.13), Some(-7.92)),
            report_row("Tikht", "Al Haouz", "2", None, None),
        ])),
    );
    let app = test_app(feed, false, None);

    let resp = handle(get("/map"), &app.state).unwrap();
    assert_eq!(resp.status(), 200);

    let data = map_data(&body_string(resp));
    assert_eq!(data["zoom"], 7);
    assert_eq!(data["markers"].as_array().unwrap().len(), 1);
    assert_eq!(data["markers"][0]["critical"], true);
    assert_eq!(data["center"][0], 31.7917);
}

#[test]
fn map_page_renders_when_feed_is_down() {
    let app = test_app(StaticFeed::default(), false, None);

    let resp = handle(get("/map"), &app.state).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    let doc = Html::parse_document(&body);
    assert_eq!(doc.select(&Selector::parse(".notice-error").unwrap()).count(), 1);
    assert!(map_data(&body)["markers"].as_array().unwrap().is_empty());
}

#[test]
fn popup_markup_cannot_close_the_data_block() {
    let feed = StaticFeed::default().with(
        FeedConfig::default().reports_url(),
        Ok(gviz_body(vec![report_row(
            "</script><b>x",
            "Al Haouz",
            "3",
            Some(31.0),
            Some(-8.0),
        )])),
    );
    let app = test_app(feed, false, None);

    let body = body_string(handle(get("/map"), &app.state).unwrap());
    let data = map_data(&body);
    assert_eq!(data["markers"].as_array().unwrap().len(), 1);
}
