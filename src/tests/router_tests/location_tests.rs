// src/tests/router_tests/location_tests.rs

use crate::router::handle;
use crate::tests::utils::{body_string, get, gviz_body, hierarchy_url, post_form, test_app, text_row, StaticFeed};
use scraper::{Html, Selector};

fn hierarchy_feed() -> StaticFeed {
    StaticFeed::default().with(
        hierarchy_url(),
        Ok(gviz_body(vec![
            text_row(&[Some("North"), Some("P1"), Some("C1"), Some("V1")]),
            text_row(&[Some("North"), Some("P1"), Some("C2"), Some("V2")]),
            text_row(&[Some("South"), Some("P2"), Some("C3"), Some("V3")]),
        ])),
    )
}

fn option_values(doc: &Html, selector: &str) -> Vec<String> {
    doc.select(&Selector::parse(selector).unwrap())
        .filter_map(|el| el.value().attr("value"))
        .map(str::to_string)
        .collect()
}

fn input_value(doc: &Html, id: &str) -> String {
    doc.select(&Selector::parse(&format!("input#{id}")).unwrap())
        .next()
        .and_then(|el| el.value().attr("value"))
        .unwrap_or_default()
        .to_string()
}

#[test]
fn changing_region_clears_deeper_levels() {
    let app = test_app(hierarchy_feed(), false, None);
    let body = "changed=region&region=South&province=P1&commune=C1&village_name=V1\
&committed_region=North&committed_province=P1&committed_commune=C1&committed_village_name=V1";

    let resp = handle(post_form("/location", body, true), &app.state).unwrap();
    assert_eq!(resp.status(), 200);

    let doc = Html::parse_fragment(&body_string(resp));
    assert_eq!(input_value(&doc, "region"), "South");
    assert_eq!(input_value(&doc, "province"), "");
    assert_eq!(input_value(&doc, "commune"), "");
    assert_eq!(input_value(&doc, "village_name"), "");
    assert_eq!(option_values(&doc, "#dl-province option"), vec!["P2"]);
}

#[test]
fn unchanged_value_keeps_deeper_levels() {
    let app = test_app(hierarchy_feed(), false, None);
    let body = "changed=province&region=North&province=P1&commune=C2&village_name=V2\
&committed_region=North&committed_province=P1&committed_commune=C2&committed_village_name=V2";

    let resp = handle(post_form("/location", body, true), &app.state).unwrap();
    let doc = Html::parse_fragment(&body_string(resp));

    assert_eq!(input_value(&doc, "commune"), "C2");
    assert_eq!(input_value(&doc, "village_name"), "V2");
    assert_eq!(option_values(&doc, "#dl-village_name option"), vec!["V2"]);
}

#[test]
fn options_endpoint_filters_by_typed_text() {
    let app = test_app(hierarchy_feed(), false, None);

    let resp = handle(get("/location/options?level=commune&region=North&province=P1&commune=2"), &app.state).unwrap();
    assert_eq!(resp.status(), 200);

    let doc = Html::parse_fragment(&body_string(resp));
    assert_eq!(option_values(&doc, "option"), vec!["C2"]);
}

#[test]
fn options_endpoint_rejects_unknown_level() {
    let app = test_app(hierarchy_feed(), false, None);
    let result = handle(get("/location/options?level=planet"), &app.state);
    assert!(matches!(result, Err(crate::errors::ServerError::BadRequest(_))));
}

#[test]
fn options_endpoint_accepts_explicit_query() {
    let app = test_app(hierarchy_feed(), false, None);

    let resp = handle(get("/location/options?level=village_name&region=North&q=V"), &app.state).unwrap();
    let doc = Html::parse_fragment(&body_string(resp));
    assert_eq!(option_values(&doc, "option"), vec!["V1", "V2"]);
}
