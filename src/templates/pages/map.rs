use maud::{html, Markup, PreEscaped};
use serde::Serialize;

use crate::domain::report::Report;
use crate::domain::severity::DamageLevel;
use crate::templates::layouts::desktop::{desktop_layout, NavItem};
use crate::templates::{notice_banner, Notice};

/// Map shown before any marker is known.
pub const DEFAULT_CENTER: (f64, f64) = (31.7917, -7.0926);
pub const DEFAULT_ZOOM: u8 = 7;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lng: f64,
    pub critical: bool,
    /// Pre-rendered popup HTML.
    pub popup: String,
}

/// South-west and north-east corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: (f64, f64),
    pub north_east: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: (f64, f64),
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
    /// Present whenever there is at least one marker; the map fits to it.
    pub bounds: Option<Bounds>,
}

impl MapView {
    pub fn from_reports(reports: &[Report]) -> MapView {
        let markers: Vec<MapMarker> = reports
            .iter()
            .filter_map(|report| {
                let coords = report.coordinates().filter(|c| c.is_plottable())?;
                Some(MapMarker {
                    lat: coords.latitude,
                    lng: coords.longitude,
                    critical: report.damage_level == DamageLevel::Critical,
                    popup: marker_popup(report).into_string(),
                })
            })
            .collect();

        let bounds = markers.iter().fold(None, |acc: Option<Bounds>, m| {
            Some(match acc {
                None => Bounds {
                    south_west: (m.lat, m.lng),
                    north_east: (m.lat, m.lng),
                },
                Some(b) => Bounds {
                    south_west: (b.south_west.0.min(m.lat), b.south_west.1.min(m.lng)),
                    north_east: (b.north_east.0.max(m.lat), b.north_east.1.max(m.lng)),
                },
            })
        });

        MapView {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            markers,
            bounds,
        }
    }
}

pub fn marker_popup(report: &Report) -> Markup {
    let critical = report.damage_level == DamageLevel::Critical;
    html! {
        div class="popup" dir="rtl" {
            h3 style="margin: 0 0 8px 0; color: #e11d48;" { (report.village_name) }
            p { strong { "الإقليم: " } (report.province) }
            p { strong { "الضرر: " } (report.damage_type) }
            p {
                strong { "الاستعجال: " }
                span class=[critical.then_some("critical")]
                    style=(if critical { "color: red; font-weight: bold;" } else { "color: inherit;" })
                {
                    (report.damage_level.numbered_label())
                }
            }
            p { strong { "الاحتياجات: " } (report.needs) }
            p {
                a href={ "tel:" (report.contact_number) } { "اتصال: " (report.contact_number) }
            }
        }
    }
}

pub struct MapVm {
    pub view: MapView,
    pub notice: Option<Notice>,
}

pub fn map_page(vm: &MapVm) -> Markup {
    // Keep "</script>" inside popups from closing the data block.
    let data = serde_json::to_string(&vm.view)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/");

    desktop_layout(
        "خريطة المناطق",
        NavItem::Map,
        html! {
            link rel="stylesheet" href=(LEAFLET_CSS);
            script src=(LEAFLET_JS) {}
        },
        html! {
            h1 { "خريطة المناطق المتضررة" }
            @if let Some(notice) = &vm.notice {
                (notice_banner(notice))
            }
            p { (vm.view.markers.len()) " موقع على الخريطة" }
            div id="map" {}
            script type="application/json" id="map-data" { (PreEscaped(data)) }
            script { (PreEscaped(MAP_SCRIPT)) }
        },
    )
}

const MAP_SCRIPT: &str = r#"(function () {
  var view = JSON.parse(document.getElementById('map-data').textContent);
  var map = L.map('map').setView(view.center, view.zoom);
  L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
    attribution: '&copy; OpenStreetMap contributors'
  }).addTo(map);
  view.markers.forEach(function (m) {
    L.marker([m.lat, m.lng]).addTo(map).bindPopup(m.popup);
  });
  if (view.bounds) {
    map.fitBounds([view.bounds.south_west, view.bounds.north_east], { padding: [50, 50] });
  }
})();"#;
