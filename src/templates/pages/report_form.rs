use maud::{html, Markup, PreEscaped};

use crate::domain::form::{GeolocationError, GeolocationFix, ReportForm};
use crate::domain::hierarchy::{HierarchyIndex, LocationLevel, LocationSelection};
use crate::domain::severity::DamageLevel;
use crate::templates::layouts::desktop::{desktop_layout, NavItem};
use crate::templates::{notice_banner, Notice};

/// Browser geolocation options.
pub const GEOLOCATION_TIMEOUT_MS: u32 = 5000;

pub struct ReportFormVm<'a> {
    pub form: ReportForm,
    /// Position from the previous submission, if any. `None` lets the
    /// browser hook ask for one.
    pub geolocation: Option<GeolocationFix>,
    pub hierarchy: &'a HierarchyIndex,
    pub notices: Vec<Notice>,
}

pub fn report_form_page(vm: &ReportFormVm) -> Markup {
    desktop_layout(
        "التبليغ عن دوار متضرر",
        NavItem::Report,
        html! {},
        html! {
            section class="card" {
                h1 { "التبليغ عن دوار متضرر" }
                p { "يرجى ملء كافة الخانات لضمان دقة المعطيات الميدانية" }
                (report_form(vm))
            }
            script { (PreEscaped(geolocation_script())) }
        },
    )
}

/// The form itself; also the htmx swap target after a submission.
pub fn report_form(vm: &ReportFormVm) -> Markup {
    let (lat, lng) = match vm.geolocation {
        Some(Ok(c)) => (c.latitude.to_string(), c.longitude.to_string()),
        _ => (String::new(), String::new()),
    };

    html! {
        form id="report-form" method="post" action="/reports"
            hx-post="/reports" hx-target="this" hx-swap="outerHTML" hx-disabled-elt="button[type=submit]"
        {
            @for notice in &vm.notices {
                (notice_banner(notice))
            }

            (location_fieldset(&vm.form.location, vm.hierarchy))

            div {
                label for="maps_link" { "رابط الإحداثيات (خرائط جوجل)" }
                input type="url" id="maps_link" name="maps_link" value=(vm.form.maps_link)
                    placeholder="سيظهر الرابط هنا تلقائياً عند تحديد الموقع";
                input type="hidden" id="latitude" name="latitude" value=(lat);
                input type="hidden" id="longitude" name="longitude" value=(lng);
                input type="hidden" id="location_status" name="location_status"
                    value=(location_status(vm.geolocation.as_ref()));
                p id="location-state" data-state=(location_status(vm.geolocation.as_ref())) {
                    (location_status_text(vm.geolocation.as_ref()))
                }
            }

            div {
                label for="damage_type" { "طبيعة الضرر" }
                textarea id="damage_type" name="damage_type" rows="2"
                    placeholder="مثال: انهيار مباني، انقطاع طرق..." { (vm.form.damage_type) }
            }

            fieldset {
                legend { "مستوى الاستعجال" }
                @for level in DamageLevel::ALL {
                    label {
                        input type="radio" name="damage_level" value=(level.token())
                            checked[level == vm.form.damage_level];
                        " " (level.label())
                    }
                }
            }

            div {
                label for="needs" { "الاحتياجات الضرورية" }
                textarea id="needs" name="needs" rows="2"
                    placeholder="مثال: خيام، أغطية، أدوية..." { (vm.form.needs) }
            }

            div {
                label for="contact_number" { "رقم هاتف للتواصل" }
                input type="tel" id="contact_number" name="contact_number" dir="ltr"
                    value=(vm.form.contact_number) placeholder="+212 ...";
            }

            button type="submit" {
                span { "إرسال البلاغ" }
                span class="htmx-indicator" { " جاري الإرسال..." }
            }
        }
    }
}

/// Region → province → commune → village inputs with their autocomplete
/// lists. Changing one level posts back and re-renders the whole fieldset
/// with the deeper levels cleared.
pub fn location_fieldset(selection: &LocationSelection, hierarchy: &HierarchyIndex) -> Markup {
    let show_region = hierarchy.has_level(LocationLevel::Region) || !selection.region.is_empty();

    html! {
        fieldset id="location-fieldset" {
            legend { "الموقع" }
            @for level in LocationLevel::ALL {
                @if level != LocationLevel::Region || show_region {
                    (location_input(level, selection, hierarchy))
                }
                input type="hidden" name={ "committed_" (level.field()) } value=(selection.get(level));
            }
        }
    }
}

fn location_input(level: LocationLevel, selection: &LocationSelection, hierarchy: &HierarchyIndex) -> Markup {
    let field = level.field();
    let list_id = format!("dl-{field}");
    let required = level != LocationLevel::Region;
    let options = hierarchy.options_for(level, selection, "");

    html! {
        div {
            label for=(field) {
                (level.label())
                @if required { " *" }
            }
            input type="text" id=(field) name=(field) list=(list_id) autocomplete="off"
                value=(selection.get(level)) required[required]
                hx-post="/location" hx-trigger="change" hx-target="#location-fieldset"
                hx-swap="outerHTML" hx-include="#location-fieldset"
                hx-vals=(format!(r#"{{"changed": "{field}"}}"#));
            datalist id=(list_id)
                hx-get=(format!("/location/options?level={field}"))
                hx-trigger=(format!("keyup changed delay:250ms from:#{field}"))
                hx-include="#location-fieldset" hx-swap="innerHTML"
            {
                (location_options(&options))
            }
        }
    }
}

pub fn location_options(options: &[String]) -> Markup {
    html! {
        @for option in options {
            option value=(option) {}
        }
    }
}

fn location_status(geolocation: Option<&GeolocationFix>) -> &'static str {
    match geolocation {
        None => "idle",
        Some(Ok(_)) => "success",
        Some(Err(GeolocationError::Denied)) => "denied",
        Some(Err(GeolocationError::Timeout)) => "timeout",
        Some(Err(GeolocationError::Unsupported)) => "unsupported",
        Some(Err(GeolocationError::Unavailable)) => "unavailable",
    }
}

fn location_status_text(geolocation: Option<&GeolocationFix>) -> &'static str {
    match geolocation {
        None => "جاري تحديد الموقع...",
        Some(Ok(_)) => "تم تحديد الموقع بنجاح",
        Some(Err(_)) => "الموقع غير متاح، يمكنك إرسال البلاغ بدونه",
    }
}

fn geolocation_script() -> String {
    format!(
        r#"(function () {{
  var byId = function (id) {{ return document.getElementById(id); }};
  var setState = function (state, text) {{
    byId('location_status').value = state;
    var p = byId('location-state');
    p.dataset.state = state;
    p.textContent = text;
  }};
  if (byId('latitude').value) {{ return; }}
  if (!navigator.geolocation) {{
    setState('unsupported', 'الموقع غير متاح، يمكنك إرسال البلاغ بدونه');
    return;
  }}
  setState('fetching', 'جاري تحديد الموقع...');
  navigator.geolocation.getCurrentPosition(function (pos) {{
    var lat = pos.coords.latitude, lng = pos.coords.longitude;
    byId('latitude').value = lat;
    byId('longitude').value = lng;
    var link = byId('maps_link');
    if (!link.value) {{ link.value = 'https://www.google.com/maps?q=' + lat + ',' + lng; }}
    setState('success', 'تم تحديد الموقع بنجاح');
  }}, function (err) {{
    var state = err.code === 1 ? 'denied' : (err.code === 3 ? 'timeout' : 'unavailable');
    setState(state, 'الموقع غير متاح، يمكنك إرسال البلاغ بدونه');
  }}, {{ enableHighAccuracy: true, timeout: {GEOLOCATION_TIMEOUT_MS} }});
}})();"#
    )
}
