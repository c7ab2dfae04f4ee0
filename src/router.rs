use astra::Request;
use chrono::Utc;
use log::{error, info};
use std::collections::HashMap;
use std::io::Read;
use url::form_urlencoded;

use crate::domain::form::{geolocation_from_params, ReportForm};
use crate::domain::hierarchy::{LocationLevel, LocationSelection};
use crate::errors::ServerError;
use crate::responses::{html_response, html_response_with_status, redirect, ResultResp};
use crate::spreadsheets::export_reports_xlsx;
use crate::state::AppState;
use crate::templates::pages::{
    analysis_failed, analysis_result, dashboard_page, location_fieldset, location_options,
    map_page, report_form, report_form_page, reports_table, DashboardSource, DashboardVm, MapView,
    MapVm, ReportFormVm,
};
use crate::templates::Notice;

pub fn handle(mut req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", [""]) => form_page(state),
        ("POST", ["reports"]) => {
            let htmx = is_htmx(&req);
            let params = read_form(&mut req)?;
            submit_report(&params, htmx, state)
        }
        ("POST", ["reports", id, "delete"]) => delete_report(id, state),
        ("GET", ["location", "options"]) => location_options_partial(&parse_query(&req), state),
        ("POST", ["location"]) => {
            let params = read_form(&mut req)?;
            location_cascade(&params, state)
        }
        ("GET", ["dashboard"]) => html_response(dashboard_page(&dashboard_vm(state))),
        ("GET", ["dashboard", "table"]) => html_response(reports_table(&dashboard_vm(state))),
        ("GET", ["dashboard", "export"]) => {
            let filename = format!("reports_{}.xlsx", Utc::now().format("%Y%m%d_%H%M"));
            export_reports_xlsx(&state.dashboard_reports(), &filename)
        }
        ("GET", ["map"]) => map(state),
        ("POST", ["analysis"]) => analysis(state),
        _ => Err(ServerError::NotFound),
    }
}

fn form_page(state: &AppState) -> ResultResp {
    let (index, notice) = state.hierarchy_index();
    let vm = ReportFormVm {
        form: ReportForm::default(),
        geolocation: None,
        hierarchy: &index,
        notices: notice.into_iter().collect(),
    };
    html_response(report_form_page(&vm))
}

fn submit_report(params: &HashMap<String, String>, htmx: bool, state: &AppState) -> ResultResp {
    let form = ReportForm::from_params(params);
    let geolocation = geolocation_from_params(params);
    let (index, hierarchy_notice) = state.hierarchy_index();

    let (vm, status) = match state
        .submissions
        .submit(&state.store, &form, &geolocation, Utc::now())
    {
        Ok(outcome) => {
            let notice = match &outcome.sync {
                Ok(()) => Notice::success("تم إرسال البلاغ بنجاح، شكراً لمساهمتك."),
                Err(warning) => Notice::warning(warning.user_message()),
            };
            info!("report {} saved for {}", outcome.report.id, outcome.report.village_name);
            let vm = ReportFormVm {
                form: outcome.next_form,
                geolocation: Some(geolocation),
                hierarchy: &index,
                notices: vec![notice],
            };
            (vm, 200)
        }
        Err(ServerError::Validation(e)) => {
            let vm = ReportFormVm {
                form,
                geolocation: Some(geolocation),
                hierarchy: &index,
                notices: hierarchy_notice
                    .into_iter()
                    .chain(std::iter::once(Notice::error(e.user_message())))
                    .collect(),
            };
            // htmx only swaps 2xx responses.
            (vm, if htmx { 200 } else { 422 })
        }
        Err(other) => return Err(other),
    };

    if htmx {
        html_response_with_status(status, report_form(&vm))
    } else {
        html_response_with_status(status, report_form_page(&vm))
    }
}

fn delete_report(id: &str, state: &AppState) -> ResultResp {
    if !state.store.remove(id)? {
        info!("delete of unknown report {id} ignored");
    }
    redirect("/dashboard")
}

fn location_options_partial(params: &HashMap<String, String>, state: &AppState) -> ResultResp {
    let level = params
        .get("level")
        .and_then(|l| LocationLevel::parse(l))
        .ok_or_else(|| ServerError::BadRequest("unknown location level".into()))?;

    let selection = selection_from(params, "");
    // `q` wins over the level's own field
    let filter = params
        .get("q")
        .map(|q| q.trim().to_string())
        .unwrap_or_else(|| selection.get(level).to_string());
    let (index, _) = state.hierarchy_index();

    html_response(location_options(&index.options_for(level, &selection, &filter)))
}

fn location_cascade(params: &HashMap<String, String>, state: &AppState) -> ResultResp {
    let level = params
        .get("changed")
        .and_then(|l| LocationLevel::parse(l))
        .ok_or_else(|| ServerError::BadRequest("unknown location level".into()))?;

    let mut selection = selection_from(params, "committed_");
    let value = params.get(level.field()).map(String::as_str).unwrap_or("");
    selection.select(level, value);

    let (index, _) = state.hierarchy_index();
    html_response(location_fieldset(&selection, &index))
}

fn dashboard_vm(state: &AppState) -> DashboardVm {
    let snapshot = state.refresh_dashboard();

    let notice = match (&snapshot.error, snapshot.refreshing) {
        (Some(e), _) => Some(Notice::error(e.user_message())),
        (None, true) => Some(Notice::info("التحديث جارٍ، يتم عرض آخر نسخة متوفرة.")),
        (None, false) => None,
    };

    let (reports, source) = match snapshot.data {
        Some(reports) if notice.is_none() => (reports.as_ref().clone(), DashboardSource::Live),
        Some(reports) => (reports.as_ref().clone(), DashboardSource::Cached),
        None => (state.store.all(), DashboardSource::Local),
    };

    DashboardVm {
        reports,
        source,
        notice,
        local_reports: state.store.all(),
    }
}

fn map(state: &AppState) -> ResultResp {
    let snapshot = state.refresh_map();
    let notice = snapshot
        .error
        .as_ref()
        .map(|e| Notice::error(e.user_message()));
    let reports = snapshot.data.map(|r| r.as_ref().clone()).unwrap_or_default();

    let vm = MapVm {
        view: MapView::from_reports(&reports),
        notice,
    };
    html_response(map_page(&vm))
}

fn analysis(state: &AppState) -> ResultResp {
    let reports = state.dashboard_reports();
    match state.summarizer.summarize(&reports) {
        Ok(summary) => html_response(analysis_result(&summary)),
        Err(e) => {
            error!("analysis unavailable: {e}");
            html_response(analysis_failed(&e))
        }
    }
}

fn selection_from(params: &HashMap<String, String>, prefix: &str) -> LocationSelection {
    let value = |level: LocationLevel| {
        params
            .get(&format!("{prefix}{}", level.field()))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };
    LocationSelection {
        region: value(LocationLevel::Region),
        province: value(LocationLevel::Province),
        commune: value(LocationLevel::Commune),
        village: value(LocationLevel::Village),
    }
}

fn is_htmx(req: &Request) -> bool {
    req.headers()
        .get("HX-Request")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "true")
        .unwrap_or(false)
}

fn read_form(req: &mut Request) -> Result<HashMap<String, String>, ServerError> {
    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("unreadable body: {e}")))?;

    Ok(form_urlencoded::parse(&body).into_owned().collect())
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}
