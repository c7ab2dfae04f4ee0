use crate::domain::report::Report;
use crate::templates::layouts::desktop::{desktop_layout, NavItem};
use crate::templates::{card, level_badge, notice_banner, Notice};
use maud::{html, Markup};

const MAPS_ICON: &str = "https://www.gstatic.com/images/branding/product/1x/maps_64dp.png";

/// Where the rows in the table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardSource {
    /// Fresh from the reports sheet.
    Live,
    /// Last good copy of the sheet.
    Cached,
    /// The sheet never loaded; showing reports saved on this server.
    Local,
}

pub struct DashboardVm {
    pub reports: Vec<Report>,
    pub source: DashboardSource,
    pub notice: Option<Notice>,
    pub local_reports: Vec<Report>,
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    desktop_layout(
        "لوحة المعطيات",
        NavItem::Dashboard,
        html! {},
        html! {
            div style="display: flex; justify-content: space-between; align-items: center;" {
                div {
                    h1 { "سجل الإغاثة الميداني" }
                    p { "مراقبة حية للوضعية في الدواوير المتضررة" }
                }
                div {
                    button
                        hx-get="/dashboard/table"
                        hx-target="#dashboard-table"
                        hx-swap="outerHTML"
                        hx-indicator="#refresh-indicator"
                    {
                        "تحديث المعطيات"
                        span id="refresh-indicator" class="htmx-indicator" { " جاري التحديث..." }
                    }
                    " "
                    a href="/dashboard/export" { "تحميل Excel" }
                }
            }

            (reports_table(vm))

            (card("التحليل الذكي", html! {
                div id="analysis" {
                    button hx-post="/analysis" hx-target="#analysis" hx-swap="innerHTML"
                        hx-indicator="#analysis-indicator"
                    {
                        "تحليل البلاغات"
                        span id="analysis-indicator" class="htmx-indicator" { " جاري التحليل..." }
                    }
                }
            }))

            (local_reports_card(&vm.local_reports))
        },
    )
}

/// Table of reports plus its banner; the refresh button swaps this element.
pub fn reports_table(vm: &DashboardVm) -> Markup {
    html! {
        section class="card" id="dashboard-table" data-source=(source_name(vm.source)) {
            @if let Some(notice) = &vm.notice {
                (notice_banner(notice))
            }
            @if vm.reports.is_empty() {
                p class="empty" { "لا توجد بلاغات بعد." }
            } @else {
                div style="overflow-x: auto;" {
                    table {
                        thead {
                            tr {
                                th { "الخريطة" }
                                th { "الدوار" }
                                th { "الإقليم" }
                                th { "الجماعة" }
                                th { "الأضرار" }
                                th { "الاستعجال" }
                                th { "الهاتف" }
                            }
                        }
                        tbody {
                            @for report in &vm.reports {
                                (report_row(report))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn report_row(report: &Report) -> Markup {
    html! {
        tr data-report-id=(report.id) {
            td {
                @if let Some(link) = report.web_maps_link() {
                    a href=(link) target="_blank" rel="noopener noreferrer" {
                        img src=(MAPS_ICON) width="24" height="24" alt="Maps";
                    }
                } @else {
                    span { "N/A" }
                }
            }
            td class="village" {
                strong { (report.village_name) }
                @if let Some(region) = report.region.as_deref().filter(|r| *r != "-") {
                    br;
                    small { (region) }
                }
            }
            td { (report.province) }
            td { (report.commune) }
            td {
                p title=(report.damage_type) { (report.damage_type) }
                small { "الاحتياجات: " (report.needs) }
            }
            td { (level_badge(report.damage_level)) }
            td {
                a href={ "tel:" (report.contact_number) } dir="ltr" { (report.contact_number) }
            }
        }
    }
}

fn local_reports_card(reports: &[Report]) -> Markup {
    card("البلاغات المحفوظة على هذا الخادم", html! {
        @if reports.is_empty() {
            p { "لا توجد بلاغات محلية." }
        } @else {
            ul id="local-reports" {
                @for report in reports {
                    li data-report-id=(report.id) {
                        strong { (report.village_name) }
                        " - " (report.province) " - "
                        (level_badge(report.damage_level))
                        " "
                        small { (report.timestamp) }
                        form method="post" action={ "/reports/" (report.id) "/delete" } style="display: inline;" {
                            button type="submit" { "حذف" }
                        }
                    }
                }
            }
        }
    })
}

fn source_name(source: DashboardSource) -> &'static str {
    match source {
        DashboardSource::Live => "live",
        DashboardSource::Cached => "cached",
        DashboardSource::Local => "local",
    }
}
