use maud::{html, Markup, PreEscaped, DOCTYPE};

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@1.9.12";

const BASE_CSS: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; }
header { display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem; background: #fff; box-shadow: 0 1px 3px rgba(0,0,0,.08); }
header nav a { margin-inline-start: 0.75rem; padding: 0.4rem 0.9rem; border-radius: 999px; text-decoration: none; color: #475569; }
header nav a.active { background: #1e293b; color: #fff; }
main { max-width: 72rem; margin: 1.5rem auto; padding: 0 1rem; }
.card { background: #fff; border-radius: 1rem; padding: 1.25rem; margin-bottom: 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,.06); }
.notice { padding: 0.75rem 1rem; border-radius: 0.75rem; margin-bottom: 1rem; }
.notice-error { background: #ffe4e6; color: #9f1239; }
.notice-warning { background: #fef3c7; color: #92400e; }
.notice-success { background: #dcfce7; color: #166534; }
.notice-info { background: #e0f2fe; color: #075985; }
.badge { padding: 0.3rem 0.75rem; border-radius: 999px; font-size: 0.7rem; font-weight: 800; }
.level-low { background: #10b981; color: #fff; }
.level-medium { background: #fbbf24; color: #0f172a; }
.level-high { background: #f97316; color: #fff; }
.level-critical { background: #e11d48; color: #fff; }
table { width: 100%; border-collapse: collapse; }
th, td { padding: 0.6rem; border-bottom: 1px solid #f1f5f9; text-align: right; }
.htmx-indicator { display: none; }
.htmx-request .htmx-indicator, .htmx-request.htmx-indicator { display: inline; }
#map { height: 70vh; border-radius: 1rem; }
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Report,
    Map,
    Dashboard,
}

pub fn desktop_layout(title: &str, active: NavItem, head_extra: Markup, content: Markup) -> Markup {
    let nav = [
        (NavItem::Report, "/", "إرسال بلاغ"),
        (NavItem::Map, "/map", "خريطة المناطق"),
        (NavItem::Dashboard, "/dashboard", "لوحة المعطيات"),
    ];

    html! {
        (DOCTYPE)
        html lang="ar" dir="rtl" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | رصد الميدان" }
                style { (PreEscaped(BASE_CSS)) }
                script src=(HTMX_SRC) defer {}
                (head_extra)
            }
            body {
                header {
                    a href="/" style="font-weight: 800; color: #e11d48; text-decoration: none;" { "رصد الميدان" }
                    nav {
                        @for (item, href, label) in nav {
                            a href=(href) class=[(item == active).then_some("active")] { (label) }
                        }
                    }
                }
                main { (content) }
                footer style="text-align: center; color: #64748b; padding: 2rem 0; font-size: 0.85rem;" {
                    "نظام رصد الدواوير المتضررة - مبادرة إنسانية"
                }
            }
        }
    }
}
