use maud::{html, Markup};

use crate::analysis::{AnalysisError, AnalysisSummary};

pub fn analysis_result(summary: &AnalysisSummary) -> Markup {
    html! {
        div class="analysis-result" {
            h3 { "ملخص الوضع" }
            p { (summary.summary) }
            h3 { "الأولويات القصوى" }
            ol {
                @for priority in &summary.priorities {
                    li { (priority) }
                }
            }
            h3 { "توصيات لفرق الإغاثة" }
            p { (summary.recommendations) }
        }
    }
}

/// Failure message with a retry button; there is no fallback summary.
pub fn analysis_failed(err: &AnalysisError) -> Markup {
    let message = match err {
        AnalysisError::NotConfigured => "التحليل الذكي غير مفعل على هذا الخادم.",
        AnalysisError::NoReports => "لا توجد بلاغات لتحليلها.",
        _ => "تعذر إجراء التحليل حالياً.",
    };

    html! {
        div class="notice notice-error" data-error=(err.to_string()) {
            p { (message) }
            button hx-post="/analysis" hx-target="#analysis" hx-swap="innerHTML" { "إعادة المحاولة" }
        }
    }
}
