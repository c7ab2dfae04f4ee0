use maud::{html, Markup};

use crate::domain::severity::DamageLevel;

pub mod card;
pub mod error;

pub use card::card;
pub use error::error_page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Warning,
    Success,
    Info,
}

/// A non-fatal message shown above a page section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Warning, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Info, message: message.into() }
    }
}

pub fn notice_banner(notice: &Notice) -> Markup {
    let class = match notice.kind {
        NoticeKind::Error => "notice notice-error",
        NoticeKind::Warning => "notice notice-warning",
        NoticeKind::Success => "notice notice-success",
        NoticeKind::Info => "notice notice-info",
    };
    html! {
        div class=(class) role="status" { (notice.message) }
    }
}

pub fn level_badge(level: DamageLevel) -> Markup {
    html! {
        span class={ "badge " (level.css_class()) } data-level=(level.token()) { (level.label()) }
    }
}
