pub mod components;
pub mod layouts;
pub mod pages;

// Re-exports for convenience
pub use components::{card, level_badge, notice_banner, Notice};
pub use layouts::desktop::{desktop_layout, NavItem};
