pub mod analysis;
pub mod dashboard;
pub mod map;
pub mod report_form;

pub use analysis::{analysis_failed, analysis_result};
pub use dashboard::{dashboard_page, reports_table, DashboardSource, DashboardVm};
pub use map::{map_page, MapView, MapVm, DEFAULT_CENTER, DEFAULT_ZOOM};
pub use report_form::{location_fieldset, location_options, report_form, report_form_page, ReportFormVm};
