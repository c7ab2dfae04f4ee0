pub mod form;
pub mod hierarchy;
pub mod report;
pub mod severity;

pub use form::{GeolocationError, GeolocationFix, ReportForm, ValidationError};
pub use hierarchy::{HierarchyIndex, HierarchyRow, LocationLevel, LocationSelection};
pub use report::{Coordinates, Report};
pub use severity::{map_severity, DamageLevel};
