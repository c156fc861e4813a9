mod summary;
mod validate;
mod views;

pub use summary::{SitePlan, SiteReport, DEFAULT_BUILDING_MW};
pub use validate::PlanError;
pub use views::{BuildingSummary, HallRowView, SiteSummary, StatusCount};
