//! Backward procurement planning: equipment catalogs, lead-time models and
//! release/ROJ risk classification.

pub mod anchor;
pub mod catalog;
pub mod import;
pub mod risk;
pub mod scheduler;

pub use anchor::{MilestoneKey, ReleaseAnchor};
pub use catalog::{
    EquipmentCatalog, EquipmentTemplate, LeadTimeBreakdown, LeadTimeModel, ProcurementHistory,
    Scope,
};
pub use import::CatalogImportError;
pub use risk::{ReleaseStatus, RojStatus, DEFAULT_RISK_WINDOW_DAYS};
pub use scheduler::{EquipmentRow, EquipmentRowView, FeasibilityWindow, ProcurementScheduler};
