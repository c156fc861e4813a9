pub mod building;
pub mod calendar;
pub mod domain;
pub mod halls;
pub mod milestones;

pub use building::{schedule_site, Building, BuildingScheduler, BuildingSpec, KeyMilestone, TimelineEntry};
pub use calendar::{Country, WorkCalendar, Workweek};
pub use domain::{DurationConfig, DurationPreset, GateSet, HallPlan, Phase};
pub use halls::{Hall, HallAllocator};
pub use milestones::{BuildingMilestones, MilestoneScheduler};
