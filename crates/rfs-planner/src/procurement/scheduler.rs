//! Backward scheduling of equipment releases from the forward schedule.
//!
//! The target (required-on-job) date is the anchor L3 start minus the item's
//! buffer, clamped into the scope's feasibility window: on or after dry-in for
//! house equipment, inside the hall's own fitout span for hall equipment.
//! The release date is the target minus the lead time on the admin calendar.

use super::catalog::{EquipmentCatalog, EquipmentTemplate, LeadTimeBreakdown, Scope};
use super::risk::{ReleaseStatus, RojStatus, DEFAULT_RISK_WINDOW_DAYS};
use crate::planning::calendar::{clamp, WorkCalendar};
use crate::planning::{Building, Hall};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Bounds a target date must fall within; a missing side is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeasibilityWindow {
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
}

impl FeasibilityWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.earliest.map_or(true, |low| date >= low) && self.latest.map_or(true, |high| date <= high)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquipmentRow {
    pub building_name: String,
    pub equipment: String,
    pub scope: Scope,
    /// 1-based hall index for hall-scope rows.
    pub hall_index: Option<usize>,
    pub anchor_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub window: FeasibilityWindow,
    pub lead_time: LeadTimeBreakdown,
    /// Release from the item's explicit milestone anchor, when configured.
    pub release_plan: Option<NaiveDate>,
    /// Latest release that still meets the target.
    pub release_date: Option<NaiveDate>,
    pub site_acceptance_date: Option<NaiveDate>,
    pub planned_arrival: Option<NaiveDate>,
    pub roj: Option<NaiveDate>,
    pub status: Option<ReleaseStatus>,
    pub roj_status: Option<RojStatus>,
}

impl EquipmentRow {
    pub fn display_name(&self) -> String {
        match self.hall_index {
            Some(index) => format!("{} (Hall {})", self.equipment, index),
            None => self.equipment.clone(),
        }
    }

    pub fn to_view(&self) -> EquipmentRowView {
        EquipmentRowView {
            building_name: self.building_name.clone(),
            equipment: self.display_name(),
            location: self.scope.label(),
            release_plan: self.release_plan,
            release_needed: self.release_date,
            status: self.status.map(ReleaseStatus::label).unwrap_or_default(),
            lead_time_weeks: self.lead_time.weeks(),
            modeled_arrival: self.lead_time.modeled_arrival,
            site_acceptance: self.site_acceptance_date,
            roj_target: self.target_date,
            roj: self.roj,
            roj_status: self.roj_status.map(RojStatus::label).unwrap_or_default(),
        }
    }
}

/// Tabular row with the column names consumed by the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct EquipmentRowView {
    #[serde(rename = "Building Name")]
    pub building_name: String,
    #[serde(rename = "Equipment")]
    pub equipment: String,
    #[serde(rename = "Location")]
    pub location: &'static str,
    #[serde(rename = "Release Plan")]
    pub release_plan: Option<NaiveDate>,
    #[serde(rename = "Release Needed")]
    pub release_needed: Option<NaiveDate>,
    #[serde(rename = "Status")]
    pub status: &'static str,
    #[serde(rename = "Lead Time (weeks)")]
    pub lead_time_weeks: i64,
    #[serde(rename = "Modeled Arrival")]
    pub modeled_arrival: Option<NaiveDate>,
    #[serde(rename = "Site Acceptance")]
    pub site_acceptance: Option<NaiveDate>,
    #[serde(rename = "ROJ Target")]
    pub roj_target: Option<NaiveDate>,
    #[serde(rename = "ROJ")]
    pub roj: Option<NaiveDate>,
    #[serde(rename = "ROJ Status")]
    pub roj_status: &'static str,
}

pub struct ProcurementScheduler<'a> {
    calendar: &'a WorkCalendar,
    today: NaiveDate,
    risk_window_days: i64,
}

impl<'a> ProcurementScheduler<'a> {
    /// `calendar` is the admin calendar, normally a five-day week.
    pub fn new(calendar: &'a WorkCalendar, today: NaiveDate) -> Self {
        Self {
            calendar,
            today,
            risk_window_days: DEFAULT_RISK_WINDOW_DAYS,
        }
    }

    pub fn with_risk_window(mut self, days: i64) -> Self {
        self.risk_window_days = days;
        self
    }

    pub fn schedule(&self, building: &Building, catalog: &EquipmentCatalog) -> Vec<EquipmentRow> {
        let mut rows = Vec::new();

        for template in catalog.templates() {
            let lead_time = template.lead_time.resolve(self.calendar);
            match template.scope {
                Scope::House => {
                    let anchor = building.earliest_l3_hall().and_then(|hall| hall.l3_start);
                    let window = FeasibilityWindow {
                        earliest: building.dryin_date,
                        latest: None,
                    };
                    rows.push(self.row(building, None, template, lead_time, anchor, window));
                }
                Scope::Hall => {
                    for hall in &building.halls {
                        let window = FeasibilityWindow {
                            earliest: hall.fitout_start,
                            latest: hall.fitout_finish,
                        };
                        rows.push(self.row(
                            building,
                            Some(hall),
                            template,
                            lead_time,
                            hall.l3_start,
                            window,
                        ));
                    }
                }
            }
        }

        debug!(
            building = %building.name,
            rows = rows.len(),
            overdue = rows
                .iter()
                .filter(|row| row.status == Some(ReleaseStatus::Overdue))
                .count(),
            "procurement rows computed"
        );
        rows
    }

    pub fn schedule_site(&self, buildings: &[Building], catalog: &EquipmentCatalog) -> Vec<EquipmentRow> {
        buildings
            .iter()
            .flat_map(|building| self.schedule(building, catalog))
            .collect()
    }

    fn row(
        &self,
        building: &Building,
        hall: Option<&Hall>,
        template: &EquipmentTemplate,
        lead_time: LeadTimeBreakdown,
        anchor: Option<NaiveDate>,
        window: FeasibilityWindow,
    ) -> EquipmentRow {
        let cal = self.calendar;
        let lead_wd = lead_time.total_wd;

        let ideal = cal.shift(anchor, -i64::from(template.buffer_wd_before_l3));
        let target_date = clamp(ideal, window.earliest, window.latest);
        let release_date = cal.shift(target_date, -lead_wd);
        // Recomputed forward so the arrival sits on a working day.
        let site_acceptance_date = cal.shift(release_date, lead_wd);

        let release_plan = template
            .release_anchor
            .and_then(|anchor| anchor.release_date(cal, building, hall));
        let planned_arrival = cal.shift(release_plan, lead_wd);

        let arrival = planned_arrival.or(site_acceptance_date);
        let roj = match (target_date, arrival) {
            (Some(target), Some(arrival)) => Some(target.max(arrival)),
            (target, arrival) => target.or(arrival),
        };
        let roj = clamp(roj, window.earliest, None);

        let status = ReleaseStatus::classify(
            release_plan.or(release_date),
            self.today,
            self.risk_window_days,
        );
        let roj_status = RojStatus::classify(arrival, target_date);

        EquipmentRow {
            building_name: building.name.clone(),
            equipment: template.name.clone(),
            scope: template.scope,
            hall_index: hall.map(|hall| hall.index),
            anchor_date: anchor,
            target_date,
            window,
            lead_time,
            release_plan,
            release_date,
            site_acceptance_date,
            planned_arrival,
            roj,
            status,
            roj_status,
        }
    }
}
