use super::views::{BuildingSummary, HallRowView, SiteSummary, StatusCount};
use crate::config::PlannerConfig;
use crate::planning::calendar::earliest_present;
use crate::planning::domain::FIRST_HALL_DELAY_DAYS;
use crate::planning::{
    schedule_site, Building, BuildingScheduler, BuildingSpec, DurationConfig, GateSet, HallPlan,
    TimelineEntry, WorkCalendar,
};
use crate::procurement::{
    EquipmentCatalog, EquipmentRow, EquipmentRowView, ProcurementScheduler, ReleaseStatus,
    RojStatus,
};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::{info, warn};

pub const DEFAULT_BUILDING_MW: f64 = 24.0;

/// Working days are stretched by this factor when sizing the holiday set;
/// country rules never leave fewer than one working day in two.
const WORKDAY_STRETCH: i64 = 2;
const MAX_CALENDAR_SPAN_YEARS: i32 = 400;

fn default_building_mw() -> f64 {
    DEFAULT_BUILDING_MW
}

fn default_buildings() -> Vec<BuildingSpec> {
    BuildingSpec::staggered(1, 0)
}

/// Inputs for one site scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitePlan {
    pub gates: GateSet,
    #[serde(default)]
    pub durations: DurationConfig,
    #[serde(default)]
    pub halls: HallPlan,
    #[serde(default = "default_buildings")]
    pub buildings: Vec<BuildingSpec>,
    /// Total IT load per building, split evenly across its halls.
    #[serde(default = "default_building_mw")]
    pub building_mw: f64,
    /// Site shutdown days added to the country holidays on both calendars.
    #[serde(default)]
    pub site_holidays: Vec<NaiveDate>,
}

impl SitePlan {
    pub fn new(gates: GateSet) -> Self {
        Self {
            gates,
            durations: DurationConfig::default(),
            halls: HallPlan::default(),
            buildings: default_buildings(),
            building_mw: DEFAULT_BUILDING_MW,
            site_holidays: Vec::new(),
        }
    }

    pub fn mw_per_hall(&self) -> f64 {
        if self.halls.hall_count == 0 {
            return 0.0;
        }
        let mw = self.building_mw / self.halls.hall_count as f64;
        (mw * 100.0).round() / 100.0
    }

    /// Upper bound, in calendar days, on how far any scheduled date can land
    /// after the latest gate of a building.
    fn horizon_days(&self) -> i64 {
        let d = &self.durations;
        let halls = self.halls.hall_count as i64;
        let building_wd = i64::from(d.site_work_wd)
            + i64::from(d.vertical_wd)
            + i64::from(d.mep_yard_wd.unwrap_or(0))
            + i64::from(d.mep_fitout_lead_wd);
        let hall_wd = i64::from(d.fitout_wd)
            + i64::from(d.l3_wd)
            + i64::from(d.l4_wd)
            + i64::from(d.l5_wd);

        hall_wd
            .saturating_mul(halls)
            .saturating_add(building_wd)
            .saturating_mul(WORKDAY_STRETCH)
            .saturating_add(self.halls.effective_cadence_days().saturating_mul(halls))
            .saturating_add(FIRST_HALL_DELAY_DAYS)
    }

    /// Years the holiday set must cover for this plan: from the year before
    /// the earliest input date to the year after the latest date any
    /// milestone can reach.
    pub fn calendar_years(&self, today: NaiveDate) -> RangeInclusive<i32> {
        let gates = self.gates;
        let offsets = self.buildings.iter().map(|spec| spec.gate_offset_days);
        let min_offset = offsets.clone().min().unwrap_or(0).min(0);
        let max_offset = offsets.max().unwrap_or(0).max(0);

        let inputs: Vec<NaiveDate> = [gates.ntp, gates.ldp, gates.bp, gates.perm_power, gates.temp_power]
            .into_iter()
            .flatten()
            .chain(std::iter::once(today))
            .collect();
        let first = inputs.iter().copied().min().unwrap_or(today);
        let last = inputs.iter().copied().max().unwrap_or(today);

        let start = offset_year(first, min_offset).unwrap_or_else(|| first.year()) - 1;
        let end = offset_year(last, max_offset.saturating_add(self.horizon_days()))
            .unwrap_or(i32::MAX)
            .saturating_add(1);

        start..=end.min(start.saturating_add(MAX_CALENDAR_SPAN_YEARS))
    }
}

fn offset_year(date: NaiveDate, days: i64) -> Option<i32> {
    let delta = Duration::try_days(days)?;
    date.checked_add_signed(delta).map(|shifted| shifted.year())
}

/// Forward and backward schedule of a whole site.
#[derive(Debug, Clone, Serialize)]
pub struct SiteReport {
    pub today: NaiveDate,
    pub mw_per_hall: f64,
    pub buildings: Vec<Building>,
    pub equipment: Vec<EquipmentRow>,
}

impl SiteReport {
    /// Runs both passes. Callers taking plans from outside the process
    /// should [`SitePlan::validate`] first.
    pub fn compute(
        plan: &SitePlan,
        settings: &PlannerConfig,
        catalog: &EquipmentCatalog,
        today: NaiveDate,
    ) -> Self {
        let years = plan.calendar_years(today);
        let covered_until = *years.end();
        let construction = WorkCalendar::new(settings.country, settings.construction_workweek, years)
            .with_extra_holidays(plan.site_holidays.iter().copied());
        let admin = construction.with_workweek(settings.admin_workweek);

        let scheduler = BuildingScheduler::new(&construction, &plan.durations, &plan.halls);
        let buildings = schedule_site(&scheduler, &plan.gates, &plan.buildings);

        let last_rfs = buildings
            .iter()
            .flat_map(|building| building.halls.iter().filter_map(|hall| hall.rfs))
            .max();
        if let Some(last_rfs) = last_rfs.filter(|date| date.year() > covered_until) {
            warn!(
                %last_rfs,
                covered_until,
                "schedule runs past the generated holiday years; later dates ignore holidays"
            );
        }

        let equipment = ProcurementScheduler::new(&admin, today)
            .with_risk_window(settings.risk_window_days)
            .schedule_site(&buildings, catalog);

        info!(
            country = settings.country.code(),
            buildings = buildings.len(),
            equipment_rows = equipment.len(),
            site_holidays = plan.site_holidays.len(),
            "site report computed"
        );

        Self {
            today,
            mw_per_hall: plan.mw_per_hall(),
            buildings,
            equipment,
        }
    }

    pub fn hall_views(&self) -> Vec<HallRowView> {
        self.buildings
            .iter()
            .flat_map(|building| {
                building.halls.iter().map(|hall| HallRowView {
                    building_name: building.name.clone(),
                    hall: hall.index,
                    mw_per_hall: self.mw_per_hall,
                    fitout_start: hall.fitout_start,
                    fitout_finish: hall.fitout_finish,
                    l3_start: hall.l3_start,
                    l4_finish: hall.l4_finish,
                    rfs: hall.rfs,
                })
            })
            .collect()
    }

    pub fn equipment_views(&self) -> Vec<EquipmentRowView> {
        self.equipment.iter().map(EquipmentRow::to_view).collect()
    }

    pub fn timeline(&self) -> Vec<TimelineEntry> {
        self.buildings.iter().flat_map(Building::timeline).collect()
    }

    pub fn summary(&self) -> SiteSummary {
        let buildings = self
            .buildings
            .iter()
            .map(|building| BuildingSummary {
                name: building.name.clone(),
                key_milestones: building.key_milestones(),
                first_rfs: earliest_present(building.halls.iter().map(|hall| hall.rfs)),
                final_rfs: building.final_rfs(),
            })
            .collect();

        let site_rfs = self
            .buildings
            .iter()
            .map(Building::final_rfs)
            .collect::<Option<Vec<_>>>()
            .and_then(|dates| dates.into_iter().max());

        let release_status = ReleaseStatus::ordered()
            .into_iter()
            .map(|status| StatusCount {
                label: status.label(),
                count: self
                    .equipment
                    .iter()
                    .filter(|row| row.status == Some(status))
                    .count(),
            })
            .collect();

        let roj_status = RojStatus::ordered()
            .into_iter()
            .map(|status| StatusCount {
                label: status.label(),
                count: self
                    .equipment
                    .iter()
                    .filter(|row| row.roj_status == Some(status))
                    .count(),
            })
            .collect();

        SiteSummary {
            today: self.today,
            buildings,
            hall_count: self.buildings.iter().map(|b| b.halls.len()).sum(),
            site_rfs,
            release_status,
            roj_status,
        }
    }
}
