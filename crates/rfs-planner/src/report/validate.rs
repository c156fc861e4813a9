//! Range checks applied to caller-supplied plans before scheduling.
//!
//! The planning core trusts its numeric inputs; every entry point that takes
//! a [`SitePlan`] from outside (HTTP body, CLI flags) runs
//! [`SitePlan::validate`] first.

use super::summary::SitePlan;
use chrono::{Datelike, NaiveDate};
use std::ops::RangeInclusive;

pub const SITE_WORK_WD: RangeInclusive<u32> = 40..=180;
pub const VERTICAL_WD: RangeInclusive<u32> = 60..=300;
pub const DRYIN_PCT: RangeInclusive<u32> = 10..=90;
pub const MEP_YARD_WD: RangeInclusive<u32> = 1..=300;
pub const MEP_FITOUT_LEAD_WD: RangeInclusive<u32> = 0..=180;
pub const FITOUT_WD: RangeInclusive<u32> = 20..=200;
pub const L3_WD: RangeInclusive<u32> = 5..=90;
pub const L4_WD: RangeInclusive<u32> = 5..=60;
pub const L5_WD: RangeInclusive<u32> = 1..=30;

pub const HALL_COUNT: RangeInclusive<usize> = 1..=50;
pub const MAX_PARALLEL: RangeInclusive<usize> = 0..=50;
pub const CADENCE_DAYS: RangeInclusive<u32> = 0..=365;
pub const BUILDING_COUNT: RangeInclusive<usize> = 1..=26;
/// Largest gate offset between buildings, in calendar days.
pub const MAX_GATE_OFFSET_DAYS: i64 = 3650;
pub const GATE_YEARS: RangeInclusive<i32> = 1900..=2200;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("building_mw must be a positive number (got {0})")]
    InvalidBuildingMw(f64),
    #[error("{field} date {date} is outside the years 1900..=2200")]
    DateOutOfRange { field: &'static str, date: NaiveDate },
}

fn check<T>(field: &'static str, value: T, range: &RangeInclusive<T>) -> Result<(), PlanError>
where
    T: Copy + PartialOrd + TryInto<i64>,
{
    if range.contains(&value) {
        return Ok(());
    }
    let widen = |v: T| v.try_into().unwrap_or(i64::MAX);
    Err(PlanError::OutOfRange {
        field,
        min: widen(*range.start()),
        max: widen(*range.end()),
        value: widen(value),
    })
}

fn check_date(field: &'static str, date: Option<NaiveDate>) -> Result<(), PlanError> {
    match date {
        Some(date) if !GATE_YEARS.contains(&date.year()) => {
            Err(PlanError::DateOutOfRange { field, date })
        }
        _ => Ok(()),
    }
}

impl SitePlan {
    /// Rejects values the scheduler cannot handle or that break the phase
    /// ordering (dry-in outside vertical construction, zero halls).
    pub fn validate(&self) -> Result<(), PlanError> {
        let gates = &self.gates;
        check_date("ntp", gates.ntp)?;
        check_date("ldp", gates.ldp)?;
        check_date("bp", gates.bp)?;
        check_date("perm_power", gates.perm_power)?;
        check_date("temp_power", gates.temp_power)?;
        for holiday in &self.site_holidays {
            check_date("site_holidays", Some(*holiday))?;
        }

        let d = &self.durations;
        check("site_work_wd", d.site_work_wd, &SITE_WORK_WD)?;
        check("vertical_wd", d.vertical_wd, &VERTICAL_WD)?;
        check("dryin_pct", d.dryin_pct, &DRYIN_PCT)?;
        if let Some(mep_yard_wd) = d.mep_yard_wd {
            check("mep_yard_wd", mep_yard_wd, &MEP_YARD_WD)?;
        }
        check("mep_fitout_lead_wd", d.mep_fitout_lead_wd, &MEP_FITOUT_LEAD_WD)?;
        check("fitout_wd", d.fitout_wd, &FITOUT_WD)?;
        check("l3_wd", d.l3_wd, &L3_WD)?;
        check("l4_wd", d.l4_wd, &L4_WD)?;
        check("l5_wd", d.l5_wd, &L5_WD)?;

        let halls = &self.halls;
        check("hall_count", halls.hall_count, &HALL_COUNT)?;
        check("cadence_days", halls.cadence_days, &CADENCE_DAYS)?;
        if let Some(max_parallel) = halls.max_parallel {
            check("max_parallel", max_parallel, &MAX_PARALLEL)?;
        }

        check("buildings", self.buildings.len(), &BUILDING_COUNT)?;
        for spec in &self.buildings {
            check(
                "gate_offset_days",
                spec.gate_offset_days,
                &(-MAX_GATE_OFFSET_DAYS..=MAX_GATE_OFFSET_DAYS),
            )?;
        }

        if !(self.building_mw.is_finite() && self.building_mw > 0.0) {
            return Err(PlanError::InvalidBuildingMw(self.building_mw));
        }

        Ok(())
    }
}
