use crate::infra::{fmt_date, load_catalog, parse_date};
use chrono::{Datelike, Local, NaiveDate};
use clap::Args;
use rfs_planner::config::{AppConfig, PlannerConfig};
use rfs_planner::error::AppError;
use rfs_planner::planning::calendar::holidays_for_years;
use rfs_planner::planning::{
    BuildingSpec, Country, DurationConfig, DurationPreset, GateSet, HallPlan, Workweek,
};
use rfs_planner::report::{SitePlan, SiteReport, DEFAULT_BUILDING_MW};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ScheduleArgs {
    /// Notice to proceed (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) ntp: Option<NaiveDate>,
    /// Land disturbance permit (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) ldp: Option<NaiveDate>,
    /// Building permit (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) bp: Option<NaiveDate>,
    /// Permanent power available (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) perm_power: Option<NaiveDate>,
    /// Temporary power available (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) temp_power: Option<NaiveDate>,
    /// Let L3/L4 start on temporary power
    #[arg(long)]
    pub(crate) allow_temp_power: bool,
    /// Data halls per building
    #[arg(long, default_value_t = 4)]
    pub(crate) halls: usize,
    /// Calendar days between hall fitout starts (0 uses 60)
    #[arg(long, default_value_t = 90)]
    pub(crate) cadence_days: u32,
    /// Halls allowed between fitout start and RFS at once (0 = unlimited)
    #[arg(long)]
    pub(crate) max_parallel: Option<usize>,
    /// Duration preset: typical, aggressive or conservative
    #[arg(long, value_parser = parse_preset, default_value = "typical")]
    pub(crate) preset: DurationPreset,
    #[arg(long)]
    pub(crate) site_work_wd: Option<u32>,
    #[arg(long)]
    pub(crate) vertical_wd: Option<u32>,
    /// Dry-in point as a percentage of vertical construction
    #[arg(long)]
    pub(crate) dryin_pct: Option<u32>,
    /// Enable the separate MEP yard with this duration
    #[arg(long)]
    pub(crate) mep_yard_wd: Option<u32>,
    #[arg(long)]
    pub(crate) mep_fitout_lead_wd: Option<u32>,
    #[arg(long)]
    pub(crate) fitout_wd: Option<u32>,
    #[arg(long)]
    pub(crate) l3_wd: Option<u32>,
    #[arg(long)]
    pub(crate) l4_wd: Option<u32>,
    #[arg(long)]
    pub(crate) l5_wd: Option<u32>,
    /// Construction works Saturdays
    #[arg(long)]
    pub(crate) six_day: bool,
    /// Holiday country (US, CA, GB); defaults to RFS_COUNTRY
    #[arg(long)]
    pub(crate) country: Option<String>,
    /// Number of buildings on the site
    #[arg(long, default_value_t = 1)]
    pub(crate) buildings: usize,
    /// Calendar days between consecutive buildings' gates
    #[arg(long, default_value_t = 0)]
    pub(crate) stagger_days: i64,
    /// Total MW per building
    #[arg(long, default_value_t = DEFAULT_BUILDING_MW)]
    pub(crate) building_mw: f64,
    /// Site shutdown day on top of the country holidays (repeatable)
    #[arg(long = "site-holiday", value_parser = parse_date)]
    pub(crate) site_holidays: Vec<NaiveDate>,
    /// Status date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Equipment catalog CSV (defaults to the built-in list)
    #[arg(long)]
    pub(crate) equipment_csv: Option<PathBuf>,
    /// Write the hall RFS table to this CSV file
    #[arg(long)]
    pub(crate) export_halls: Option<PathBuf>,
    /// Write the equipment table to this CSV file
    #[arg(long)]
    pub(crate) export_equipment: Option<PathBuf>,
    /// Print the phase timeline
    #[arg(long)]
    pub(crate) timeline: bool,
}

impl ScheduleArgs {
    fn durations(&self) -> DurationConfig {
        let mut durations = DurationConfig::from_preset(self.preset);
        let overrides = [
            (&mut durations.site_work_wd, self.site_work_wd),
            (&mut durations.vertical_wd, self.vertical_wd),
            (&mut durations.dryin_pct, self.dryin_pct),
            (&mut durations.mep_fitout_lead_wd, self.mep_fitout_lead_wd),
            (&mut durations.fitout_wd, self.fitout_wd),
            (&mut durations.l3_wd, self.l3_wd),
            (&mut durations.l4_wd, self.l4_wd),
            (&mut durations.l5_wd, self.l5_wd),
        ];
        for (slot, value) in overrides {
            if let Some(value) = value {
                *slot = value;
            }
        }
        durations.mep_yard_wd = self.mep_yard_wd;
        durations
    }

    pub(crate) fn site_plan(&self) -> SitePlan {
        SitePlan {
            gates: GateSet {
                ntp: self.ntp,
                ldp: self.ldp,
                bp: self.bp,
                perm_power: self.perm_power,
                temp_power: self.temp_power,
            },
            durations: self.durations(),
            halls: HallPlan {
                hall_count: self.halls,
                cadence_days: self.cadence_days,
                max_parallel: self.max_parallel,
                allow_temp_power: self.allow_temp_power,
            },
            buildings: BuildingSpec::staggered(self.buildings, self.stagger_days),
            building_mw: self.building_mw,
            site_holidays: self.site_holidays.clone(),
        }
    }

    pub(crate) fn planner(&self, mut base: PlannerConfig) -> PlannerConfig {
        if let Some(code) = self.country.as_deref() {
            base.country = Country::from_code(code);
        }
        if self.six_day {
            base.construction_workweek = Workweek::SixDay;
        }
        base
    }
}

#[derive(Args, Debug)]
pub(crate) struct HolidaysArgs {
    /// Country code (US, CA, GB)
    #[arg(long, default_value = "US")]
    pub(crate) country: String,
    /// First year to list (defaults to the current year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Number of consecutive years
    #[arg(long, default_value_t = 1)]
    pub(crate) years: u16,
}

pub(crate) fn parse_preset(raw: &str) -> Result<DurationPreset, String> {
    DurationPreset::parse(raw)
        .ok_or_else(|| format!("unknown preset '{raw}' (expected typical, aggressive or conservative)"))
}

pub(crate) fn run_schedule(args: ScheduleArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let planner = args.planner(config.planner);
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let catalog = load_catalog(args.equipment_csv.as_deref())?;
    let plan = args.site_plan();
    plan.validate()?;

    let report = SiteReport::compute(&plan, &planner, &catalog, today);
    render_site_report(&report, &planner, args.timeline);

    if let Some(path) = args.export_halls.as_deref() {
        write_csv(path, &report.hall_views())?;
        println!("\nHall table written to {}", path.display());
    }
    if let Some(path) = args.export_equipment.as_deref() {
        write_csv(path, &report.equipment_views())?;
        println!("Equipment table written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_holidays(args: HolidaysArgs) -> Result<(), AppError> {
    let country = Country::from_code(&args.country);
    let first = args.year.unwrap_or_else(|| Local::now().year());
    let years = first..first + i32::from(args.years.max(1));

    println!("{} holidays (observed dates)", country.label());
    for date in holidays_for_years(country, years) {
        println!("- {} {}", date, date.weekday());
    }
    Ok(())
}

pub(crate) fn render_site_report(report: &SiteReport, planner: &PlannerConfig, timeline: bool) {
    let summary = report.summary();

    println!("RFS schedule (status date {})", summary.today);
    println!(
        "Holidays: {} | construction {}-day week | admin {}-day week",
        planner.country.label(),
        planner.construction_workweek.length(),
        planner.admin_workweek.length()
    );

    for (building, view) in report.buildings.iter().zip(&summary.buildings) {
        println!("\n{}", view.name);
        for milestone in &view.key_milestones {
            println!("- {}: {}", milestone.label, milestone.date.format("%b %d, %Y"));
        }
        println!(
            "- Halls: {} | first RFS {} | final RFS {}",
            building.halls.len(),
            fmt_date(view.first_rfs),
            fmt_date(view.final_rfs)
        );
    }

    println!("\nHall RFS");
    for row in report.hall_views() {
        println!(
            "- {} hall {} ({:.2} MW): fitout {} -> {}, L3 {}, L4 finish {}, RFS {}",
            row.building_name,
            row.hall,
            row.mw_per_hall,
            fmt_date(row.fitout_start),
            fmt_date(row.fitout_finish),
            fmt_date(row.l3_start),
            fmt_date(row.l4_finish),
            fmt_date(row.rfs)
        );
    }

    println!("\nEquipment releases");
    for row in report.equipment_views() {
        println!(
            "- {} | {} [{}]: release by {}, ROJ {}, {} wk lead | {} / {}",
            row.building_name,
            row.equipment,
            row.location,
            fmt_date(row.release_needed),
            fmt_date(row.roj_target),
            row.lead_time_weeks,
            if row.status.is_empty() { "n/a" } else { row.status },
            if row.roj_status.is_empty() { "n/a" } else { row.roj_status },
        );
    }

    let counts = summary
        .release_status
        .iter()
        .map(|entry| format!("{} {}", entry.count, entry.label))
        .collect::<Vec<_>>()
        .join(" | ");
    println!("\nRelease status: {counts}");
    println!("Site RFS: {}", fmt_date(summary.site_rfs));

    if timeline {
        println!("\nTimeline");
        for entry in report.timeline() {
            println!("- {}: {} -> {}", entry.label, entry.start, entry.finish);
        }
    }
}

pub(crate) fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(std::io::Error::from)?;
    for row in rows {
        writer.serialize(row).map_err(std::io::Error::from)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = rows.len(), "csv export written");
    Ok(())
}
