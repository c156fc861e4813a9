use super::calendar::WorkCalendar;
use super::domain::{DurationConfig, GateSet, HallPlan, Phase};
use super::halls::{Hall, HallAllocator};
use super::milestones::{BuildingMilestones, MilestoneScheduler};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Derived milestone bundle of one building with its halls.
///
/// Recomputed from scratch on every input change, never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Building {
    pub name: String,
    pub gates: GateSet,
    pub civil_start: Option<NaiveDate>,
    pub civil_finish: Option<NaiveDate>,
    pub vertical_start: Option<NaiveDate>,
    pub vertical_finish: Option<NaiveDate>,
    pub dryin_date: Option<NaiveDate>,
    pub mep_start: Option<NaiveDate>,
    pub mep_finish: Option<NaiveDate>,
    pub fitout_trigger: Option<NaiveDate>,
    pub halls: Vec<Hall>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub label: String,
    pub start: NaiveDate,
    pub finish: NaiveDate,
    pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyMilestone {
    pub label: &'static str,
    pub date: NaiveDate,
}

impl Building {
    fn from_parts(name: String, gates: GateSet, milestones: BuildingMilestones, halls: Vec<Hall>) -> Self {
        Self {
            name,
            gates,
            civil_start: milestones.civil_start,
            civil_finish: milestones.civil_finish,
            vertical_start: milestones.vertical_start,
            vertical_finish: milestones.vertical_finish,
            dryin_date: milestones.dryin_date,
            mep_start: milestones.mep_start,
            mep_finish: milestones.mep_finish,
            fitout_trigger: milestones.fitout_trigger,
            halls,
        }
    }

    /// Hall with the earliest known L3 start.
    pub fn earliest_l3_hall(&self) -> Option<&Hall> {
        self.halls
            .iter()
            .filter(|hall| hall.l3_start.is_some())
            .min_by_key(|hall| hall.l3_start)
    }

    /// Latest RFS across all halls, if every hall is determinable.
    pub fn final_rfs(&self) -> Option<NaiveDate> {
        self.halls
            .iter()
            .map(|hall| hall.rfs)
            .collect::<Option<Vec<_>>>()?
            .into_iter()
            .max()
    }

    /// Gantt rows: building phases first, then each hall's chain.
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        let mut entries = Vec::new();
        let mut push = |label: String, start: Option<NaiveDate>, finish: Option<NaiveDate>, phase| {
            if let (Some(start), Some(finish)) = (start, finish) {
                entries.push(TimelineEntry {
                    label,
                    start,
                    finish,
                    phase,
                });
            }
        };

        push(
            format!("{} • Site Work", self.name),
            self.civil_start,
            self.civil_finish,
            Phase::SiteWork,
        );
        push(
            format!("{} • Shell", self.name),
            self.vertical_start,
            self.vertical_finish,
            Phase::Shell,
        );
        push(
            format!("{} • MEP Yard", self.name),
            self.mep_start,
            self.mep_finish,
            Phase::MepYard,
        );

        for hall in &self.halls {
            let chain = [
                (Phase::Fitout, hall.fitout_start, hall.fitout_finish),
                (Phase::L3, hall.l3_start, hall.l3_finish),
                (Phase::L4, hall.l4_start, hall.l4_finish),
                (Phase::L5, hall.l5_start, hall.l5_finish),
            ];
            for (phase, start, finish) in chain {
                push(
                    format!("{} • Hall {} • {}", self.name, hall.index, phase.label()),
                    start,
                    finish,
                    phase,
                );
            }
        }

        entries
    }

    pub fn key_milestones(&self) -> Vec<KeyMilestone> {
        [
            ("Civil Start", self.civil_start),
            ("Dry-In", self.dryin_date),
            ("Core & Shell Complete", self.vertical_finish),
            ("Permanent Power", self.gates.perm_power),
            ("Temporary Power", self.gates.temp_power),
        ]
        .into_iter()
        .filter_map(|(label, date)| date.map(|date| KeyMilestone { label, date }))
        .collect()
    }
}

/// Forward scheduler for buildings sharing one duration and hall setup.
pub struct BuildingScheduler<'a> {
    calendar: &'a WorkCalendar,
    durations: &'a DurationConfig,
    plan: &'a HallPlan,
}

impl<'a> BuildingScheduler<'a> {
    pub fn new(
        calendar: &'a WorkCalendar,
        durations: &'a DurationConfig,
        plan: &'a HallPlan,
    ) -> Self {
        Self {
            calendar,
            durations,
            plan,
        }
    }

    pub fn schedule(&self, name: impl Into<String>, gates: GateSet) -> Building {
        let name = name.into();
        let milestones = MilestoneScheduler::new(self.calendar, self.durations).schedule(&gates);
        let halls = HallAllocator::new(self.calendar, self.durations, self.plan)
            .allocate(milestones.fitout_trigger, &gates);

        debug!(
            building = %name,
            civil_start = ?milestones.civil_start,
            dryin = ?milestones.dryin_date,
            fitout_trigger = ?milestones.fitout_trigger,
            halls = halls.len(),
            "scheduled building"
        );

        Building::from_parts(name, gates, milestones, halls)
    }
}

/// One building of a site plan; gates are the site gates moved by
/// `gate_offset_days` calendar days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingSpec {
    pub name: String,
    #[serde(default)]
    pub gate_offset_days: i64,
}

impl BuildingSpec {
    pub fn new(name: impl Into<String>, gate_offset_days: i64) -> Self {
        Self {
            name: name.into(),
            gate_offset_days,
        }
    }

    /// `count` buildings named "Building A", "Building B", … each offset by
    /// `stagger_days` from the previous one.
    pub fn staggered(count: usize, stagger_days: i64) -> Vec<Self> {
        (0..count)
            .map(|idx| {
                let name = building_letter_name(idx);
                Self::new(name, stagger_days * idx as i64)
            })
            .collect()
    }
}

fn building_letter_name(idx: usize) -> String {
    let letter = (b'A' + (idx % 26) as u8) as char;
    if idx < 26 {
        format!("Building {letter}")
    } else {
        format!("Building {letter}{}", idx / 26)
    }
}

/// Schedules every building of a site from shared gates.
pub fn schedule_site(
    scheduler: &BuildingScheduler<'_>,
    site_gates: &GateSet,
    buildings: &[BuildingSpec],
) -> Vec<Building> {
    let scheduled: Vec<Building> = buildings
        .iter()
        .map(|spec| scheduler.schedule(spec.name.clone(), site_gates.shifted(spec.gate_offset_days)))
        .collect();

    info!(
        buildings = scheduled.len(),
        halls = scheduled.iter().map(|b| b.halls.len()).sum::<usize>(),
        "site schedule computed"
    );
    scheduled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::calendar::Workweek;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn gates() -> GateSet {
        GateSet {
            ntp: Some(date(2025, 1, 15)),
            ldp: Some(date(2025, 2, 1)),
            bp: Some(date(2025, 5, 1)),
            perm_power: Some(date(2025, 12, 1)),
            temp_power: None,
        }
    }

    #[test]
    fn timeline_lists_building_then_hall_phases() {
        let calendar = WorkCalendar::without_holidays(Workweek::FiveDay);
        let durations = DurationConfig::default();
        let plan = HallPlan {
            hall_count: 2,
            ..HallPlan::default()
        };
        let building = BuildingScheduler::new(&calendar, &durations, &plan).schedule("Building A", gates());

        let timeline = building.timeline();
        // Site work + shell, no MEP yard, four phases per hall.
        assert_eq!(timeline.len(), 2 + 2 * 4);
        assert_eq!(timeline[0].phase, Phase::SiteWork);
        assert_eq!(timeline[1].label, "Building A • Shell");
        assert_eq!(timeline[2].label, "Building A • Hall 1 • Fitout");
        assert!(timeline.iter().all(|entry| entry.start <= entry.finish));
    }

    #[test]
    fn key_milestones_skip_unknown_dates() {
        let calendar = WorkCalendar::without_holidays(Workweek::FiveDay);
        let durations = DurationConfig::default();
        let plan = HallPlan::default();
        let building = BuildingScheduler::new(&calendar, &durations, &plan).schedule("B", gates());

        let labels: Vec<_> = building.key_milestones().iter().map(|m| m.label).collect();
        assert_eq!(
            labels,
            ["Civil Start", "Dry-In", "Core & Shell Complete", "Permanent Power"]
        );
    }

    #[test]
    fn staggered_specs_offset_each_building() {
        let specs = BuildingSpec::staggered(3, 45);
        assert_eq!(specs[0], BuildingSpec::new("Building A", 0));
        assert_eq!(specs[2], BuildingSpec::new("Building C", 90));
    }

    #[test]
    fn site_schedule_shifts_gates_per_building() {
        let calendar = WorkCalendar::without_holidays(Workweek::FiveDay);
        let durations = DurationConfig::default();
        let plan = HallPlan::default();
        let scheduler = BuildingScheduler::new(&calendar, &durations, &plan);
        let buildings = schedule_site(&scheduler, &gates(), &BuildingSpec::staggered(2, 30));

        assert_eq!(buildings.len(), 2);
        assert_eq!(buildings[0].civil_start, Some(date(2025, 2, 1)));
        assert_eq!(buildings[1].civil_start, Some(date(2025, 3, 3)));
        assert!(buildings[1].final_rfs() >= buildings[0].final_rfs());
    }
}
