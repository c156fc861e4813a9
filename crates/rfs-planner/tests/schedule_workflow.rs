use chrono::{Duration, NaiveDate};
use rfs_planner::planning::{
    schedule_site, BuildingScheduler, BuildingSpec, Country, DurationConfig, DurationPreset,
    GateSet, Hall, HallAllocator, HallPlan, MilestoneScheduler, WorkCalendar, Workweek,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn site_gates() -> GateSet {
    GateSet {
        ntp: Some(date(2025, 1, 15)),
        ldp: Some(date(2025, 2, 1)),
        bp: Some(date(2025, 5, 1)),
        perm_power: Some(date(2025, 12, 1)),
        temp_power: Some(date(2025, 10, 15)),
    }
}

fn us_calendar(workweek: Workweek) -> WorkCalendar {
    WorkCalendar::new(Country::UnitedStates, workweek, 2024..=2032)
}

fn assert_monotonic(hall: &Hall) {
    let chain = [
        hall.fitout_start,
        hall.fitout_finish,
        hall.l3_start,
        hall.l3_finish,
        hall.l4_start,
        hall.l4_finish,
        hall.l5_start,
        hall.l5_finish,
    ];
    let dates: Vec<NaiveDate> = chain
        .iter()
        .map(|date| date.expect("fully determined hall"))
        .collect();
    assert!(
        dates.windows(2).all(|pair| pair[0] <= pair[1]),
        "hall {} out of order: {dates:?}",
        hall.index
    );
    assert_eq!(hall.rfs, hall.l5_finish);
}

#[test]
fn civil_chain_matches_business_day_count() {
    let calendar = WorkCalendar::without_holidays(Workweek::FiveDay);
    let durations = DurationConfig::default();
    let milestones = MilestoneScheduler::new(&calendar, &durations).schedule(&site_gates());

    assert_eq!(milestones.civil_start, Some(date(2025, 2, 1)));
    assert_eq!(milestones.civil_finish, Some(date(2025, 4, 25)));
    // Building permit is later than civil finish.
    assert_eq!(milestones.vertical_start, Some(date(2025, 5, 1)));
    assert!(milestones.dryin_date < milestones.vertical_finish);
    assert_eq!(milestones.fitout_trigger, milestones.vertical_finish);
}

#[test]
fn halls_stay_monotonic_across_configurations() {
    let presets = [
        DurationPreset::Typical,
        DurationPreset::Aggressive,
        DurationPreset::Conservative,
    ];
    for workweek in [Workweek::FiveDay, Workweek::SixDay] {
        let calendar = us_calendar(workweek);
        for preset in presets {
            for allow_temp_power in [false, true] {
                let durations = DurationConfig::from_preset(preset);
                let plan = HallPlan {
                    hall_count: 5,
                    cadence_days: 45,
                    max_parallel: Some(2),
                    allow_temp_power,
                };
                let building = BuildingScheduler::new(&calendar, &durations, &plan)
                    .schedule("Building A", site_gates());
                assert_eq!(building.halls.len(), 5);
                building.halls.iter().for_each(assert_monotonic);
            }
        }
    }
}

#[test]
fn single_slot_capacity_serialises_halls() {
    let calendar = us_calendar(Workweek::FiveDay);
    let durations = DurationConfig::default();
    let plan = HallPlan {
        hall_count: 3,
        cadence_days: 1,
        max_parallel: Some(1),
        allow_temp_power: false,
    };
    let trigger = Some(date(2026, 1, 5));
    let halls = HallAllocator::new(&calendar, &durations, &plan).allocate(trigger, &site_gates());

    assert!(halls[1].fitout_start > halls[0].rfs);
    assert!(halls[2].fitout_start > halls[1].rfs);
}

#[test]
fn parallel_halls_never_exceed_capacity() {
    let calendar = us_calendar(Workweek::SixDay);
    let durations = DurationConfig::default();
    let plan = HallPlan {
        hall_count: 8,
        cadence_days: 10,
        max_parallel: Some(2),
        allow_temp_power: true,
    };
    let halls = HallAllocator::new(&calendar, &durations, &plan)
        .allocate(Some(date(2026, 1, 5)), &site_gates());

    let first = halls[0].fitout_start.expect("first start");
    let last = halls
        .iter()
        .filter_map(|hall| hall.rfs)
        .max()
        .expect("last rfs");
    let mut day = first;
    while day <= last {
        let busy = halls.iter().filter(|hall| hall.in_progress_on(day)).count();
        assert!(busy <= 2, "{busy} halls in progress on {day}");
        day += Duration::days(1);
    }
}

#[test]
fn unlimited_capacity_follows_cadence() {
    let calendar = WorkCalendar::without_holidays(Workweek::FiveDay);
    let durations = DurationConfig::default();
    let plan = HallPlan {
        hall_count: 3,
        cadence_days: 0,
        ..HallPlan::default()
    };
    let halls = HallAllocator::new(&calendar, &durations, &plan)
        .allocate(Some(date(2026, 1, 5)), &site_gates());

    assert_eq!(halls[0].fitout_start, Some(date(2026, 1, 20)));
    assert_eq!(halls[1].fitout_start, Some(date(2026, 3, 21)));
    assert_eq!(halls[2].fitout_start, Some(date(2026, 5, 20)));
}

#[test]
fn identical_inputs_give_identical_schedules() {
    let calendar = us_calendar(Workweek::FiveDay);
    let durations = DurationConfig {
        mep_yard_wd: Some(40),
        ..DurationConfig::default()
    };
    let plan = HallPlan {
        max_parallel: Some(2),
        ..HallPlan::default()
    };
    let scheduler = BuildingScheduler::new(&calendar, &durations, &plan);

    let first = scheduler.schedule("Building A", site_gates());
    let second = scheduler.schedule("Building A", site_gates());
    assert_eq!(first, second);
}

#[test]
fn stepping_lands_on_working_days_and_round_trips() {
    let calendar = us_calendar(Workweek::FiveDay);
    let starts = [date(2025, 1, 1), date(2025, 7, 4), date(2025, 11, 22), date(2026, 12, 24)];
    for start in starts {
        for n in (-90..=90).filter(|n| *n != 0) {
            let landed = calendar.add_workdays(start, n);
            assert!(calendar.is_working_day(landed), "{start} + {n} -> {landed}");
            assert_eq!(calendar.workdays_between(start, landed), n);
        }
    }
}

#[test]
fn staggered_buildings_finish_in_order() {
    let calendar = us_calendar(Workweek::FiveDay);
    let durations = DurationConfig::default();
    let plan = HallPlan::default();
    let scheduler = BuildingScheduler::new(&calendar, &durations, &plan);

    let buildings = schedule_site(&scheduler, &site_gates(), &BuildingSpec::staggered(3, 60));
    let names: Vec<&str> = buildings.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["Building A", "Building B", "Building C"]);

    let finals: Vec<NaiveDate> = buildings
        .iter()
        .map(|b| b.final_rfs().expect("final rfs"))
        .collect();
    assert!(finals.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn missing_permit_propagates_to_every_hall() {
    let calendar = us_calendar(Workweek::FiveDay);
    let durations = DurationConfig::default();
    let plan = HallPlan::default();
    let gates = GateSet {
        bp: None,
        ..site_gates()
    };
    let building = BuildingScheduler::new(&calendar, &durations, &plan).schedule("Building A", gates);

    assert!(building.civil_finish.is_some());
    assert_eq!(building.vertical_start, None);
    assert_eq!(building.dryin_date, None);
    assert!(building.halls.iter().all(|hall| hall.rfs.is_none()));
    assert_eq!(building.final_rfs(), None);
    assert!(building.timeline().iter().all(|entry| !entry.label.contains("Hall")));
}
