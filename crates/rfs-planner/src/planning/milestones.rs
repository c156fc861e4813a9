use super::calendar::{latest, WorkCalendar};
use super::domain::{DurationConfig, GateSet};
use chrono::NaiveDate;
use serde::Serialize;

/// Forward milestone chain of one building, before halls are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildingMilestones {
    pub civil_start: Option<NaiveDate>,
    pub civil_finish: Option<NaiveDate>,
    pub vertical_start: Option<NaiveDate>,
    pub vertical_finish: Option<NaiveDate>,
    pub dryin_date: Option<NaiveDate>,
    pub mep_start: Option<NaiveDate>,
    pub mep_finish: Option<NaiveDate>,
    /// Earliest point hall fitout may begin.
    pub fitout_trigger: Option<NaiveDate>,
}

pub struct MilestoneScheduler<'a> {
    calendar: &'a WorkCalendar,
    durations: &'a DurationConfig,
}

impl<'a> MilestoneScheduler<'a> {
    pub fn new(calendar: &'a WorkCalendar, durations: &'a DurationConfig) -> Self {
        Self {
            calendar,
            durations,
        }
    }

    pub fn schedule(&self, gates: &GateSet) -> BuildingMilestones {
        let cal = self.calendar;
        let durations = self.durations;

        // Civil waits for both NTP and the land disturbance permit.
        let civil_start = latest(gates.ntp, gates.ldp);
        let civil_finish = cal.shift(civil_start, i64::from(durations.site_work_wd));

        let vertical_start = latest(civil_finish, gates.bp);
        let vertical_finish = cal.shift(vertical_start, i64::from(durations.vertical_wd));
        let dryin_date = cal.shift(vertical_start, i64::from(durations.dryin_wd()));

        let (mep_start, mep_finish, fitout_trigger) = match durations.mep_yard_wd {
            Some(yard_wd) => {
                // Finish-to-finish with vertical construction.
                let mep_finish = vertical_finish;
                let mep_start = cal.shift(mep_finish, -i64::from(yard_wd));
                let trigger = cal.shift(mep_start, i64::from(durations.mep_fitout_lead_wd));
                (mep_start, mep_finish, trigger)
            }
            None => (None, None, vertical_finish),
        };

        BuildingMilestones {
            civil_start,
            civil_finish,
            vertical_start,
            vertical_finish,
            dryin_date,
            mep_start,
            mep_finish,
            fitout_trigger,
        }
    }
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
    fn civil_waits_for_both_permits() {
        let calendar = WorkCalendar::without_holidays(Workweek::FiveDay);
        let durations = DurationConfig::default();
        let milestones = MilestoneScheduler::new(&calendar, &durations).schedule(&gates());

        assert_eq!(milestones.civil_start, Some(date(2025, 2, 1)));
        assert_eq!(milestones.civil_finish, Some(date(2025, 4, 25)));
        // Building permit lands after civil finish and gates vertical.
        assert_eq!(milestones.vertical_start, Some(date(2025, 5, 1)));
        assert_eq!(milestones.fitout_trigger, milestones.vertical_finish);
        assert_eq!(milestones.mep_start, None);
    }

    #[test]
    fn dryin_sits_strictly_inside_vertical_span() {
        let calendar = WorkCalendar::without_holidays(Workweek::FiveDay);
        let durations = DurationConfig::default();
        let milestones = MilestoneScheduler::new(&calendar, &durations).schedule(&gates());

        let dryin = milestones.dryin_date.expect("dry-in scheduled");
        assert!(dryin > milestones.vertical_start.expect("vertical start"));
        assert!(dryin < milestones.vertical_finish.expect("vertical finish"));
    }

    #[test]
    fn mep_yard_variant_offsets_fitout_trigger() {
        let calendar = WorkCalendar::without_holidays(Workweek::FiveDay);
        let durations = DurationConfig {
            mep_yard_wd: Some(40),
            mep_fitout_lead_wd: 20,
            ..DurationConfig::default()
        };
        let milestones = MilestoneScheduler::new(&calendar, &durations).schedule(&gates());

        let finish = milestones.vertical_finish.expect("vertical finish");
        assert_eq!(milestones.mep_finish, Some(finish));
        let mep_start = milestones.mep_start.expect("mep start");
        assert_eq!(calendar.workdays_between(mep_start, finish), 40);
        assert_eq!(
            milestones.fitout_trigger,
            Some(calendar.add_workdays(mep_start, 20))
        );
    }

    #[test]
    fn missing_gate_propagates_as_undeterminable() {
        let calendar = WorkCalendar::without_holidays(Workweek::FiveDay);
        let durations = DurationConfig::default();
        let partial = GateSet {
            bp: None,
            ..gates()
        };
        let milestones = MilestoneScheduler::new(&calendar, &durations).schedule(&partial);

        assert!(milestones.civil_finish.is_some());
        assert_eq!(milestones.vertical_start, None);
        assert_eq!(milestones.dryin_date, None);
        assert_eq!(milestones.fitout_trigger, None);
    }
}
