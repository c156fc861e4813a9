use crate::planning::calendar::WorkCalendar;
use crate::planning::{Building, Hall};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Schedule milestones a release plan may be pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKey {
    Ntp,
    Ldp,
    Bp,
    PermPower,
    TempPower,
    CivilStart,
    CivilFinish,
    ShellStart,
    ShellFinish,
    Dryin,
    MepStart,
    MepFinish,
    FitoutStart,
    FitoutFinish,
    L3Start,
    PowerGate,
}

impl MilestoneKey {
    pub fn parse(value: &str) -> Option<Self> {
        let key = match value.trim().to_ascii_lowercase().as_str() {
            "ntp" => Self::Ntp,
            "ldp" => Self::Ldp,
            "bp" => Self::Bp,
            "perm_power" | "permanent_power" => Self::PermPower,
            "temp_power" | "temporary_power" => Self::TempPower,
            "civil_start" => Self::CivilStart,
            "civil_finish" => Self::CivilFinish,
            "shell_start" | "vertical_start" => Self::ShellStart,
            "shell_finish" | "vertical_finish" => Self::ShellFinish,
            "dryin" | "dry_in" => Self::Dryin,
            "mep_start" => Self::MepStart,
            "mep_finish" => Self::MepFinish,
            "fitout_start" | "fitup_start" | "hall_fit_start" => Self::FitoutStart,
            "fitout_finish" | "fitup_finish" | "hall_fit_finish" => Self::FitoutFinish,
            "l3_start" | "hall_l3_start" => Self::L3Start,
            "power_gate" => Self::PowerGate,
            _ => return None,
        };
        Some(key)
    }

    /// Resolves the milestone for a building, or for one of its halls when
    /// the key is hall-specific. House-scope lookups of hall milestones use
    /// the first hall.
    pub fn resolve(self, building: &Building, hall: Option<&Hall>) -> Option<NaiveDate> {
        let hall = hall.or_else(|| building.halls.first());
        match self {
            Self::Ntp => building.gates.ntp,
            Self::Ldp => building.gates.ldp,
            Self::Bp => building.gates.bp,
            Self::PermPower => building.gates.perm_power,
            Self::TempPower => building.gates.temp_power,
            Self::CivilStart => building.civil_start,
            Self::CivilFinish => building.civil_finish,
            Self::ShellStart => building.vertical_start,
            Self::ShellFinish => building.vertical_finish,
            Self::Dryin => building.dryin_date,
            Self::MepStart => building.mep_start,
            Self::MepFinish => building.mep_finish,
            Self::FitoutStart => hall.and_then(|h| h.fitout_start),
            Self::FitoutFinish => hall.and_then(|h| h.fitout_finish),
            Self::L3Start => hall.and_then(|h| h.l3_start),
            Self::PowerGate => hall.and_then(|h| h.power_gate),
        }
    }
}

/// Release pinned to a named milestone plus a signed working-day offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAnchor {
    pub milestone: MilestoneKey,
    #[serde(default)]
    pub offset_wd: i64,
}

impl ReleaseAnchor {
    pub fn release_date(
        &self,
        calendar: &WorkCalendar,
        building: &Building,
        hall: Option<&Hall>,
    ) -> Option<NaiveDate> {
        calendar.shift(self.milestone.resolve(building, hall), self.offset_wd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::calendar::Workweek;
    use crate::planning::{BuildingScheduler, DurationConfig, GateSet, HallPlan};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn building(calendar: &WorkCalendar) -> Building {
        let durations = DurationConfig::default();
        let plan = HallPlan {
            hall_count: 2,
            ..HallPlan::default()
        };
        let gates = GateSet {
            ntp: Some(date(2025, 1, 15)),
            ldp: Some(date(2025, 2, 1)),
            bp: Some(date(2025, 5, 1)),
            perm_power: Some(date(2025, 12, 1)),
            temp_power: None,
        };
        BuildingScheduler::new(calendar, &durations, &plan).schedule("Building A", gates)
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!(MilestoneKey::parse("Permanent_Power"), Some(MilestoneKey::PermPower));
        assert_eq!(MilestoneKey::parse(" fitup_start "), Some(MilestoneKey::FitoutStart));
        assert_eq!(MilestoneKey::parse("hall_l3_start"), Some(MilestoneKey::L3Start));
        assert_eq!(MilestoneKey::parse("topping_out"), None);
    }

    #[test]
    fn hall_milestones_fall_back_to_first_hall() {
        let calendar = WorkCalendar::without_holidays(Workweek::FiveDay);
        let building = building(&calendar);
        let second = &building.halls[1];

        assert_eq!(
            MilestoneKey::L3Start.resolve(&building, None),
            building.halls[0].l3_start
        );
        assert_eq!(
            MilestoneKey::L3Start.resolve(&building, Some(second)),
            second.l3_start
        );
        assert_eq!(MilestoneKey::Dryin.resolve(&building, Some(second)), building.dryin_date);
    }

    #[test]
    fn release_date_applies_signed_offset() {
        let calendar = WorkCalendar::without_holidays(Workweek::FiveDay);
        let building = building(&calendar);
        let anchor = ReleaseAnchor {
            milestone: MilestoneKey::Bp,
            offset_wd: -5,
        };
        // 2025-05-01 is a Thursday.
        assert_eq!(
            anchor.release_date(&calendar, &building, None),
            Some(date(2025, 4, 24))
        );

        let missing = ReleaseAnchor {
            milestone: MilestoneKey::TempPower,
            offset_wd: 0,
        };
        assert_eq!(missing.release_date(&calendar, &building, None), None);
    }
}
