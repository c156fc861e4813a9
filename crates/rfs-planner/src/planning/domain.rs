use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Absolute gate dates for one building. Any gate may still be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSet {
    pub ntp: Option<NaiveDate>,
    pub ldp: Option<NaiveDate>,
    pub bp: Option<NaiveDate>,
    pub perm_power: Option<NaiveDate>,
    #[serde(default)]
    pub temp_power: Option<NaiveDate>,
}

impl GateSet {
    /// Moves every known gate by `days` calendar days. A gate pushed outside
    /// the representable date range becomes unknown.
    pub fn shifted(&self, days: i64) -> Self {
        let delta = Duration::try_days(days);
        let shift = |date: Option<NaiveDate>| date?.checked_add_signed(delta?);
        Self {
            ntp: shift(self.ntp),
            ldp: shift(self.ldp),
            bp: shift(self.bp),
            perm_power: shift(self.perm_power),
            temp_power: shift(self.temp_power),
        }
    }

    /// Gate that L3/L4 commissioning waits for.
    pub fn commissioning_power(&self, allow_temp_power: bool) -> Option<NaiveDate> {
        match (allow_temp_power, self.temp_power) {
            (true, Some(temp)) => Some(temp),
            _ => self.perm_power,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationPreset {
    #[default]
    Typical,
    Aggressive,
    Conservative,
}

impl DurationPreset {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Typical => "Typical",
            Self::Aggressive => "Aggressive (-10%)",
            Self::Conservative => "Conservative (+15%)",
        }
    }

    /// Percentage applied to the base durations.
    pub const fn scale_pct(self) -> u32 {
        match self {
            Self::Typical => 100,
            Self::Aggressive => 90,
            Self::Conservative => 115,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "typical" => Some(Self::Typical),
            "aggressive" => Some(Self::Aggressive),
            "conservative" => Some(Self::Conservative),
            _ => None,
        }
    }
}

/// Working-day durations for every scheduled phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationConfig {
    pub site_work_wd: u32,
    pub vertical_wd: u32,
    /// Dry-in point inside vertical construction, in whole percent.
    pub dryin_pct: u32,
    /// Enables the separate MEP yard variant when set.
    pub mep_yard_wd: Option<u32>,
    pub mep_fitout_lead_wd: u32,
    pub fitout_wd: u32,
    pub l3_wd: u32,
    pub l4_wd: u32,
    pub l5_wd: u32,
}

const BASE_SITE_WORK_WD: u32 = 60;
const BASE_VERTICAL_WD: u32 = 160;
const BASE_FITOUT_WD: u32 = 60;
const BASE_L3_WD: u32 = 40;
const BASE_L4_WD: u32 = 10;
const BASE_L5_WD: u32 = 3;
const DEFAULT_DRYIN_PCT: u32 = 60;

fn default_mep_fitout_lead_wd() -> u32 {
    20
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self::from_preset(DurationPreset::Typical)
    }
}

impl DurationConfig {
    pub fn from_preset(preset: DurationPreset) -> Self {
        let scale = preset.scale_pct();
        Self {
            site_work_wd: scale_round(BASE_SITE_WORK_WD, scale),
            vertical_wd: scale_round(BASE_VERTICAL_WD, scale),
            dryin_pct: DEFAULT_DRYIN_PCT,
            mep_yard_wd: None,
            mep_fitout_lead_wd: default_mep_fitout_lead_wd(),
            fitout_wd: scale_round(BASE_FITOUT_WD, scale),
            l3_wd: scale_round(BASE_L3_WD, scale),
            l4_wd: scale_round(BASE_L4_WD, scale),
            l5_wd: scale_round(BASE_L5_WD, scale).max(1),
        }
    }

    /// Working days from vertical start to dry-in; at least one, and short
    /// of vertical finish whenever vertical construction spans two days.
    pub fn dryin_wd(&self) -> u32 {
        let dryin = scale_round(self.vertical_wd, self.dryin_pct).max(1);
        if self.vertical_wd >= 2 {
            dryin.min(self.vertical_wd - 1)
        } else {
            dryin
        }
    }
}

/// `value * pct / 100` rounded half up, in integer arithmetic.
fn scale_round(value: u32, pct: u32) -> u32 {
    let scaled = (u64::from(value) * u64::from(pct) + 50) / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Hall count and placement constraints for the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HallPlan {
    pub hall_count: usize,
    /// Calendar days between consecutive hall fitout starts; `0` uses the default.
    pub cadence_days: u32,
    /// Maximum halls between fitout start and RFS at once; `None`/`0` is unlimited.
    pub max_parallel: Option<usize>,
    pub allow_temp_power: bool,
}

pub const DEFAULT_CADENCE_DAYS: u32 = 60;

/// Calendar days between the fitout trigger and hall 1's earliest start.
pub const FIRST_HALL_DELAY_DAYS: i64 = 15;

impl Default for HallPlan {
    fn default() -> Self {
        Self {
            hall_count: 4,
            cadence_days: 90,
            max_parallel: None,
            allow_temp_power: false,
        }
    }
}

impl HallPlan {
    pub fn effective_cadence_days(&self) -> i64 {
        if self.cadence_days > 0 {
            i64::from(self.cadence_days)
        } else {
            i64::from(DEFAULT_CADENCE_DAYS)
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.max_parallel.filter(|cap| *cap > 0)
    }
}

/// Phase categories used by timeline consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    SiteWork,
    Shell,
    MepYard,
    Fitout,
    L3,
    L4,
    L5,
}

impl Phase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SiteWork => "Site Work",
            Self::Shell => "Shell",
            Self::MepYard => "MEP Yard",
            Self::Fitout => "Fitout",
            Self::L3 => "L3",
            Self::L4 => "L4",
            Self::L5 => "L5",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_scale_base_durations() {
        let typical = DurationConfig::from_preset(DurationPreset::Typical);
        assert_eq!(typical.vertical_wd, 160);
        assert_eq!(typical.l5_wd, 3);

        let aggressive = DurationConfig::from_preset(DurationPreset::Aggressive);
        assert_eq!(aggressive.site_work_wd, 54);
        assert_eq!(aggressive.vertical_wd, 144);
        assert_eq!(aggressive.l4_wd, 9);
        assert_eq!(aggressive.l5_wd, 3);

        let conservative = DurationConfig::from_preset(DurationPreset::Conservative);
        assert_eq!(conservative.site_work_wd, 69);
        assert_eq!(conservative.vertical_wd, 184);
        assert_eq!(conservative.l3_wd, 46);
    }

    #[test]
    fn dryin_is_at_least_one_day() {
        let mut durations = DurationConfig::default();
        assert_eq!(durations.dryin_wd(), 96);
        durations.vertical_wd = 1;
        durations.dryin_pct = 10;
        assert_eq!(durations.dryin_wd(), 1);
    }

    #[test]
    fn dryin_stays_inside_vertical_span() {
        let mut durations = DurationConfig::default();
        durations.dryin_pct = 150;
        assert_eq!(durations.dryin_wd(), 159);
        durations.dryin_pct = 100;
        assert_eq!(durations.dryin_wd(), 159);
        durations.vertical_wd = 2;
        assert_eq!(durations.dryin_wd(), 1);
    }

    #[test]
    fn scaling_large_values_saturates() {
        assert_eq!(scale_round(u32::MAX, 100), u32::MAX);
        assert_eq!(scale_round(u32::MAX, 200), u32::MAX);
    }

    #[test]
    fn shifted_gates_keep_missing_values() {
        let gates = GateSet {
            ntp: NaiveDate::from_ymd_opt(2025, 1, 15),
            ..GateSet::default()
        };
        let shifted = gates.shifted(30);
        assert_eq!(shifted.ntp, NaiveDate::from_ymd_opt(2025, 2, 14));
        assert_eq!(shifted.bp, None);
    }

    #[test]
    fn shifting_out_of_range_leaves_gates_unknown() {
        let gates = GateSet {
            ntp: NaiveDate::from_ymd_opt(2025, 1, 15),
            ..GateSet::default()
        };
        assert_eq!(gates.shifted(i64::MAX / 2).ntp, None);
        assert_eq!(gates.shifted(-(i64::MAX / 2)).ntp, None);
    }

    #[test]
    fn temp_power_only_used_when_allowed() {
        let gates = GateSet {
            perm_power: NaiveDate::from_ymd_opt(2025, 12, 1),
            temp_power: NaiveDate::from_ymd_opt(2025, 9, 1),
            ..GateSet::default()
        };
        assert_eq!(gates.commissioning_power(false), gates.perm_power);
        assert_eq!(gates.commissioning_power(true), gates.temp_power);
        let no_temp = GateSet {
            temp_power: None,
            ..gates
        };
        assert_eq!(no_temp.commissioning_power(true), gates.perm_power);
    }

    #[test]
    fn zero_capacity_means_unlimited() {
        let plan = HallPlan {
            max_parallel: Some(0),
            cadence_days: 0,
            ..HallPlan::default()
        };
        assert_eq!(plan.capacity(), None);
        assert_eq!(plan.effective_cadence_days(), 60);
    }
}
