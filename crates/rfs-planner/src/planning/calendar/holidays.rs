use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

/// Countries with a built-in public holiday rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Country {
    #[default]
    #[serde(rename = "US")]
    UnitedStates,
    #[serde(rename = "CA")]
    Canada,
    #[serde(rename = "GB")]
    UnitedKingdom,
}

impl Country {
    pub const fn ordered() -> [Self; 3] {
        [Self::UnitedStates, Self::Canada, Self::UnitedKingdom]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::UnitedStates => "US",
            Self::Canada => "CA",
            Self::UnitedKingdom => "GB",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UnitedStates => "United States (federal)",
            Self::Canada => "Canada (federal)",
            Self::UnitedKingdom => "United Kingdom (England & Wales)",
        }
    }

    /// Strict lookup; `None` for codes without a rule set.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "US" | "USA" => Some(Self::UnitedStates),
            "CA" | "CAN" => Some(Self::Canada),
            "GB" | "UK" | "GBR" => Some(Self::UnitedKingdom),
            _ => None,
        }
    }

    /// Lenient lookup used at the configuration boundary: unsupported codes
    /// resolve to the United States rule set.
    pub fn from_code(code: &str) -> Self {
        Self::parse(code).unwrap_or_else(|| {
            warn!(code, fallback = Self::default().code(), "unsupported holiday country");
            Self::default()
        })
    }

    fn rules(self) -> &'static [HolidayRule] {
        match self {
            Self::UnitedStates => US_RULES,
            Self::Canada => CA_RULES,
            Self::UnitedKingdom => GB_RULES,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum HolidayRule {
    /// Same month/day every year; weekend dates add an observed weekday.
    Fixed { month: u32, day: u32 },
    /// `nth` occurrence of `weekday` in `month`; `-1` selects the last one.
    NthWeekday { month: u32, weekday: Weekday, nth: i8 },
    /// Latest `weekday` falling on or before `month`/`day`.
    WeekdayOnOrBefore { month: u32, day: u32, weekday: Weekday },
    /// Signed calendar-day offset from Easter Sunday.
    Easter { offset_days: i64 },
}

const US_RULES: &[HolidayRule] = &[
    HolidayRule::Fixed { month: 1, day: 1 },
    HolidayRule::NthWeekday { month: 1, weekday: Weekday::Mon, nth: 3 },
    HolidayRule::NthWeekday { month: 2, weekday: Weekday::Mon, nth: 3 },
    HolidayRule::NthWeekday { month: 5, weekday: Weekday::Mon, nth: -1 },
    HolidayRule::Fixed { month: 6, day: 19 },
    HolidayRule::Fixed { month: 7, day: 4 },
    HolidayRule::NthWeekday { month: 9, weekday: Weekday::Mon, nth: 1 },
    HolidayRule::NthWeekday { month: 10, weekday: Weekday::Mon, nth: 2 },
    HolidayRule::Fixed { month: 11, day: 11 },
    HolidayRule::NthWeekday { month: 11, weekday: Weekday::Thu, nth: 4 },
    HolidayRule::Fixed { month: 12, day: 25 },
];

const CA_RULES: &[HolidayRule] = &[
    HolidayRule::Fixed { month: 1, day: 1 },
    HolidayRule::Easter { offset_days: -2 },
    HolidayRule::WeekdayOnOrBefore { month: 5, day: 24, weekday: Weekday::Mon },
    HolidayRule::Fixed { month: 7, day: 1 },
    HolidayRule::NthWeekday { month: 9, weekday: Weekday::Mon, nth: 1 },
    HolidayRule::NthWeekday { month: 10, weekday: Weekday::Mon, nth: 2 },
    HolidayRule::Fixed { month: 11, day: 11 },
    HolidayRule::Fixed { month: 12, day: 25 },
    HolidayRule::Fixed { month: 12, day: 26 },
];

const GB_RULES: &[HolidayRule] = &[
    HolidayRule::Fixed { month: 1, day: 1 },
    HolidayRule::Easter { offset_days: -2 },
    HolidayRule::Easter { offset_days: 1 },
    HolidayRule::NthWeekday { month: 5, weekday: Weekday::Mon, nth: 1 },
    HolidayRule::NthWeekday { month: 5, weekday: Weekday::Mon, nth: -1 },
    HolidayRule::NthWeekday { month: 8, weekday: Weekday::Mon, nth: -1 },
    HolidayRule::Fixed { month: 12, day: 25 },
    HolidayRule::Fixed { month: 12, day: 26 },
];

impl HolidayRule {
    fn dates(&self, year: i32) -> Vec<NaiveDate> {
        match *self {
            HolidayRule::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day)
                .map(with_observed)
                .unwrap_or_default(),
            HolidayRule::NthWeekday {
                month,
                weekday,
                nth,
            } => nth_weekday_of_month(year, month, weekday, nth)
                .into_iter()
                .collect(),
            HolidayRule::WeekdayOnOrBefore {
                month,
                day,
                weekday,
            } => NaiveDate::from_ymd_opt(year, month, day)
                .map(|anchor| {
                    let back = (7 + anchor.weekday().num_days_from_monday()
                        - weekday.num_days_from_monday())
                        % 7;
                    anchor - Duration::days(i64::from(back))
                })
                .into_iter()
                .collect(),
            HolidayRule::Easter { offset_days } => easter_sunday(year)
                .map(|easter| easter + Duration::days(offset_days))
                .into_iter()
                .collect(),
        }
    }
}

/// Calendar date plus its observed weekday when it lands on a weekend.
fn with_observed(date: NaiveDate) -> Vec<NaiveDate> {
    match date.weekday() {
        Weekday::Sat => vec![date, date - Duration::days(1)],
        Weekday::Sun => vec![date, date + Duration::days(1)],
        _ => vec![date],
    }
}

fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, nth: i8) -> Option<NaiveDate> {
    if nth > 0 {
        return NaiveDate::from_weekday_of_month_opt(year, month, weekday, nth as u8);
    }

    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = first_of_next.pred_opt()?;
    let back = (7 + last.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    Some(last - Duration::days(i64::from(back)))
}

/// Easter Sunday for a Gregorian year (anonymous Gregorian algorithm).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Union of every holiday (and observed weekday) for `country` across `years`.
pub fn holidays_for_years<I>(country: Country, years: I) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = i32>,
{
    let mut holidays = BTreeSet::new();
    for year in years {
        for rule in country.rules() {
            holidays.extend(rule.dates(year));
        }
    }
    holidays
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn easter_matches_known_years() {
        assert_eq!(easter_sunday(2024), Some(date(2024, 3, 31)));
        assert_eq!(easter_sunday(2025), Some(date(2025, 4, 20)));
        assert_eq!(easter_sunday(2026), Some(date(2026, 4, 5)));
        assert_eq!(easter_sunday(2038), Some(date(2038, 4, 25)));
    }

    #[test]
    fn us_floating_holidays_resolve_for_2025() {
        let holidays = holidays_for_years(Country::UnitedStates, [2025]);
        assert!(holidays.contains(&date(2025, 1, 20)), "MLK day");
        assert!(holidays.contains(&date(2025, 2, 17)), "Presidents day");
        assert!(holidays.contains(&date(2025, 5, 26)), "Memorial day");
        assert!(holidays.contains(&date(2025, 9, 1)), "Labor day");
        assert!(holidays.contains(&date(2025, 10, 13)), "Columbus day");
        assert!(holidays.contains(&date(2025, 11, 27)), "Thanksgiving");
    }

    #[test]
    fn weekend_fixed_holidays_add_observed_weekday() {
        let holidays = holidays_for_years(Country::UnitedStates, [2026, 2027]);
        // July 4th 2026 is a Saturday, observed Friday the 3rd.
        assert!(holidays.contains(&date(2026, 7, 4)));
        assert!(holidays.contains(&date(2026, 7, 3)));
        // Christmas 2027 and Juneteenth 2027 both fall on a Saturday.
        assert!(holidays.contains(&date(2027, 12, 24)));
        assert!(holidays.contains(&date(2027, 6, 18)));

        let holidays = holidays_for_years(Country::UnitedStates, [2033]);
        // June 19th 2033 is a Sunday, observed Monday the 20th.
        assert!(holidays.contains(&date(2033, 6, 20)));
    }

    #[test]
    fn canada_uses_easter_and_victoria_day() {
        let holidays = holidays_for_years(Country::Canada, [2025]);
        assert!(holidays.contains(&date(2025, 4, 18)), "Good Friday");
        assert!(holidays.contains(&date(2025, 5, 19)), "Victoria Day");
        assert!(holidays.contains(&date(2025, 7, 1)), "Canada Day");
        assert!(!holidays.contains(&date(2025, 7, 4)));
    }

    #[test]
    fn united_kingdom_bank_holidays() {
        let holidays = holidays_for_years(Country::UnitedKingdom, [2025]);
        assert!(holidays.contains(&date(2025, 4, 21)), "Easter Monday");
        assert!(holidays.contains(&date(2025, 5, 5)), "Early May");
        assert!(holidays.contains(&date(2025, 5, 26)), "Spring");
        assert!(holidays.contains(&date(2025, 8, 25)), "Summer");
    }

    #[test]
    fn unknown_country_codes_fall_back_to_default() {
        assert_eq!(Country::parse("zz"), None);
        assert_eq!(Country::from_code("zz"), Country::UnitedStates);
        assert_eq!(Country::from_code(" uk "), Country::UnitedKingdom);
    }

    #[test]
    fn multi_year_union_covers_each_year() {
        let holidays = holidays_for_years(Country::UnitedStates, 2025..=2026);
        assert!(holidays.contains(&date(2025, 12, 25)));
        assert!(holidays.contains(&date(2026, 12, 25)));
        assert!(holidays.iter().all(|d| (2024..=2027).contains(&d.year())));
    }
}
