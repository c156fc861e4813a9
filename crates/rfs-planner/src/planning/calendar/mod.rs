//! Working-day arithmetic over a country holiday set.
//!
//! Every stepping operation is a day-by-day simulation so irregular holiday
//! spacing is absorbed exactly; cost is linear in the number of calendar days
//! scanned. Absent dates are modelled as `Option<NaiveDate>` and propagate
//! through [`WorkCalendar::shift`], [`latest`] and [`clamp`] as `None`.

mod holidays;

pub use holidays::{easter_sunday, holidays_for_years, Country};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Number of working days in a week. Sunday is never a working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Workweek {
    #[default]
    FiveDay,
    SixDay,
}

impl Workweek {
    pub fn from_length(days: u8) -> Option<Self> {
        match days {
            5 => Some(Self::FiveDay),
            6 => Some(Self::SixDay),
            _ => None,
        }
    }

    pub const fn length(self) -> u8 {
        match self {
            Self::FiveDay => 5,
            Self::SixDay => 6,
        }
    }

    pub fn is_weekend(self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Sun => true,
            Weekday::Sat => self == Self::FiveDay,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkCalendar {
    country: Country,
    workweek: Workweek,
    holidays: BTreeSet<NaiveDate>,
}

impl WorkCalendar {
    /// Builds a calendar from the country's holiday rules for `years`.
    pub fn new<I>(country: Country, workweek: Workweek, years: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        Self {
            country,
            workweek,
            holidays: holidays_for_years(country, years),
        }
    }

    /// Calendar with weekends only.
    pub fn without_holidays(workweek: Workweek) -> Self {
        Self {
            country: Country::default(),
            workweek,
            holidays: BTreeSet::new(),
        }
    }

    /// Same holiday set, different weekend rule.
    pub fn with_workweek(&self, workweek: Workweek) -> Self {
        Self {
            workweek,
            ..self.clone()
        }
    }

    pub fn with_extra_holidays<I>(mut self, dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.holidays.extend(dates);
        self
    }

    pub fn country(&self) -> Country {
        self.country
    }

    pub fn workweek(&self) -> Workweek {
        self.workweek
    }

    pub fn holidays(&self) -> &BTreeSet<NaiveDate> {
        &self.holidays
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.workweek.is_weekend(date.weekday()) && !self.is_holiday(date)
    }

    /// Steps `days` working days from `start`; negative values step backwards.
    /// The start date itself is never counted, and `0` returns `start`.
    pub fn add_workdays(&self, start: NaiveDate, days: i64) -> NaiveDate {
        let step = Duration::days(days.signum());
        let mut remaining = days.unsigned_abs();
        let mut current = start;

        while remaining > 0 {
            current += step;
            if self.is_working_day(current) {
                remaining -= 1;
            }
        }

        current
    }

    /// [`add_workdays`](Self::add_workdays) lifted over an optional start.
    pub fn shift(&self, start: Option<NaiveDate>, days: i64) -> Option<NaiveDate> {
        start.map(|date| self.add_workdays(date, days))
    }

    /// Working days crossed while walking from `from` to `to`, excluding
    /// `from` and including `to`. Negative when `to` precedes `from`.
    pub fn workdays_between(&self, from: NaiveDate, to: NaiveDate) -> i64 {
        let (step, sign) = if to >= from {
            (Duration::days(1), 1)
        } else {
            (Duration::days(-1), -1)
        };

        let mut count = 0;
        let mut current = from;
        while current != to {
            current += step;
            if self.is_working_day(current) {
                count += sign;
            }
        }
        count
    }

    pub fn workdays_between_opt(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Option<i64> {
        Some(self.workdays_between(from?, to?))
    }
}

/// Bounds `date` into `[low, high]`; absent bounds are not enforced.
pub fn clamp(
    date: Option<NaiveDate>,
    low: Option<NaiveDate>,
    high: Option<NaiveDate>,
) -> Option<NaiveDate> {
    let mut date = date?;
    if let Some(low) = low {
        date = date.max(low);
    }
    if let Some(high) = high {
        date = date.min(high);
    }
    Some(date)
}

/// Max-merge of two dependencies; undeterminable if either one is.
pub fn latest(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    Some(a?.max(b?))
}

/// Earliest of the dates that are present.
pub fn earliest_present<I>(dates: I) -> Option<NaiveDate>
where
    I: IntoIterator<Item = Option<NaiveDate>>,
{
    dates.into_iter().flatten().min()
}
