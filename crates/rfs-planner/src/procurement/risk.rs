use chrono::NaiveDate;
use serde::Serialize;

pub const DEFAULT_RISK_WINDOW_DAYS: i64 = 30;

/// Urgency of issuing the purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStatus {
    Overdue,
    AtRisk,
    OnTrack,
}

impl ReleaseStatus {
    pub fn ordered() -> [Self; 3] {
        [Self::Overdue, Self::AtRisk, Self::OnTrack]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Overdue => "Overdue",
            Self::AtRisk => "At Risk",
            Self::OnTrack => "On Track",
        }
    }

    pub fn classify(release: Option<NaiveDate>, today: NaiveDate, window_days: i64) -> Option<Self> {
        let release = release?;
        let status = if release < today {
            Self::Overdue
        } else if (release - today).num_days() <= window_days {
            Self::AtRisk
        } else {
            Self::OnTrack
        };
        Some(status)
    }
}

/// Arrival on site relative to the required-on-job target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RojStatus {
    OnTime,
    AtRisk,
    Late,
}

pub const ROJ_LATE_AFTER_DAYS: i64 = 30;

impl RojStatus {
    pub fn ordered() -> [Self; 3] {
        [Self::Late, Self::AtRisk, Self::OnTime]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OnTime => "On Time",
            Self::AtRisk => "At Risk",
            Self::Late => "Late",
        }
    }

    pub fn classify(arrival: Option<NaiveDate>, target: Option<NaiveDate>) -> Option<Self> {
        let days_late = (arrival? - target?).num_days();
        let status = if days_late <= 0 {
            Self::OnTime
        } else if days_late <= ROJ_LATE_AFTER_DAYS {
            Self::AtRisk
        } else {
            Self::Late
        };
        Some(status)
    }
}
