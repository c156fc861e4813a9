use super::anchor::ReleaseAnchor;
use crate::planning::calendar::WorkCalendar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where a piece of equipment is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Shared building-wide; one row per building.
    House,
    /// Dedicated to a data hall; one row per hall.
    Hall,
}

impl Scope {
    pub const fn label(self) -> &'static str {
        match self {
            Self::House => "House",
            Self::Hall => "Hall",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "house" => Some(Self::House),
            "hall" => Some(Self::Hall),
            _ => None,
        }
    }
}

/// Historical procurement milestones for an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcurementHistory {
    pub po: Option<NaiveDate>,
    pub fab_start: Option<NaiveDate>,
    pub expected_ship: Option<NaiveDate>,
    pub delivered: Option<NaiveDate>,
}

impl ProcurementHistory {
    pub fn is_empty(&self) -> bool {
        self.po.is_none()
            && self.fab_start.is_none()
            && self.expected_ship.is_none()
            && self.delivered.is_none()
    }
}

pub const DEFAULT_SUBMITTALS_WD: i64 = 20;
pub const MIN_SUBMITTALS_WD: i64 = 15;
pub const MAX_SUBMITTALS_WD: i64 = 45;
pub const DEFAULT_SHIPPING_WD: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum LeadTimeModel {
    Single {
        lead_time_wd: u32,
    },
    Phased {
        submittals_wd: u32,
        manufacturing_wd: u32,
        shipping_wd: u32,
    },
    /// Phases measured from historical dates on the admin calendar.
    Historical(ProcurementHistory),
}

/// Lead time resolved against a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeadTimeBreakdown {
    pub submittals_wd: Option<i64>,
    pub manufacturing_wd: Option<i64>,
    pub shipping_wd: Option<i64>,
    pub total_wd: i64,
    /// PO + submittals + manufacturing + shipping, for historical items.
    pub modeled_arrival: Option<NaiveDate>,
}

impl LeadTimeBreakdown {
    pub fn weeks(&self) -> i64 {
        if self.total_wd <= 0 {
            0
        } else {
            (self.total_wd + 4) / 5
        }
    }
}

impl LeadTimeModel {
    pub fn resolve(&self, calendar: &WorkCalendar) -> LeadTimeBreakdown {
        match *self {
            LeadTimeModel::Single { lead_time_wd } => LeadTimeBreakdown {
                submittals_wd: None,
                manufacturing_wd: None,
                shipping_wd: None,
                total_wd: i64::from(lead_time_wd),
                modeled_arrival: None,
            },
            LeadTimeModel::Phased {
                submittals_wd,
                manufacturing_wd,
                shipping_wd,
            } => {
                let (s, m, sh) = (
                    i64::from(submittals_wd),
                    i64::from(manufacturing_wd),
                    i64::from(shipping_wd),
                );
                LeadTimeBreakdown {
                    submittals_wd: Some(s),
                    manufacturing_wd: Some(m),
                    shipping_wd: Some(sh),
                    total_wd: s + m + sh,
                    modeled_arrival: None,
                }
            }
            LeadTimeModel::Historical(history) => derive_from_history(&history, calendar),
        }
    }
}

fn derive_from_history(history: &ProcurementHistory, calendar: &WorkCalendar) -> LeadTimeBreakdown {
    let submittals = calendar
        .workdays_between_opt(history.po, history.fab_start)
        .unwrap_or(DEFAULT_SUBMITTALS_WD)
        .clamp(MIN_SUBMITTALS_WD, MAX_SUBMITTALS_WD);
    let manufacturing = calendar
        .workdays_between_opt(history.fab_start, history.expected_ship)
        .unwrap_or(0)
        .max(0);
    let shipping = calendar
        .workdays_between_opt(history.expected_ship, history.delivered)
        .unwrap_or(DEFAULT_SHIPPING_WD)
        .max(0);

    let modeled_arrival = calendar.shift(history.po, submittals + manufacturing + shipping);

    LeadTimeBreakdown {
        submittals_wd: Some(submittals),
        manufacturing_wd: Some(manufacturing),
        shipping_wd: Some(shipping),
        total_wd: submittals + manufacturing + shipping,
        modeled_arrival,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentTemplate {
    pub name: String,
    pub scope: Scope,
    pub buffer_wd_before_l3: u32,
    pub lead_time: LeadTimeModel,
    /// Optional explicit release model: named milestone plus offset.
    #[serde(default)]
    pub release_anchor: Option<ReleaseAnchor>,
}

/// Read-only equipment reference data for one scheduling run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentCatalog {
    templates: Vec<EquipmentTemplate>,
}

impl EquipmentCatalog {
    pub fn new(templates: Vec<EquipmentTemplate>) -> Self {
        Self { templates }
    }

    /// Built-in data hall equipment list with historical procurement dates.
    pub fn standard() -> Self {
        let templates = STANDARD_EQUIPMENT
            .iter()
            .map(|&(name, scope, po, fab, ship, delivered, buffer)| EquipmentTemplate {
                name: name.to_string(),
                scope,
                buffer_wd_before_l3: buffer,
                lead_time: LeadTimeModel::Historical(ProcurementHistory {
                    po: parse_catalog_date(po),
                    fab_start: parse_catalog_date(fab),
                    expected_ship: parse_catalog_date(ship),
                    delivered: parse_catalog_date(delivered),
                }),
                release_anchor: None,
            })
            .collect();
        Self { templates }
    }

    pub fn templates(&self) -> &[EquipmentTemplate] {
        &self.templates
    }

    pub fn templates_for_scope(&self, scope: Scope) -> Vec<&EquipmentTemplate> {
        self.templates
            .iter()
            .filter(|template| template.scope == scope)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Accepts `M/D/YYYY` as well as ISO `YYYY-MM-DD`.
pub(crate) fn parse_catalog_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(trimmed, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .ok()
}

type StandardRow = (&'static str, Scope, &'static str, &'static str, &'static str, &'static str, u32);

const STANDARD_EQUIPMENT: &[StandardRow] = &[
    ("Air Cooled Chiller", Scope::House, "10/1/2025", "10/23/2025", "4/30/2026", "5/20/2026", 30),
    ("Computer Room Air Conditioner", Scope::Hall, "8/11/2025", "9/1/2025", "3/23/2026", "4/13/2026", 15),
    ("Generator", Scope::House, "2/14/2025", "6/13/2025", "4/28/2026", "5/18/2026", 30),
    ("Main Switchboard", Scope::House, "8/4/2025", "8/25/2025", "2/23/2026", "3/16/2026", 30),
    ("Maintenance Bypass Board", Scope::House, "8/4/2025", "8/25/2025", "3/2/2026", "3/23/2026", 30),
    ("Mechanical Panels", Scope::House, "9/2/2025", "9/23/2025", "6/23/2026", "7/14/2026", 30),
    ("Modular Electrical Room", Scope::House, "8/11/2025", "11/10/2025", "7/21/2026", "7/27/2026", 30),
    ("Padmount Transformer", Scope::House, "6/17/2025", "7/8/2025", "12/9/2025", "1/20/2026", 30),
    ("Power Distribution Unit", Scope::Hall, "8/11/2025", "9/1/2025", "6/29/2026", "7/20/2026", 15),
    ("Static Transfer Switch", Scope::Hall, "8/11/2025", "9/1/2025", "5/4/2026", "5/25/2026", 15),
    ("Uninterruptible Power Supply", Scope::Hall, "8/11/2025", "9/1/2025", "6/16/2026", "6/30/2026", 15),
    ("UPS Battery Cabinet", Scope::Hall, "8/12/2025", "9/2/2025", "3/31/2026", "4/14/2026", 15),
    ("UPS Board", Scope::Hall, "8/4/2025", "8/25/2025", "3/16/2026", "4/6/2026", 15),
    ("UPS Board Reserve", Scope::Hall, "8/4/2025", "8/25/2025", "3/16/2026", "4/6/2026", 15),
];
