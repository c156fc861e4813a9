use crate::planning::KeyMilestone;
use chrono::NaiveDate;
use serde::Serialize;

/// Hall RFS table row.
#[derive(Debug, Clone, Serialize)]
pub struct HallRowView {
    #[serde(rename = "Building Name")]
    pub building_name: String,
    #[serde(rename = "Hall")]
    pub hall: usize,
    #[serde(rename = "MW per Hall")]
    pub mw_per_hall: f64,
    #[serde(rename = "Fitout Start")]
    pub fitout_start: Option<NaiveDate>,
    #[serde(rename = "Fitout Finish")]
    pub fitout_finish: Option<NaiveDate>,
    #[serde(rename = "L3 Start")]
    pub l3_start: Option<NaiveDate>,
    #[serde(rename = "L4 Finish")]
    pub l4_finish: Option<NaiveDate>,
    #[serde(rename = "RFS (L5 Finish)")]
    pub rfs: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildingSummary {
    pub name: String,
    pub key_milestones: Vec<KeyMilestone>,
    pub first_rfs: Option<NaiveDate>,
    pub final_rfs: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteSummary {
    pub today: NaiveDate,
    pub buildings: Vec<BuildingSummary>,
    pub hall_count: usize,
    /// Latest RFS across the site; absent while any hall is undeterminable.
    pub site_rfs: Option<NaiveDate>,
    pub release_status: Vec<StatusCount>,
    pub roj_status: Vec<StatusCount>,
}
