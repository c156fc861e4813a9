//! CSV import of custom equipment catalogs.
//!
//! Expected headers (order free, unknown columns ignored):
//! `Equipment, Scope, Buffer WD Before L3, Lead Time WD, Submittals WD,
//! Manufacturing WD, Shipping WD, PO, FabStart, ExpectedShip, Delivered,
//! Release Anchor, Release Offset WD`.
//!
//! A row's lead time comes from `Lead Time WD` when present, otherwise from
//! the three phase columns, otherwise from the historical dates.

use super::anchor::{MilestoneKey, ReleaseAnchor};
use super::catalog::{
    parse_catalog_date, EquipmentCatalog, EquipmentTemplate, LeadTimeModel, ProcurementHistory,
    Scope,
};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to read equipment catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid equipment catalog CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("equipment catalog row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Equipment")]
    equipment: String,
    #[serde(rename = "Scope")]
    scope: String,
    #[serde(rename = "Buffer WD Before L3", default, deserialize_with = "empty_string_as_none")]
    buffer_wd: Option<String>,
    #[serde(rename = "Lead Time WD", default, deserialize_with = "empty_string_as_none")]
    lead_time_wd: Option<String>,
    #[serde(rename = "Submittals WD", default, deserialize_with = "empty_string_as_none")]
    submittals_wd: Option<String>,
    #[serde(rename = "Manufacturing WD", default, deserialize_with = "empty_string_as_none")]
    manufacturing_wd: Option<String>,
    #[serde(rename = "Shipping WD", default, deserialize_with = "empty_string_as_none")]
    shipping_wd: Option<String>,
    #[serde(rename = "PO", default, deserialize_with = "empty_string_as_none")]
    po: Option<String>,
    #[serde(rename = "FabStart", default, deserialize_with = "empty_string_as_none")]
    fab_start: Option<String>,
    #[serde(rename = "ExpectedShip", default, deserialize_with = "empty_string_as_none")]
    expected_ship: Option<String>,
    #[serde(rename = "Delivered", default, deserialize_with = "empty_string_as_none")]
    delivered: Option<String>,
    #[serde(rename = "Release Anchor", default, deserialize_with = "empty_string_as_none")]
    release_anchor: Option<String>,
    #[serde(rename = "Release Offset WD", default, deserialize_with = "empty_string_as_none")]
    release_offset_wd: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

impl CatalogRow {
    fn into_template(self, row: usize) -> Result<EquipmentTemplate, CatalogImportError> {
        let invalid = |reason: String| CatalogImportError::InvalidRow { row, reason };

        let name = self.equipment.trim().to_string();
        if name.is_empty() {
            return Err(invalid("equipment name is empty".to_string()));
        }

        let scope = Scope::parse(&self.scope)
            .ok_or_else(|| invalid(format!("unknown scope '{}'", self.scope)))?;

        let buffer_wd_before_l3 = parse_count(self.buffer_wd.as_deref(), "Buffer WD Before L3")
            .map_err(invalid)?
            .unwrap_or(default_buffer(scope));

        let lead_time = self.lead_time_model().map_err(invalid)?;

        let release_anchor = match self.release_anchor.as_deref() {
            None => None,
            Some(key) => {
                let milestone = MilestoneKey::parse(key)
                    .ok_or_else(|| invalid(format!("unknown release anchor '{key}'")))?;
                let offset_wd = match self.release_offset_wd.as_deref() {
                    None => 0,
                    Some(raw) => raw
                        .trim()
                        .parse::<i64>()
                        .map_err(|_| invalid(format!("Release Offset WD '{raw}' is not an integer")))?,
                };
                Some(ReleaseAnchor {
                    milestone,
                    offset_wd,
                })
            }
        };

        Ok(EquipmentTemplate {
            name,
            scope,
            buffer_wd_before_l3,
            lead_time,
            release_anchor,
        })
    }

    fn lead_time_model(&self) -> Result<LeadTimeModel, String> {
        if let Some(lead_time_wd) = parse_count(self.lead_time_wd.as_deref(), "Lead Time WD")? {
            return Ok(LeadTimeModel::Single { lead_time_wd });
        }

        let phases = (
            parse_count(self.submittals_wd.as_deref(), "Submittals WD")?,
            parse_count(self.manufacturing_wd.as_deref(), "Manufacturing WD")?,
            parse_count(self.shipping_wd.as_deref(), "Shipping WD")?,
        );
        if let (Some(submittals_wd), Some(manufacturing_wd), Some(shipping_wd)) = phases {
            return Ok(LeadTimeModel::Phased {
                submittals_wd,
                manufacturing_wd,
                shipping_wd,
            });
        }

        let history = ProcurementHistory {
            po: parse_date(self.po.as_deref(), "PO")?,
            fab_start: parse_date(self.fab_start.as_deref(), "FabStart")?,
            expected_ship: parse_date(self.expected_ship.as_deref(), "ExpectedShip")?,
            delivered: parse_date(self.delivered.as_deref(), "Delivered")?,
        };
        if history.is_empty() {
            return Err("no lead time: expected Lead Time WD, all three phase columns, or historical dates".to_string());
        }
        Ok(LeadTimeModel::Historical(history))
    }
}

/// Buffers used by the built-in catalog when a row leaves the column blank.
fn default_buffer(scope: Scope) -> u32 {
    match scope {
        Scope::House => 30,
        Scope::Hall => 15,
    }
}

fn parse_count(value: Option<&str>, column: &str) -> Result<Option<u32>, String> {
    value
        .map(|raw| {
            raw.trim()
                .parse::<u32>()
                .map_err(|_| format!("{column} '{raw}' is not a non-negative integer"))
        })
        .transpose()
}

fn parse_date(value: Option<&str>, column: &str) -> Result<Option<chrono::NaiveDate>, String> {
    value
        .map(|raw| parse_catalog_date(raw).ok_or_else(|| format!("{column} '{raw}' is not a date")))
        .transpose()
}

impl EquipmentCatalog {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut templates = Vec::new();
        for (idx, result) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            // Header is line 1.
            let row = idx + 2;
            templates.push(result?.into_template(row)?);
        }

        info!(items = templates.len(), "imported equipment catalog");
        Ok(Self::new(templates))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn rows_pick_the_most_specific_lead_time_model() {
        let csv = "\
Equipment,Scope,Buffer WD Before L3,Lead Time WD,Submittals WD,Manufacturing WD,Shipping WD,PO,FabStart,ExpectedShip,Delivered
Generator,House,30,120,,,,,,,
UPS,hall,,,20,100,12,,,,
Chiller,House,25,,20,,,10/1/2025,10/23/2025,4/30/2026,5/20/2026
";
        let catalog = EquipmentCatalog::from_reader(csv.as_bytes()).expect("catalog imports");
        let templates = catalog.templates();

        assert_eq!(templates.len(), 3);
        assert_eq!(templates[0].lead_time, LeadTimeModel::Single { lead_time_wd: 120 });
        assert_eq!(templates[1].scope, Scope::Hall);
        assert_eq!(templates[1].buffer_wd_before_l3, 15);
        assert_eq!(
            templates[1].lead_time,
            LeadTimeModel::Phased {
                submittals_wd: 20,
                manufacturing_wd: 100,
                shipping_wd: 12
            }
        );
        // Incomplete phase columns fall through to the historical dates.
        match templates[2].lead_time {
            LeadTimeModel::Historical(history) => {
                assert_eq!(history.po, NaiveDate::from_ymd_opt(2025, 10, 1));
            }
            other => panic!("expected historical model, got {other:?}"),
        }
    }

    #[test]
    fn release_anchor_columns_are_optional() {
        let csv = "\
Equipment,Scope,Lead Time WD,Release Anchor,Release Offset WD
Switchboard,House,60,dryin,-10
Panels,House,40,,
";
        let catalog = EquipmentCatalog::from_reader(csv.as_bytes()).expect("catalog imports");
        assert_eq!(
            catalog.templates()[0].release_anchor,
            Some(ReleaseAnchor {
                milestone: MilestoneKey::Dryin,
                offset_wd: -10
            })
        );
        assert_eq!(catalog.templates()[1].release_anchor, None);
    }

    #[test]
    fn invalid_rows_report_their_line() {
        let csv = "\
Equipment,Scope,Lead Time WD
Generator,House,120
Busway,Roof,10
";
        let err = EquipmentCatalog::from_reader(csv.as_bytes()).expect_err("unknown scope");
        match err {
            CatalogImportError::InvalidRow { row, reason } => {
                assert_eq!(row, 3);
                assert!(reason.contains("Roof"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rows_without_any_lead_time_are_rejected() {
        let csv = "Equipment,Scope\nGenerator,House\n";
        let err = EquipmentCatalog::from_reader(csv.as_bytes()).expect_err("missing lead time");
        assert!(err.to_string().contains("no lead time"));
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        let err = EquipmentCatalog::from_path("/nonexistent/catalog.csv").expect_err("missing file");
        assert!(matches!(err, CatalogImportError::Io(_)));
    }
}
