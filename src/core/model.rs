// LeadSweep - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;

use crate::util::constants;
use crate::util::error::ConfigError;

// =============================================================================
// Region
// =============================================================================

/// Geographic bucket used for owner routing.
///
/// Variant order is the classifier's priority order; `UsEast` is last because
/// it is the fallback and never matched by triggers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Region {
    #[serde(rename = "APAC")]
    Apac,
    #[serde(rename = "EURO")]
    Euro,
    #[serde(rename = "EMEA")]
    Emea,
    #[serde(rename = "US-West")]
    UsWest,
    #[default]
    #[serde(rename = "US-East")]
    UsEast,
}

impl Region {
    /// Number of regions.
    pub const COUNT: usize = 5;

    /// The fallback region for absent or unmatched locations.
    pub const DEFAULT: Region = Region::UsEast;

    /// Returns all variants in priority order.
    pub fn all() -> &'static [Region] {
        &[
            Region::Apac,
            Region::Euro,
            Region::Emea,
            Region::UsWest,
            Region::UsEast,
        ]
    }

    /// Label used in output files and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Region::Apac => "APAC",
            Region::Euro => "EURO",
            Region::Emea => "EMEA",
            Region::UsWest => "US-West",
            Region::UsEast => "US-East",
        }
    }

    /// Position in `Region::all()`, used to index fixed-size per-region tables.
    pub fn index(&self) -> usize {
        match self {
            Region::Apac => 0,
            Region::Euro => 1,
            Region::Emea => 2,
            Region::UsWest => 3,
            Region::UsEast => 4,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Region {
    type Err = ConfigError;

    /// Case-insensitive; `-`, `_` and spaces are ignored so "US-West",
    /// "us_west" and "uswest" are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "apac" => Ok(Region::Apac),
            "euro" => Ok(Region::Euro),
            "emea" => Ok(Region::Emea),
            "uswest" => Ok(Region::UsWest),
            "useast" => Ok(Region::UsEast),
            _ => Err(ConfigError::UnknownRegion {
                value: s.to_string(),
            }),
        }
    }
}

// =============================================================================
// Per-region tables
// =============================================================================

/// Region → owner identifier. An empty identifier means "unassigned".
///
/// Stored as a fixed array so iteration order never depends on hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerMapping {
    owners: [String; Region::COUNT],
}

impl OwnerMapping {
    /// Set the owner for a region. The identifier is trimmed.
    pub fn set(&mut self, region: Region, owner_id: &str) {
        self.owners[region.index()] = owner_id.trim().to_string();
    }

    /// Builder form of [`OwnerMapping::set`].
    pub fn with(mut self, region: Region, owner_id: &str) -> Self {
        self.set(region, owner_id);
        self
    }

    /// Owner for `region`, or an empty string if none is configured.
    pub fn owner_for(&self, region: Region) -> &str {
        &self.owners[region.index()]
    }

    /// Regions that have no owner configured.
    pub fn unassigned(&self) -> Vec<Region> {
        Region::all()
            .iter()
            .copied()
            .filter(|r| self.owner_for(*r).is_empty())
            .collect()
    }
}

/// Lead count per region, zero-filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionCounts {
    counts: [usize; Region::COUNT],
}

impl RegionCounts {
    pub fn increment(&mut self, region: Region) {
        self.counts[region.index()] += 1;
    }

    pub fn get(&self, region: Region) -> usize {
        self.counts[region.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(region, count)` pairs in priority order, including zeros.
    pub fn iter(&self) -> impl Iterator<Item = (Region, usize)> + '_ {
        Region::all().iter().map(move |r| (*r, self.get(*r)))
    }
}

impl Serialize for RegionCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Region::COUNT))?;
        for (region, count) in self.iter() {
            map.serialize_entry(region.label(), &count)?;
        }
        map.end()
    }
}

// =============================================================================
// Lead records
// =============================================================================

/// A retained input row bound to its roles.
///
/// Produced once at the boundary from the schema-less `Table`; every later
/// stage works on these instead of raw columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRecord {
    /// Zero-based data row index in the input table.
    pub row: usize,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
    /// Free-text country/region field used for classification.
    pub location: Option<String>,
}

impl LeadRecord {
    /// Name of the first critical field (first name, last name, company)
    /// that is null, if any.
    pub fn missing_critical_field(&self) -> Option<&'static str> {
        if self.first_name.is_none() {
            Some("FirstName")
        } else if self.last_name.is_none() {
            Some("LastName")
        } else if self.company.is_none() {
            Some("Company")
        } else {
            None
        }
    }
}

/// A lead after region classification and owner assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLead {
    pub record: LeadRecord,
    pub region: Region,
    /// Empty when the region has no owner configured.
    pub owner_id: String,
}

impl ClassifiedLead {
    /// Build the CRM output row. Null optional fields become empty strings.
    pub fn to_crm(&self, campaign: &str) -> CrmLead {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        CrmLead {
            first_name: text(&self.record.first_name),
            last_name: text(&self.record.last_name),
            company: text(&self.record.company),
            email: text(&self.record.email),
            title: text(&self.record.title),
            source: constants::LEAD_SOURCE.to_string(),
            campaign: campaign.to_string(),
            status: constants::LEAD_STATUS.to_string(),
            region: self.region,
            owner_id: self.owner_id.clone(),
        }
    }
}

/// One row of the CRM import file. Field order and names are the output
/// contract (see `constants::OUTPUT_COLUMNS`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrmLead {
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Campaign")]
    pub campaign: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Region")]
    pub region: Region,
    #[serde(rename = "OwnerId")]
    pub owner_id: String,
}

// =============================================================================
// Run summary
// =============================================================================

/// Audit figures for a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Data rows in the input table.
    pub input_rows: usize,

    /// Rows removed by the exclusion filter.
    pub excluded_count: usize,

    /// Distinct excluded organization names, first-seen order.
    pub excluded_companies: Vec<String>,

    /// Rows left after the exclusion filter.
    pub retained_count: usize,

    /// Region distribution over the retained rows, before the
    /// critical-field gate.
    pub region_counts: RegionCounts,

    /// Rows dropped for a null first name, last name or company.
    pub dropped_incomplete: usize,

    /// Rows written to the output.
    pub final_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LeadRecord {
        LeadRecord {
            row: 0,
            first_name: Some("Jo".to_string()),
            last_name: Some("Lee".to_string()),
            company: Some("Acme Biotech".to_string()),
            email: None,
            title: Some("CSO".to_string()),
            location: Some("Singapore".to_string()),
        }
    }

    #[test]
    fn test_region_from_str_accepts_label_variants() {
        assert_eq!("US-West".parse::<Region>().unwrap(), Region::UsWest);
        assert_eq!("us_east".parse::<Region>().unwrap(), Region::UsEast);
        assert_eq!(" apac ".parse::<Region>().unwrap(), Region::Apac);
        assert_eq!("Euro".parse::<Region>().unwrap(), Region::Euro);
        assert!("LATAM".parse::<Region>().is_err());
    }

    #[test]
    fn test_region_index_matches_all_order() {
        for (i, region) in Region::all().iter().enumerate() {
            assert_eq!(region.index(), i);
        }
        assert_eq!(Region::default(), Region::DEFAULT);
    }

    #[test]
    fn test_owner_mapping_defaults_to_unassigned() {
        let owners = OwnerMapping::default().with(Region::Apac, "  005A1 ");
        assert_eq!(owners.owner_for(Region::Apac), "005A1");
        assert_eq!(owners.owner_for(Region::Emea), "");
        assert_eq!(owners.unassigned().len(), 4);
    }

    #[test]
    fn test_region_counts_serialise_zero_filled_in_priority_order() {
        let mut counts = RegionCounts::default();
        counts.increment(Region::Emea);
        counts.increment(Region::Emea);
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(
            json,
            r#"{"APAC":0,"EURO":0,"EMEA":2,"US-West":0,"US-East":0}"#
        );
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn test_missing_critical_field() {
        assert_eq!(record().missing_critical_field(), None);
        let mut r = record();
        r.last_name = None;
        assert_eq!(r.missing_critical_field(), Some("LastName"));
    }

    #[test]
    fn test_to_crm_fills_constants_and_blanks() {
        let lead = ClassifiedLead {
            record: record(),
            region: Region::Apac,
            owner_id: String::new(),
        }
        .to_crm("BIO 2025");
        assert_eq!(lead.email, "");
        assert_eq!(lead.source, "Event");
        assert_eq!(lead.status, "New");
        assert_eq!(lead.campaign, "BIO 2025");
        assert_eq!(lead.region, Region::Apac);
    }
}
