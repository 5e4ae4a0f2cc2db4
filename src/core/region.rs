// LeadSweep - core/region.rs
//
// Region classification and owner assignment.
//
// Rules are data: an ordered list of (region, trigger substrings). The
// classifier walks that list top to bottom and the first region with a
// trigger contained in the lowercased location wins. Trigger lists overlap
// ("or" sits inside "Singapore"), so the order is part of the behaviour and
// is fixed regardless of which triggers are configured.
// Core layer: pure logic, no I/O.

use crate::core::model::{ClassifiedLead, LeadRecord, OwnerMapping, Region};
use crate::util::constants;
use crate::util::error::ConfigError;

/// Regions that carry triggers, in evaluation order. The fallback region
/// is deliberately absent.
const RULE_ORDER: [Region; 4] = [Region::Apac, Region::Euro, Region::Emea, Region::UsWest];

/// Ordered region rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRules {
    groups: Vec<(Region, Vec<String>)>,
}

impl Default for RegionRules {
    /// The built-in trigger sets.
    fn default() -> Self {
        let defaults: [&[&str]; 4] = [
            constants::APAC_TRIGGERS,
            constants::EURO_TRIGGERS,
            constants::EMEA_TRIGGERS,
            constants::US_WEST_TRIGGERS,
        ];
        let groups = RULE_ORDER
            .iter()
            .zip(defaults)
            .map(|(region, triggers)| (*region, normalise_triggers(triggers)))
            .collect();
        Self { groups }
    }
}

impl RegionRules {
    /// Replace the trigger list of one region. Evaluation order is unchanged.
    pub fn with_triggers<I, S>(mut self, region: Region, triggers: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let slot = self
            .groups
            .iter_mut()
            .find(|(r, _)| *r == region)
            .ok_or(ConfigError::DefaultRegionTriggers)?;
        slot.1 = normalise_triggers(triggers);
        Ok(self)
    }

    /// Trigger list for `region`; empty for the fallback region.
    pub fn triggers(&self, region: Region) -> &[String] {
        self.groups
            .iter()
            .find(|(r, _)| *r == region)
            .map(|(_, t)| t.as_slice())
            .unwrap_or(&[])
    }

    /// Classify a location. Total: every input maps to exactly one region.
    pub fn classify(&self, location: Option<&str>) -> Region {
        let Some(text) = location else {
            return Region::DEFAULT;
        };
        let lower = text.to_lowercase();

        self.groups
            .iter()
            .find(|(_, triggers)| triggers.iter().any(|t| lower.contains(t.as_str())))
            .map(|(region, _)| *region)
            .unwrap_or(Region::DEFAULT)
    }
}

/// Lowercase triggers and drop blank ones. A blank trigger would match
/// every location and starve every lower-priority region.
///
/// Surrounding spaces are kept: `" ca"` only matches "ca" after a space, so
/// it hits "Los Angeles, CA" but not "Jamaica".
fn normalise_triggers<I, S>(triggers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    triggers
        .into_iter()
        .filter(|t| !t.as_ref().trim().is_empty())
        .map(|t| t.as_ref().to_lowercase())
        .collect()
}

/// Classify every record and attach its owner.
///
/// Produces new values; the input records are not modified.
pub fn enrich(
    records: &[LeadRecord],
    rules: &RegionRules,
    owners: &OwnerMapping,
) -> Vec<ClassifiedLead> {
    records
        .iter()
        .map(|record| {
            if record.location.is_none() {
                tracing::debug!(row = record.row, "No location; using fallback region");
            }
            let region = rules.classify(record.location.as_deref());
            ClassifiedLead {
                record: record.clone(),
                region,
                owner_id: owners.owner_for(region).to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Region {
        RegionRules::default().classify(Some(text))
    }

    #[test]
    fn test_null_location_is_us_east() {
        assert_eq!(RegionRules::default().classify(None), Region::UsEast);
    }

    #[test]
    fn test_each_group_matches() {
        assert_eq!(classify("Singapore"), Region::Apac);
        assert_eq!(classify("Hong Kong SAR"), Region::Apac);
        assert_eq!(classify("Germany"), Region::Euro);
        assert_eq!(classify("UNITED KINGDOM"), Region::Euro);
        assert_eq!(classify("Israel"), Region::Emea);
        assert_eq!(classify("California"), Region::UsWest);
        assert_eq!(classify("Boston, MA"), Region::UsEast);
        assert_eq!(classify(""), Region::UsEast);
    }

    #[test]
    fn test_priority_order_resolves_overlap() {
        // APAC and EURO both present.
        assert_eq!(classify("Singapore / UK office"), Region::Apac);
        // EURO and EMEA both present.
        assert_eq!(classify("Germany & Israel"), Region::Euro);
        // EMEA and US-West both present.
        assert_eq!(classify("Washington, Israel"), Region::Emea);
        // "or" inside "Singapore" would hit US-West, but APAC is first.
        assert_eq!(classify("singapore"), Region::Apac);
    }

    #[test]
    fn test_two_letter_triggers_match_inside_words() {
        // "ca" inside "Jamaica", "co" inside "Mexico": known limitation.
        assert_eq!(classify("Jamaica"), Region::UsWest);
        assert_eq!(classify("Mexico"), Region::UsWest);
        assert_eq!(classify("New York"), Region::UsWest);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let rules = RegionRules::default();
        for text in ["Japan", "Oregon", "Nowhere", "Dubai, UAE"] {
            let first = rules.classify(Some(text));
            assert_eq!(rules.classify(Some(text)), first);
        }
    }

    #[test]
    fn test_with_triggers_replaces_one_group_only() {
        let rules = RegionRules::default()
            .with_triggers(Region::Emea, ["BRAZIL", "", "   "])
            .unwrap();
        assert_eq!(rules.triggers(Region::Emea), ["brazil"]);
        assert_eq!(rules.classify(Some("Brazil")), Region::Emea);
        assert_eq!(rules.classify(Some("Israel")), Region::UsEast);
        // APAC still wins over the new EMEA trigger.
        assert_eq!(rules.classify(Some("Brazil / Japan")), Region::Apac);
    }

    #[test]
    fn test_spaced_trigger_keeps_its_spaces() {
        let rules = RegionRules::default()
            .with_triggers(Region::UsWest, ["california", " ca"])
            .unwrap();
        assert_eq!(rules.triggers(Region::UsWest), ["california", " ca"]);
        assert_eq!(rules.classify(Some("Los Angeles, CA")), Region::UsWest);
        assert_eq!(rules.classify(Some("Jamaica")), Region::UsEast);
    }

    #[test]
    fn test_fallback_region_rejects_triggers() {
        let err = RegionRules::default()
            .with_triggers(Region::UsEast, ["new york"])
            .unwrap_err();
        assert!(matches!(err, ConfigError::DefaultRegionTriggers));
        assert!(RegionRules::default().triggers(Region::UsEast).is_empty());
    }

    #[test]
    fn test_enrich_assigns_owner_or_blank() {
        let owners = OwnerMapping::default().with(Region::Apac, "005APAC");
        let records = vec![
            LeadRecord {
                row: 0,
                first_name: Some("Jo".to_string()),
                last_name: Some("Lee".to_string()),
                company: Some("Acme Biotech".to_string()),
                email: None,
                title: None,
                location: Some("Singapore".to_string()),
            },
            LeadRecord {
                row: 1,
                first_name: Some("Al".to_string()),
                last_name: Some("Kim".to_string()),
                company: Some("Beta".to_string()),
                email: None,
                title: None,
                location: None,
            },
        ];
        let leads = enrich(&records, &RegionRules::default(), &owners);
        assert_eq!(leads[0].region, Region::Apac);
        assert_eq!(leads[0].owner_id, "005APAC");
        assert_eq!(leads[1].region, Region::UsEast);
        assert_eq!(leads[1].owner_id, "");
        assert_eq!(leads[0].record, records[0]);
    }

    #[test]
    fn test_enrich_again_yields_same_regions() {
        let rules = RegionRules::default();
        let owners = OwnerMapping::default().with(Region::Euro, "005EURO");
        let records: Vec<LeadRecord> = ["Japan", "Germany", "Oregon", "Nowhere"]
            .iter()
            .enumerate()
            .map(|(row, location)| LeadRecord {
                row,
                first_name: Some("Jo".to_string()),
                last_name: Some("Lee".to_string()),
                company: Some("Acme".to_string()),
                email: None,
                title: None,
                location: Some(location.to_string()),
            })
            .collect();

        let first = enrich(&records, &rules, &owners);
        let again_records: Vec<LeadRecord> = first.iter().map(|l| l.record.clone()).collect();
        let second = enrich(&again_records, &rules, &owners);
        assert_eq!(first, second);
        for lead in &first {
            assert_eq!(rules.classify(lead.record.location.as_deref()), lead.region);
        }
    }
}
