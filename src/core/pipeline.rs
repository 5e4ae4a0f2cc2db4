// LeadSweep - core/pipeline.rs
//
// Whole-table processing: mapping validation, exclusion, binding,
// classification, critical-field gate and audit counts.
// Core layer: pure logic, no I/O. A run either returns a complete output
// or an error; nothing partial escapes.

use crate::core::filter::{self, ExclusionKeywords};
use crate::core::model::{
    ClassifiedLead, CrmLead, LeadRecord, OwnerMapping, RegionCounts, RunSummary,
};
use crate::core::region::{self, RegionRules};
use crate::core::table::Table;
use crate::util::error::{ConfigError, Result};

/// Role → input column binding supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub country: String,
    pub email: Option<String>,
    pub title: Option<String>,
}

/// Column indices for each role, resolved against a concrete table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub first_name: usize,
    pub last_name: usize,
    pub company: usize,
    pub country: usize,
    pub email: Option<usize>,
    pub title: Option<usize>,
}

impl ColumnMapping {
    /// Validate the mapping against `table` and resolve it to indices.
    ///
    /// Required roles must be non-blank and present; optional roles that are
    /// blank count as unmapped, but a non-blank optional role must exist.
    pub fn resolve(&self, table: &Table) -> std::result::Result<ResolvedColumns, ConfigError> {
        let required = |role: &'static str, column: &str| {
            let column = column.trim();
            if column.is_empty() {
                return Err(ConfigError::MissingMapping { role });
            }
            lookup(table, role, column)
        };
        let optional = |role: &'static str, column: &Option<String>| {
            match column.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
                Some(c) => lookup(table, role, c).map(Some),
                None => Ok(None),
            }
        };

        Ok(ResolvedColumns {
            first_name: required("First Name", &self.first_name)?,
            last_name: required("Last Name", &self.last_name)?,
            company: required("Company", &self.company)?,
            country: required("Country/Region", &self.country)?,
            email: optional("Email", &self.email)?,
            title: optional("Title", &self.title)?,
        })
    }
}

/// Exact header match first, then a match ignoring surrounding whitespace
/// (mapping values are trimmed, header cells are not).
fn lookup(
    table: &Table,
    role: &'static str,
    column: &str,
) -> std::result::Result<usize, ConfigError> {
    table
        .column_index(column)
        .or_else(|| table.headers().iter().position(|h| h.trim() == column))
        .ok_or_else(|| ConfigError::UnknownColumn {
            role,
            column: column.to_string(),
        })
}

impl ResolvedColumns {
    /// Bind one table row to a typed record.
    pub fn bind(&self, table: &Table, row: usize) -> LeadRecord {
        let cell = |col: usize| table.cell(row, col).map(str::to_string);
        LeadRecord {
            row,
            first_name: cell(self.first_name),
            last_name: cell(self.last_name),
            company: cell(self.company),
            email: self.email.and_then(cell),
            title: self.title.and_then(cell),
            location: cell(self.country),
        }
    }
}

/// Immutable configuration for one run, built once before processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadConfig {
    pub mapping: ColumnMapping,
    pub keywords: ExclusionKeywords,
    pub rules: RegionRules,
    pub owners: OwnerMapping,
    /// Applied to every output row; empty when unset.
    pub campaign: String,
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    /// CRM rows, input order minus removed rows.
    pub leads: Vec<CrmLead>,
    pub summary: RunSummary,
}

/// Run the full pipeline over `table`.
///
/// Region counts are taken over every row that survives the exclusion
/// filter, before the critical-field gate; `final_count` is after it.
pub fn process(table: &Table, config: &LeadConfig) -> Result<PipelineOutput> {
    let columns = config.mapping.resolve(table)?;

    let company_column = &table.headers()[columns.company];
    let exclusion = filter::apply_exclusions(table, company_column, &config.keywords)?;

    let records: Vec<LeadRecord> = exclusion
        .retained
        .iter()
        .map(|&row| columns.bind(table, row))
        .collect();

    let classified = region::enrich(&records, &config.rules, &config.owners);

    let mut region_counts = RegionCounts::default();
    for lead in &classified {
        region_counts.increment(lead.region);
    }

    let (complete, dropped_incomplete) = drop_incomplete(classified);
    let leads: Vec<CrmLead> = complete
        .iter()
        .map(|lead| lead.to_crm(&config.campaign))
        .collect();

    let summary = RunSummary {
        input_rows: table.row_count(),
        excluded_count: exclusion.excluded_count(),
        excluded_companies: exclusion.excluded_organizations,
        retained_count: records.len(),
        region_counts,
        dropped_incomplete,
        final_count: leads.len(),
    };

    tracing::info!(
        input = summary.input_rows,
        excluded = summary.excluded_count,
        retained = summary.retained_count,
        dropped_incomplete = summary.dropped_incomplete,
        final_count = summary.final_count,
        "Pipeline complete"
    );

    Ok(PipelineOutput { leads, summary })
}

/// Critical-field gate: drop leads missing first name, last name or company.
/// Returns the kept leads and how many were dropped.
pub fn drop_incomplete(leads: Vec<ClassifiedLead>) -> (Vec<ClassifiedLead>, usize) {
    let before = leads.len();
    let kept: Vec<ClassifiedLead> = leads
        .into_iter()
        .filter(|lead| match lead.record.missing_critical_field() {
            Some(field) => {
                tracing::debug!(
                    row = lead.record.row,
                    field,
                    "Dropping lead with missing critical field"
                );
                false
            }
            None => true,
        })
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}
