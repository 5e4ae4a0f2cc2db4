// LeadSweep - core/export.rs
//
// CSV export of CRM-ready leads and JSON export of the run summary.
// Core layer: writes to any Write trait object.

use crate::core::model::{CrmLead, RunSummary};
use crate::util::constants;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Export leads to CSV.
///
/// Writes the fixed header (`constants::OUTPUT_COLUMNS`) even when there are
/// no leads, then one row per lead in order.
pub fn export_csv<W: Write>(
    leads: &[CrmLead],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer
        .write_record(constants::OUTPUT_COLUMNS)
        .map_err(csv_err)?;

    let mut count = 0;
    for lead in leads {
        csv_writer.serialize(lead).map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export the run summary as pretty-printed JSON.
pub fn export_summary_json<W: Write>(
    summary: &RunSummary,
    writer: W,
    export_path: &Path,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, summary).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })
}

/// `cleaned_leads_<stem>.csv` next to the input file.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "leads".to_string());
    let name = format!("{}{stem}.csv", constants::OUTPUT_FILE_PREFIX);
    match input.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Region, RegionCounts};

    fn make_lead(first: &str, company: &str, region: Region) -> CrmLead {
        CrmLead {
            first_name: first.to_string(),
            last_name: "Lee".to_string(),
            company: company.to_string(),
            email: String::new(),
            title: String::new(),
            source: "Event".to_string(),
            campaign: String::new(),
            status: "New".to_string(),
            region,
            owner_id: "005X".to_string(),
        }
    }

    #[test]
    fn test_csv_export() {
        let leads = vec![
            make_lead("Jo", "Acme, Inc.", Region::Apac),
            make_lead("Al", "Beta", Region::UsWest),
        ];
        let mut buf = Vec::new();
        let count = export_csv(&leads, &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "FirstName,LastName,Company,Email,Title,Source,Campaign,Status,Region,OwnerId"
        );
        assert_eq!(lines[1], "Jo,Lee,\"Acme, Inc.\",,,Event,,New,APAC,005X");
        assert_eq!(lines[2], "Al,Lee,Beta,,,Event,,New,US-West,005X");
    }

    #[test]
    fn test_csv_export_header_only_when_empty() {
        let mut buf = Vec::new();
        let count = export_csv(&[], &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 0);
        let output = String::from_utf8(buf).unwrap();
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_summary_json_export() {
        let mut counts = RegionCounts::default();
        counts.increment(Region::Euro);
        let summary = RunSummary {
            input_rows: 3,
            excluded_count: 2,
            excluded_companies: vec!["Acme CRO".to_string()],
            retained_count: 1,
            region_counts: counts,
            dropped_incomplete: 0,
            final_count: 1,
        };
        let mut buf = Vec::new();
        export_summary_json(&summary, &mut buf, Path::new("summary.json")).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["excluded_count"], 2);
        assert_eq!(value["region_counts"]["EURO"], 1);
        assert_eq!(value["region_counts"]["US-East"], 0);
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/data/bio_2025.xlsx")),
            PathBuf::from("/data/cleaned_leads_bio_2025.csv")
        );
        assert_eq!(
            default_output_path(Path::new("leads.csv")),
            PathBuf::from("cleaned_leads_leads.csv")
        );
    }
}
