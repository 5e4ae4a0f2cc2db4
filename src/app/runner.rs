// LeadSweep - app/runner.rs
//
// One complete run: load the input table, process it, write the CRM file
// and the optional JSON summary. Outputs are rendered in memory first and
// written only after every step has succeeded, so a failed run leaves no
// partial files behind.

use crate::app::import;
use crate::core::export;
use crate::core::model::{Region, RunSummary};
use crate::core::pipeline;
use crate::platform::config::AppConfig;
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::{ConfigError, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Everything needed for a run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Input lead file.
    pub input: PathBuf,
    /// Output CSV path; `None` derives `cleaned_leads_<stem>.csv`.
    pub output: Option<PathBuf>,
    /// Where to write the JSON summary, if anywhere.
    pub summary_json: Option<PathBuf>,
    pub config: AppConfig,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub summary_json: Option<PathBuf>,
    pub summary: RunSummary,
    /// Regions that received leads but have no owner configured.
    pub unowned_regions: Vec<Region>,
}

/// Execute a run.
pub fn run(request: &RunRequest) -> Result<RunReport> {
    let output = request
        .output
        .clone()
        .unwrap_or_else(|| export::default_output_path(&request.input));
    if same_file(&output, &request.input) {
        return Err(ConfigError::ValueOutOfRange {
            field: "--output".to_string(),
            value: output.display().to_string(),
            expected: "a path different from the input file".to_string(),
        }
        .into());
    }

    let table = import::load_table(&request.input, &request.config.table)?;
    let result = pipeline::process(&table, &request.config.lead)?;

    let mut csv_bytes = Vec::new();
    export::export_csv(&result.leads, &mut csv_bytes, &output)?;

    let summary_bytes = match request.summary_json {
        Some(ref path) => {
            let mut bytes = Vec::new();
            export::export_summary_json(&result.summary, &mut bytes, path)?;
            Some((path.as_path(), bytes))
        }
        None => None,
    };

    let mut files: Vec<(&Path, &[u8])> = vec![(output.as_path(), csv_bytes.as_slice())];
    if let Some((path, bytes)) = &summary_bytes {
        files.push((*path, bytes.as_slice()));
    }
    fs::write_atomic_all(&files)?;

    let counts = &result.summary.region_counts;
    let unowned_regions: Vec<Region> = request
        .config
        .lead
        .owners
        .unassigned()
        .into_iter()
        .filter(|region| counts.get(*region) > 0)
        .collect();
    if !unowned_regions.is_empty() {
        tracing::warn!(
            regions = ?unowned_regions,
            "Leads routed to regions with no owner configured"
        );
    }

    tracing::info!(
        output = %output.display(),
        leads = result.leads.len(),
        "Run complete"
    );

    Ok(RunReport {
        input: request.input.clone(),
        output,
        summary_json: request.summary_json.clone(),
        summary: result.summary,
        unowned_regions,
    })
}

/// Compare canonical paths when both exist, raw paths otherwise.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

impl RunReport {
    /// Human-readable audit block for the terminal.
    pub fn render_text(&self) -> String {
        let s = &self.summary;
        let mut out = String::new();

        let _ = writeln!(out, "Input:               {}", self.input.display());
        let _ = writeln!(out, "Original leads:      {}", s.input_rows);
        let _ = writeln!(out, "Excluded companies:  {}", s.excluded_count);
        let _ = writeln!(out, "Remaining leads:     {}", s.retained_count);
        let _ = writeln!(out);
        let _ = writeln!(out, "Region distribution:");
        for (region, count) in s.region_counts.iter() {
            let marker = if self.unowned_regions.contains(&region) {
                "  (no owner)"
            } else {
                ""
            };
            let _ = writeln!(out, "  {:<8} {count:>6}{marker}", region.label());
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Final clean leads:   {}", s.final_count);
        if s.dropped_incomplete > 0 {
            let _ = writeln!(
                out,
                "  ({} dropped for missing first name, last name or company)",
                s.dropped_incomplete
            );
        }
        let _ = writeln!(out, "Output:              {}", self.output.display());
        if let Some(ref path) = self.summary_json {
            let _ = writeln!(out, "Summary:             {}", path.display());
        }

        if !s.excluded_companies.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Excluded organizations:");
            for name in s
                .excluded_companies
                .iter()
                .take(constants::MAX_REPORTED_EXCLUDED_NAMES)
            {
                let _ = writeln!(out, "  - {name}");
            }
            let hidden = s
                .excluded_companies
                .len()
                .saturating_sub(constants::MAX_REPORTED_EXCLUDED_NAMES);
            if hidden > 0 {
                let _ = writeln!(out, "  ... and {hidden} more");
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::ExclusionKeywords;
    use crate::core::pipeline::ColumnMapping;
    use crate::util::error::ExportError;
    use tempfile::TempDir;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.lead.mapping = ColumnMapping {
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            company: "Company".to_string(),
            country: "Country".to_string(),
            email: None,
            title: None,
        };
        config.lead.keywords = ExclusionKeywords::parse("cro");
        config
    }

    fn write_input(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("leads.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_run_writes_default_output_and_summary() {
        let dir = TempDir::new().unwrap();
        let input = write_input(
            &dir,
            "First,Last,Company,Country\nJo,Lee,Acme Bio,Japan\nAl,Kim,Beta CRO,UK\n",
        );
        let summary_path = dir.path().join("summary.json");
        let report = run(&RunRequest {
            input: input.clone(),
            output: None,
            summary_json: Some(summary_path.clone()),
            config: config(),
        })
        .unwrap();

        assert_eq!(report.output, dir.path().join("cleaned_leads_leads.csv"));
        let written = std::fs::read_to_string(&report.output).unwrap();
        assert_eq!(written.lines().count(), 2);
        assert!(written.contains("Jo,Lee,Acme Bio,,,Event,,New,APAC,"));
        assert!(summary_path.exists());
        assert_eq!(report.unowned_regions, vec![Region::Apac]);

        let text = report.render_text();
        assert!(text.contains("Excluded companies:  1"));
        assert!(text.contains("  - Beta CRO"));
        assert!(text.contains("(no owner)"));
    }

    #[test]
    fn test_failed_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "First,Last,Org,Country\nJo,Lee,Acme,Japan\n");
        let output = dir.path().join("out.csv");
        let err = run(&RunRequest {
            input,
            output: Some(output.clone()),
            summary_json: None,
            config: config(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("'Company'"));
        assert!(!output.exists());
    }

    #[test]
    fn test_failed_summary_write_leaves_no_csv() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "First,Last,Company,Country\nJo,Lee,Acme Bio,Japan\n");
        let output = dir.path().join("out.csv");
        // A non-empty directory where the summary should go.
        let summary = dir.path().join("summary.json");
        std::fs::create_dir(&summary).unwrap();
        std::fs::write(summary.join("keep.txt"), "x").unwrap();

        let err = run(&RunRequest {
            input,
            output: Some(output.clone()),
            summary_json: Some(summary.clone()),
            config: config(),
        })
        .unwrap_err();
        assert!(matches!(
            err,
            crate::util::error::LeadSweepError::Export(ExportError::Io { .. })
        ));
        assert!(!output.exists());
        assert!(!dir.path().join("out.csv.tmp").exists());
        assert!(!dir.path().join("summary.json.tmp").exists());
    }

    #[test]
    fn test_output_may_not_overwrite_input() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "First,Last,Company,Country\n");
        let err = run(&RunRequest {
            input: input.clone(),
            output: Some(input.clone()),
            summary_json: None,
            config: config(),
        })
        .unwrap_err();
        assert!(matches!(
            err,
            crate::util::error::LeadSweepError::Config(ConfigError::ValueOutOfRange { .. })
        ));
        assert_eq!(
            std::fs::read_to_string(&input).unwrap(),
            "First,Last,Company,Country\n"
        );
    }
}
