// LeadSweep - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and CLI overrides
// 3. Logging initialisation (debug mode support)
// 4. Running the pipeline and printing the report

use leadsweep::app::runner::{self, RunRequest};
use leadsweep::platform::config::{self, Overrides, PlatformPaths};
use leadsweep::util;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// LeadSweep - clean a conference lead list for CRM import.
///
/// Removes leads whose company matches an exclusion keyword, routes each
/// remaining lead to a region and owner, and writes a CSV with the columns
/// FirstName, LastName, Company, Email, Title, Source, Campaign, Status,
/// Region, OwnerId.
#[derive(Parser, Debug)]
#[command(name = "LeadSweep", version, about)]
struct Cli {
    /// Lead list to clean (.csv, .tsv, .txt, .xlsx, .xls, .xlsm, .xlsb, .ods).
    input: PathBuf,

    /// Output CSV path [default: cleaned_leads_<input name>.csv next to the input].
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Config file [default: config.toml in the platform config directory].
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Input column holding the first name.
    #[arg(long = "first-name", value_name = "COLUMN")]
    first_name: Option<String>,

    /// Input column holding the last name.
    #[arg(long = "last-name", value_name = "COLUMN")]
    last_name: Option<String>,

    /// Input column holding the company / organization name.
    #[arg(long = "company", value_name = "COLUMN")]
    company: Option<String>,

    /// Input column holding the country or region text.
    #[arg(long = "country", value_name = "COLUMN")]
    country: Option<String>,

    /// Input column holding the email address (optional).
    #[arg(long = "email", value_name = "COLUMN")]
    email: Option<String>,

    /// Input column holding the job title (optional).
    #[arg(long = "title", value_name = "COLUMN")]
    title: Option<String>,

    /// Comma-separated exclusion keywords (replaces the configured list).
    #[arg(short = 'k', long = "keywords", value_name = "TEXT")]
    keywords: Option<String>,

    /// Campaign name written to every output row.
    #[arg(long = "campaign")]
    campaign: Option<String>,

    /// Owner for a region, e.g. --owner APAC=005A000001. Repeatable.
    #[arg(long = "owner", value_name = "REGION=ID")]
    owners: Vec<String>,

    /// Field delimiter for delimited input (single character or "tab").
    #[arg(long = "delimiter", value_name = "CHAR")]
    delimiter: Option<String>,

    /// Also write the run summary as JSON to this path.
    #[arg(long = "summary-json", value_name = "PATH")]
    summary_json: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            company: self.company.clone(),
            country: self.country.clone(),
            email: self.email.clone(),
            title: self.title.clone(),
            keywords: self.keywords.clone(),
            campaign: self.campaign.clone(),
            owners: self.owners.clone(),
            delimiter: self.delimiter.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config is read before logging starts so that [logging] level applies.
    let (config_path, required) = match cli.config {
        Some(ref path) => (path.clone(), true),
        None => (PlatformPaths::resolve().config_file(), false),
    };
    let loaded = config::load_config(&config_path, required);

    let log_level = match loaded {
        Ok(ref l) => l.config.log_level.clone(),
        Err(_) => None,
    };
    util::logging::init(cli.debug, log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "LeadSweep starting"
    );

    let mut app_config = match loaded {
        Ok(l) => {
            match l.source {
                Some(ref path) => tracing::info!(path = %path.display(), "Loaded config.toml"),
                None => tracing::debug!(
                    path = %config_path.display(),
                    "No config.toml found; using defaults"
                ),
            }
            for warning in &l.warnings {
                tracing::warn!(warning = %warning, "Config warning");
            }
            l.config
        }
        Err(e) => return fail(e.into()),
    };

    if let Err(e) = app_config.apply_overrides(&cli.overrides()) {
        return fail(e.into());
    }

    let request = RunRequest {
        input: cli.input.clone(),
        output: cli.output.clone(),
        summary_json: cli.summary_json.clone(),
        config: app_config,
    };

    match runner::run(&request) {
        Ok(report) => {
            print!("{}", report.render_text());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn fail(error: util::error::LeadSweepError) -> ExitCode {
    tracing::error!(error = %error, "Run failed");
    eprintln!("Error: {error}");
    ExitCode::FAILURE
}
