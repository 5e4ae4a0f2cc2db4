// LeadSweep - platform/config.rs
//
// Platform-specific config directory resolution, and config.toml loading
// with validation into the immutable run configuration.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::filter::ExclusionKeywords;
use crate::core::model::{OwnerMapping, Region};
use crate::core::pipeline::LeadConfig;
use crate::core::region::RegionRules;
use crate::core::table::TableOptions;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LeadSweep configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/leadsweep/ or %APPDATA%\LeadSweep\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml shape
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Campaign label applied to every output row.
    pub campaign: Option<String>,
    /// `[columns]` section.
    pub columns: ColumnsSection,
    /// `[exclusion]` section.
    pub exclusion: ExclusionSection,
    /// `[owners]` section: region name → owner identifier.
    pub owners: BTreeMap<String, String>,
    /// `[regions]` section.
    pub regions: RegionsSection,
    /// `[input]` section.
    pub input: InputSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[columns]` config section: input column for each role.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ColumnsSection {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
}

/// `[exclusion]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExclusionSection {
    /// Comma-separated text or an array of keywords.
    pub keywords: Option<KeywordList>,
}

/// Keywords may be written either way in TOML.
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum KeywordList {
    Text(String),
    List(Vec<String>),
}

impl KeywordList {
    fn to_keywords(&self) -> ExclusionKeywords {
        match self {
            KeywordList::Text(text) => ExclusionKeywords::parse(text),
            KeywordList::List(items) => ExclusionKeywords::from_list(items),
        }
    }
}

/// `[regions]` config section: trigger overrides. Evaluation order is
/// fixed; only the lists can change.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RegionsSection {
    pub apac: Option<Vec<String>>,
    pub euro: Option<Vec<String>>,
    pub emea: Option<Vec<String>>,
    #[serde(alias = "us-west")]
    pub us_west: Option<Vec<String>>,
    /// Present only so it can be rejected with a clear message.
    #[serde(alias = "us-east")]
    pub us_east: Option<Vec<String>>,
}

/// `[input]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct InputSection {
    /// Single-character field delimiter, or "tab".
    pub delimiter: Option<String>,
    /// Cell values read as null. Replaces the defaults when set.
    pub null_markers: Option<Vec<String>>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

// =============================================================================
// Validated configuration
// =============================================================================

/// Validated application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Everything the pipeline reads.
    pub lead: LeadConfig,
    /// How input files are tokenised.
    pub table: TableOptions,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            lead: LeadConfig {
                keywords: ExclusionKeywords::parse(constants::DEFAULT_EXCLUSION_KEYWORDS),
                ..Default::default()
            },
            table: TableOptions::default(),
            log_level: None,
        }
    }
}

/// Values supplied on the command line. Each `Some` replaces the config
/// value; `owners` entries are `REGION=ID` and replace one region each.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
    pub keywords: Option<String>,
    pub campaign: Option<String>,
    pub owners: Vec<String>,
    pub delimiter: Option<String>,
}

impl AppConfig {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&mut self, overrides: &Overrides) -> Result<(), ConfigError> {
        let mapping = &mut self.lead.mapping;
        let set = |target: &mut String, value: &Option<String>| {
            if let Some(v) = value {
                *target = v.clone();
            }
        };
        set(&mut mapping.first_name, &overrides.first_name);
        set(&mut mapping.last_name, &overrides.last_name);
        set(&mut mapping.company, &overrides.company);
        set(&mut mapping.country, &overrides.country);
        if overrides.email.is_some() {
            mapping.email = overrides.email.clone();
        }
        if overrides.title.is_some() {
            mapping.title = overrides.title.clone();
        }

        if let Some(ref text) = overrides.keywords {
            self.lead.keywords = ExclusionKeywords::parse(text);
        }
        if let Some(ref campaign) = overrides.campaign {
            self.lead.campaign = campaign.trim().to_string();
        }
        for entry in &overrides.owners {
            let (region, owner) = parse_owner_arg(entry)?;
            self.lead.owners.set(region, owner);
        }
        if let Some(ref delimiter) = overrides.delimiter {
            self.table.delimiter = parse_delimiter("--delimiter", delimiter)?;
        }
        Ok(())
    }
}

/// Split a `REGION=ID` argument.
pub fn parse_owner_arg(entry: &str) -> Result<(Region, &str), ConfigError> {
    let (region, owner) = entry
        .split_once('=')
        .ok_or_else(|| ConfigError::ValueOutOfRange {
            field: "--owner".to_string(),
            value: entry.to_string(),
            expected: "REGION=ID, e.g. APAC=005A000001".to_string(),
        })?;
    Ok((region.parse()?, owner))
}

/// A single ASCII character, or the word "tab".
pub fn parse_delimiter(field: &str, value: &str) -> Result<u8, ConfigError> {
    if value.eq_ignore_ascii_case("tab") || value == "\\t" || value == "\t" {
        return Ok(b'\t');
    }
    match value.as_bytes() {
        [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => Ok(*b),
        _ => Err(ConfigError::ValueOutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            expected: "a single ASCII character other than a quote or newline, or \"tab\""
                .to_string(),
        }),
    }
}

/// Outcome of [`load_config`].
///
/// Config is read before logging is initialised, so nothing is logged here;
/// the caller reports `source` and `warnings` once the subscriber is up.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    /// Non-fatal validation warnings.
    pub warnings: Vec<String>,
    /// The file that was read, or `None` when defaults were used.
    pub source: Option<PathBuf>,
}

/// Load and validate config.toml at `path`.
///
/// A missing file yields defaults when `required` is false (no config yet)
/// and an error when it is true (the user named the file explicitly).
pub fn load_config(path: &Path, required: bool) -> Result<LoadedConfig, ConfigError> {
    if !required && !path.exists() {
        return Ok(LoadedConfig {
            config: AppConfig::default(),
            warnings: Vec::new(),
            source: None,
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let (config, warnings) = parse_config(&content, path)?;
    Ok(LoadedConfig {
        config,
        warnings,
        source: Some(path.to_path_buf()),
    })
}

/// Parse and validate config.toml content. `path` is for messages only.
pub fn parse_config(content: &str, path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut warnings: Vec<String> = Vec::new();
    let mut config = AppConfig::default();

    // -- Columns --
    let columns = raw.columns;
    let mapping = &mut config.lead.mapping;
    mapping.first_name = columns.first_name.unwrap_or_default();
    mapping.last_name = columns.last_name.unwrap_or_default();
    mapping.company = columns.company.unwrap_or_default();
    mapping.country = columns.country.unwrap_or_default();
    mapping.email = columns.email;
    mapping.title = columns.title;

    // -- Campaign --
    if let Some(campaign) = raw.campaign {
        config.lead.campaign = campaign.trim().to_string();
    }

    // -- Exclusion keywords --
    if let Some(ref list) = raw.exclusion.keywords {
        config.lead.keywords = list.to_keywords();
        if config.lead.keywords.is_empty() {
            warnings.push(
                "[exclusion] keywords is empty. No leads will be excluded.".to_string(),
            );
        }
    }

    // -- Owners --
    let mut owners = OwnerMapping::default();
    for (name, owner) in &raw.owners {
        let region: Region = name.parse()?;
        owners.set(region, owner);
    }
    config.lead.owners = owners;

    // -- Region trigger overrides --
    if raw.regions.us_east.is_some() {
        return Err(ConfigError::DefaultRegionTriggers);
    }
    let overrides = [
        (Region::Apac, raw.regions.apac),
        (Region::Euro, raw.regions.euro),
        (Region::Emea, raw.regions.emea),
        (Region::UsWest, raw.regions.us_west),
    ];
    let mut rules = RegionRules::default();
    for (region, triggers) in overrides {
        if let Some(triggers) = triggers {
            rules = rules.with_triggers(region, triggers)?;
            if rules.triggers(region).is_empty() {
                warnings.push(format!(
                    "[regions] {} has no triggers. Nothing will be routed there.",
                    region.label().to_lowercase().replace('-', "_")
                ));
            }
        }
    }
    config.lead.rules = rules;

    // -- Input --
    if let Some(ref delimiter) = raw.input.delimiter {
        config.table.delimiter = parse_delimiter("[input] delimiter", delimiter)?;
    }
    if let Some(markers) = raw.input.null_markers {
        config.table.null_markers = markers;
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    Ok((config, warnings))
}
