// LeadSweep - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LeadSweep";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LeadSweep";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Exclusion defaults
// =============================================================================

/// Default exclusion keyword text, in the same comma-separated form a user
/// would type it. Parsing trims, lowercases, drops the empty item between the
/// double comma and collapses the duplicate "CRO".
pub const DEFAULT_EXCLUSION_KEYWORDS: &str = "Accelerator, Acedemia, CRO, Service Providers, \
     Investors, Fund, Govt, clinical research organization,,Consultant, Hospital, CDMO,Research, CRO";

// =============================================================================
// Region trigger defaults
// =============================================================================

/// Substrings that route a location to APAC.
pub const APAC_TRIGGERS: &[&str] = &[
    "australia",
    "new zealand",
    "singapore",
    "japan",
    "china",
    "korea",
    "india",
    "malaysia",
    "thailand",
    "vietnam",
    "indonesia",
    "philippines",
    "hong kong",
];

/// Substrings that route a location to EURO.
pub const EURO_TRIGGERS: &[&str] = &[
    "uk",
    "united kingdom",
    "england",
    "scotland",
    "wales",
    "germany",
    "france",
    "spain",
    "italy",
    "netherlands",
    "belgium",
    "switzerland",
    "austria",
    "sweden",
    "denmark",
    "norway",
    "finland",
    "poland",
    "ireland",
    "portugal",
    "greece",
    "czech",
    "hungary",
    "romania",
];

/// Substrings that route a location to EMEA (Middle East and Africa).
pub const EMEA_TRIGGERS: &[&str] = &[
    "israel",
    "uae",
    "saudi",
    "qatar",
    "dubai",
    "bahrain",
    "kuwait",
    "oman",
    "egypt",
    "south africa",
    "morocco",
    "tunisia",
    "kenya",
    "nigeria",
    "ghana",
    "ethiopia",
    "turkey",
    "jordan",
    "lebanon",
];

/// Substrings that route a location to US-West. The two-letter state codes
/// are plain substrings and will also hit inside longer words.
pub const US_WEST_TRIGGERS: &[&str] = &[
    "california",
    "ca",
    "oregon",
    "or",
    "washington",
    "wa",
    "nevada",
    "nv",
    "arizona",
    "az",
    "utah",
    "colorado",
    "co",
];

// =============================================================================
// CRM output
// =============================================================================

/// Value written to the `Source` column of every output row.
pub const LEAD_SOURCE: &str = "Event";

/// Value written to the `Status` column of every output row.
pub const LEAD_STATUS: &str = "New";

/// Output column names, in contract order.
pub const OUTPUT_COLUMNS: &[&str] = &[
    "FirstName",
    "LastName",
    "Company",
    "Email",
    "Title",
    "Source",
    "Campaign",
    "Status",
    "Region",
    "OwnerId",
];

/// Prefix of the default output file name (`cleaned_leads_<input stem>.csv`).
pub const OUTPUT_FILE_PREFIX: &str = "cleaned_leads_";

// =============================================================================
// Input limits
// =============================================================================

/// Maximum size of an input lead file in bytes. The whole table is held in
/// memory, so this bounds peak usage.
pub const MAX_INPUT_FILE_SIZE: u64 = 256 * 1024 * 1024; // 256 MB

/// Cell values treated as null when reading a table. Matches the markers
/// common spreadsheet and dataframe tools emit for missing data.
pub const DEFAULT_NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Default field delimiter for delimited text input.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Header given to a blank header cell; `{}` is the zero-based column index.
pub const UNNAMED_COLUMN_PREFIX: &str = "Unnamed: ";

/// Maximum number of excluded organization names listed in the text report.
/// The JSON summary always carries the full list.
pub const MAX_REPORTED_EXCLUDED_NAMES: usize = 50;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
