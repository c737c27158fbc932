//! Run configuration for `tabulate-solar`.
//!
//! Settings may come from a YAML file passed with `--config`; command-line
//! flags override it.
//!
//! ```yaml
//! na_value: "."
//! skip_failures: true
//! skip_missing_files: false
//! format: tsv
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use solar_tabulate_parser::ReadError;

/// Placeholder written for absent cells unless configured otherwise.
pub const DEFAULT_NA_VALUE: &str = "NA";

/// Output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Wide tab-separated table.
    #[default]
    Tsv,
    /// Parsed reports as a JSON array.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabulateConfig {
    /// Text written for absent cells.
    pub na_value: String,
    /// Warn about and omit files that fail instead of aborting.
    pub skip_failures: bool,
    /// With `skip_failures`, also skip missing or inaccessible paths.
    pub skip_missing_files: bool,
    pub format: OutputFormat,
}

impl Default for TabulateConfig {
    fn default() -> Self {
        Self {
            na_value: DEFAULT_NA_VALUE.to_string(),
            skip_failures: false,
            skip_missing_files: true,
            format: OutputFormat::Tsv,
        }
    }
}

impl TabulateConfig {
    /// Loads configuration from a YAML file. Missing keys take defaults.
    pub fn load(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|err| format!("Failed to open config '{}': {err}", path.display()))?;
        serde_yaml::from_reader(BufReader::new(file))
            .map_err(|err| format!("Invalid config '{}': {err}", path.display()))
    }

    /// Whether a file that failed with `err` is omitted rather than fatal.
    pub fn skips(&self, err: &ReadError) -> bool {
        self.skip_failures && (self.skip_missing_files || !err.is_access_error())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use solar_tabulate_core::ParseError;

    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: TabulateConfig = serde_yaml::from_str("skip_failures: true\n").unwrap();
        assert!(config.skip_failures);
        assert_eq!(config.na_value, "NA");
        assert!(config.skip_missing_files);
        assert_eq!(config.format, OutputFormat::Tsv);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = "na_value: \".\"\nskip_failures: false\nskip_missing_files: false\nformat: json\n";
        let config: TabulateConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.na_value, ".");
        assert!(!config.skip_missing_files);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = TabulateConfig::load(Path::new("/nonexistent/tabulate.yml")).unwrap_err();
        assert!(err.starts_with("Failed to open config"));
    }

    #[test]
    fn test_skip_policy() {
        let missing = ReadError::NotFound {
            path: PathBuf::from("run1/polygenic.out"),
        };
        let malformed = ReadError::Parse(ParseError::NoMetadata);

        let strict = TabulateConfig::default();
        assert!(!strict.skips(&missing));
        assert!(!strict.skips(&malformed));

        let lenient = TabulateConfig {
            skip_failures: true,
            ..TabulateConfig::default()
        };
        assert!(lenient.skips(&missing));
        assert!(lenient.skips(&malformed));

        let missing_fatal = TabulateConfig {
            skip_failures: true,
            skip_missing_files: false,
            ..TabulateConfig::default()
        };
        assert!(!missing_fatal.skips(&missing));
        assert!(missing_fatal.skips(&malformed));
    }
}
