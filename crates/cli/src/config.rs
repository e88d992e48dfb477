// Run configuration: optional TOML file plus command-line overrides.
//
// Precedence is flags > config file > defaults.

use std::path::{Path, PathBuf};

use paradiff_align::{AlignError, AlignmentPolicy, ColumnMapping, PolicySettings};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(String),

    #[error("config validation error: {0}")]
    Validation(String),

    #[error("no {0} column given")]
    MissingColumn(&'static str),

    #[error(transparent)]
    Policy(#[from] AlignError),
}

/// `[columns]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnSettings {
    pub source: Option<String>,
    pub target: Option<String>,
    pub extra: Option<String>,
    pub row_offset: Option<usize>,
}

/// `[worksheets]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorksheetSettings {
    pub pattern: Option<String>,
}

/// Contents of a `--config` file. Every table is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default)]
    pub columns: ColumnSettings,
    #[serde(default)]
    pub alignment: PolicySettings,
    #[serde(default)]
    pub worksheets: WorksheetSettings,
}

/// Values given on the command line. `None` / `false` leaves the config value.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub source: Option<String>,
    pub target: Option<String>,
    pub extra: Option<String>,
    pub row_offset: Option<usize>,
    pub realign_window: Option<i64>,
    pub tolerate_percent: Option<i64>,
    pub nocap: bool,
    pub omit_identical: bool,
    pub worksheet_pattern: Option<String>,
}

/// Fully validated settings for one run.
#[derive(Debug, Clone)]
pub struct ResolvedRun {
    pub columns: ColumnMapping,
    pub policy: AlignmentPolicy,
    pub worksheet_pattern: Option<Regex>,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        log::info!("loaded config {}", path.display());
        Self::from_toml(&input)
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check what can be checked without the command line: column letters,
    /// policy values and the worksheet pattern.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cols = &self.columns;
        for letter in [&cols.source, &cols.target, &cols.extra].into_iter().flatten() {
            check_column(letter)?;
        }
        self.alignment.clone().into_policy()?;
        if let Some(pattern) = &self.worksheets.pattern {
            compile_pattern(pattern)?;
        }
        Ok(())
    }

    /// Apply command-line overrides and build the run settings.
    pub fn resolve(self, overrides: &RunOverrides) -> Result<ResolvedRun, ConfigError> {
        let RunConfig { columns, alignment, worksheets } = self;

        let source = overrides.source.clone().or(columns.source).ok_or(ConfigError::MissingColumn("source"))?;
        let target = overrides.target.clone().or(columns.target).ok_or(ConfigError::MissingColumn("target"))?;
        let extra = overrides.extra.clone().or(columns.extra);
        for letter in [Some(&source), Some(&target), extra.as_ref()].into_iter().flatten() {
            check_column(letter)?;
        }
        let columns = ColumnMapping {
            source,
            target,
            extra,
            row_offset: overrides.row_offset.or(columns.row_offset).unwrap_or(0),
        };

        let settings = PolicySettings {
            realign_window: overrides.realign_window.unwrap_or(alignment.realign_window),
            tolerate_percent: overrides.tolerate_percent.unwrap_or(alignment.tolerate_percent),
            omit_identical: overrides.omit_identical || alignment.omit_identical,
            nocap: overrides.nocap || alignment.nocap,
        };
        let policy = settings.into_policy()?;

        let worksheet_pattern = overrides
            .worksheet_pattern
            .as_deref()
            .or(worksheets.pattern.as_deref())
            .map(compile_pattern)
            .transpose()?;

        log::debug!("columns {columns:?}, policy {policy:?}");
        Ok(ResolvedRun { columns, policy, worksheet_pattern })
    }
}

fn check_column(letter: &str) -> Result<(), ConfigError> {
    paradiff_io::column_index(letter)
        .map(|_| ())
        .map_err(|e| ConfigError::Validation(e.to_string()))
}

fn compile_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::Validation(format!("invalid worksheet pattern: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[columns]
source = "B"
target = "C"
extra = "D"
row_offset = 1

[alignment]
realign_window = 5
tolerate_percent = 10
omit_identical = true

[worksheets]
pattern = "^Chapter"
"#;

    #[test]
    fn parses_full_config() {
        let config = RunConfig::from_toml(FULL).unwrap();
        assert_eq!(config.columns.source.as_deref(), Some("B"));
        assert_eq!(config.columns.row_offset, Some(1));
        assert_eq!(config.alignment.realign_window, 5);
        assert!(config.alignment.omit_identical);
        assert_eq!(config.worksheets.pattern.as_deref(), Some("^Chapter"));
    }

    #[test]
    fn empty_config_is_valid() {
        assert_eq!(RunConfig::from_toml("").unwrap(), RunConfig::default());
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = RunConfig::from_toml("[columns]\nsauce = \"A\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let err = RunConfig::from_toml("[output]\nformat = \"csv\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_values_rejected() {
        let err = RunConfig::from_toml("[columns]\nsource = \"B2\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        let err = RunConfig::from_toml("[alignment]\nrealign_window = -1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Policy(_)));
        let err = RunConfig::from_toml("[worksheets]\npattern = \"(\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn flags_override_config() {
        let config = RunConfig::from_toml(FULL).unwrap();
        let overrides = RunOverrides {
            target: Some("E".into()),
            realign_window: Some(0),
            worksheet_pattern: Some("^Appendix".into()),
            ..RunOverrides::default()
        };
        let run = config.resolve(&overrides).unwrap();
        assert_eq!(run.columns.source, "B");
        assert_eq!(run.columns.target, "E");
        assert_eq!(run.columns.extra.as_deref(), Some("D"));
        assert_eq!(run.columns.row_offset, 1);
        assert_eq!(run.policy.realign_window(), 0);
        assert_eq!(run.policy.tolerate_percent(), 10);
        assert!(run.policy.omit_identical());
        assert_eq!(run.worksheet_pattern.map(|re| re.as_str().to_string()).as_deref(), Some("^Appendix"));
    }

    #[test]
    fn defaults_without_config() {
        let overrides = RunOverrides { source: Some("A".into()), target: Some("B".into()), ..RunOverrides::default() };
        let run = RunConfig::default().resolve(&overrides).unwrap();
        assert_eq!(run.columns, ColumnMapping::default());
        assert_eq!(run.policy, AlignmentPolicy::strict());
        assert!(run.worksheet_pattern.is_none());
    }

    #[test]
    fn columns_required_somewhere() {
        let err = RunConfig::default().resolve(&RunOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingColumn("source")));
        let overrides = RunOverrides { source: Some("A".into()), ..RunOverrides::default() };
        let err = RunConfig::default().resolve(&overrides).unwrap_err();
        assert!(matches!(err, ConfigError::MissingColumn("target")));
    }

    #[test]
    fn flag_caps_still_apply() {
        let overrides = RunOverrides {
            source: Some("A".into()),
            target: Some("B".into()),
            realign_window: Some(99),
            ..RunOverrides::default()
        };
        let run = RunConfig::default().resolve(&overrides).unwrap();
        assert_eq!(run.policy.realign_window(), 15);

        let overrides = RunOverrides { nocap: true, ..overrides };
        let run = RunConfig::default().resolve(&overrides).unwrap();
        assert_eq!(run.policy.realign_window(), 99);
    }
}
