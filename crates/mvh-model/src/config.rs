//! Source-path configuration.
//!
//! The mapping from logical source key to file path is an explicit value
//! handed to the loader. It starts from defaults under a data directory and
//! can be overridden per source from a TOML file:
//!
//! ```toml
//! data_dir = "data"
//! duplicate_keys = "keep-first"
//!
//! [sources]
//! energy = "/mnt/owid/energy.csv"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::source::SourceKind;

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// What a normalizer does when a `(Country, Year)` key occurs more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateKeyPolicy {
    /// Fail the run, naming the source and the first duplicated key.
    #[default]
    Reject,
    /// Keep the first row of each key and drop the rest.
    KeepFirst,
}

impl fmt::Display for DuplicateKeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => f.write_str("reject"),
            Self::KeepFirst => f.write_str("keep-first"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    duplicate_keys: Option<DuplicateKeyPolicy>,
    #[serde(default)]
    sources: BTreeMap<String, PathBuf>,
}

/// Where each source lives and how duplicate keys are handled.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    data_dir: PathBuf,
    overrides: BTreeMap<SourceKind, PathBuf>,
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::with_data_dir(DEFAULT_DATA_DIR)
    }
}

impl SourceConfig {
    /// All sources at their default file names under `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            overrides: BTreeMap::new(),
            duplicate_keys: DuplicateKeyPolicy::default(),
        }
    }

    /// Loads a TOML config file. Relative paths inside it resolve against the
    /// file's own directory.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_toml_str(&contents, base).map_err(|error| match error {
            ConfigError::Toml { source, .. } => ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parses TOML config text, resolving a relative `data_dir` against `base`.
    pub fn from_toml_str(contents: &str, base: &Path) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|source| ConfigError::Toml {
            path: PathBuf::new(),
            source,
        })?;
        let data_dir = match file.data_dir {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => base.join(dir),
            None => base.join(DEFAULT_DATA_DIR),
        };
        let mut config = Self::with_data_dir(data_dir);
        if let Some(policy) = file.duplicate_keys {
            config.duplicate_keys = policy;
        }
        for (key, path) in file.sources {
            let kind: SourceKind = key.parse()?;
            config.overrides.insert(kind, path);
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_source(mut self, kind: SourceKind, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(kind, path.into());
        self
    }

    #[must_use]
    pub fn with_duplicate_keys(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_keys = policy;
        self
    }

    #[must_use]
    pub fn with_data_dir_override(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Resolved path for a source: the override if set (relative overrides
    /// resolve against the data directory), otherwise the default file name.
    pub fn path_for(&self, kind: SourceKind) -> PathBuf {
        match self.overrides.get(&kind) {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.data_dir.join(path),
            None => self.data_dir.join(kind.default_file()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_under_data_dir() {
        let config = SourceConfig::with_data_dir("/srv/data");
        assert_eq!(
            config.path_for(SourceKind::Energy),
            PathBuf::from("/srv/data/energy.csv")
        );
        assert_eq!(config.duplicate_keys, DuplicateKeyPolicy::Reject);
    }

    #[test]
    fn toml_overrides_and_policy() {
        let config = SourceConfig::from_toml_str(
            r#"
data_dir = "inputs"
duplicate_keys = "keep-first"

[sources]
energy = "owid/energy.csv"
hdi = "/abs/hdi.csv"
"#,
            Path::new("/project"),
        )
        .unwrap();
        assert_eq!(config.data_dir(), Path::new("/project/inputs"));
        assert_eq!(config.duplicate_keys, DuplicateKeyPolicy::KeepFirst);
        assert_eq!(
            config.path_for(SourceKind::Energy),
            PathBuf::from("/project/inputs/owid/energy.csv")
        );
        assert_eq!(config.path_for(SourceKind::Hdi), PathBuf::from("/abs/hdi.csv"));
        assert_eq!(
            config.path_for(SourceKind::Whr),
            PathBuf::from("/project/inputs/world_happiness_report.xls")
        );
    }

    #[test]
    fn unknown_source_key_is_rejected() {
        let err = SourceConfig::from_toml_str("[sources]\ngdp = \"gdp.csv\"\n", Path::new("."))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSource { ref key, .. } if key == "gdp"));
    }

    #[test]
    fn unknown_top_level_field_is_rejected() {
        let err = SourceConfig::from_toml_str("output = \"x\"\n", Path::new(".")).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }

    #[test]
    fn load_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mvh.toml");
        std::fs::write(&path, "data_dir = [").unwrap();
        let err = SourceConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("mvh.toml"));
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = SourceConfig::from_toml_str("duplicate_keys = \"merge\"\n", Path::new("."))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }
}
