//! Program configuration.
//!
//! The configuration file is TOML with two sections, one for the input and
//! output locations and one for the output file name prefix:
//!
//! ```toml
//! [path]
//! src = "/data/fhs/nc"
//! out = "/data/fhs/csv"
//!
//! [str]
//! prefix = "FY4A_FHS"
//! ```
//!
//! This is TOML, so unlike the INI files of older deployments the string values
//! must be quoted; `src = /data/fhs/nc` is a parse error.
//!
//! Any key can be overridden from the environment with a `FHS2CSV_` prefix and
//! `__` between the section and key, e.g. `FHS2CSV_PATH__OUT=/tmp/csv`.
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Where the program looks for its configuration if not told otherwise.
pub const DEFAULT_CONFIG_FILE: &str = "./config.cfg";

/// Prefix for environment variables that override configuration keys.
pub const ENV_PREFIX: &str = "FHS2CSV_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub path: PathSection,
    #[serde(rename = "str")]
    pub names: NameSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSection {
    /// Directory containing the FHS netCDF files
    pub src: PathBuf,
    /// Root of the date-partitioned CSV tree
    pub out: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameSection {
    /// Prefix of every output CSV file name
    pub prefix: String,
}

impl Config {
    /// Load from a TOML file, with environment overrides applied on top.
    pub fn from_toml_file(path: &Path) -> error_stack::Result<Self, ConfigError> {
        if !path.is_file() {
            error_stack::bail!(ConfigError::NotFound(path.to_path_buf()));
        }

        let config: Self = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(config)
    }

    /// Load from a TOML string only.
    pub fn from_toml_str(s: &str) -> error_stack::Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Toml::string(s))
            .extract()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(config)
    }

    pub fn src_dir(&self) -> &Path {
        &self.path.src
    }

    pub fn out_dir(&self) -> &Path {
        &self.path.out
    }

    pub fn prefix(&self) -> &str {
        &self.names.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
[path]
src = "/data/fhs/nc"
out = "/data/fhs/csv"

[str]
prefix = "FY4A_FHS"
"#;

    #[test]
    fn test_parse_example() {
        let config = Config::from_toml_str(EXAMPLE).unwrap();
        assert_eq!(config.src_dir(), Path::new("/data/fhs/nc"));
        assert_eq!(config.out_dir(), Path::new("/data/fhs/csv"));
        assert_eq!(config.prefix(), "FY4A_FHS");
    }

    #[test]
    fn test_missing_prefix() {
        let err = Config::from_toml_str("[path]\nsrc = \"a\"\nout = \"b\"\n").unwrap_err();
        assert!(matches!(err.current_context(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_unquoted_ini_values_rejected() {
        let ini = "[path]\nsrc = /data/fhs/nc\nout = /data/fhs/csv\n\n[str]\nprefix = FY4A_FHS\n";
        let err = Config::from_toml_str(ini).unwrap_err();
        assert!(matches!(err.current_context(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.cfg", EXAMPLE)?;
            jail.set_env("FHS2CSV_PATH__OUT", "/tmp/fhs_csv");
            jail.set_env("FHS2CSV_STR__PREFIX", "FY4B_FHS");

            let config = Config::from_toml_file(Path::new("config.cfg"))
                .map_err(|e| format!("{e:?}"))?;
            assert_eq!(config.src_dir(), Path::new("/data/fhs/nc"));
            assert_eq!(config.out_dir(), Path::new("/tmp/fhs_csv"));
            assert_eq!(config.prefix(), "FY4B_FHS");
            Ok(())
        });
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_toml_file(&dir.path().join("config.cfg")).unwrap_err();
        assert!(matches!(err.current_context(), ConfigError::NotFound(_)));
    }

    #[test]
    fn test_from_file() {
        // Inside a jail so that overrides set by other tests cannot leak in
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.cfg", EXAMPLE)?;
            let config = Config::from_toml_file(Path::new("config.cfg"))
                .map_err(|e| format!("{e:?}"))?;
            assert_eq!(config.prefix(), "FY4A_FHS");
            Ok(())
        });
    }
}
