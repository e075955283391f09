//! `prodtrace.toml` configuration.
//!
//! ```toml
//! store = "data/db.json"
//!
//! [[departments]]
//! code = "BAKERY"
//! name = "Bakery"
//! csv = "suppliers/BAKERY.csv"
//!
//! [matching]
//! substring = true
//! min_substring_len = 4
//! cross_department = true
//! cross_department_policy = "unanimous"
//! unknown_markers = ["", "Unknown"]
//!
//! [audit]
//! unknown_supplier = ""
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;

use prodtrace_audit::DEFAULT_UNKNOWN_MARKERS;
use prodtrace_map::MatchOptions;
use prodtrace_model::DepartmentCode;

/// Config file used when neither `--config` nor the environment names one.
pub const DEFAULT_CONFIG_FILE: &str = "prodtrace.toml";

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "PRODTRACE_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// JSON record store.
    pub store: PathBuf,
    #[serde(default)]
    pub departments: Vec<DepartmentConfig>,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentConfig {
    pub code: DepartmentCode,
    #[serde(default)]
    pub name: Option<String>,
    /// Supplier export for this department.
    pub csv: PathBuf,
}

impl DepartmentConfig {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.code.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatchingConfig {
    #[serde(flatten)]
    pub options: MatchOptions,
    /// Supplier values the backfill treats as unknown, compared case-insensitively.
    #[serde(default = "default_unknown_markers")]
    pub unknown_markers: Vec<String>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            options: MatchOptions::default(),
            unknown_markers: default_unknown_markers(),
        }
    }
}

fn default_unknown_markers() -> Vec<String> {
    DEFAULT_UNKNOWN_MARKERS
        .iter()
        .map(|marker| (*marker).to_string())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuditConfig {
    /// Written to `supplier_name` when no supplier can be determined.
    #[serde(default)]
    pub unknown_supplier: String,
}

impl AppConfig {
    /// Read and parse a config file, resolving relative paths against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let config = Self::from_toml_str(&contents, base_dir)
            .with_context(|| format!("invalid config {}", path.display()))?;
        debug!(
            path = %path.display(),
            departments = config.departments.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parse config text; relative paths are joined onto `base_dir`.
    pub fn from_toml_str(contents: &str, base_dir: &Path) -> Result<Self> {
        let mut config: Self = toml::from_str(contents)?;
        config.store = resolve_path(base_dir, &config.store);
        for department in &mut config.departments {
            department.csv = resolve_path(base_dir, &department.csv);
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (position, department) in self.departments.iter().enumerate() {
            if self.departments[..position]
                .iter()
                .any(|earlier| earlier.code == department.code)
            {
                bail!("department {} is configured twice", department.code);
            }
        }
        Ok(())
    }

    pub fn department(&self, code: &DepartmentCode) -> Option<&DepartmentConfig> {
        self.departments.iter().find(|d| &d.code == code)
    }
}

/// Pick the config file: the explicit flag, then `PRODTRACE_CONFIG`, then
/// `prodtrace.toml` in the working directory.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match env::var_os(CONFIG_ENV_VAR) {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodtrace_map::CrossDepartmentPolicy;

    #[test]
    fn optional_sections_fall_back_to_defaults() {
        let config = AppConfig::from_toml_str("store = \"db.json\"\n", Path::new("/srv")).unwrap();
        assert_eq!(config.store, PathBuf::from("/srv/db.json"));
        assert!(config.departments.is_empty());
        assert_eq!(config.matching, MatchingConfig::default());
        assert_eq!(config.matching.unknown_markers, vec!["", "Unknown"]);
        assert_eq!(config.audit.unknown_supplier, "");
    }

    #[test]
    fn matching_section_is_flattened_into_options() {
        let config = AppConfig::from_toml_str(
            r#"
store = "/abs/db.json"

[[departments]]
code = "bakery"
csv = "suppliers/bakery.csv"

[matching]
substring = false
cross_department_policy = "department_order"
unknown_markers = ["N/A"]

[audit]
unknown_supplier = "Unknown"
"#,
            Path::new("/srv"),
        )
        .unwrap();
        assert_eq!(config.store, PathBuf::from("/abs/db.json"));
        let bakery = &config.departments[0];
        assert_eq!(bakery.code.as_str(), "BAKERY");
        assert_eq!(bakery.display_name(), "BAKERY");
        assert_eq!(bakery.csv, PathBuf::from("/srv/suppliers/bakery.csv"));
        assert!(!config.matching.options.substring);
        assert!(config.matching.options.cross_department);
        assert_eq!(
            config.matching.options.cross_department_policy,
            CrossDepartmentPolicy::DepartmentOrder
        );
        assert_eq!(config.matching.unknown_markers, vec!["N/A"]);
        assert_eq!(config.audit.unknown_supplier, "Unknown");
    }

    #[test]
    fn duplicate_departments_are_rejected() {
        let err = AppConfig::from_toml_str(
            r#"
store = "db.json"
[[departments]]
code = "HMR"
csv = "a.csv"
[[departments]]
code = "hmr"
csv = "b.csv"
"#,
            Path::new(""),
        )
        .unwrap_err();
        assert!(err.to_string().contains("HMR"));
    }

    #[test]
    fn explicit_path_wins() {
        assert_eq!(
            config_path(Some(Path::new("other.toml"))),
            PathBuf::from("other.toml")
        );
    }
}
