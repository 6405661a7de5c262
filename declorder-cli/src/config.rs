//! Configuration file loading for declorder.
//!
//! Discovers and loads `declorder.toml` from the working directory (or an
//! explicit `--config` path) and merges it with CLI arguments. CLI flags take
//! precedence.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use declorder_types::CheckFlags;
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "declorder.toml";

/// Top-level configuration from declorder.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeclorderConfig {
    /// Which ordering checks run.
    pub checks: ChecksConfig,

    /// File selection.
    pub files: FilesConfig,
}

/// `[checks]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChecksConfig {
    /// Constructors directly after their type, before its methods.
    pub constructor: bool,

    /// Exported methods before unexported ones.
    pub method_visibility: bool,

    /// Alphabetical order within constructors and each visibility bucket.
    pub alphabetical: bool,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        let flags = CheckFlags::default();
        Self {
            constructor: flags.constructor_check,
            method_visibility: flags.method_visibility_check,
            alphabetical: flags.alphabetical_check,
        }
    }
}

/// `[files]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    /// Glob patterns for paths that are never checked.
    pub exclude: Vec<String>,
}

/// Discover the declorder.toml config file in `root`.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a declorder.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<DeclorderConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<DeclorderConfig> {
    let config: DeclorderConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load `explicit` if given (it must exist), else `root/declorder.toml` if
/// present, else defaults.
pub fn load_or_default(
    root: &Utf8Path,
    explicit: Option<&Utf8Path>,
) -> anyhow::Result<DeclorderConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match discover_config(root) {
        Some(path) => load_config(&path),
        None => Ok(DeclorderConfig::default()),
    }
}

/// Check toggles as given on the command line. `false` means "not given".
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOverrides {
    pub alphabetical: bool,
    pub no_constructor_check: bool,
    pub no_method_visibility_check: bool,
}

/// Configuration after merging the config file with CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedConfig {
    pub checks: CheckFlags,
    pub exclude: Vec<String>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: DeclorderConfig,
}

impl ConfigMerger {
    pub fn new(config: DeclorderConfig) -> Self {
        Self { config }
    }

    /// Merge with `check` command arguments.
    ///
    /// Flags that are set win over `[checks]`. CLI `exclude` patterns extend
    /// the config file list.
    pub fn merge_check_args(self, cli: CheckOverrides, cli_exclude: &[String]) -> MergedConfig {
        let file = self.config.checks;
        let checks = CheckFlags {
            constructor_check: file.constructor && !cli.no_constructor_check,
            method_visibility_check: file.method_visibility && !cli.no_method_visibility_check,
            alphabetical_check: file.alphabetical || cli.alphabetical,
        };

        let mut exclude = self.config.files.exclude;
        for pattern in cli_exclude {
            if !exclude.contains(pattern) {
                exclude.push(pattern.clone());
            }
        }

        MergedConfig { checks, exclude }
    }
}
