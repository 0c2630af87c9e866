//! Layered configuration: built-in defaults, then a TOML file, then
//! `SIB_*` environment overrides on top.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, SibError};
use crate::inventory::sort::SortKey;

/// Full SIB configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub view: ViewConfig,
    pub motion: MotionConfig,
    pub contact: ContactConfig,
    pub log: LogConfig,
    pub tui: TuiConfig,
    pub paths: PathsConfig,
}

/// Inventory view-state knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ViewConfig {
    /// Quiet interval before a typed search term is applied.
    pub debounce_ms: u64,
    /// Category constraint a fresh session starts with.
    pub default_filter: String,
    /// Sort token a fresh session starts with (must parse; "none" keeps load order).
    pub default_sort: String,
}

/// Reveal, counter, and scroll animation knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
    /// Fraction of an element that must be in view before it reveals.
    pub reveal_threshold: f64,
    /// Rows shaved off the viewport bottom before reveal checks.
    pub reveal_bottom_margin: u32,
    /// Fraction of a counter block in view before its tween starts.
    pub counter_threshold: f64,
    /// Number of equal increments a counter animates through.
    pub counter_steps: u32,
    /// Milliseconds between counter increments.
    pub counter_tick_ms: u64,
    /// Rows reserved for the fixed header when resolving anchor targets.
    pub header_offset: u32,
    /// Leading-edge suppression window for scroll-driven recomputes.
    pub scroll_throttle_ms: u64,
}

/// Contact form behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContactConfig {
    /// Banner text shown after a successful submission.
    pub success_message: String,
    /// How long the success banner stays up.
    pub success_display_ms: u64,
}

/// Interaction log behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub enabled: bool,
    /// Rotate the JSONL log once it exceeds this size.
    pub max_size_kb: u64,
}

/// Terminal browser tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TuiConfig {
    /// Runtime tick cadence; counters advance on this clock.
    pub tick_ms: u64,
    /// Visible toast cap; older toasts are dropped first.
    pub max_notifications: usize,
    /// Palette name; unknown values fall back to "dark".
    pub theme: String,
}

/// Filesystem paths used by sib.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    pub catalog_file: PathBuf,
    pub interaction_log: PathBuf,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            default_filter: "all".to_string(),
            default_sort: "none".to_string(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            reveal_threshold: 0.1,
            reveal_bottom_margin: 50,
            counter_threshold: 0.5,
            counter_steps: 50,
            counter_tick_ms: 40,
            header_offset: 80,
            scroll_throttle_ms: 100,
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            success_message: "Thank you for your message! We'll get back to you soon.".to_string(),
            success_display_ms: 5_000,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size_kb: 512,
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_ms: 40,
            max_notifications: 3,
            theme: "dark".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!(
                    "[SIB-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths"
                );
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        let cfg = home_dir.join(".config").join("sib").join("config.toml");
        let data = home_dir.join(".local").join("share").join("sib");
        Self {
            config_file: cfg,
            catalog_file: data.join("catalog.json"),
            interaction_log: data.join("interactions.jsonl"),
        }
    }
}

impl Config {
    /// Where the config file lives when no `--config` flag is given.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Read the config, layering `SIB_*` env overrides on top.
    ///
    /// An absent file at the default path falls back to defaults silently.
    /// An absent file at an explicitly requested path is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| SibError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(SibError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write the config as pretty TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let rendered =
            toml::to_string_pretty(self).map_err(|error| SibError::Serialization {
                context: "toml",
                details: error.to_string(),
            })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SibError::io(parent, source))?;
        }
        fs::write(path, rendered).map_err(|source| SibError::io(path, source))
    }

    /// Short fingerprint of the effective config, printed by `config
    /// validate` and the verbose CLI path.
    ///
    /// FNV-1a over the canonical JSON form. `DefaultHasher` is unsuitable
    /// here since its seed is not stable across Rust releases.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_env_overrides_from(env_var)
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        // view
        if let Some(raw) = lookup("SIB_VIEW_DEBOUNCE_MS") {
            self.view.debounce_ms = parse_env_u64("SIB_VIEW_DEBOUNCE_MS", &raw)?;
        }
        if let Some(raw) = lookup("SIB_VIEW_DEFAULT_FILTER") {
            self.view.default_filter = raw;
        }
        if let Some(raw) = lookup("SIB_VIEW_DEFAULT_SORT") {
            self.view.default_sort = raw;
        }

        // motion
        if let Some(raw) = lookup("SIB_MOTION_REVEAL_THRESHOLD") {
            self.motion.reveal_threshold = parse_env_f64("SIB_MOTION_REVEAL_THRESHOLD", &raw)?;
        }
        if let Some(raw) = lookup("SIB_MOTION_COUNTER_STEPS") {
            self.motion.counter_steps = parse_env_u32("SIB_MOTION_COUNTER_STEPS", &raw)?;
        }
        if let Some(raw) = lookup("SIB_MOTION_COUNTER_TICK_MS") {
            self.motion.counter_tick_ms = parse_env_u64("SIB_MOTION_COUNTER_TICK_MS", &raw)?;
        }
        if let Some(raw) = lookup("SIB_MOTION_HEADER_OFFSET") {
            self.motion.header_offset = parse_env_u32("SIB_MOTION_HEADER_OFFSET", &raw)?;
        }

        // contact
        if let Some(raw) = lookup("SIB_CONTACT_SUCCESS_DISPLAY_MS") {
            self.contact.success_display_ms =
                parse_env_u64("SIB_CONTACT_SUCCESS_DISPLAY_MS", &raw)?;
        }

        // log
        if let Some(raw) = lookup("SIB_LOG_ENABLED") {
            self.log.enabled = parse_env_bool("SIB_LOG_ENABLED", &raw)?;
        }
        if let Some(raw) = lookup("SIB_LOG_MAX_SIZE_KB") {
            self.log.max_size_kb = parse_env_u64("SIB_LOG_MAX_SIZE_KB", &raw)?;
        }
        if let Some(raw) = lookup("SIB_LOG_PATH") {
            self.paths.interaction_log = PathBuf::from(raw);
        }

        // tui
        if let Some(raw) = lookup("SIB_TUI_TICK_MS") {
            self.tui.tick_ms = parse_env_u64("SIB_TUI_TICK_MS", &raw)?;
        }
        if let Some(raw) = lookup("SIB_TUI_THEME") {
            self.tui.theme = raw;
        }

        // catalog
        if let Some(raw) = lookup("SIB_CATALOG_FILE") {
            self.paths.catalog_file = PathBuf::from(raw);
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.view.debounce_ms > 10_000 {
            return Err(SibError::InvalidConfig {
                details: format!(
                    "view.debounce_ms must be <= 10000, got {}",
                    self.view.debounce_ms
                ),
            });
        }
        if self.view.default_filter.trim().is_empty() {
            return Err(SibError::InvalidConfig {
                details: "view.default_filter must not be empty".to_string(),
            });
        }
        if SortKey::parse(&self.view.default_sort).is_none() {
            return Err(SibError::InvalidConfig {
                details: format!(
                    "view.default_sort {:?} is not a sort token (none, price-low, price-high, year-new, year-old)",
                    self.view.default_sort
                ),
            });
        }

        validate_fraction("motion.reveal_threshold", self.motion.reveal_threshold)?;
        validate_fraction("motion.counter_threshold", self.motion.counter_threshold)?;
        if self.motion.counter_steps == 0 {
            return Err(SibError::InvalidConfig {
                details: "motion.counter_steps must be >= 1".to_string(),
            });
        }
        if self.motion.counter_tick_ms == 0 {
            return Err(SibError::InvalidConfig {
                details: "motion.counter_tick_ms must be >= 1".to_string(),
            });
        }

        if self.contact.success_message.trim().is_empty() {
            return Err(SibError::InvalidConfig {
                details: "contact.success_message must not be empty".to_string(),
            });
        }
        if self.contact.success_display_ms == 0 {
            return Err(SibError::InvalidConfig {
                details: "contact.success_display_ms must be >= 1".to_string(),
            });
        }

        if self.log.max_size_kb == 0 {
            return Err(SibError::InvalidConfig {
                details: "log.max_size_kb must be >= 1".to_string(),
            });
        }

        if self.tui.tick_ms == 0 || self.tui.tick_ms > 1_000 {
            return Err(SibError::InvalidConfig {
                details: format!("tui.tick_ms must be in [1, 1000], got {}", self.tui.tick_ms),
            });
        }
        if self.tui.max_notifications == 0 {
            return Err(SibError::InvalidConfig {
                details: "tui.max_notifications must be >= 1".to_string(),
            });
        }

        Ok(())
    }
}

fn validate_fraction(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SibError::InvalidConfig {
            details: format!("{name} must be in [0,1], got {value}"),
        });
    }
    Ok(())
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_u64(name: &str, raw: &str) -> Result<u64> {
    raw.parse::<u64>().map_err(|error| SibError::ConfigParse {
        context: "env",
        details: format!("{name}={raw:?}: {error}"),
    })
}

fn parse_env_u32(name: &str, raw: &str) -> Result<u32> {
    raw.parse::<u32>().map_err(|error| SibError::ConfigParse {
        context: "env",
        details: format!("{name}={raw:?}: {error}"),
    })
}

fn parse_env_f64(name: &str, raw: &str) -> Result<f64> {
    raw.parse::<f64>().map_err(|error| SibError::ConfigParse {
        context: "env",
        details: format!("{name}={raw:?}: {error}"),
    })
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    raw.parse::<bool>().map_err(|error| SibError::ConfigParse {
        context: "env",
        details: format!("{name}={raw:?}: {error}"),
    })
}

#[cfg(test)]
mod tests {
    use super::{Config, SibError};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn defaults_pass_validation() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn default_timings_match_reference_behavior() {
        let cfg = Config::default();
        assert_eq!(cfg.view.debounce_ms, 300);
        assert_eq!(cfg.motion.counter_steps, 50);
        assert_eq!(cfg.motion.counter_tick_ms, 40);
        assert_eq!(cfg.motion.header_offset, 80);
        assert_eq!(cfg.contact.success_display_ms, 5_000);
    }

    #[test]
    fn oversized_debounce_rejected() {
        let mut cfg = Config::default();
        cfg.view.debounce_ms = 60_000;
        let err = cfg.validate().expect_err("expected debounce error");
        match err {
            SibError::InvalidConfig { details } => {
                assert!(details.contains("debounce_ms"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_default_sort_rejected() {
        let mut cfg = Config::default();
        cfg.view.default_sort = "mileage-low".to_string();
        let err = cfg.validate().expect_err("expected sort token error");
        assert!(err.to_string().contains("sort token"));
    }

    #[test]
    fn reveal_threshold_out_of_range_rejected() {
        let mut cfg = Config::default();
        cfg.motion.reveal_threshold = 1.5;
        let err = cfg.validate().expect_err("expected threshold error");
        assert!(err.to_string().contains("reveal_threshold"));
    }

    #[test]
    fn zero_counter_steps_rejected() {
        let mut cfg = Config::default();
        cfg.motion.counter_steps = 0;
        let err = cfg.validate().expect_err("expected counter error");
        assert!(err.to_string().contains("counter_steps"));
    }

    #[test]
    fn empty_success_message_rejected() {
        let mut cfg = Config::default();
        cfg.contact.success_message = "   ".to_string();
        let err = cfg.validate().expect_err("expected message error");
        assert!(err.to_string().contains("success_message"));
    }

    #[test]
    fn tui_tick_bounds_enforced() {
        let mut cfg = Config::default();
        cfg.tui.tick_ms = 0;
        assert!(cfg.validate().is_err());
        cfg.tui.tick_ms = 5_000;
        assert!(cfg.validate().is_err());
        cfg.tui.tick_ms = 40;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn env_overrides_apply_through_injected_lookup() {
        let mut cfg = Config::default();
        let overrides = vars(&[
            ("SIB_VIEW_DEBOUNCE_MS", "150"),
            ("SIB_VIEW_DEFAULT_FILTER", "suv"),
            ("SIB_TUI_THEME", "light"),
            ("SIB_CATALOG_FILE", "/tmp/sib/stock.json"),
        ]);

        cfg.apply_env_overrides_from(|name| overrides.get(name).cloned())
            .expect("env overrides should parse");

        assert_eq!(cfg.view.debounce_ms, 150);
        assert_eq!(cfg.view.default_filter, "suv");
        assert_eq!(cfg.tui.theme, "light");
        assert_eq!(cfg.paths.catalog_file, PathBuf::from("/tmp/sib/stock.json"));
    }

    #[test]
    fn env_invalid_number_rejected() {
        let mut cfg = Config::default();
        let overrides = vars(&[("SIB_VIEW_DEBOUNCE_MS", "soon")]);

        let err = cfg
            .apply_env_overrides_from(|name| overrides.get(name).cloned())
            .expect_err("invalid u64 should fail");
        match err {
            SibError::ConfigParse { context, details } => {
                assert_eq!(context, "env");
                assert!(details.contains("SIB_VIEW_DEBOUNCE_MS"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn env_invalid_boolean_rejected() {
        let mut cfg = Config::default();
        let overrides = vars(&[("SIB_LOG_ENABLED", "yes-please")]);

        let err = cfg
            .apply_env_overrides_from(|name| overrides.get(name).cloned())
            .expect_err("invalid bool should fail");
        assert!(matches!(err, SibError::ConfigParse { .. }));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/sib/config.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, SibError::MissingConfig { .. }));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.view.debounce_ms = 250;
        cfg.tui.theme = "light".to_string();
        cfg.save(&path).expect("save should succeed");

        let loaded = Config::load(Some(&path)).expect("load should succeed");
        assert_eq!(loaded.view.debounce_ms, 250);
        assert_eq!(loaded.tui.theme, "light");
    }

    #[test]
    fn hash_is_stable_across_calls() {
        let cfg = Config::default();
        let h1 = cfg.stable_hash().expect("hash");
        let h2 = cfg.stable_hash().expect("hash");
        assert_eq!(h1, h2);
    }

    #[test]
    fn hash_tracks_config_changes() {
        let cfg = Config::default();
        let hash_before = cfg.stable_hash().expect("hash should compute");
        let mut modified = Config::default();
        modified.view.debounce_ms += 1;
        let hash_after = modified.stable_hash().expect("hash should compute");
        assert_ne!(hash_before, hash_after);
    }
}
