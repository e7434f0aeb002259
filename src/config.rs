use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::syntax::highlight::DEFAULT_THEME;

/// File name of the per-directory override
pub const LOCAL_CONFIG: &str = ".hunkline.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HlConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

/// [display] section configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Start in side-by-side mode
    #[serde(default)]
    pub split_view: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_tab_width")]
    pub tab_width: u8,
    #[serde(default = "default_true")]
    pub line_numbers: bool,
    /// Syntax coloring
    #[serde(default = "default_true")]
    pub syntax: bool,
}

/// [watch] section configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

fn default_tab_width() -> u8 {
    4
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            split_view: false,
            theme: default_theme(),
            tab_width: default_tab_width(),
            line_numbers: true,
            syntax: true,
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Global config path (`~/.config/hunkline/config.toml` on Linux)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("hunkline").join("config.toml"))
}

/// Load config by merging global defaults with per-directory overrides.
/// Priority: `<dir>/.hunkline.toml` > global config > built-in defaults.
/// Merging is deep: individual fields within sections override independently.
pub fn load_config(dir: &Path) -> HlConfig {
    load_config_from(global_config_path().as_deref(), &dir.join(LOCAL_CONFIG))
}

fn load_config_from(global_path: Option<&Path>, local_path: &Path) -> HlConfig {
    let global_table = global_path.and_then(read_table);
    let local_table = read_table(local_path);

    let merged = match (global_table, local_table) {
        (Some(mut global), Some(local)) => {
            deep_merge(&mut global, local);
            toml::Value::Table(global)
        }
        (Some(global), None) => toml::Value::Table(global),
        (None, Some(local)) => toml::Value::Table(local),
        (None, None) => return HlConfig::default(),
    };

    merged.try_into().unwrap_or_else(|e| {
        log::warn!("Invalid config, using defaults: {}", e);
        HlConfig::default()
    })
}

/// Read a TOML file as a table. Missing files are silent; broken ones are logged.
fn read_table(path: &Path) -> Option<toml::map::Map<String, toml::Value>> {
    let content = std::fs::read_to_string(path).ok()?;
    match content.parse::<toml::Table>() {
        Ok(t) => Some(t),
        Err(e) => {
            log::warn!("Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

/// Recursively merge `overlay` into `base`. Overlay values win; nested tables are merged recursively.
fn deep_merge(
    base: &mut toml::map::Map<String, toml::Value>,
    overlay: toml::map::Map<String, toml::Value>,
) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Save config to the global config dir.
pub fn save_config(config: &HlConfig) -> Result<PathBuf> {
    let path = global_config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    save_config_to(config, &path)?;
    Ok(path)
}

fn save_config_to(config: &HlConfig, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_config_from(None, &dir.path().join(LOCAL_CONFIG));
        assert_eq!(cfg, HlConfig::default());
        assert_eq!(cfg.display.theme, DEFAULT_THEME);
        assert_eq!(cfg.display.tab_width, 4);
        assert!(cfg.watch.enabled);
    }

    #[test]
    fn local_overrides_global_field_by_field() {
        let dir = tempfile::tempdir().expect("tempdir");
        let global = dir.path().join("global.toml");
        let local = dir.path().join(LOCAL_CONFIG);
        std::fs::write(&global, "[display]\nsplit_view = true\ntab_width = 8\n").expect("write");
        std::fs::write(&local, "[display]\ntab_width = 2\n[watch]\nenabled = false\n").expect("write");

        let cfg = load_config_from(Some(&global), &local);
        assert!(cfg.display.split_view);
        assert_eq!(cfg.display.tab_width, 2);
        assert!(!cfg.watch.enabled);
        assert_eq!(cfg.watch.debounce_ms, 300);
    }

    #[test]
    fn whole_document_is_read_as_table() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(LOCAL_CONFIG);
        std::fs::write(&path, "[display]\ntheme = \"InspiredGitHub\"\n\n[watch]\ndebounce_ms = 50\n")
            .expect("write");
        let table = read_table(&path).expect("table");
        assert!(table.contains_key("display"));
        assert!(table.contains_key("watch"));

        let cfg = load_config_from(None, &path);
        assert_eq!(cfg.display.theme, "InspiredGitHub");
        assert_eq!(cfg.watch.debounce_ms, 50);
    }

    #[test]
    fn broken_file_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let local = dir.path().join(LOCAL_CONFIG);
        std::fs::write(&local, "[display\nsplit_view = ").expect("write");
        assert_eq!(load_config_from(None, &local), HlConfig::default());

        std::fs::write(&local, "[display]\ntab_width = \"wide\"\n").expect("write");
        assert_eq!(load_config_from(None, &local), HlConfig::default());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = HlConfig::default();
        cfg.display.split_view = true;
        cfg.display.theme = "InspiredGitHub".to_string();
        save_config_to(&cfg, &path).expect("save");
        assert_eq!(load_config_from(Some(&path), &dir.path().join(LOCAL_CONFIG)), cfg);
    }
}
