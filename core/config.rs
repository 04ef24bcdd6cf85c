use crate::error::{AppError, Result};
use crate::extensions::normalize_extension;
use crate::presets;
use log;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILENAME: &str = "ctxgen.json";
pub const DEFAULT_OUTPUT_FILE: &str = "project-context.md";
pub const DEFAULT_MAX_FILE_SIZE_KB: u64 = 1024;

static DEFAULT_EXCLUDE_PATHS: Lazy<BTreeSet<String>> = Lazy::new(|| {
    [
        "node_modules/",
        "dist/",
        "build/",
        "coverage/",
        "target/",
        "vendor/",
        "package-lock.json",
        "yarn.lock",
        "pnpm-lock.yaml",
        "*.log",
        "*.lock",
        "*.min.js",
        "*.map",
    ]
    .into_iter()
    .map(String::from)
    .collect()
});

static DEFAULT_INCLUDE_EXTENSIONS: Lazy<BTreeSet<String>> = Lazy::new(|| {
    [
        ".js", ".jsx", ".mjs", ".cjs", ".ts", ".tsx", ".json", ".md", ".py", ".rs", ".go",
        ".java", ".kt", ".rb", ".php", ".c", ".h", ".cpp", ".hpp", ".cs", ".sh", ".yml",
        ".yaml", ".toml", ".html", ".css", ".scss", ".sql", ".txt",
    ]
    .into_iter()
    .map(String::from)
    .collect()
});

/// The persisted, additively-composable configuration. Field names and value
/// shapes are the wire contract and must remain stable across versions; the
/// `BTreeSet` fields persist sorted and deduplicated for diff-friendliness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    pub exclude_paths: BTreeSet<String>,
    pub include_extensions: BTreeSet<String>,
    #[serde(default)]
    pub include_paths: BTreeSet<String>,
    #[serde(rename = "maxFileSizeKB")]
    pub max_file_size_kb: u64,
    pub output_file: String,
    #[serde(default = "default_true")]
    pub use_gitignore: bool,
    #[serde(default)]
    pub presets: BTreeSet<String>,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude_paths: DEFAULT_EXCLUDE_PATHS.clone(),
            include_extensions: DEFAULT_INCLUDE_EXTENSIONS.clone(),
            include_paths: BTreeSet::new(),
            max_file_size_kb: DEFAULT_MAX_FILE_SIZE_KB,
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            use_gitignore: true,
            presets: BTreeSet::new(),
        }
    }
}

/// One invocation's worth of CLI-supplied changes, applied in a fixed order
/// by [`Config::apply_delta`].
#[derive(Debug, Clone, Default)]
pub struct ConfigDelta {
    pub reset: bool,
    pub presets: Vec<String>,
    pub add_excludes: Vec<String>,
    pub remove_excludes: Vec<String>,
    pub add_extensions: Vec<String>,
    pub remove_extensions: Vec<String>,
    pub add_include_paths: Vec<String>,
    pub output_file: Option<String>,
    pub max_file_size_kb: Option<u64>,
    pub use_gitignore: Option<bool>,
}

impl ConfigDelta {
    pub fn is_empty(&self) -> bool {
        !self.reset
            && self.presets.is_empty()
            && self.add_excludes.is_empty()
            && self.remove_excludes.is_empty()
            && self.add_extensions.is_empty()
            && self.remove_extensions.is_empty()
            && self.add_include_paths.is_empty()
            && self.output_file.is_none()
            && self.max_file_size_kb.is_none()
            && self.use_gitignore.is_none()
    }
}

impl Config {
    /// Loads the persisted configuration, falling back to the built-in
    /// defaults when the file is absent. A corrupt or unreadable file is a
    /// non-fatal condition: the defaults are used, nothing on disk is
    /// touched, and the warning is returned for the caller to surface.
    pub fn load_or_default(config_path: &Path) -> (Self, Option<String>) {
        if !config_path.exists() {
            log::debug!(
                "No config file at {}, using defaults.",
                config_path.display()
            );
            return (Self::default(), None);
        }
        log::info!("Loading configuration from: {}", config_path.display());
        let raw = match fs::read_to_string(config_path) {
            Ok(raw) => raw,
            Err(e) => {
                let warning = format!(
                    "Could not read config file '{}': {}. Using defaults.",
                    config_path.display(),
                    e
                );
                log::warn!("{}", warning);
                return (Self::default(), Some(warning));
            }
        };
        match serde_json::from_str::<Config>(&raw) {
            Ok(mut config) => {
                // Hand-edited files may carry bare or mixed-case entries;
                // the in-memory allow-list is always dotted lowercase.
                let normalized: BTreeSet<String> = config
                    .include_extensions
                    .iter()
                    .map(|ext| normalize_extension(ext))
                    .collect();
                if normalized != config.include_extensions {
                    log::debug!("Normalized extension entries from persisted config.");
                    config.include_extensions = normalized;
                }
                (config, None)
            }
            Err(e) => {
                let warning = format!(
                    "Could not parse config file '{}': {}. Using defaults.",
                    config_path.display(),
                    e
                );
                log::warn!("{}", warning);
                (Self::default(), Some(warning))
            }
        }
    }

    /// Unions a named preset's entries into this configuration and records
    /// the name. Idempotent: applying the same preset twice leaves the
    /// configuration unchanged.
    pub fn merge_preset(&mut self, name: &str) -> Result<bool> {
        let preset = presets::get_preset(name)
            .ok_or_else(|| AppError::UnknownPreset(name.to_string()))?;

        let mut changed = false;
        for pattern in &preset.exclude_paths {
            changed |= self.exclude_paths.insert(pattern.clone());
        }
        for ext in &preset.include_extensions {
            changed |= self
                .include_extensions
                .insert(normalize_extension(ext));
        }
        changed |= self.presets.insert(name.to_string());

        log::debug!(
            "Merged preset '{}' ({}).",
            name,
            if changed { "changed" } else { "no change" }
        );
        Ok(changed)
    }

    /// Applies one invocation's CLI deltas in a fixed order: reset, preset
    /// unions, exclude additions, exclude removals, extension additions,
    /// extension removals, scalar overrides, force-include additions.
    /// Removals run after additions so a preset's exclusion can be
    /// countermanded by an explicit removal in the same invocation.
    ///
    /// Returns true when the configuration changed and persisting it is
    /// warranted. Unknown preset names are warned about and skipped.
    pub fn apply_delta(&mut self, delta: &ConfigDelta) -> bool {
        let mut changed = false;

        if delta.reset {
            log::info!("Resetting configuration to built-in defaults.");
            *self = Self::default();
            changed = true;
        }

        for name in &delta.presets {
            match self.merge_preset(name) {
                Ok(preset_changed) => changed |= preset_changed,
                Err(e) => log::warn!("Skipping preset: {}", e),
            }
        }

        for pattern in &delta.add_excludes {
            changed |= self.exclude_paths.insert(pattern.clone());
        }
        for pattern in &delta.remove_excludes {
            changed |= self.exclude_paths.remove(pattern);
        }

        for ext in &delta.add_extensions {
            changed |= self.include_extensions.insert(normalize_extension(ext));
        }
        for ext in &delta.remove_extensions {
            changed |= self.include_extensions.remove(&normalize_extension(ext));
        }

        if let Some(output_file) = &delta.output_file {
            if *output_file != self.output_file {
                self.output_file = output_file.clone();
                changed = true;
            }
        }
        if let Some(max_kb) = delta.max_file_size_kb {
            if max_kb == 0 {
                log::warn!("Ignoring --max-size 0: the size ceiling must be positive.");
            } else if max_kb != self.max_file_size_kb {
                self.max_file_size_kb = max_kb;
                changed = true;
            }
        }
        if let Some(use_gitignore) = delta.use_gitignore {
            if use_gitignore != self.use_gitignore {
                self.use_gitignore = use_gitignore;
                changed = true;
            }
        }

        for path in &delta.add_include_paths {
            changed |= self.include_paths.insert(path.clone());
        }

        changed
    }

    /// Writes the canonicalized configuration as pretty JSON. Side effect
    /// only; the persisted file is never consulted again within the run.
    pub fn persist(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| AppError::FileWrite {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(config_path, json).map_err(|e| AppError::FileWrite {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        log::info!("Configuration persisted to: {}", config_path.display());
        Ok(())
    }

    pub fn determine_project_root(cli_project_root: Option<&PathBuf>) -> Result<PathBuf> {
        let path_str_opt = cli_project_root
            .map(|p| p.to_string_lossy().to_string())
            .or_else(|| env::var("PROJECT_ROOT").ok().filter(|s| !s.is_empty()));

        let path_to_resolve = match path_str_opt {
            Some(p_str) => PathBuf::from(shellexpand::tilde(&p_str).as_ref()),
            None => env::current_dir().map_err(AppError::Io)?,
        };

        path_to_resolve.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to canonicalize project root '{}': {}",
                    path_to_resolve.display(),
                    e
                ),
            ))
        })
    }

    /// Resolves the config file location: an explicit CLI path (tilde
    /// expanded, relative to the project root when not absolute) or the
    /// default `ctxgen.json` at the root.
    pub fn resolve_config_path(project_root: &Path, cli_config_file: Option<&String>) -> PathBuf {
        match cli_config_file {
            Some(p_str) => {
                let expanded = shellexpand::tilde(p_str);
                let path = PathBuf::from(expanded.as_ref());
                if path.is_absolute() {
                    path
                } else {
                    project_root.join(path)
                }
            }
            None => project_root.join(DEFAULT_CONFIG_FILENAME),
        }
    }

    pub fn effective_project_name(project_root: &Path) -> String {
        project_root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "UnknownProject".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn preset_merge_is_idempotent() -> Result<()> {
        let mut config = Config::default();
        config.merge_preset("node")?;
        let once = config.clone();
        let changed = config.merge_preset("node")?;
        assert!(!changed);
        assert_eq!(config, once);
        Ok(())
    }

    #[test]
    fn preset_union_is_order_independent() -> Result<()> {
        let mut ab = Config::default();
        ab.merge_preset("node")?;
        ab.merge_preset("python")?;

        let mut ba = Config::default();
        ba.merge_preset("python")?;
        ba.merge_preset("node")?;

        assert_eq!(ab, ba);
        Ok(())
    }

    #[test]
    fn unknown_preset_errors_but_delta_continues() {
        let mut config = Config::default();
        assert!(matches!(
            config.merge_preset("not-a-preset"),
            Err(AppError::UnknownPreset(_))
        ));

        // Via a delta the unknown name is skipped and the rest still applies.
        let delta = ConfigDelta {
            presets: vec!["not-a-preset".to_string()],
            add_excludes: vec!["extra/".to_string()],
            ..Default::default()
        };
        assert!(config.apply_delta(&delta));
        assert!(config.exclude_paths.contains("extra/"));
        assert!(!config.presets.contains("not-a-preset"));
    }

    #[test]
    fn exclude_removal_runs_after_additions() {
        let mut config = Config::default();
        // node adds node_modules/; the removal in the same delta wins.
        let delta = ConfigDelta {
            presets: vec!["node".to_string()],
            remove_excludes: vec!["node_modules/".to_string()],
            ..Default::default()
        };
        config.apply_delta(&delta);
        assert!(!config.exclude_paths.contains("node_modules/"));
        assert!(config.presets.contains("node"));
    }

    #[test]
    fn extension_delta_normalizes_bare_names() {
        let mut config = Config::default();
        let delta = ConfigDelta {
            add_extensions: vec!["SVG".to_string()],
            remove_extensions: vec!["md".to_string()],
            ..Default::default()
        };
        config.apply_delta(&delta);
        assert!(config.include_extensions.contains(".svg"));
        assert!(!config.include_extensions.contains(".md"));
    }

    #[test]
    fn scalar_overrides_and_change_reporting() {
        let mut config = Config::default();
        assert!(!config.apply_delta(&ConfigDelta::default()));

        let delta = ConfigDelta {
            output_file: Some("ctx.md".to_string()),
            max_file_size_kb: Some(64),
            use_gitignore: Some(false),
            ..Default::default()
        };
        assert!(config.apply_delta(&delta));
        assert_eq!(config.output_file, "ctx.md");
        assert_eq!(config.max_file_size_kb, 64);
        assert!(!config.use_gitignore);

        // Re-applying the identical delta changes nothing.
        assert!(!config.apply_delta(&delta));
    }

    #[test]
    fn zero_size_ceiling_is_ignored() {
        let mut config = Config::default();
        let delta = ConfigDelta {
            max_file_size_kb: Some(0),
            ..Default::default()
        };
        assert!(!config.apply_delta(&delta));
        assert_eq!(config.max_file_size_kb, DEFAULT_MAX_FILE_SIZE_KB);
    }

    #[test]
    fn reset_restores_defaults_before_other_steps() {
        let mut config = Config::default();
        config.apply_delta(&ConfigDelta {
            add_excludes: vec!["junk/".to_string()],
            ..Default::default()
        });
        assert!(config.exclude_paths.contains("junk/"));

        let delta = ConfigDelta {
            reset: true,
            add_extensions: vec!["zig".to_string()],
            ..Default::default()
        };
        assert!(config.apply_delta(&delta));
        assert!(!config.exclude_paths.contains("junk/"));
        assert!(config.include_extensions.contains(".zig"));
    }

    #[test]
    fn persist_and_reload_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(DEFAULT_CONFIG_FILENAME);

        let mut config = Config::default();
        config.merge_preset("rust")?;
        config.include_paths.insert(".github".to_string());
        config.persist(&path)?;

        let (reloaded, warning) = Config::load_or_default(&path);
        assert!(warning.is_none());
        assert_eq!(reloaded, config);

        // Wire contract: camelCase keys, sorted arrays.
        let raw = std::fs::read_to_string(&path)?;
        assert!(raw.contains("\"excludePaths\""));
        assert!(raw.contains("\"maxFileSizeKB\""));
        assert!(raw.contains("\"includePaths\""));
        Ok(())
    }

    #[test]
    fn corrupt_config_falls_back_to_defaults_with_warning() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(DEFAULT_CONFIG_FILENAME);
        std::fs::write(&path, "{ not json")?;

        let (config, warning) = Config::load_or_default(&path);
        assert_eq!(config, Config::default());
        assert!(warning.is_some());
        // The corrupt file itself is left alone.
        assert_eq!(std::fs::read_to_string(&path)?, "{ not json");
        Ok(())
    }

    #[test]
    fn hand_edited_extension_entries_are_normalized_on_load() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(DEFAULT_CONFIG_FILENAME);

        let mut config = Config::default();
        config.persist(&path)?;
        // Simulate a hand-edited file with mixed-case and bare entries.
        let raw = std::fs::read_to_string(&path)?;
        let raw = raw.replace("\".js\"", "\".JS\"").replace("\".ts\"", "\"ts\"");
        std::fs::write(&path, raw)?;

        let (reloaded, warning) = Config::load_or_default(&path);
        assert!(warning.is_none());
        assert!(reloaded.include_extensions.contains(".js"));
        assert!(reloaded.include_extensions.contains(".ts"));
        assert!(!reloaded.include_extensions.contains(".JS"));
        assert!(!reloaded.include_extensions.contains("ts"));
        Ok(())
    }

    #[test]
    fn missing_config_is_defaults_without_warning() {
        let (config, warning) = Config::load_or_default(Path::new("/nonexistent/ctxgen.json"));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }
}
