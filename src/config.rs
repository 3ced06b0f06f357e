use crate::classifier::PathClassifier;
use crate::locations;
use crate::scan_job::{ScanPlan, PATH_EVENT_INTERVAL_MS};
use crate::scanner::CacheRoot;
use crate::sweeper::DEFAULT_DEPTH_LIMIT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Substrings of a final path component that mark it as sensitive.
pub const DEFAULT_EXCLUDE_KEYWORDS: &[&str] = &[
    "login data",
    "cookies",
    "web data",
    "bookmarks",
    "history",
    "preferences",
    "current sessions",
    "extension",
    "extensions",
    "local storage",
    "databases",
    "sessions",
    "key",
    "secret",
    "password",
    "autofill",
    "topsites",
    "favicons",
    "recovery",
    "wallet",
    "auth",
    "account",
    "token",
    "cache index",
];

/// Directory names the drive sweep treats as cache roots (case-sensitive).
pub const DEFAULT_CACHE_FOLDER_NAMES: &[&str] = &[
    "Cache",
    "cache",
    "cache2",
    "User Data",
    "Profile",
    "Default",
    "entries",
    "Opera Stable",
    "Brave-Browser",
    "YandexBrowser",
    ".mozilla",
    "temp",
    "tmp",
    "download",
    "updates",
    "logs",
    "recent",
    "thumbnails",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rules: Rules,

    #[serde(default)]
    pub paths: Paths,

    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rules {
    #[serde(default = "default_exclude_keywords")]
    pub exclude_keywords: Vec<String>,

    /// Empty means the platform defaults.
    #[serde(default)]
    pub protected_paths: Vec<PathBuf>,

    #[serde(default = "default_cache_folder_names")]
    pub cache_folder_names: Vec<String>,

    #[serde(default = "default_depth_limit")]
    pub depth_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    /// Empty means the platform defaults.
    #[serde(default)]
    pub scan_roots: Vec<PathBuf>,

    /// Empty means the platform defaults.
    #[serde(default)]
    pub browser_caches: Vec<CacheRoot>,

    /// Empty means every mounted volume.
    #[serde(default)]
    pub volume_roots: Vec<PathBuf>,

    #[serde(default = "default_true")]
    pub sweep_volumes: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Logging {
    /// Defaults to `error_log.txt` in the platform data directory.
    #[serde(default)]
    pub error_log: Option<PathBuf>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            exclude_keywords: default_exclude_keywords(),
            protected_paths: Vec::new(),
            cache_folder_names: default_cache_folder_names(),
            depth_limit: default_depth_limit(),
        }
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            scan_roots: Vec::new(),
            browser_caches: Vec::new(),
            volume_roots: Vec::new(),
            sweep_volumes: true,
        }
    }
}

fn default_exclude_keywords() -> Vec<String> {
    DEFAULT_EXCLUDE_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

fn default_cache_folder_names() -> Vec<String> {
    DEFAULT_CACHE_FOLDER_NAMES.iter().map(|s| s.to_string()).collect()
}

fn default_depth_limit() -> usize {
    DEFAULT_DEPTH_LIMIT
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Get the config file path: `<config dir>/trashcleaner/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let dirs = locations::project_dirs().context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load config from file or return defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) if path.exists() => match Self::load_from(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: {:#}", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to file
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, toml).context("Failed to write config file")?;

        Ok(())
    }

    /// Apply CLI option overrides
    pub fn apply_cli_overrides(&mut self, depth: Option<usize>, no_sweep: bool, roots: Vec<PathBuf>) {
        if let Some(depth) = depth {
            self.rules.depth_limit = depth;
        }
        if no_sweep {
            self.paths.sweep_volumes = false;
        }
        if !roots.is_empty() {
            self.paths.scan_roots = roots;
        }
    }

    /// Where caught filesystem errors are appended.
    pub fn error_log_path(&self) -> PathBuf {
        if let Some(path) = &self.logging.error_log {
            return path.clone();
        }
        locations::project_dirs()
            .map(|dirs| dirs.data_local_dir().join("error_log.txt"))
            .unwrap_or_else(|| PathBuf::from("error_log.txt"))
    }

    pub fn protected_paths(&self) -> Vec<PathBuf> {
        if self.rules.protected_paths.is_empty() {
            locations::default_protected_paths()
        } else {
            self.rules.protected_paths.clone()
        }
    }

    pub fn classifier(&self) -> PathClassifier {
        PathClassifier::new(&self.rules.exclude_keywords, self.protected_paths())
    }

    /// Resolve defaults and build the inputs for one scan.
    pub fn scan_plan(&self) -> ScanPlan {
        let roots = if self.paths.scan_roots.is_empty() {
            locations::default_scan_roots()
        } else {
            self.paths.scan_roots.clone()
        };
        let cache_roots = if self.paths.browser_caches.is_empty() {
            locations::default_browser_caches()
        } else {
            self.paths.browser_caches.clone()
        };
        let volume_roots = match (self.paths.sweep_volumes, self.paths.volume_roots.is_empty()) {
            (false, _) => Vec::new(),
            (true, true) => locations::default_volume_roots(),
            (true, false) => self.paths.volume_roots.clone(),
        };

        ScanPlan {
            roots,
            cache_roots,
            volume_roots,
            depth_limit: self.rules.depth_limit,
            cache_folder_names: self.rules.cache_folder_names.clone(),
            classifier: self.classifier(),
            path_event_interval_ms: PATH_EVENT_INTERVAL_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.rules.depth_limit, 5);
        assert_eq!(config.rules.exclude_keywords.len(), 24);
        assert!(config.rules.exclude_keywords.contains(&"cookies".to_string()));
        assert!(config.rules.cache_folder_names.contains(&"cache2".to_string()));
        assert!(config.paths.sweep_volumes);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let toml = r#"
            [rules]
            depth_limit = 3

            [paths]
            scan_roots = ["/srv/scratch"]
            sweep_volumes = false

            [[paths.browser_caches]]
            name = "Vivaldi"
            base = "/home/u/.cache/vivaldi"
        "#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.rules.depth_limit, 3);
        assert_eq!(config.rules.exclude_keywords, default_exclude_keywords());
        assert_eq!(config.paths.scan_roots, vec![PathBuf::from("/srv/scratch")]);
        assert!(!config.paths.sweep_volumes);
        assert_eq!(config.paths.browser_caches[0].cache_subpath, PathBuf::from("Cache"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = create_test_dir();
        let path = temp_dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.rules.depth_limit = 7;
        config.rules.protected_paths = vec![PathBuf::from("/keep")];

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded.rules.depth_limit, 7);
        assert_eq!(loaded.rules.protected_paths, vec![PathBuf::from("/keep")]);
    }

    #[test]
    fn test_load_from_rejects_garbage() {
        let temp_dir = create_test_dir();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "rules = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_config_apply_cli_overrides() {
        let mut config = Config::default();
        config.apply_cli_overrides(Some(2), true, vec![PathBuf::from("/x")]);

        assert_eq!(config.rules.depth_limit, 2);
        assert!(!config.paths.sweep_volumes);
        assert_eq!(config.paths.scan_roots, vec![PathBuf::from("/x")]);
    }

    #[test]
    fn test_config_partial_overrides() {
        let mut config = Config::default();
        config.paths.scan_roots = vec![PathBuf::from("/configured")];
        config.apply_cli_overrides(None, false, Vec::new());

        assert_eq!(config.rules.depth_limit, 5);
        assert!(config.paths.sweep_volumes);
        assert_eq!(config.paths.scan_roots, vec![PathBuf::from("/configured")]);
    }

    #[test]
    fn test_scan_plan_uses_explicit_values() {
        let mut config = Config::default();
        config.paths.scan_roots = vec![PathBuf::from("/a")];
        config.paths.browser_caches = vec![CacheRoot::new("Chrome", "/b", "Cache")];
        config.paths.volume_roots = vec![PathBuf::from("/c")];
        config.rules.protected_paths = vec![PathBuf::from("/p")];

        let plan = config.scan_plan();
        assert_eq!(plan.roots, vec![PathBuf::from("/a")]);
        assert_eq!(plan.cache_roots.len(), 1);
        assert_eq!(plan.volume_roots, vec![PathBuf::from("/c")]);
        assert_eq!(plan.classifier.protected_paths(), [PathBuf::from("/p")]);

        config.paths.sweep_volumes = false;
        assert!(config.scan_plan().volume_roots.is_empty());
    }

    #[test]
    fn test_explicit_error_log_path() {
        let mut config = Config::default();
        config.logging.error_log = Some(PathBuf::from("/var/log/tc.txt"));
        assert_eq!(config.error_log_path(), PathBuf::from("/var/log/tc.txt"));
    }
}
