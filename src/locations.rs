//! Platform default locations.
//!
//! Resolves scan roots, browser profile roots, protected paths and volume roots from
//! environment variables and the mounted disk list. Unset variables are skipped rather
//! than turned into relative paths.

use crate::scanner::CacheRoot;
use std::env;
use std::path::{Path, PathBuf};

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg_attr(not(windows), allow(dead_code))]
fn env_join(var: &str, parts: &[&str]) -> Option<PathBuf> {
    env_path(var).map(|base| join_all(&base, parts))
}

fn join_all(base: &Path, parts: &[&str]) -> PathBuf {
    parts.iter().fold(base.to_path_buf(), |acc, p| acc.join(p))
}

#[cfg(not(windows))]
fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

#[cfg(windows)]
pub fn default_scan_roots() -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = [
        env_path("TEMP"),
        env_join("WINDIR", &["Temp"]),
        env_join("WINDIR", &["SoftwareDistribution", "Download"]),
        env_join("LOCALAPPDATA", &["Temp"]),
        env_join("WINDIR", &["Logs"]),
        env_join("APPDATA", &["Microsoft", "Windows", "Recent"]),
        env_join("LOCALAPPDATA", &["Microsoft", "Windows", "Explorer"]),
    ]
    .into_iter()
    .flatten()
    .collect();
    roots.push(PathBuf::from(r"C:\$WINDOWS.~BT"));
    roots.push(PathBuf::from(r"C:\Windows.old"));
    roots
}

#[cfg(not(windows))]
pub fn default_scan_roots() -> Vec<PathBuf> {
    let mut roots = vec![env_path("TMPDIR").unwrap_or_else(|| PathBuf::from("/tmp"))];
    roots.push(PathBuf::from("/var/tmp"));
    if let Some(home) = home_dir() {
        roots.push(join_all(&home, &[".cache", "thumbnails"]));
    }
    roots
}

#[cfg(windows)]
pub fn default_browser_caches() -> Vec<CacheRoot> {
    let firefox_entries = Path::new("cache2").join("entries");
    [
        env_join("LOCALAPPDATA", &["Google", "Chrome", "User Data"])
            .map(|p| CacheRoot::new("Chrome", p, "Cache")),
        env_join("LOCALAPPDATA", &["BraveSoftware", "Brave-Browser", "User Data"])
            .map(|p| CacheRoot::new("Brave", p, "Cache")),
        env_join("APPDATA", &["Opera Software", "Opera Stable"])
            .map(|p| CacheRoot::new("Opera", p, "Cache")),
        env_join("APPDATA", &["Mozilla", "Firefox", "Profiles"])
            .map(|p| CacheRoot::new("Firefox", p, firefox_entries.clone())),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(not(windows))]
pub fn default_browser_caches() -> Vec<CacheRoot> {
    let Some(home) = home_dir() else {
        return Vec::new();
    };
    let cache = home.join(".cache");
    vec![
        CacheRoot::new("Chrome", cache.join("google-chrome"), "Cache"),
        CacheRoot::new("Brave", join_all(&cache, &["BraveSoftware", "Brave-Browser"]), "Cache"),
        CacheRoot::new("Opera", cache.join("opera"), "Cache"),
        CacheRoot::new(
            "Firefox",
            join_all(&cache, &["mozilla", "firefox"]),
            Path::new("cache2").join("entries"),
        ),
    ]
}

#[cfg(windows)]
pub fn default_protected_paths() -> Vec<PathBuf> {
    [
        env_path("APPDATA"),
        env_path("LOCALAPPDATA"),
        env_path("PROGRAMFILES"),
        env_path("PROGRAMFILES(X86)"),
        env_path("PROGRAMDATA"),
        env_join("WINDIR", &["System32"]),
        env_join("WINDIR", &["SysWOW64"]),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(not(windows))]
pub fn default_protected_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = [
        "/usr",
        "/bin",
        "/sbin",
        "/etc",
        "/lib",
        "/System",
        "/Library",
        "/Applications",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect();
    if let Some(home) = home_dir() {
        paths.push(join_all(&home, &[".config"]));
        paths.push(join_all(&home, &[".local", "share"]));
        paths.push(home.join(".ssh"));
        paths.push(home.join(".gnupg"));
    }
    paths
}

/// Mount points of every volume the OS reports.
pub fn default_volume_roots() -> Vec<PathBuf> {
    let disks = sysinfo::Disks::new_with_refreshed_list();
    let mut roots: Vec<PathBuf> = disks
        .list()
        .iter()
        .map(|disk| disk.mount_point().to_path_buf())
        .collect();
    roots.sort();
    roots.dedup();
    roots
}

/// Directory holding the config file and the error log.
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "trashcleaner")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_all() {
        let p = join_all(Path::new("base"), &["a", "b"]);
        assert_eq!(p, Path::new("base").join("a").join("b"));
    }

    #[test]
    fn test_unset_variable_is_skipped() {
        assert_eq!(env_join("TRASHCLEANER_TEST_SURELY_UNSET_VAR", &["Temp"]), None);
    }

    #[test]
    fn test_defaults_are_absolute() {
        for root in default_scan_roots() {
            assert!(root.is_absolute(), "{} is relative", root.display());
        }
        for path in default_protected_paths() {
            assert!(path.is_absolute(), "{} is relative", path.display());
        }
    }

    #[test]
    fn test_firefox_uses_entries_subpath() {
        let firefox = default_browser_caches()
            .into_iter()
            .find(|c| c.name == "Firefox");
        if let Some(firefox) = firefox {
            assert_eq!(firefox.cache_subpath, Path::new("cache2").join("entries"));
        }
    }
}
