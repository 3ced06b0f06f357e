//! Deletion eligibility.
//!
//! Two independent safety layers decide whether a discovered path may be offered for
//! deletion: sensitive-data keywords matched against the final path component, and
//! protected directory prefixes whose whole subtree is off limits.

use crate::utils;
use std::path::{Component, Path, PathBuf};

/// Read-only eligibility predicate, safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct PathClassifier {
    exclude_keywords: Vec<String>,
    protected_paths: Vec<PathBuf>,
    /// Canonical forms of `protected_paths` that differ from the configured text.
    resolved_protected: Vec<PathBuf>,
}

impl PathClassifier {
    pub fn new<K, P>(exclude_keywords: K, protected_paths: P) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: Into<PathBuf>,
    {
        let protected_paths: Vec<PathBuf> = protected_paths
            .into_iter()
            .map(Into::into)
            .filter(|p: &PathBuf| !p.as_os_str().is_empty())
            .collect();
        let resolved_protected = protected_paths
            .iter()
            .map(|p| utils::resolve_path(p))
            .filter(|resolved| !protected_paths.contains(resolved))
            .collect();

        Self {
            exclude_keywords: exclude_keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            protected_paths,
            resolved_protected,
        }
    }

    pub fn exclude_keywords(&self) -> &[String] {
        &self.exclude_keywords
    }

    pub fn protected_paths(&self) -> &[PathBuf] {
        &self.protected_paths
    }

    /// True when `path` exists, carries no sensitive keyword in its final component and
    /// does not sit under a protected prefix.
    pub fn is_eligible(&self, path: &Path) -> bool {
        if !path.exists() {
            return false;
        }
        if self.has_excluded_keyword(path) {
            return false;
        }
        !self.is_protected(path)
    }

    /// Case-insensitive keyword match against the final path component only.
    pub fn has_excluded_keyword(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy().to_lowercase();
        self.exclude_keywords.iter().any(|kw| name.contains(kw.as_str()))
    }

    /// True when `path` equals or is nested under any protected prefix, in either its
    /// configured or its canonical form.
    ///
    /// Clean absolute paths are compared as given, which is what traversals from resolved
    /// roots produce. Relative paths and paths with `..` are resolved first. Use
    /// [`Self::is_protected_resolved`] for a path whose ancestors may be symlinks.
    pub fn is_protected(&self, path: &Path) -> bool {
        let needs_resolving = path.is_relative()
            || path.components().any(|c| matches!(c, Component::ParentDir));
        if needs_resolving {
            return self.matches_prefix(&utils::resolve_path(path));
        }
        self.matches_prefix(path)
    }

    /// Like [`Self::is_protected`], but also checks the canonical form of `path`, so a
    /// symlinked ancestor cannot hide a protected target.
    pub fn is_protected_resolved(&self, path: &Path) -> bool {
        self.is_protected(path) || self.matches_prefix(&utils::resolve_path(path))
    }

    fn matches_prefix(&self, path: &Path) -> bool {
        self.protected_paths
            .iter()
            .chain(&self.resolved_protected)
            .any(|prefix| is_nested_under(path, prefix))
    }
}

/// Component-wise prefix test. Windows paths compare case-insensitively.
pub fn is_nested_under(path: &Path, prefix: &Path) -> bool {
    let mut path_components = path.components().filter(|c| !matches!(c, Component::CurDir));
    for expected in prefix.components().filter(|c| !matches!(c, Component::CurDir)) {
        match path_components.next() {
            Some(actual) if components_equal(actual, expected) => {}
            _ => return false,
        }
    }
    true
}

#[cfg(windows)]
fn components_equal(a: Component<'_>, b: Component<'_>) -> bool {
    a.as_os_str()
        .to_string_lossy()
        .eq_ignore_ascii_case(&b.as_os_str().to_string_lossy())
}

#[cfg(not(windows))]
fn components_equal(a: Component<'_>, b: Component<'_>) -> bool {
    a == b
}
