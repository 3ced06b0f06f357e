//! Scanner for configured root directories and browser profile caches.

use crate::debug_log;
use crate::error::FileError;
use crate::harvest::{Candidate, Harvest, ScanContext};
use crate::utils;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// A browser profile root: every subdirectory of `base` is a profile, and each profile
/// keeps its cache at `cache_subpath`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRoot {
    pub name: String,
    pub base: PathBuf,
    #[serde(default = "default_cache_subpath")]
    pub cache_subpath: PathBuf,
}

fn default_cache_subpath() -> PathBuf {
    PathBuf::from("Cache")
}

impl CacheRoot {
    pub fn new(name: &str, base: impl Into<PathBuf>, cache_subpath: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            base: base.into(),
            cache_subpath: cache_subpath.into(),
        }
    }

    /// Existing per-profile cache directories, resolved to canonical paths. A missing
    /// base yields nothing.
    pub fn profile_caches(&self) -> Vec<PathBuf> {
        if !self.base.is_dir() {
            return Vec::new();
        }
        let base = utils::resolve_path(&self.base);
        match utils::list_subdirs(&base) {
            Ok(profiles) => profiles
                .into_iter()
                .map(|profile| utils::resolve_path(&profile.join(&self.cache_subpath)))
                .filter(|cache| cache.is_dir())
                .collect(),
            Err(FileError::NotFound) => Vec::new(),
            Err(err) => {
                debug_log::error(&format!(
                    "Browser cache error: {} - {}",
                    self.base.display(),
                    err
                ));
                Vec::new()
            }
        }
    }
}

/// Roots that currently exist as directories, resolved to canonical paths so that
/// everything found below them compares correctly against protected prefixes. Missing
/// roots are a configuration matter and are dropped without logging.
pub fn existing_roots(roots: &[PathBuf]) -> Vec<PathBuf> {
    roots
        .iter()
        .filter(|r| r.is_dir())
        .map(|r| utils::resolve_path(r))
        .collect()
}

pub struct Scanner<'a> {
    ctx: ScanContext<'a>,
}

impl<'a> Scanner<'a> {
    pub fn new(ctx: ScanContext<'a>) -> Self {
        Self { ctx }
    }

    /// Lazily enumerate eligible files under `roots` and under every profile cache of
    /// `cache_roots`. One progress step is reported per existing root and per cache root.
    pub fn scan(&self, roots: &[PathBuf], cache_roots: &[CacheRoot]) -> Scan<'a> {
        let mut steps: VecDeque<Step> = existing_roots(roots).into_iter().map(Step::Root).collect();
        steps.extend(cache_roots.iter().cloned().map(Step::Browser));
        Scan {
            ctx: self.ctx,
            steps,
            current_label: None,
            pending: VecDeque::new(),
            harvest: None,
        }
    }
}

enum Step {
    Root(PathBuf),
    Browser(CacheRoot),
}

/// One-shot candidate sequence produced by [`Scanner::scan`].
pub struct Scan<'a> {
    ctx: ScanContext<'a>,
    steps: VecDeque<Step>,
    current_label: Option<String>,
    pending: VecDeque<PathBuf>,
    harvest: Option<Harvest<'a>>,
}

impl Scan<'_> {
    fn begin(&mut self, step: Step) {
        let label = match step {
            Step::Root(dir) => {
                let label = dir.display().to_string();
                self.pending.push_back(dir);
                label
            }
            Step::Browser(root) => {
                self.pending.extend(root.profile_caches());
                root.name
            }
        };
        self.current_label = Some(label);
    }

    fn finish_step(&mut self) {
        if let Some(label) = self.current_label.take() {
            if let Some(progress) = self.ctx.progress {
                progress.step_finished(&label);
            }
        }
    }

    fn start_harvest(&mut self, tree: &Path) {
        self.harvest = Some(Harvest::new(tree, self.ctx));
    }
}

impl Iterator for Scan<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            if let Some(harvest) = self.harvest.as_mut() {
                if let Some(candidate) = harvest.next() {
                    return Some(candidate);
                }
                self.harvest = None;
            }
            if self.ctx.is_cancelled() {
                return None;
            }
            if let Some(tree) = self.pending.pop_front() {
                self.start_harvest(&tree);
                continue;
            }
            self.finish_step();
            let step = self.steps.pop_front()?;
            self.begin(step);
        }
    }
}
