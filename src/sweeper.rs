//! Depth-bounded sweep of whole volumes for heuristically named cache folders.
//!
//! Each volume root sits at depth 0. A child directory whose name is one of the
//! configured cache folder names is harvested in full when its depth is within the
//! bound; other directories are only descended into while their children can still be
//! within the bound. An explicit visited/harvested set replaces any mutation of the
//! in-progress listing.

use crate::debug_log;
use crate::harvest::{Candidate, Harvest, ScanContext};
use crate::utils;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

pub const DEFAULT_DEPTH_LIMIT: usize = 5;

pub struct DriveSweeper<'a> {
    ctx: ScanContext<'a>,
    depth_limit: usize,
    cache_folder_names: HashSet<String>,
}

impl<'a> DriveSweeper<'a> {
    /// `cache_folder_names` is matched case-sensitively against directory names.
    pub fn new<I>(ctx: ScanContext<'a>, depth_limit: usize, cache_folder_names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            ctx,
            depth_limit,
            cache_folder_names: cache_folder_names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn depth_limit(&self) -> usize {
        self.depth_limit
    }

    pub fn sweep(&self, volume_roots: &[PathBuf]) -> Sweep<'a> {
        Sweep {
            ctx: self.ctx,
            depth_limit: self.depth_limit,
            cache_folder_names: self.cache_folder_names.clone(),
            volumes: volume_roots.iter().cloned().collect(),
            current_volume: None,
            stack: Vec::new(),
            seen: HashSet::new(),
            pending: VecDeque::new(),
            harvest: None,
        }
    }
}

/// One-shot candidate sequence produced by [`DriveSweeper::sweep`].
pub struct Sweep<'a> {
    ctx: ScanContext<'a>,
    depth_limit: usize,
    cache_folder_names: HashSet<String>,
    volumes: VecDeque<PathBuf>,
    current_volume: Option<PathBuf>,
    stack: Vec<(PathBuf, usize)>,
    seen: HashSet<PathBuf>,
    pending: VecDeque<PathBuf>,
    harvest: Option<Harvest<'a>>,
}

impl Sweep<'_> {
    fn is_cache_folder(&self, dir: &Path) -> bool {
        utils::file_name_str(dir)
            .map(|name| self.cache_folder_names.contains(name))
            .unwrap_or(false)
    }

    /// List `dir` once: queue cache-named children for harvesting, push the rest for
    /// descent while they stay within the bound.
    fn visit(&mut self, dir: PathBuf, depth: usize) {
        if !self.seen.insert(dir.clone()) {
            return;
        }
        if self.ctx.classifier.is_protected(&dir) || utils::is_windows_reparse_point(&dir) {
            return;
        }
        let children = match utils::list_subdirs(&dir) {
            Ok(children) => children,
            Err(err) => {
                debug_log::error(&format!("Drive scan error: {} - {}", dir.display(), err));
                return;
            }
        };

        let child_depth = depth + 1;
        if child_depth > self.depth_limit {
            return;
        }
        for child in children {
            if self.seen.contains(&child) {
                continue;
            }
            if self.is_cache_folder(&child) {
                self.seen.insert(child.clone());
                self.pending.push_back(child);
            } else if child_depth < self.depth_limit {
                self.stack.push((child, child_depth));
            }
        }
    }

    fn finish_volume(&mut self) {
        if let Some(volume) = self.current_volume.take() {
            if let Some(progress) = self.ctx.progress {
                progress.step_finished(&volume.display().to_string());
            }
        }
    }
}

impl Iterator for Sweep<'_> {
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
            if let Some(cache_dir) = self.pending.pop_front() {
                if let Some(progress) = self.ctx.progress {
                    progress.emit_path(&cache_dir);
                }
                self.harvest = Some(Harvest::new(&cache_dir, self.ctx));
                continue;
            }
            if let Some((dir, depth)) = self.stack.pop() {
                self.visit(dir, depth);
                continue;
            }

            self.finish_volume();
            let volume = self.volumes.pop_front()?;
            if volume.is_dir() {
                self.stack.push((utils::resolve_path(&volume), 0));
            }
            self.current_volume = Some(volume);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::PathClassifier;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    fn write_file(path: &Path, len: usize) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, vec![0u8; len]).unwrap();
    }

    fn sweep_paths(classifier: &PathClassifier, volume: &Path, depth: usize) -> Vec<PathBuf> {
        let sweeper = DriveSweeper::new(
            ScanContext::new(classifier),
            depth,
            ["Cache", "cache2", "temp", "logs", "thumbnails"],
        );
        let mut paths: Vec<PathBuf> = sweeper
            .sweep(&[volume.to_path_buf()])
            .map(|c| c.path)
            .collect();
        paths.sort();
        paths
    }

    #[test]
    fn test_harvests_named_cache_folders_fully() {
        let temp_dir = create_test_dir();
        let vol = temp_dir.path();
        let cache = vol.join("apps").join("Cache");
        // Files far below the depth bound still count once their folder is harvested
        let deep = cache.join("a").join("b").join("c").join("d").join("e").join("f");
        write_file(&deep, 3);
        write_file(&cache.join("index"), 1);
        write_file(&vol.join("apps").join("readme.txt"), 1);

        let paths = sweep_paths(&PathClassifier::default(), vol, DEFAULT_DEPTH_LIMIT);
        assert_eq!(paths, vec![deep, cache.join("index")]);
    }

    #[test]
    fn test_folder_names_are_case_sensitive() {
        let temp_dir = create_test_dir();
        let vol = temp_dir.path();
        write_file(&vol.join("x").join("LOGS").join("a.log"), 1);
        write_file(&vol.join("y").join("logs").join("b.log"), 1);

        let paths = sweep_paths(&PathClassifier::default(), vol, DEFAULT_DEPTH_LIMIT);
        assert_eq!(paths, vec![vol.join("y").join("logs").join("b.log")]);
    }

    #[test]
    fn test_depth_bound_is_respected() {
        let temp_dir = create_test_dir();
        let vol = temp_dir.path();
        // Cache folder at depth 2 and depth 3
        write_file(&vol.join("a").join("temp").join("in.tmp"), 1);
        write_file(&vol.join("a").join("b").join("temp").join("out.tmp"), 1);

        let paths = sweep_paths(&PathClassifier::default(), vol, 2);
        assert_eq!(paths, vec![vol.join("a").join("temp").join("in.tmp")]);

        let paths = sweep_paths(&PathClassifier::default(), vol, 3);
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_cache_folder_directly_under_volume() {
        let temp_dir = create_test_dir();
        let vol = temp_dir.path();
        write_file(&vol.join("temp").join("x"), 1);

        assert_eq!(
            sweep_paths(&PathClassifier::default(), vol, 1),
            vec![vol.join("temp").join("x")]
        );
        assert!(sweep_paths(&PathClassifier::default(), vol, 0).is_empty());
    }

    #[test]
    fn test_nested_cache_folders_are_harvested_once() {
        let temp_dir = create_test_dir();
        let vol = temp_dir.path();
        write_file(&vol.join("Cache").join("cache2").join("entry"), 1);

        let paths = sweep_paths(&PathClassifier::default(), vol, DEFAULT_DEPTH_LIMIT);
        assert_eq!(paths, vec![vol.join("Cache").join("cache2").join("entry")]);
    }

    #[test]
    fn test_protected_cache_folder_contributes_nothing() {
        let temp_dir = create_test_dir();
        let vol = temp_dir.path();
        let config_dir = vol.join("home").join("user").join(".config");
        write_file(&config_dir.join("Cache").join("x"), 1);
        write_file(&vol.join("home").join("user").join("thumbnails").join("t.png"), 1);

        let classifier = PathClassifier::new(Vec::<String>::new(), [config_dir]);
        let paths = sweep_paths(&classifier, vol, DEFAULT_DEPTH_LIMIT);
        assert_eq!(
            paths,
            vec![vol.join("home").join("user").join("thumbnails").join("t.png")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_volume_does_not_bypass_protected_prefix() {
        let temp_dir = create_test_dir();
        let base = utils::resolve_path(temp_dir.path());
        let config_dir = base.join("home").join(".config");
        write_file(&config_dir.join("logs").join("app.log"), 1);
        let mount = base.join("mnt");
        std::os::unix::fs::symlink(base.join("home"), &mount).unwrap();

        let classifier = PathClassifier::new(Vec::<String>::new(), [config_dir]);
        assert!(sweep_paths(&classifier, &mount, DEFAULT_DEPTH_LIMIT).is_empty());
    }

    #[test]
    fn test_overlapping_volumes_do_not_duplicate() {
        let temp_dir = create_test_dir();
        let vol = temp_dir.path();
        write_file(&vol.join("mnt").join("logs").join("a.log"), 1);

        let classifier = PathClassifier::default();
        let sweeper = DriveSweeper::new(ScanContext::new(&classifier), 5, ["logs"]);
        let count = sweeper.sweep(&[vol.to_path_buf(), vol.join("mnt")]).count();
        assert_eq!(count, 1);
    }
}
