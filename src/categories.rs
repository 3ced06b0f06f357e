//! Grouping of candidates into the five user-facing categories.
//!
//! Classification is a coarse substring heuristic over the whole lower-cased path.
//! Rules are evaluated in table order and the first match wins, so a path such as
//! `.../temp/cache/x` lands in System Temp.

use crate::harvest::Candidate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SystemTemp,
    BrowserCache,
    WindowsCache,
    RecentPrefetch,
    OtherTemp,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::SystemTemp,
        Category::BrowserCache,
        Category::WindowsCache,
        Category::RecentPrefetch,
        Category::OtherTemp,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::SystemTemp => "System Temp",
            Category::BrowserCache => "Browser Cache",
            Category::WindowsCache => "Windows Cache",
            Category::RecentPrefetch => "Recent/Prefetch",
            Category::OtherTemp => "Other Temp",
        }
    }

    /// Short name accepted on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            Category::SystemTemp => "temp",
            Category::BrowserCache => "browser",
            Category::WindowsCache => "windows",
            Category::RecentPrefetch => "recent",
            Category::OtherTemp => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.key() == wanted || c.label().to_lowercase() == wanted)
            .ok_or_else(|| {
                let keys: Vec<&str> = Category::ALL.iter().map(|c| c.key()).collect();
                format!("unknown category '{}' (expected one of: {})", s, keys.join(", "))
            })
    }
}

/// Ordered substring rules; anything unmatched is [`Category::OtherTemp`].
pub const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::SystemTemp, &["temp", "tmp"]),
    (
        Category::BrowserCache,
        &["cache", "browser", "chrome", "brave", "opera"],
    ),
    (Category::WindowsCache, &["logs", "softwaredistribution"]),
    (Category::RecentPrefetch, &["recent", "prefetch"]),
];

/// Category for a single path string.
pub fn classify(path: &str) -> Category {
    let lower = path.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| lower.contains(n)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::OtherTemp)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryBucket {
    pub candidates: Vec<Candidate>,
    pub size_bytes: u64,
}

impl CategoryBucket {
    pub fn push(&mut self, candidate: Candidate) {
        self.size_bytes += candidate.size_bytes;
        self.candidates.push(candidate);
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn size_human(&self) -> String {
        bytesize::to_string(self.size_bytes, false)
    }
}

/// Category → candidates in discovery order. Every category is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryIndex {
    buckets: BTreeMap<Category, CategoryBucket>,
}

impl Default for CategoryIndex {
    fn default() -> Self {
        Self {
            buckets: Category::ALL
                .into_iter()
                .map(|c| (c, CategoryBucket::default()))
                .collect(),
        }
    }
}

impl CategoryIndex {
    pub fn bucket(&self, category: Category) -> &CategoryBucket {
        // Every category is inserted at construction and never removed
        &self.buckets[&category]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryBucket)> {
        self.buckets.iter().map(|(c, b)| (*c, b))
    }

    pub fn total_count(&self) -> usize {
        self.buckets.values().map(|b| b.len()).sum()
    }

    pub fn total_size_bytes(&self) -> u64 {
        self.buckets.values().map(|b| b.size_bytes).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    fn push(&mut self, category: Category, candidate: Candidate) {
        self.buckets.entry(category).or_default().push(candidate);
    }
}

/// Assign every candidate to exactly one category. Pure and deterministic.
pub fn categorize<I>(candidates: I) -> CategoryIndex
where
    I: IntoIterator<Item = Candidate>,
{
    let mut index = CategoryIndex::default();
    for candidate in candidates {
        let category = classify(&candidate.path.to_string_lossy());
        index.push(category, candidate);
    }
    index
}

/// Which categories the user wants removed. Defaults to all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSet {
    selected: BTreeMap<Category, bool>,
}

impl Default for SelectionSet {
    fn default() -> Self {
        Self::all()
    }
}

impl SelectionSet {
    pub fn all() -> Self {
        Self {
            selected: Category::ALL.into_iter().map(|c| (c, true)).collect(),
        }
    }

    pub fn none() -> Self {
        Self {
            selected: Category::ALL.into_iter().map(|c| (c, false)).collect(),
        }
    }

    pub fn only(categories: &[Category]) -> Self {
        let mut selection = Self::none();
        for category in categories {
            selection.set(*category, true);
        }
        selection
    }

    pub fn set(&mut self, category: Category, selected: bool) {
        self.selected.insert(category, selected);
    }

    pub fn select_all(&mut self) {
        for value in self.selected.values_mut() {
            *value = true;
        }
    }

    pub fn is_selected(&self, category: Category) -> bool {
        self.selected.get(&category).copied().unwrap_or(false)
    }

    pub fn selected(&self) -> impl Iterator<Item = Category> + '_ {
        self.selected
            .iter()
            .filter(|(_, on)| **on)
            .map(|(c, _)| *c)
    }
}
