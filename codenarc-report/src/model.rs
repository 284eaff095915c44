//! In-memory model of a parsed `CodeNarc` report.
//!
//! The [`Analysis`] owns every package, file and violation. Aggregate counts
//! are never stored: they are recomputed from the leaf violations each time
//! they are requested, so they cannot drift from the data they summarize.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::Serialize;

/// Violation priority. `High` is the most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// All recognized priorities, most severe first.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Map a numeric report level (`1..=3`) onto a priority.
    #[must_use]
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::High),
            2 => Some(Self::Medium),
            3 => Some(Self::Low),
            _ => None,
        }
    }

    /// Numeric level as written in the report.
    #[must_use]
    pub fn level(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// Number of violations at each priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub priority1: usize,
    pub priority2: usize,
    pub priority3: usize,
}

impl PriorityCounts {
    /// Count of violations at `priority`.
    #[must_use]
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.priority1,
            Priority::Medium => self.priority2,
            Priority::Low => self.priority3,
        }
    }

    /// Record one violation at `priority`.
    pub fn record(&mut self, priority: Priority) {
        match priority {
            Priority::High => self.priority1 += 1,
            Priority::Medium => self.priority2 += 1,
            Priority::Low => self.priority3 += 1,
        }
    }

    /// Total violations across all priorities.
    #[must_use]
    pub fn total(&self) -> usize {
        self.priority1 + self.priority2 + self.priority3
    }

    /// Number of violations at `threshold` or more severe.
    #[must_use]
    pub fn at_or_above(&self, threshold: Priority) -> usize {
        Priority::ALL
            .iter()
            .filter(|p| **p <= threshold)
            .map(|p| self.get(*p))
            .sum()
    }
}

impl Add for PriorityCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            priority1: self.priority1 + rhs.priority1,
            priority2: self.priority2 + rhs.priority2,
            priority3: self.priority3 + rhs.priority3,
        }
    }
}

impl AddAssign for PriorityCounts {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for PriorityCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Name of the violated rule. Never empty.
    pub rule_name: String,
    pub priority: Priority,
    /// 1-based line; `None` for file- or class-level violations.
    pub line_number: Option<u32>,
    /// Offending source line, when the report carries it.
    pub source_line: Option<String>,
    pub message: Option<String>,
}

/// Violations reported for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResult {
    /// File name relative to its package directory.
    pub name: String,
    pub violations: Vec<Violation>,
}

impl FileResult {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            violations: Vec::new(),
        }
    }

    #[must_use]
    pub fn counts(&self) -> PriorityCounts {
        let mut counts = PriorityCounts::default();
        for violation in &self.violations {
            counts.record(violation.priority);
        }
        counts
    }

    #[must_use]
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }
}

/// Files of one package directory within a source root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    /// Slash-separated path as written in the report; empty for the default package.
    pub path: String,
    /// Index of the source root this package was reported under.
    pub source_root: usize,
    pub files: Vec<FileResult>,
}

impl Package {
    #[must_use]
    pub fn new(path: impl Into<String>, source_root: usize) -> Self {
        Self {
            path: path.into(),
            source_root,
            files: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.path.trim().is_empty()
    }

    /// Dotted package name (`com/example` becomes `com.example`).
    ///
    /// Returns `None` for the default package.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        if self.is_default() {
            None
        } else {
            Some(self.path.replace('/', "."))
        }
    }

    /// Path of `file` relative to the source root.
    #[must_use]
    pub fn file_path(&self, file: &FileResult) -> String {
        if self.is_default() {
            file.name.clone()
        } else {
            format!("{}/{}", self.path, file.name)
        }
    }

    #[must_use]
    pub fn counts(&self) -> PriorityCounts {
        self.files.iter().map(FileResult::counts).sum()
    }

    #[must_use]
    pub fn files_with_violations(&self) -> usize {
        self.files.iter().filter(|f| f.has_violations()).count()
    }
}

/// Root of a parsed report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// Version of the tool that produced the report.
    pub tool_version: Option<String>,
    /// Report generation time, verbatim.
    pub timestamp: Option<String>,
    pub project_title: Option<String>,
    /// Source roots in the order the report lists them.
    pub source_directories: Vec<String>,
    /// Number of scanned files declared by the report summary.
    pub declared_total_files: Option<usize>,
    pub packages: Vec<Package>,
}

impl Analysis {
    #[must_use]
    pub fn counts(&self) -> PriorityCounts {
        self.packages.iter().map(Package::counts).sum()
    }

    #[must_use]
    pub fn total_violations(&self) -> usize {
        self.counts().total()
    }

    #[must_use]
    pub fn has_violations(&self) -> bool {
        self.files().any(|(_, file)| file.has_violations())
    }

    #[must_use]
    pub fn files_with_violations(&self) -> usize {
        self.packages.iter().map(Package::files_with_violations).sum()
    }

    /// Number of analyzed files.
    ///
    /// Clean files are usually left out of the report body, so the declared
    /// summary figure is preferred when it covers every listed file.
    #[must_use]
    pub fn total_files(&self) -> usize {
        let listed = self.files().count();
        self.declared_total_files
            .filter(|declared| *declared >= listed)
            .unwrap_or(listed)
    }

    /// Every file paired with its package, in document order.
    pub fn files(&self) -> impl Iterator<Item = (&Package, &FileResult)> {
        self.packages
            .iter()
            .flat_map(|package| package.files.iter().map(move |file| (package, file)))
    }

    /// Every violation, in document order.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.files().flat_map(|(_, file)| file.violations.iter())
    }

    /// Source directory named for `source_root`, if the report lists it.
    #[must_use]
    pub fn source_directory(&self, source_root: usize) -> Option<&str> {
        self.source_directories.get(source_root).map(String::as_str)
    }

    /// Packages grouped by source root, preserving document order.
    #[must_use]
    pub fn source_roots(&self) -> Vec<(usize, Vec<&Package>)> {
        let mut groups: Vec<(usize, Vec<&Package>)> = Vec::new();
        for package in &self.packages {
            if let Some((root, members)) = groups.last_mut()
                && *root == package.source_root
            {
                members.push(package);
                continue;
            }
            groups.push((package.source_root, vec![package]));
        }
        groups
    }
}
