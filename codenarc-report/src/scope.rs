//! Which sources an external analysis run covers.
//!
//! The report pipeline never runs the rule engine. [`AnalysisScope`] is the
//! explicit value handed to whoever does: it names the source roots and the
//! include/exclude patterns, and can list the matching files.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use crate::error::ScopeError;

/// Default include pattern: every Groovy source.
pub const DEFAULT_INCLUDE: &str = "**/*.groovy";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Sources to analyze.
///
/// Relative source directories are resolved against `base_dir`. Patterns
/// are matched against paths relative to their source directory, using `/`
/// as separator; excludes win over includes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct AnalysisScope {
    pub base_dir: PathBuf,
    /// Glob patterns selecting files (default: `**/*.groovy`).
    pub includes: Vec<String>,
    /// Glob patterns removing files from the selection.
    pub excludes: Vec<String>,
    /// Production source directories (default: `src/main/groovy`).
    pub source_dirs: Vec<PathBuf>,
    /// Test source directories (default: `src/test/groovy`).
    pub test_source_dirs: Vec<PathBuf>,
    /// Analyze `source_dirs` (default: on).
    pub include_main: bool,
    /// Analyze `test_source_dirs` (default: off).
    pub include_tests: bool,
    /// Whether to follow symbolic links while walking (default: off).
    pub follow_links: bool,
    /// Maximum directory depth below a source root (default: 64).
    pub max_depth: usize,
}

impl Default for AnalysisScope {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            includes: vec![DEFAULT_INCLUDE.to_owned()],
            excludes: Vec::new(),
            source_dirs: vec![PathBuf::from("src/main/groovy")],
            test_source_dirs: vec![PathBuf::from("src/test/groovy")],
            include_main: true,
            include_tests: false,
            follow_links: false,
            max_depth: 64,
        }
    }
}

impl AnalysisScope {
    /// Default scope rooted at `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Directories the analysis must cover, main sources first.
    #[must_use]
    pub fn source_roots(&self) -> Vec<PathBuf> {
        let main = self.source_dirs.iter().filter(|_| self.include_main);
        let tests = self.test_source_dirs.iter().filter(|_| self.include_tests);
        main.chain(tests).map(|dir| self.base_dir.join(dir)).collect()
    }

    /// Files selected by this scope, grouped by source root in
    /// [`source_roots`](Self::source_roots) order and sorted by path within
    /// each root. Roots that do not exist are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidPattern`] for a malformed include or
    /// exclude pattern and [`ScopeError::Walk`] when a directory cannot be
    /// read.
    pub fn resolve_files(&self) -> Result<Vec<PathBuf>, ScopeError> {
        let includes = compile(&self.includes)?;
        let excludes = compile(&self.excludes)?;
        let mut files = Vec::new();

        for root in self.source_roots() {
            if !root.is_dir() {
                tracing::debug!(root = %root.display(), "source root missing, skipped");
                continue;
            }
            let before = files.len();
            let walker = WalkDir::new(&root)
                .follow_links(self.follow_links)
                .max_depth(self.max_depth)
                .sort_by_file_name();
            for entry in walker {
                let entry = entry.map_err(|source| ScopeError::Walk {
                    root: root.clone(),
                    source,
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let Some(relative) = relative_path(&root, entry.path()) else {
                    continue;
                };
                let included = includes.iter().any(|p| p.matches_with(&relative, MATCH_OPTIONS));
                let excluded = excludes.iter().any(|p| p.matches_with(&relative, MATCH_OPTIONS));
                if included && !excluded {
                    files.push(entry.into_path());
                }
            }
            tracing::debug!(
                root = %root.display(),
                files = files.len() - before,
                "source root resolved"
            );
        }
        Ok(files)
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, ScopeError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|source| ScopeError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// `path` relative to `root`, `/`-separated.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(base: &Path, relative: &str) {
        let path = base.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "class X {}\n").unwrap();
    }

    fn names(base: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| relative_path(base, f).unwrap())
            .collect()
    }

    #[test]
    fn test_source_roots_follow_toggles() {
        let mut scope = AnalysisScope::new("/project");
        assert_eq!(
            scope.source_roots(),
            vec![PathBuf::from("/project/src/main/groovy")]
        );

        scope.include_tests = true;
        assert_eq!(
            scope.source_roots(),
            vec![
                PathBuf::from("/project/src/main/groovy"),
                PathBuf::from("/project/src/test/groovy"),
            ]
        );

        scope.include_main = false;
        assert_eq!(
            scope.source_roots(),
            vec![PathBuf::from("/project/src/test/groovy")]
        );

        scope.include_tests = false;
        assert!(scope.source_roots().is_empty());
    }

    #[test]
    fn test_absolute_source_dirs_are_kept() {
        let mut scope = AnalysisScope::new("/project");
        scope.source_dirs = vec![PathBuf::from("/elsewhere/groovy")];
        assert_eq!(
            scope.source_roots(),
            vec![PathBuf::from("/elsewhere/groovy")]
        );
    }

    #[test]
    fn test_resolve_files_applies_patterns() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/main/groovy/Root.groovy");
        touch(dir.path(), "src/main/groovy/com/example/Foo.groovy");
        touch(dir.path(), "src/main/groovy/com/example/Foo.java");
        touch(dir.path(), "src/main/groovy/com/generated/Gen.groovy");
        touch(dir.path(), "src/test/groovy/com/example/FooTest.groovy");

        let mut scope = AnalysisScope::new(dir.path());
        scope.excludes = vec!["com/generated/**".to_owned()];
        let files = scope.resolve_files().unwrap();
        assert_eq!(
            names(dir.path(), &files),
            vec![
                "src/main/groovy/Root.groovy",
                "src/main/groovy/com/example/Foo.groovy",
            ]
        );

        scope.include_tests = true;
        let files = scope.resolve_files().unwrap();
        assert_eq!(files.len(), 3);
        assert!(files[2].ends_with("com/example/FooTest.groovy"));
    }

    #[test]
    fn test_missing_roots_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let scope = AnalysisScope::new(dir.path());
        assert!(scope.resolve_files().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut scope = AnalysisScope::new(dir.path());
        scope.includes = vec!["src/a**".to_owned()];
        assert!(matches!(
            scope.resolve_files().unwrap_err(),
            ScopeError::InvalidPattern { .. }
        ));
    }
}
