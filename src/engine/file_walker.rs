#![forbid(unsafe_code)]

//! File discovery and traversal with gitignore support
//!
//! Walks one input root (a directory or a single file), honoring
//! `.gitignore`, and yields the C/C++ sources and headers that pass the
//! include/exclude globs. Globs are matched against the path relative to the
//! root. Entries come out sorted by file name so runs are reproducible.

use crate::types::{GlobPattern, Language};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during file walking
#[derive(Debug, Error)]
pub enum FileWalkerError {
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },

    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Reason why a file was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// File matched an exclude pattern or missed every include pattern
    ExcludedByPattern,
    /// Extension is not a C/C++ source or header
    NoMatchingLanguage,
}

/// Result of file walking - either a file to process or a skipped file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkResult {
    File(FileEntry),
    Skipped { path: PathBuf, reason: SkipReason },
}

/// A discovered source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path as found by the walker (root joined with the relative path)
    pub path: PathBuf,
    /// Path relative to the walked root; the file name for a file root
    pub relative: PathBuf,
    pub language: Language,
}

impl FileEntry {
    /// Creates an entry if the path has a recognized extension
    pub fn new(path: PathBuf, relative: PathBuf) -> Option<Self> {
        let language = Language::detect(&path)?;
        Some(Self {
            path,
            relative,
            language,
        })
    }

    /// File name without directories
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Iterator source over discovered files
pub struct FileWalker {
    root: PathBuf,
    walker: ignore::Walk,
    include_set: Option<GlobSet>,
    exclude_set: GlobSet,
}

impl FileWalker {
    /// Creates a new FileWalker
    ///
    /// # Arguments
    /// * `root` - Directory or file to walk
    /// * `include` - Include patterns (empty means include all)
    /// * `exclude` - Exclude patterns (applied after include)
    pub fn new(
        root: &Path,
        include: &[GlobPattern],
        exclude: &[GlobPattern],
    ) -> Result<Self, FileWalkerError> {
        let walker = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let include_set = if include.is_empty() {
            None
        } else {
            Some(build_globset(include)?)
        };

        // Always exclude .git, merged with the configured excludes
        let mut exclude_patterns = Vec::from(exclude);
        exclude_patterns.push(GlobPattern::new("**/.git/**"));
        let exclude_set = build_globset(&exclude_patterns)?;

        Ok(Self {
            root: root.to_path_buf(),
            walker,
            include_set,
            exclude_set,
        })
    }

    /// Walks the tree and yields matching files
    pub fn walk(self) -> impl Iterator<Item = Result<FileEntry, FileWalkerError>> {
        self.walk_with_skip_info()
            .filter_map(|result| match result {
                Ok(WalkResult::File(file)) => Some(Ok(file)),
                Ok(WalkResult::Skipped { .. }) => None,
                Err(e) => Some(Err(e)),
            })
    }

    /// Walks the tree and also reports files that were skipped
    pub fn walk_with_skip_info(self) -> impl Iterator<Item = Result<WalkResult, FileWalkerError>> {
        let root = self.root;
        let include_set = self.include_set;
        let exclude_set = self.exclude_set;

        self.walker.filter_map(move |result| {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => return Some(Err(FileWalkerError::Walk(e))),
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                return None;
            }

            let path = entry.path().to_path_buf();
            let relative = relative_path(&root, &path);
            let skipped = |reason: SkipReason| -> Option<Result<WalkResult, FileWalkerError>> {
                Some(Ok(WalkResult::Skipped {
                    path: path.clone(),
                    reason,
                }))
            };

            if let Some(ref include_set) = include_set
                && !include_set.is_match(&relative)
            {
                return skipped(SkipReason::ExcludedByPattern);
            }
            if exclude_set.is_match(&relative) {
                return skipped(SkipReason::ExcludedByPattern);
            }

            match FileEntry::new(path.clone(), relative) {
                Some(file) => Some(Ok(WalkResult::File(file))),
                None => skipped(SkipReason::NoMatchingLanguage),
            }
        })
    }
}

fn relative_path(root: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        _ => path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf()),
    }
}

/// Builds a GlobSet from patterns
pub fn build_globset(patterns: &[GlobPattern]) -> Result<GlobSet, FileWalkerError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern.as_str()).map_err(|e| FileWalkerError::InvalidGlob {
            pattern: pattern.as_str().to_string(),
            source: e,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| FileWalkerError::InvalidGlob {
        pattern: "<globset>".to_string(),
        source: e,
    })
}
