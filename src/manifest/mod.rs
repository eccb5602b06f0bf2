//! Manifest loading and pattern matching
//!
//! A manifest is a plain-text file with one glob pattern per line. The
//! patterns are compiled into a single [`globset::GlobSet`] and matched
//! against bare file names during copy filtering and destination cleanup.

use std::ffi::OsStr;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use globset::{Glob, GlobSet, GlobSetBuilder};

/// How manifest patterns select files during the copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterPolicy {
    /// Copy a file only if its name matches a manifest pattern
    Include,
    /// Copy a file unless its name matches a manifest pattern
    Exclude,
}

impl FilterPolicy {
    /// Decide whether a file with the given name is copied.
    pub fn selects(self, manifest: &Manifest, name: &OsStr) -> bool {
        match self {
            FilterPolicy::Include => manifest.matches(name),
            FilterPolicy::Exclude => !manifest.matches(name),
        }
    }
}

/// An ordered set of glob patterns read from a manifest file.
#[derive(Debug)]
pub struct Manifest {
    patterns: Vec<String>,
    set: GlobSet,
}

impl Manifest {
    /// Load a manifest from a plain-text file, one glob pattern per line.
    ///
    /// Blank lines are dropped; there is no comment syntax and no escaping.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest file: {}", path.display()))?;

        let patterns = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Self::from_patterns(patterns)
    }

    /// Build a manifest from an in-memory list of patterns.
    pub fn from_patterns(patterns: Vec<String>) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = Glob::new(pattern)
                .with_context(|| format!("invalid manifest pattern: '{pattern}'"))?;
            builder.add(glob);
        }
        let set = builder.build()?;

        Ok(Self { patterns, set })
    }

    /// Test a bare file name against the pattern set.
    pub fn matches(&self, name: &OsStr) -> bool {
        self.set.is_match(Path::new(name))
    }

    /// The patterns in manifest order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
