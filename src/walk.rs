//! Depth-first traversal of the import graph.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ResolveError;
use crate::source::go::config::DEFAULT_IGNORED;
use crate::source::{PackageId, PackageSource};

pub type VisitedSet = BTreeSet<PackageId>;

#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Follow the root package's test-only imports.
    pub include_tests: bool,
    /// Only follow imports starting with this string. Empty follows everything.
    pub prefix: String,
    pub ignored: BTreeSet<PackageId>,
    /// Resolution context handed to the package source.
    pub working_dir: PathBuf,
}

impl WalkOptions {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            include_tests: false,
            prefix: String::new(),
            ignored: DEFAULT_IGNORED.iter().map(|s| s.to_string()).collect(),
            working_dir: working_dir.into(),
        }
    }

    pub fn from_current_dir() -> Result<Self, ResolveError> {
        let cwd = std::env::current_dir().map_err(ResolveError::working_dir)?;
        Ok(Self::new(cwd))
    }

    pub fn include_tests(mut self, include: bool) -> Self {
        self.include_tests = include;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn ignore<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PackageId>,
    {
        self.ignored.extend(ids.into_iter().map(Into::into));
        self
    }

    fn should_follow(&self, import: &str, visited: &VisitedSet) -> bool {
        if visited.contains(import) {
            trace!(import, "already visited");
            return false;
        }
        if self.ignored.contains(import) {
            trace!(import, "ignored");
            return false;
        }
        if !self.prefix.is_empty() && !import.starts_with(&self.prefix) {
            trace!(import, prefix = %self.prefix, "outside prefix");
            return false;
        }
        true
    }
}

/// Outcome of a complete traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Walk {
    /// The name the walk was started from, as given.
    pub start: String,
    /// Canonical identifier of the start package, absent when it is standard.
    pub root: Option<PackageId>,
    pub visited: VisitedSet,
}

pub struct ImportWalker<'a, S: PackageSource + ?Sized> {
    source: &'a S,
    options: &'a WalkOptions,
}

impl<'a, S: PackageSource + ?Sized> ImportWalker<'a, S> {
    pub fn new(source: &'a S, options: &'a WalkOptions) -> Self {
        Self { source, options }
    }

    pub fn walk(&self, start: &str) -> Result<Walk, ResolveError> {
        let mut visited = VisitedSet::new();
        let root = self.walk_into(&mut visited, start)?;
        debug!(start, count = visited.len(), "walk complete");
        Ok(Walk {
            start: start.to_string(),
            root,
            visited,
        })
    }

    /// Adds every package reachable from `start` to `visited` and returns the
    /// canonical identifier of `start`, or `None` if it is a standard package.
    ///
    /// The first resolution failure aborts the walk; `visited` is then left
    /// partially filled and should be discarded.
    pub fn walk_into(
        &self,
        visited: &mut VisitedSet,
        start: &str,
    ) -> Result<Option<PackageId>, ResolveError> {
        self.visit(visited, start, self.options.include_tests)
    }

    fn visit(
        &self,
        visited: &mut VisitedSet,
        name: &str,
        include_tests: bool,
    ) -> Result<Option<PackageId>, ResolveError> {
        let pkg = self.source.import(name, &self.options.working_dir)?;
        if pkg.standard {
            trace!(package = %pkg.import_path, "standard package");
            return Ok(None);
        }

        debug!(package = %pkg.import_path, "visiting");
        visited.insert(pkg.import_path.clone());

        let tests: &[PackageId] = if include_tests {
            &pkg.test_imports
        } else {
            &[]
        };
        for import in pkg.imports.iter().chain(tests) {
            if self.options.should_follow(import, visited) {
                self.visit(visited, import, false)?;
            }
        }

        Ok(Some(pkg.import_path))
    }
}
