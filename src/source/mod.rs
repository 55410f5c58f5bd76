use std::path::Path;

use crate::error::ResolveError;

pub mod go;
pub mod graph;

pub use go::GoListSource;
pub use graph::{GraphNode, GraphSource};

pub type PackageId = String;

/// Metadata for one node of the import graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    /// Canonical identifier, which may differ from the name it was looked up by
    /// (e.g. `.` resolves to the module path of the current directory).
    pub import_path: PackageId,
    pub imports: Vec<PackageId>,
    pub test_imports: Vec<PackageId>,
    /// Part of the toolchain's standard distribution.
    pub standard: bool,
}

impl Package {
    pub fn new(import_path: impl Into<PackageId>) -> Self {
        Self {
            import_path: import_path.into(),
            ..Self::default()
        }
    }
}

/// Resolves package identifiers to their descriptors.
pub trait PackageSource: Send + Sync {
    /// Looks up `name` using `dir` as the resolution context for relative
    /// identifiers.
    fn import(&self, name: &str, dir: &Path) -> Result<Package, ResolveError>;
}

impl<S: PackageSource + ?Sized> PackageSource for Box<S> {
    fn import(&self, name: &str, dir: &Path) -> Result<Package, ResolveError> {
        (**self).import(name, dir)
    }
}
