//! Static package graphs.
//!
//! A graph file lists every package the walk may reach, keyed by identifier:
//!
//! ```yaml
//! current: example.com/app
//! packages:
//!   example.com/app:
//!     imports: [example.com/lib, fmt]
//!     test_imports: [example.com/testutil]
//!   fmt:
//!     standard: true
//! ```
//!
//! JSON files use the same shape.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraphError, ResolveError};
use crate::source::go::config::CURRENT_PACKAGE;
use crate::source::{Package, PackageId, PackageSource};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphNode {
    pub imports: Vec<PackageId>,
    pub test_imports: Vec<PackageId>,
    pub standard: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSource {
    /// Package that `.` resolves to.
    #[serde(default)]
    current: Option<PackageId>,
    packages: BTreeMap<PackageId, GraphNode>,
}

impl GraphSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let content = fs::read_to_string(path).map_err(|e| GraphError::read(path, e))?;

        let graph: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| GraphError::parse(path, e.to_string()))?
            }
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| GraphError::parse(path, e.to_string()))?
            }
            _ => return Err(GraphError::unsupported_format(path)),
        };

        debug!(
            path = %path.display(),
            packages = graph.packages.len(),
            "loaded package graph"
        );
        Ok(graph)
    }

    pub fn with_current(mut self, id: impl Into<PackageId>) -> Self {
        self.current = Some(id.into());
        self
    }

    /// Adds a non-standard package with the given direct imports.
    pub fn package<I, S>(self, id: impl Into<PackageId>, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PackageId>,
    {
        self.node(
            id,
            GraphNode {
                imports: imports.into_iter().map(Into::into).collect(),
                ..GraphNode::default()
            },
        )
    }

    pub fn standard(self, id: impl Into<PackageId>) -> Self {
        self.node(
            id,
            GraphNode {
                standard: true,
                ..GraphNode::default()
            },
        )
    }

    pub fn node(mut self, id: impl Into<PackageId>, node: GraphNode) -> Self {
        self.packages.insert(id.into(), node);
        self
    }

    pub(crate) fn len(&self) -> usize {
        self.packages.len()
    }
}

impl PackageSource for GraphSource {
    fn import(&self, name: &str, _dir: &Path) -> Result<Package, ResolveError> {
        let id = match (name, &self.current) {
            (CURRENT_PACKAGE, Some(current)) => current.as_str(),
            _ => name,
        };

        let node = self
            .packages
            .get(id)
            .ok_or_else(|| ResolveError::unknown_package(name))?;

        Ok(Package {
            import_path: id.to_string(),
            imports: node.imports.clone(),
            test_imports: node.test_imports.clone(),
            standard: node.standard,
        })
    }
}
