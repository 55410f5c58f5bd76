//! deplist
//!
//! Lists the transitive non-standard dependencies of a Go package by walking
//! its import graph, resolving each package through `go list` or a static
//! graph file.
pub mod cli;
pub mod error;
pub mod logging;
pub mod output;
pub mod source;
pub mod walk;

pub use output::{list_dependencies, OutputMode, Report};
pub use source::{Package, PackageId, PackageSource};
pub use walk::{ImportWalker, VisitedSet, Walk, WalkOptions};
