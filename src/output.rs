use crate::error::Result;
use crate::source::{PackageId, PackageSource};
use crate::walk::{ImportWalker, VisitedSet, Walk, WalkOptions};

/// Walks the imports of `start` and builds the report to print.
pub fn list_dependencies<S: PackageSource + ?Sized>(
    source: &S,
    options: &WalkOptions,
    start: &str,
    include_root: bool,
) -> Result<Report> {
    let walk = ImportWalker::new(source, options).walk(start)?;
    Ok(Report::new(walk, include_root))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One package per line.
    #[default]
    Lines,
    /// All packages on a single comma-separated line.
    OneLine,
}

/// The packages to print for a finished walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    packages: VisitedSet,
}

impl Report {
    /// Drops the start package unless `include_root` is set. The start is
    /// matched both as typed and by its canonical identifier.
    pub fn new(walk: Walk, include_root: bool) -> Self {
        let Walk {
            start,
            root,
            mut visited,
        } = walk;

        if !include_root {
            visited.remove(&start);
            if let Some(root) = root {
                visited.remove(&root);
            }
        }

        Self { packages: visited }
    }

    pub fn packages(&self) -> impl Iterator<Item = &PackageId> {
        self.packages.iter()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Renders the report, newline-terminated. An empty report renders as
    /// nothing in `Lines` mode and as a single empty line in `OneLine` mode.
    pub fn render(&self, mode: OutputMode) -> String {
        match mode {
            OutputMode::Lines => self.packages.iter().fold(String::new(), |mut out, pkg| {
                out.push_str(pkg);
                out.push('\n');
                out
            }),
            OutputMode::OneLine => {
                let mut line = self
                    .packages
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(",");
                line.push('\n');
                line
            }
        }
    }
}
