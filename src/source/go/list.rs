use std::path::{Path, PathBuf};
use std::process::Command;
use std::str;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::error::ResolveError;
use crate::source::{Package, PackageSource};

use super::config::*;

/// Package metadata backed by `go list`.
#[derive(Debug, Clone)]
pub struct GoListSource {
    go: PathBuf,
}

impl GoListSource {
    pub fn new(go: impl Into<PathBuf>) -> Self {
        Self { go: go.into() }
    }

    pub(crate) fn go(&self) -> &Path {
        &self.go
    }
}

impl Default for GoListSource {
    fn default() -> Self {
        Self::new(GO_COMMAND)
    }
}

impl PackageSource for GoListSource {
    fn import(&self, name: &str, dir: &Path) -> Result<Package, ResolveError> {
        trace!(package = name, dir = %dir.display(), "running go list");
        let output = Command::new(&self.go)
            .args(GO_LIST_ARGS)
            .arg(name)
            .current_dir(dir)
            .output()
            .map_err(|e| {
                ResolveError::tool(name, format!("failed to run '{}': {e}", self.go.display()))
            })?;

        let decoded = decode_packages(name, &output.stdout);
        if !output.status.success() && !matches!(&decoded, Ok(pkgs) if !pkgs.is_empty()) {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            };
            return Err(ResolveError::tool(name, message));
        }

        let mut packages = decoded?;
        match packages.len() {
            0 => Err(ResolveError::unknown_package(name)),
            1 => packages.remove(0).into_package(name),
            count => Err(ResolveError::ambiguous(name, count)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct GoPackage {
    import_path: String,
    imports: Vec<String>,
    test_imports: Vec<String>,
    goroot: bool,
    standard: bool,
    error: Option<GoPackageError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct GoPackageError {
    err: String,
}

impl GoPackage {
    fn into_package(self, name: &str) -> Result<Package, ResolveError> {
        if let Some(error) = self.error.filter(|e| !e.err.is_empty()) {
            return Err(ResolveError::invalid_package(name, error.err));
        }
        if self.import_path.is_empty() {
            return Err(ResolveError::decode(name, "package has no import path"));
        }

        debug!(
            package = %self.import_path,
            imports = self.imports.len(),
            test_imports = self.test_imports.len(),
            standard = self.goroot || self.standard,
            "resolved package"
        );

        Ok(Package {
            import_path: self.import_path,
            imports: self.imports,
            test_imports: self.test_imports,
            standard: self.goroot || self.standard,
        })
    }
}

/// `go list -json` prints one JSON object per matched package, back to back.
fn decode_packages(name: &str, stdout: &[u8]) -> Result<Vec<GoPackage>, ResolveError> {
    let text = str::from_utf8(stdout)
        .map_err(|e| ResolveError::decode(name, format!("invalid UTF-8 from go list: {e}")))?;

    serde_json::Deserializer::from_str(text)
        .into_iter::<GoPackage>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ResolveError::decode(name, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const LIB_JSON: &str = r#"{
        "Dir": "/home/dev/go/pkg/mod/github.com/x/lib@v1.0.0",
        "ImportPath": "github.com/x/lib",
        "Name": "lib",
        "Module": {"Path": "github.com/x/lib", "Version": "v1.0.0"},
        "Imports": ["fmt", "github.com/x/util"],
        "TestImports": ["testing", "github.com/x/assert"],
        "XTestImports": ["github.com/x/lib"]
    }"#;

    #[test]
    fn test_decode_single_package() {
        let mut packages = decode_packages("github.com/x/lib", LIB_JSON.as_bytes()).unwrap();
        assert_eq!(packages.len(), 1);

        let pkg = packages.remove(0).into_package("github.com/x/lib").unwrap();
        assert_eq!(pkg.import_path, "github.com/x/lib");
        assert_eq!(pkg.imports, vec!["fmt", "github.com/x/util"]);
        assert_eq!(pkg.test_imports, vec!["testing", "github.com/x/assert"]);
        assert!(!pkg.standard);
    }

    #[test]
    fn test_decode_standard_package() {
        let json = r#"{"ImportPath": "fmt", "Goroot": true, "Standard": true, "Imports": ["errors"]}"#;
        let pkg = decode_packages("fmt", json.as_bytes())
            .unwrap()
            .remove(0)
            .into_package("fmt")
            .unwrap();
        assert!(pkg.standard);
    }

    #[test]
    fn test_decode_goroot_without_standard_flag() {
        let json = r#"{"ImportPath": "cmd/internal/obj", "Goroot": true}"#;
        let pkg = decode_packages("cmd/internal/obj", json.as_bytes())
            .unwrap()
            .remove(0)
            .into_package("cmd/internal/obj")
            .unwrap();
        assert!(pkg.standard);
    }

    #[test]
    fn test_decode_package_stream() {
        let stream = format!("{LIB_JSON}\n{{\"ImportPath\": \"github.com/x/util\"}}\n");
        let packages = decode_packages("./...", stream.as_bytes()).unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[1].import_path, "github.com/x/util");
    }

    #[test]
    fn test_decode_empty_output() {
        let packages = decode_packages("nothing", b"").unwrap();
        assert!(packages.is_empty());
    }

    #[test]
    fn test_decode_garbage_output() {
        let err = decode_packages("github.com/x/lib", b"not json").unwrap_err();
        assert!(matches!(err, ResolveError::Decode { .. }));
    }

    #[test]
    fn test_package_error_becomes_invalid_package() {
        let json = r#"{
            "ImportPath": "github.com/x/missing",
            "Incomplete": true,
            "Error": {"ImportStack": [], "Pos": "", "Err": "no required module provides package github.com/x/missing"}
        }"#;
        let err = decode_packages("github.com/x/missing", json.as_bytes())
            .unwrap()
            .remove(0)
            .into_package("github.com/x/missing")
            .unwrap_err();

        match err {
            ResolveError::InvalidPackage { name, message } => {
                assert_eq!(name, "github.com/x/missing");
                assert!(message.contains("no required module provides"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_go_binary_is_tool_error() {
        let temp_dir = TempDir::new().unwrap();
        let source = GoListSource::new(temp_dir.path().join("no-such-go"));
        let err = source.import("fmt", temp_dir.path()).unwrap_err();
        assert!(matches!(err, ResolveError::Tool { .. }));
        assert!(err.to_string().contains("failed to run"));
    }

    #[test]
    fn test_default_uses_go_command() {
        assert_eq!(GoListSource::default().go(), Path::new(GO_COMMAND));
    }

    #[cfg(unix)]
    mod fake_go {
        use super::*;
        use pretty_assertions::assert_eq;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        /// Writes an executable `go` stand-in whose body is `script`.
        fn fake_go(dir: &TempDir, script: &str) -> GoListSource {
            let path = dir.path().join("go");
            fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            GoListSource::new(path)
        }

        #[test]
        fn test_import_passes_list_args_and_working_dir() {
            let bin_dir = TempDir::new().unwrap();
            let work_dir = TempDir::new().unwrap();
            let source = fake_go(
                &bin_dir,
                r#"echo "$@" > args.txt
pwd -P > cwd.txt
echo '{"ImportPath": "github.com/x/lib", "Imports": ["github.com/x/util"]}'"#,
            );

            let pkg = source.import("github.com/x/lib", work_dir.path()).unwrap();
            assert_eq!(pkg.import_path, "github.com/x/lib");
            assert_eq!(pkg.imports, vec!["github.com/x/util"]);

            let args = fs::read_to_string(work_dir.path().join("args.txt")).unwrap();
            assert_eq!(args.trim(), "list -e -json github.com/x/lib");

            let cwd = fs::read_to_string(work_dir.path().join("cwd.txt")).unwrap();
            assert_eq!(
                Path::new(cwd.trim()),
                fs::canonicalize(work_dir.path()).unwrap()
            );
        }

        #[test]
        fn test_import_failed_exit_carries_stderr() {
            let temp_dir = TempDir::new().unwrap();
            let source = fake_go(&temp_dir, "echo 'go: module lookup disabled' >&2\nexit 1");

            let err = source.import("github.com/x/lib", temp_dir.path()).unwrap_err();
            match err {
                ResolveError::Tool { name, message } => {
                    assert_eq!(name, "github.com/x/lib");
                    assert_eq!(message, "go: module lookup disabled");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[test]
        fn test_import_failed_exit_without_stderr() {
            let temp_dir = TempDir::new().unwrap();
            let source = fake_go(&temp_dir, "exit 3");

            let err = source.import("github.com/x/lib", temp_dir.path()).unwrap_err();
            assert!(matches!(err, ResolveError::Tool { ref message, .. } if message.contains("exit")));
        }

        #[test]
        fn test_import_package_error_with_failed_exit() {
            let temp_dir = TempDir::new().unwrap();
            let source = fake_go(
                &temp_dir,
                r#"echo '{"ImportPath": "github.com/x/bad", "Error": {"Err": "no Go files"}}'
echo 'listing failed' >&2
exit 1"#,
            );

            let err = source.import("github.com/x/bad", temp_dir.path()).unwrap_err();
            assert!(matches!(
                err,
                ResolveError::InvalidPackage { ref message, .. } if message == "no Go files"
            ));
        }

        #[test]
        fn test_import_several_packages_is_ambiguous() {
            let temp_dir = TempDir::new().unwrap();
            let source = fake_go(
                &temp_dir,
                r#"echo '{"ImportPath": "github.com/x/a"}'
echo '{"ImportPath": "github.com/x/b"}'"#,
            );

            let err = source.import("github.com/x/...", temp_dir.path()).unwrap_err();
            assert!(matches!(err, ResolveError::Ambiguous { count: 2, .. }));
        }

        #[test]
        fn test_import_no_packages_is_unknown() {
            let temp_dir = TempDir::new().unwrap();
            let source = fake_go(&temp_dir, "exit 0");

            let err = source.import("github.com/x/none", temp_dir.path()).unwrap_err();
            assert!(matches!(
                err,
                ResolveError::UnknownPackage { ref name } if name == "github.com/x/none"
            ));
        }
    }
}
