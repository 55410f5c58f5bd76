pub const GO_COMMAND: &str = "go";

pub const GO_COMMAND_ENV: &str = "DEPLIST_GO";

/// `-e` reports broken packages through the `Error` field instead of failing
/// the whole invocation.
pub const GO_LIST_ARGS: &[&str] = &["list", "-e", "-json"];

/// Pseudo-imports that never name a real package.
pub const DEFAULT_IGNORED: &[&str] = &["C"];

pub const CURRENT_PACKAGE: &str = ".";
