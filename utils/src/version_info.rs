//! Build/version metadata surfaced in the UI top bar.
//!
//! `BUILD_DATE` and `BUILD_COMMIT` are captured by `build.rs` at compile
//! time; the commit falls back to "unknown" outside a git checkout.

/// RFC 3339 build timestamp.
pub fn build_date() -> &'static str {
    env!("BUILD_DATE")
}

/// Short git commit of the build, or "unknown".
pub fn build_commit() -> &'static str {
    env!("BUILD_COMMIT")
}

/// Package version.
pub fn build_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns the environment label and version/info string for this build.
///
/// Format: `(env_name, info_string)`
/// - Debug builds: ("dev", commit)
/// - Release builds: ("stable", version)
pub fn env_version_info() -> (&'static str, &'static str) {
    if cfg!(debug_assertions) {
        ("dev", build_commit())
    } else {
        ("stable", build_version())
    }
}

/// Format the environment and version info as a display string, e.g.
/// `stable:2026.1.0`.
pub fn format_env_version() -> String {
    let (env_name, info) = env_version_info();
    format!("{env_name}:{info}")
}
