/// Compile-time build metadata produced by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

/// Returns the statically-embedded build metadata.
pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("CASE_INTAKE_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("CASE_INTAKE_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("CASE_INTAKE_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("CASE_INTAKE_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("CASE_INTAKE_BUILD_PROFILE").unwrap_or("unknown"),
        rustc: option_env!("CASE_INTAKE_BUILD_RUSTC").unwrap_or("unknown"),
    }
}

/// One `label: value` row per field, in display order.
pub fn rows(meta: &BuildMetadata) -> Vec<(&'static str, String)> {
    vec![
        ("Build hash", format!("{} ({})", meta.git_hash, meta.git_status)),
        ("Built at", meta.timestamp.to_string()),
        ("Target", meta.target.to_string()),
        ("Profile", meta.profile.to_string()),
        ("Rustc", meta.rustc.to_string()),
    ]
}
