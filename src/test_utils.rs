//! Helpers shared by in-crate and integration proptests.

/// `PROPTEST_CASES` from the environment, if set and numeric.
fn cases_override() -> Option<u32> {
    std::env::var("PROPTEST_CASES").ok()?.parse().ok()
}

/// Case count for a proptest block.
///
/// An explicit `PROPTEST_CASES` wins. CI runs `default`; local runs are
/// capped at 16 so `cargo test` stays quick.
pub fn proptest_cases(default: u32) -> u32 {
    let cases = match cases_override() {
        Some(cases) => cases,
        None if std::env::var_os("CI").is_some() => default,
        None => default.min(16),
    };
    cases.max(1)
}
