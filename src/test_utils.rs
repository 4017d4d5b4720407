//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest and for
//! unit tests that spawn stand-in command-line tools.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    /// Generate a valid package name (lowercase alphanumeric with hyphens)
    pub fn package_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,30}[a-z0-9]?".prop_filter("Name must not be empty", |s| !s.is_empty())
    }

    /// Generate a run stamp in the `%Y-%m-%d_%H%M%S` shape
    pub fn stamp() -> impl Strategy<Value = String> {
        (2020u32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_map(
            |(year, month, day, hour, minute, second)| {
                format!("{year:04}-{month:02}-{day:02}_{hour:02}{minute:02}{second:02}")
            },
        )
    }

    /// Generate an overlay key (word characters only)
    pub fn config_key() -> impl Strategy<Value = String> {
        "[a-zA-Z][a-zA-Z0-9_]{0,15}"
    }

    /// Generate an overlay value (word characters, slashes, dots, hyphens)
    pub fn config_value() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_][a-zA-Z0-9_/.-]{0,31}"
    }
}

#[cfg(test)]
pub mod stubs {
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Write an executable shell script into `dir` and return its path
    pub fn write_stub(dir: &Path, name: &str, script: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, script).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_package_name_generator(name in package_name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }

        #[test]
        fn test_stamp_generator(stamp in stamp()) {
            prop_assert_eq!(stamp.len(), 17);
            prop_assert_eq!(stamp.chars().filter(|c| *c == '_').count(), 1);
        }

        #[test]
        fn test_config_value_generator(value in config_value()) {
            prop_assert!(!value.is_empty());
            prop_assert!(value.chars().all(|c| c.is_ascii_alphanumeric() || "_/.-".contains(c)));
        }
    }
}
