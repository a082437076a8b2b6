//! Version parsing and comparison for Companion release tags
//!
//! Versions are compared as dotted integer sequences rather than strict
//! semver: Companion tags are not guaranteed to have three components, and
//! anything that does not parse still has to order somewhere.

use std::cmp::Ordering;
use std::fmt;

/// Placeholder shown when a version could not be determined
pub const UNKNOWN_VERSION: &str = "Unknown";

/// Ordered sequence of numeric components extracted from a version string
///
/// `4.2` and `4.2.0` are equal: the shorter sequence is padded with zeros
/// before comparing. Components are kept as digit strings without leading
/// zeros, so components of any length compare exactly.
#[derive(Debug, Clone, Default)]
pub struct Version {
    parts: Vec<String>,
}

impl Version {
    /// Parse a version string. Never fails.
    ///
    /// A single leading `v` is dropped, then every maximal run of ASCII digits
    /// becomes one component. Input without digits yields an empty version,
    /// which compares equal to all-zero versions.
    pub fn parse(input: &str) -> Self {
        let input = input.strip_prefix('v').unwrap_or(input);

        let parts = input
            .split(|c: char| !c.is_ascii_digit())
            .filter(|run| !run.is_empty())
            .map(normalize_digits)
            .collect();

        Self { parts }
    }

    /// Numeric components in order
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    fn component(&self, index: usize) -> &str {
        self.parts.get(index).map(String::as_str).unwrap_or("0")
    }
}

fn normalize_digits(run: &str) -> String {
    match run.trim_start_matches('0') {
        "" => "0".to_string(),
        digits => digits.to_string(),
    }
}

/// Order two normalized digit strings by numeric value
fn cmp_digits(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| cmp_digits(self.component(i), other.component(i)))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join("."))
    }
}

/// Compare two version strings.
///
/// `Less` means `current` is older than `latest` (an update is available),
/// `Greater` means `current` is ahead of the release.
pub fn compare(current: &str, latest: &str) -> Ordering {
    Version::parse(current).cmp(&Version::parse(latest))
}

/// Whether `latest` is strictly newer than `current`
pub fn is_update_available(current: &str, latest: &str) -> bool {
    compare(current, latest) == Ordering::Less
}

/// Format a version for display with a single leading `v`
pub fn format_for_display(version: Option<&str>) -> String {
    match version {
        None | Some("") => UNKNOWN_VERSION.to_string(),
        Some(v) if v.starts_with('v') => v.to_string(),
        Some(v) => format!("v{}", v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_strips_prefix_and_separators() {
        assert_eq!(Version::parse("v4.2.3").parts(), ["4", "2", "3"]);
        assert_eq!(Version::parse("4.2.3-beta+1").parts(), ["4", "2", "3", "1"]);
        assert_eq!(Version::parse("release 10_0").parts(), ["10", "0"]);
        assert_eq!(Version::parse("4.02.000").parts(), ["4", "2", "0"]);
    }

    #[test]
    fn parse_without_digits_is_empty() {
        assert!(Version::parse("").parts().is_empty());
        assert!(Version::parse("latest").parts().is_empty());
        assert_eq!(Version::parse("nightly"), Version::parse("0.0.0"));
    }

    #[test]
    fn huge_components_compare_exactly() {
        let past_u64 = "18446744073709551616";
        assert_eq!(Version::parse(past_u64).to_string(), past_u64);
        assert_eq!(
            compare("99999999999999999999999.1", "99999999999999999999998.9"),
            Ordering::Greater
        );
        assert_eq!(compare("18446744073709551615", past_u64), Ordering::Less);
        assert_eq!(compare("00099999999999999999999", "99999999999999999999999"), Ordering::Equal);
    }

    #[test]
    fn compare_is_reflexive() {
        for v in ["4.2.3", "v4.2.3", "", "latest", "1.0.0-rc.2", "2024.1"] {
            assert_eq!(compare(v, v), Ordering::Equal, "{v}");
        }
    }

    #[test]
    fn compare_is_antisymmetric() {
        let samples = ["4.2.3", "4.2.4", "4.2", "v5", "", "3.99.0", "4.10.0"];
        for a in samples {
            for b in samples {
                assert_eq!(compare(a, b), compare(b, a).reverse(), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn compare_pads_with_zeros() {
        assert_eq!(compare("4.2", "4.2.0"), Ordering::Equal);
        assert_eq!(compare("4.2", "4.2.1"), Ordering::Less);
        assert_eq!(compare("4.10.0", "4.9.9"), Ordering::Greater);
    }

    #[test]
    fn update_available() {
        assert!(is_update_available("4.2.3", "4.2.4"));
        assert!(is_update_available("4.2.3", "v4.2.4"));
        assert!(!is_update_available("4.2.4", "4.2.3"));
        assert!(!is_update_available("4.2", "4.2.0"));
    }

    #[test]
    fn display_formatting() {
        assert_eq!(format_for_display(None), "Unknown");
        assert_eq!(format_for_display(Some("")), "Unknown");
        assert_eq!(format_for_display(Some("4.2.3")), "v4.2.3");
        assert_eq!(format_for_display(Some("v4.2.3")), "v4.2.3");
    }

    #[test]
    fn version_display_joins_parts() {
        assert_eq!(Version::parse("v4.2.3").to_string(), "4.2.3");
    }
}
