// ── Device identity ──
//
// Access points are keyed by MAC. The Mist API writes MACs as bare
// lowercase hex (`5c5b35000001`); configuration files and labels use every
// other format, so all comparisons go through this type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// MAC address, normalized to lowercase bare hex (5c5b35000001).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-, dash- or dot-separated and bare hex.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = raw
            .as_ref()
            .chars()
            .filter(|c| !matches!(c, ':' | '-' | '.') && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Twelve hex digits after normalization.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == 12 && self.0.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Compare against a MAC string as the controller returned it.
    pub fn matches(&self, raw: &str) -> bool {
        *self == Self::new(raw)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for MacAddress {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_colons_and_case() {
        let mac = MacAddress::new("5C:5B:35:00:00:01");
        assert_eq!(mac.as_str(), "5c5b35000001");
        assert!(mac.is_well_formed());
    }

    #[test]
    fn normalizes_dashes_and_dots() {
        assert_eq!(MacAddress::new("5c-5b-35-00-00-01").as_str(), "5c5b35000001");
        assert_eq!(MacAddress::new("5c5b.3500.0001").as_str(), "5c5b35000001");
    }

    #[test]
    fn matches_controller_format() {
        let mac: MacAddress = "5C-5B-35-00-00-01".parse().unwrap();
        assert!(mac.matches("5c5b35000001"));
        assert!(!mac.matches("5c5b35000002"));
    }

    #[test]
    fn rejects_short_values_as_malformed() {
        assert!(!MacAddress::new("5c5b35").is_well_formed());
        assert!(!MacAddress::new("zz5b35000001").is_well_formed());
    }
}
