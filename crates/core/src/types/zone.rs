//! Storage zones, production lines and the reference pick lists.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Zone labels of the reference deployment, in display order.
pub const DEFAULT_ZONES: [&str; 7] = ["A", "B", "C", "D", "E", "F", "G"];

/// Box colours offered by the job form.
pub const COLORS: [&str; 12] = [
    "แดง",
    "น้ำเงิน",
    "เขียว",
    "เหลือง",
    "ส้ม",
    "ม่วง",
    "ชมพู",
    "ขาว",
    "ดำ",
    "เทา",
    "น้ำตาล",
    "ฟ้า",
];

/// Box sizes offered by the job form.
pub const BOX_SIZES: [&str; 5] = ["10x10x10", "20x20x20", "30x30x30", "40x40x40", "50x50x50"];

/// An opaque storage-location label.
///
/// Zones carry no capacity or position; any number of jobs may share one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zone(String);

impl Zone {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Zone {
    fn from(label: &str) -> Self {
        Self(label.to_owned())
    }
}

/// The ordered set of zones a deployment accepts.
///
/// Operations that assign a zone (job creation, edit, return) check the label
/// against the catalog. Zones already present in a stored document are not
/// re-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneCatalog {
    zones: Vec<Zone>,
}

impl ZoneCatalog {
    /// Build a catalog from labels, dropping blanks and duplicates while
    /// keeping the first-seen order.
    #[must_use]
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut zones: Vec<Zone> = Vec::new();
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() || zones.iter().any(|z| z.as_str() == label) {
                continue;
            }
            zones.push(Zone::from(label));
        }
        Self { zones }
    }

    /// Parse a comma-separated list such as `A,B,C`.
    #[must_use]
    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Zones in display order.
    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    #[must_use]
    pub fn contains(&self, zone: &Zone) -> bool {
        self.zones.contains(zone)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Check that `zone` belongs to this catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownZone`] for labels outside the catalog.
    pub fn validate(&self, zone: &Zone) -> Result<(), ValidationError> {
        if self.contains(zone) {
            Ok(())
        } else {
            Err(ValidationError::UnknownZone(zone.to_string()))
        }
    }
}

impl Default for ZoneCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_ZONES)
    }
}

/// Production line a pulled job is assigned to (1 through 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductionLine(u8);

impl ProductionLine {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    /// Create a line number, rejecting values outside 1–6.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidLine`] when out of range.
    pub fn new(line: u8) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&line) {
            Ok(Self(line))
        } else {
            Err(ValidationError::InvalidLine(line))
        }
    }

    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for ProductionLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for ProductionLine {
    type Error = ValidationError;

    fn try_from(line: u8) -> Result<Self, Self::Error> {
        Self::new(line)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_seven_zones() {
        let catalog = ZoneCatalog::default();
        assert_eq!(catalog.zones().len(), 7);
        assert_eq!(catalog.zones()[0].as_str(), "A");
        assert!(catalog.contains(&Zone::from("G")));
        assert!(!catalog.contains(&Zone::from("H")));
    }

    #[test]
    fn test_parse_list_trims_and_dedupes() {
        let catalog = ZoneCatalog::parse_list(" A, B ,,A,C ");
        let labels: Vec<&str> = catalog.zones().iter().map(Zone::as_str).collect();
        assert_eq!(labels, ["A", "B", "C"]);
    }

    #[test]
    fn test_validate_unknown_zone() {
        let err = ZoneCatalog::default()
            .validate(&Zone::from("Z"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownZone(z) if z == "Z"));
    }

    #[test]
    fn test_production_line_range() {
        assert!(ProductionLine::new(0).is_err());
        assert_eq!(ProductionLine::new(1).unwrap().get(), 1);
        assert_eq!(ProductionLine::new(6).unwrap().get(), 6);
        assert!(matches!(
            ProductionLine::new(7),
            Err(ValidationError::InvalidLine(7))
        ));
    }
}
