//! Coastal visitor statistics
//!
//! Monthly visitor counts per coastal region. The table lives in the
//! statistics database owned by another service; only the record shape is
//! shared here.

use serde::{Deserialize, Serialize};

use crate::validation::validate_year_month;

/// Maximum length of a region name
pub const REGION_MAX_LEN: usize = 20;

/// One row of `coastal_visitor_stats`, unique on `(region, year_month)`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoastalVisitorStats {
    pub region: String,
    /// `YYYY-MM`
    pub year_month: String,
    pub visitor: i32,
}

impl CoastalVisitorStats {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.region.is_empty() {
            return Err("Region is required");
        }
        if self.region.chars().count() > REGION_MAX_LEN {
            return Err("Region must be at most 20 characters");
        }
        if self.visitor < 0 {
            return Err("Visitor count cannot be negative");
        }
        validate_year_month(&self.year_month)
    }

    /// Key the table enforces uniqueness on
    pub fn unique_key(&self) -> (&str, &str) {
        (&self.region, &self.year_month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(region: &str, year_month: &str, visitor: i32) -> CoastalVisitorStats {
        CoastalVisitorStats {
            region: region.to_string(),
            year_month: year_month.to_string(),
            visitor,
        }
    }

    #[test]
    fn test_valid_record() {
        assert!(stats("협재", "2024-07", 152_300).validate().is_ok());
    }

    #[test]
    fn test_invalid_records() {
        assert!(stats("", "2024-07", 1).validate().is_err());
        assert!(stats("협재", "2024-7", 1).validate().is_err());
        assert!(stats("협재", "2024-07", -1).validate().is_err());
        assert!(stats(&"가".repeat(21), "2024-07", 1).validate().is_err());
    }

    #[test]
    fn test_unique_key() {
        let a = stats("함덕", "2024-08", 10);
        let b = stats("함덕", "2024-08", 99);
        assert_eq!(a.unique_key(), b.unique_key());
    }
}
