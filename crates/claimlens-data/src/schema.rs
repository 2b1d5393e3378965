//! Canonical column names of the insurance policy dataset.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Total premium collected for the policy.
pub const TOTAL_PREMIUM: &str = "TotalPremium";

/// Total claims paid on the policy.
pub const TOTAL_CLAIMS: &str = "TotalClaims";

/// Province of the insured.
pub const PROVINCE: &str = "Province";

/// Postal code of the insured.
pub const POSTAL_CODE: &str = "PostalCode";

/// Gender of the insured.
pub const GENDER: &str = "Gender";

/// Derived flag: `TotalClaims > 0`.
pub const HAS_CLAIM: &str = "HasClaim";

/// Gender categories compared by the gender risk test.
///
/// Any other value in the `Gender` column (e.g. "Not specified") is excluded
/// from that test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
pub enum Gender {
    /// Male
    #[display("Male")]
    Male,

    /// Female
    #[display("Female")]
    Female,
}

impl Gender {
    /// Returns both tested categories.
    pub const fn all() -> [Self; 2] {
        [Self::Male, Self::Female]
    }

    /// Value of this category as it appears in the dataset.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    /// Parse a dataset value, returning `None` for untested categories.
    pub fn from_label(value: &str) -> Option<Self> {
        Self::all().into_iter().find(|g| g.label() == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_labels() {
        assert_eq!(Gender::from_label("Male"), Some(Gender::Male));
        assert_eq!(Gender::from_label("Female"), Some(Gender::Female));
        assert_eq!(Gender::from_label("Not specified"), None);
        assert_eq!(Gender::Female.to_string(), "Female");
    }
}
