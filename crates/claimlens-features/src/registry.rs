//! Feature Registry
//!
//! Static list of the logical features used by the predictive models, with
//! the source column spellings each one may appear under.

/// Datasets a feature can be selected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Claim severity (claim records, target `TotalClaims`)
    Severity,
    /// Premium prediction (target `TotalPremium`)
    Premium,
}

/// Feature metadata
///
/// The resolved column's dtype decides how a feature is treated: a numeric
/// column is imputed with its median, anything else is imputed with its mode
/// and one-hot encoded.
#[derive(Debug, Clone)]
pub struct FeatureInfo {
    /// Canonical feature name
    pub name: &'static str,
    /// Alternative source column spellings
    pub aliases: &'static [&'static str],
    /// Datasets that select this feature
    pub datasets: &'static [Dataset],
}

impl FeatureInfo {
    /// Whether `column` names this feature, ignoring case.
    pub fn matches(&self, column: &str) -> bool {
        let column = column.to_lowercase();
        column == self.name.to_lowercase()
            || self.aliases.iter().any(|a| a.to_lowercase() == column)
    }
}

const BOTH: &[Dataset] = &[Dataset::Severity, Dataset::Premium];
const PREMIUM_ONLY: &[Dataset] = &[Dataset::Premium];

/// Get all available feature info
pub fn available_features() -> Vec<FeatureInfo> {
    vec![
        // Location
        FeatureInfo {
            name: "Province",
            aliases: &[],
            datasets: BOTH,
        },
        FeatureInfo {
            name: "PostalCode",
            aliases: &[],
            datasets: BOTH,
        },
        // Client
        FeatureInfo {
            name: "Gender",
            aliases: &[],
            datasets: BOTH,
        },
        FeatureInfo {
            name: "MaritalStatus",
            aliases: &[],
            datasets: BOTH,
        },
        // Vehicle
        FeatureInfo {
            name: "VehicleType",
            aliases: &[],
            datasets: BOTH,
        },
        FeatureInfo {
            name: "Make",
            aliases: &["make"],
            datasets: BOTH,
        },
        FeatureInfo {
            name: "RegistrationYear",
            aliases: &[],
            datasets: BOTH,
        },
        FeatureInfo {
            name: "EngineDisplacement",
            aliases: &["cubiccapacity"],
            datasets: BOTH,
        },
        FeatureInfo {
            name: "PowerKW",
            aliases: &["kilowatts"],
            datasets: BOTH,
        },
        // Plan
        FeatureInfo {
            name: "SumInsured",
            aliases: &[],
            datasets: BOTH,
        },
        FeatureInfo {
            name: "CoverType",
            aliases: &[],
            datasets: BOTH,
        },
        FeatureInfo {
            name: "PremiumPerTerm",
            aliases: &["CalculatedPremiumPerTerm"],
            datasets: BOTH,
        },
        // Premium-only vehicle details
        FeatureInfo {
            name: "BodyType",
            aliases: &["bodytype"],
            datasets: PREMIUM_ONLY,
        },
        FeatureInfo {
            name: "NumberOfDoors",
            aliases: &[],
            datasets: PREMIUM_ONLY,
        },
    ]
}

/// Features selected for a dataset, in registry order
pub fn features_for(dataset: Dataset) -> Vec<FeatureInfo> {
    available_features()
        .into_iter()
        .filter(|f| f.datasets.contains(&dataset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_allow_list() {
        let names: Vec<&str> = features_for(Dataset::Severity)
            .iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names.len(), 12);
        assert!(names.contains(&"PremiumPerTerm"));
        assert!(!names.contains(&"BodyType"));
        assert!(!names.contains(&"NumberOfDoors"));
    }

    #[test]
    fn test_premium_adds_body_and_doors() {
        let names: Vec<&str> = features_for(Dataset::Premium)
            .iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names.len(), 14);
        assert!(names.contains(&"BodyType"));
        assert!(names.contains(&"NumberOfDoors"));
    }

    #[test]
    fn test_alias_matching_ignores_case() {
        let features = available_features();
        let lookup = |column: &str| features.iter().find(|f| f.matches(column)).map(|f| f.name);

        assert_eq!(lookup("CUBICCAPACITY"), Some("EngineDisplacement"));
        assert_eq!(lookup("make"), Some("Make"));
        assert_eq!(lookup("TotalClaims"), None);
    }
}
