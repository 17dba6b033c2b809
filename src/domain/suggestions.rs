//! Client-side hints shown on the type and transmission steps.
//!
//! Display-only: a hint never changes the selection unless the user applies it.

use crate::domain::profile::{AgeRange, DemographicProfile, Gender};

/// Vehicle types worth highlighting for this profile (option ids of the type step).
pub fn suggest_types(profile: &DemographicProfile) -> Vec<&'static str> {
    match (profile.gender, profile.age_range) {
        (Some(Gender::Female), Some(AgeRange::From26To35 | AgeRange::From36To45)) => {
            vec!["suv", "sedan"]
        }
        (Some(Gender::Male), Some(AgeRange::From18To25)) => vec!["coupe", "convertible"],
        (_, Some(AgeRange::From46To55 | AgeRange::Over55)) => vec!["sedan", "suv"],
        _ => Vec::new(),
    }
}

/// A suggested transmission and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmissionHint {
    pub option: &'static str,
    pub reason: &'static str,
}

/// Suggests a transmission from earlier selections and the profile.
///
/// Rules are checked in order; the first match wins.
pub fn suggest_transmission(
    types: &[String],
    fuel: Option<&str>,
    profile: &DemographicProfile,
) -> Option<TransmissionHint> {
    let has_type = |t: &str| types.iter().any(|selected| selected == t);

    if has_type("coupe") || has_type("convertible") {
        Some(TransmissionHint {
            option: "manual",
            reason: "Sports cars are usually more fun with a manual gearbox",
        })
    } else if profile.age_range == Some(AgeRange::From18To25) {
        Some(TransmissionHint {
            option: "manual",
            reason: "For a more connected driving experience",
        })
    } else if has_type("suv") && profile.gender == Some(Gender::Female) {
        Some(TransmissionHint {
            option: "automatic",
            reason: "More comfortable for family and city driving",
        })
    } else if fuel == Some("electrico") {
        Some(TransmissionHint {
            option: "automatic",
            reason: "Electric vehicles typically use an automatic transmission",
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(gender: Option<Gender>, age: Option<AgeRange>) -> DemographicProfile {
        DemographicProfile {
            display_name: None,
            gender,
            age_range: age,
        }
    }

    #[test]
    fn type_suggestions_follow_profile() {
        assert_eq!(
            suggest_types(&profile(Some(Gender::Female), Some(AgeRange::From26To35))),
            vec!["suv", "sedan"]
        );
        assert_eq!(
            suggest_types(&profile(Some(Gender::Male), Some(AgeRange::From18To25))),
            vec!["coupe", "convertible"]
        );
        assert_eq!(
            suggest_types(&profile(Some(Gender::Other), Some(AgeRange::Over55))),
            vec!["sedan", "suv"]
        );
        assert!(suggest_types(&DemographicProfile::default()).is_empty());
    }

    #[test]
    fn sporty_types_suggest_manual_first() {
        let hint = suggest_transmission(
            &["suv".to_string(), "coupe".to_string()],
            Some("electrico"),
            &profile(Some(Gender::Female), None),
        )
        .unwrap();
        assert_eq!(hint.option, "manual");
    }

    #[test]
    fn electric_fuel_suggests_automatic() {
        let hint =
            suggest_transmission(&["sedan".to_string()], Some("electrico"), &DemographicProfile::default())
                .unwrap();
        assert_eq!(hint.option, "automatic");
    }

    #[test]
    fn no_rule_no_hint() {
        assert_eq!(
            suggest_transmission(&[], Some("diesel"), &DemographicProfile::default()),
            None
        );
    }
}
