//! Demographic profile collected on the profile step.
//!
//! Wire values follow the remote store (`masculino`, `26-35`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "masculino")]
    Male,
    #[serde(rename = "femenino")]
    Female,
    #[serde(rename = "otro")]
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "masculino",
            Gender::Female => "femenino",
            Gender::Other => "otro",
        }
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "masculino" => Ok(Gender::Male),
            "femenino" => Ok(Gender::Female),
            "otro" => Ok(Gender::Other),
            other => Err(ValidationError::invalid_format(
                "gender",
                format!("unknown value '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeRange {
    #[serde(rename = "18-25")]
    From18To25,
    #[serde(rename = "26-35")]
    From26To35,
    #[serde(rename = "36-45")]
    From36To45,
    #[serde(rename = "46-55")]
    From46To55,
    #[serde(rename = "56+")]
    Over55,
}

impl AgeRange {
    pub const ALL: [AgeRange; 5] = [
        AgeRange::From18To25,
        AgeRange::From26To35,
        AgeRange::From36To45,
        AgeRange::From46To55,
        AgeRange::Over55,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgeRange::From18To25 => "18-25",
            AgeRange::From26To35 => "26-35",
            AgeRange::From36To45 => "36-45",
            AgeRange::From46To55 => "46-55",
            AgeRange::Over55 => "56+",
        }
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|range| range.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("age_range", format!("unknown value '{}'", s))
            })
    }
}

/// The demographic part of a user profile.
///
/// Mirrored into the local cache as a non-authoritative copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicProfile {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub age_range: Option<AgeRange>,
}

/// Fields being edited on the profile step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    display_name: String,
    pub gender: Option<Gender>,
    pub age_range: Option<AgeRange>,
}

impl ProfileDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the display name trimmed, as typed input is.
    pub fn set_display_name(&mut self, name: &str) {
        self.display_name = name.trim().to_string();
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Converts a complete draft into a profile.
    ///
    /// # Errors
    ///
    /// Returns `EmptyField` naming the first missing field.
    pub fn to_profile(&self) -> Result<DemographicProfile, ValidationError> {
        if self.display_name.is_empty() {
            return Err(ValidationError::empty_field("display_name"));
        }
        let gender = self.gender.ok_or_else(|| ValidationError::empty_field("gender"))?;
        let age_range = self
            .age_range
            .ok_or_else(|| ValidationError::empty_field("age_range"))?;
        Ok(DemographicProfile {
            display_name: Some(self.display_name.clone()),
            gender: Some(gender),
            age_range: Some(age_range),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demographic_profile_uses_store_field_names() {
        let profile = DemographicProfile {
            display_name: Some("Ana".to_string()),
            gender: Some(Gender::Female),
            age_range: Some(AgeRange::From26To35),
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"displayName": "Ana", "gender": "femenino", "ageRange": "26-35"})
        );
    }

    #[test]
    fn missing_fields_deserialize_to_none() {
        let profile: DemographicProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile, DemographicProfile::default());
    }

    #[test]
    fn age_range_parses_wire_values() {
        assert_eq!("56+".parse::<AgeRange>(), Ok(AgeRange::Over55));
        assert!("12-17".parse::<AgeRange>().is_err());
    }

    #[test]
    fn draft_trims_display_name() {
        let mut draft = ProfileDraft::new();
        draft.set_display_name("   ");
        assert_eq!(draft.display_name(), "");
        draft.set_display_name("  Luis ");
        assert_eq!(draft.display_name(), "Luis");
    }

    #[test]
    fn incomplete_draft_names_missing_field() {
        let mut draft = ProfileDraft::new();
        draft.set_display_name("Luis");
        draft.gender = Some(Gender::Male);
        assert_eq!(
            draft.to_profile().unwrap_err(),
            ValidationError::empty_field("age_range")
        );
    }

    #[test]
    fn gender_parses_wire_values() {
        assert_eq!("otro".parse::<Gender>(), Ok(Gender::Other));
        assert_eq!(Gender::Female.as_str(), "femenino");
    }
}
