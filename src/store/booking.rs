// 📋 Booking - A customer's project request
//
// The store owns identity: callers hand over a BookingInput and get back a
// BookingRecord with `id` and `created_at` filled in.

use super::BookingError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// PROJECT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Branding,
    Website,
    Video,
    Photography,
    Motion,
    Other,
}

impl ProjectType {
    pub const ALL: [ProjectType; 6] = [
        ProjectType::Branding,
        ProjectType::Website,
        ProjectType::Video,
        ProjectType::Photography,
        ProjectType::Motion,
        ProjectType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Branding => "branding",
            ProjectType::Website => "website",
            ProjectType::Video => "video",
            ProjectType::Photography => "photography",
            ProjectType::Motion => "motion",
            ProjectType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectType::Branding => "Branding",
            ProjectType::Website => "Website",
            ProjectType::Video => "Video",
            ProjectType::Photography => "Photography",
            ProjectType::Motion => "Motion",
            ProjectType::Other => "Other",
        }
    }
}

impl FromStr for ProjectType {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.is_empty() {
            return Err(BookingError::required("projectType"));
        }

        ProjectType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BookingError::Validation {
                field: "projectType",
                message: format!("unknown project type '{}'", wanted),
            })
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// INPUT & RECORD
// ============================================================================

/// What the intake form submits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
}

/// A persisted booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub project_type: ProjectType,
    pub description: Option<String>,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub audience: Option<String>,
    pub goal: Option<String>,
    pub mood: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input after validation: required fields present, blanks dropped
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBooking {
    pub name: String,
    pub phone: String,
    pub project_type: ProjectType,
    pub description: Option<String>,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub audience: Option<String>,
    pub goal: Option<String>,
    pub mood: Option<String>,
}

impl BookingInput {
    /// Check required fields and normalize whitespace
    pub fn validate(self) -> Result<ValidBooking, BookingError> {
        let name = required("name", &self.name)?;
        let phone = required("phone", &self.phone)?;
        let project_type = self.project_type.parse::<ProjectType>()?;

        Ok(ValidBooking {
            name,
            phone,
            project_type,
            description: optional(self.description),
            budget: optional(self.budget),
            timeline: optional(self.timeline),
            audience: optional(self.audience),
            goal: optional(self.goal),
            mood: optional(self.mood),
        })
    }
}

impl ValidBooking {
    /// Attach the store-assigned identity
    pub fn into_record(self, id: i64, created_at: DateTime<Utc>) -> BookingRecord {
        BookingRecord {
            id,
            name: self.name,
            phone: self.phone,
            project_type: self.project_type,
            description: self.description,
            budget: self.budget,
            timeline: self.timeline,
            audience: self.audience,
            goal: self.goal,
            mood: self.mood,
            created_at,
        }
    }
}

fn required(field: &'static str, value: &str) -> Result<String, BookingError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookingError::required(field));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_input() -> BookingInput {
        BookingInput {
            name: "Ana Reyes".to_string(),
            phone: "+1 555 0100".to_string(),
            project_type: "branding".to_string(),
            description: Some("Rebrand for a coffee roaster".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_accepts_complete_input() {
        let valid = sample_input().validate().unwrap();

        assert_eq!(valid.name, "Ana Reyes");
        assert_eq!(valid.project_type, ProjectType::Branding);
        assert_eq!(valid.budget, None);
    }

    #[test]
    fn test_validate_rejects_missing_required_fields() {
        for (field, input) in [
            ("name", BookingInput { name: "  ".to_string(), ..sample_input() }),
            ("phone", BookingInput { phone: String::new(), ..sample_input() }),
            ("projectType", BookingInput { project_type: String::new(), ..sample_input() }),
        ] {
            match input.validate() {
                Err(BookingError::Validation { field: f, .. }) => assert_eq!(f, field),
                other => panic!("expected validation error on {}, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_unknown_project_type() {
        let input = BookingInput { project_type: "catering".to_string(), ..sample_input() };
        let err = input.validate().unwrap_err();

        assert!(err.to_string().contains("catering"));
    }

    #[test]
    fn test_project_type_parse_is_case_insensitive() {
        assert_eq!("  VIDEO ".parse::<ProjectType>().unwrap(), ProjectType::Video);
    }

    #[test]
    fn test_blank_optionals_are_dropped() {
        let input = BookingInput {
            mood: Some("   ".to_string()),
            goal: Some(" launch ".to_string()),
            ..sample_input()
        };
        let valid = input.validate().unwrap();

        assert_eq!(valid.mood, None);
        assert_eq!(valid.goal.as_deref(), Some("launch"));
    }

    #[test]
    fn test_record_json_uses_camel_case() {
        let record = sample_input().validate().unwrap().into_record(7, Utc::now());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["projectType"], "branding");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_input_json_ignores_client_identity() {
        let input: BookingInput = serde_json::from_str(
            r#"{"id": 99, "createdAt": "2020-01-01T00:00:00Z", "name": "Li", "phone": "1", "projectType": "motion"}"#,
        )
        .unwrap();

        assert_eq!(input.project_type, "motion");
        assert_eq!(input.name, "Li");
    }
}
