use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::matching::AxisMatch;

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

/// The job seeker side of a match. Read-only input to the scorer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub preferred_track: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub track: Option<String>,
}

/// A learning resource. Has no experience level and no explicit track;
/// track relevance is inferred from its title, category and skills.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcePosting {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub related_skills: Vec<String>,
}

/// Accepts any JSON value for a skill list. Arrays keep their string items;
/// anything else (null, a bare string, an object) becomes an empty list.
fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Outputs
// ────────────────────────────────────────────────────────────────────────────

/// Score breakdown for a candidate against a job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: u32, // 0 – 100
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub experience_match: AxisMatch,
    pub track_match: AxisMatch,
    pub reasons: Vec<String>,
}

/// Score breakdown for a candidate against a learning resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceMatchResult {
    pub score: u32, // 0 – 100
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub track_related: bool,
    pub reasons: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_array_skills_become_empty() {
        let profile: CandidateProfile =
            serde_json::from_value(json!({ "skills": "React, Node" })).unwrap();
        assert!(profile.skills.is_empty());

        let job: JobPosting =
            serde_json::from_value(json!({ "title": "Dev", "required_skills": null })).unwrap();
        assert!(job.required_skills.is_empty());
    }

    #[test]
    fn test_non_string_items_are_dropped() {
        let profile: CandidateProfile =
            serde_json::from_value(json!({ "skills": ["Rust", 3, null, "Go"] })).unwrap();
        assert_eq!(profile.skills, vec!["Rust".to_string(), "Go".to_string()]);
    }

    #[test]
    fn test_missing_fields_default() {
        let resource: ResourcePosting = serde_json::from_value(json!({})).unwrap();
        assert!(resource.related_skills.is_empty());
        assert!(resource.category.is_none());
        assert_eq!(resource.title, "");
    }
}
