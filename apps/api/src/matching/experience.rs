use serde::{Deserialize, Serialize};

use crate::matching::normalize::normalize_optional;
use crate::matching::AxisMatch;

/// Ordered experience buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Beginner,
    Intermediate,
    Advanced,
}

impl Tier {
    pub fn rank(self) -> u8 {
        match self {
            Tier::Beginner => 0,
            Tier::Intermediate => 1,
            Tier::Advanced => 2,
        }
    }

    fn from_literal(label: &str) -> Option<Self> {
        match label {
            "beginner" => Some(Tier::Beginner),
            "intermediate" => Some(Tier::Intermediate),
            "advanced" => Some(Tier::Advanced),
            _ => None,
        }
    }
}

// Checked in order; the first group with a hit wins ("mid-senior" is intermediate).
const TIER_KEYWORDS: &[(Tier, &[&str])] = &[
    (Tier::Beginner, &["fresher", "entry", "intern"]),
    (Tier::Intermediate, &["junior", "mid"]),
    (Tier::Advanced, &["senior", "lead", "expert"]),
];

/// Maps a free-form level label onto a tier.
///
/// Labels without a keyword pass through as their lowercase literal, so
/// "Intermediate" still resolves while "Principal" stays unmapped.
pub fn classify_level(label: Option<&str>) -> Option<Tier> {
    let level = normalize_optional(label)?;
    TIER_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| level.contains(kw)))
        .map(|(tier, _)| *tier)
        .or_else(|| Tier::from_literal(&level))
}

/// Same tier → 100, adjacent → 50, anything else → 0 and unmatched.
pub fn match_experience(candidate_level: Option<&str>, posting_level: Option<&str>) -> AxisMatch {
    let (Some(have), Some(want)) = (classify_level(candidate_level), classify_level(posting_level))
    else {
        return AxisMatch::none();
    };

    match have.rank().abs_diff(want.rank()) {
        0 => AxisMatch::new(true, 100),
        1 => AxisMatch::new(true, 50),
        _ => AxisMatch::none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_classification() {
        assert_eq!(classify_level(Some("Fresher")), Some(Tier::Beginner));
        assert_eq!(classify_level(Some("Entry Level")), Some(Tier::Beginner));
        assert_eq!(classify_level(Some("Internship")), Some(Tier::Beginner));
        assert_eq!(classify_level(Some("Junior")), Some(Tier::Intermediate));
        assert_eq!(classify_level(Some("Mid-Senior")), Some(Tier::Intermediate));
        assert_eq!(classify_level(Some("Senior")), Some(Tier::Advanced));
        assert_eq!(classify_level(Some("Team Lead")), Some(Tier::Advanced));
        assert_eq!(classify_level(Some("Expert")), Some(Tier::Advanced));
    }

    #[test]
    fn test_literal_tier_names_pass_through() {
        assert_eq!(classify_level(Some(" Intermediate ")), Some(Tier::Intermediate));
        assert_eq!(classify_level(Some("ADVANCED")), Some(Tier::Advanced));
        assert_eq!(classify_level(Some("Principal")), None);
        assert_eq!(classify_level(Some("  ")), None);
        assert_eq!(classify_level(None), None);
    }

    #[test]
    fn test_tier_distance_grid() {
        let labels = [
            (Tier::Beginner, "beginner"),
            (Tier::Intermediate, "intermediate"),
            (Tier::Advanced, "advanced"),
        ];
        for (a, la) in labels {
            for (b, lb) in labels {
                let result = match_experience(Some(la), Some(lb));
                let expected = match a.rank().abs_diff(b.rank()) {
                    0 => AxisMatch::new(true, 100),
                    1 => AxisMatch::new(true, 50),
                    _ => AxisMatch::none(),
                };
                assert_eq!(result, expected, "{la} vs {lb}");
                assert_eq!(result, match_experience(Some(lb), Some(la)));
            }
        }
    }

    #[test]
    fn test_missing_candidate_level_is_unmatched() {
        assert_eq!(match_experience(None, Some("Senior")), AxisMatch::none());
        assert_eq!(match_experience(Some(""), Some("Senior")), AxisMatch::none());
    }

    #[test]
    fn test_unmapped_level_is_unmatched() {
        assert_eq!(match_experience(Some("Principal"), Some("Principal")), AxisMatch::none());
        assert_eq!(match_experience(Some("Senior"), None), AxisMatch::none());
    }

    #[test]
    fn test_mid_and_junior_share_a_tier() {
        assert_eq!(match_experience(Some("Mid"), Some("Junior")), AxisMatch::new(true, 100));
    }
}
