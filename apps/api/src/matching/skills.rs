use serde::{Deserialize, Serialize};

use crate::matching::normalize::{contains_either, dedup_trimmed, normalize_label};

/// Skill overlap between a candidate and a posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    /// 0.0 – 100.0, unrounded.
    pub score: f64,
}

impl SkillMatch {
    pub fn total(&self) -> usize {
        self.matched.len() + self.missing.len()
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && !self.matched.is_empty()
    }
}

/// Matches posting skills against candidate skills.
///
/// A posting skill counts as matched when any candidate skill equals it,
/// contains it, or is contained by it (case-insensitive, trimmed). The
/// output keeps the posting's spelling. No posting skills yields a zero
/// score rather than a free pass.
pub fn match_skills(candidate_skills: &[String], posting_skills: &[String]) -> SkillMatch {
    let required = dedup_trimmed(posting_skills);
    if required.is_empty() {
        return SkillMatch {
            matched: vec![],
            missing: vec![],
            score: 0.0,
        };
    }

    let candidate: Vec<String> = candidate_skills
        .iter()
        .filter_map(|s| normalize_label(s))
        .collect();

    let (matched, missing): (Vec<String>, Vec<String>) =
        required.into_iter().partition(|skill| {
            let needle = skill.to_lowercase();
            candidate.iter().any(|have| contains_either(have, &needle))
        });

    let score = 100.0 * matched.len() as f64 / (matched.len() + missing.len()) as f64;

    SkillMatch {
        matched,
        missing,
        score,
    }
}
