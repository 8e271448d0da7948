//! Composite scoring — combines the skill, experience and track axes into a
//! single 0–100 score with human-readable reasons.
//!
//! Two policies live here:
//! - jobs: weighted blend `0.6*skills + 0.2*experience + 0.2*track`
//! - resources: skill score plus a flat bonus when the resource relates to
//!   the candidate's preferred track, capped at 100. No experience axis.
//!
//! `AppState` holds an `Arc<dyn MatchScorer>`; handlers never score inline.

use serde::{Deserialize, Serialize};

use crate::matching::experience::match_experience;
use crate::matching::models::{
    CandidateProfile, JobPosting, MatchResult, ResourceMatchResult, ResourcePosting,
};
use crate::matching::normalize::{contains_either, normalize_label, normalize_optional, preview_list};
use crate::matching::skills::{match_skills, SkillMatch};
use crate::matching::track::match_track;
use crate::matching::AxisMatch;

/// How many skill names a reason line lists before truncating with "...".
const REASON_PREVIEW: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchWeights {
    pub skills: f64,
    pub experience: f64,
    pub track: f64,
    /// Flat bonus added to a resource's skill score when it relates to the
    /// candidate's preferred track.
    pub resource_track_bonus: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            skills: 0.6,
            experience: 0.2,
            track: 0.2,
            resource_track_bonus: 15.0,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The matcher interface every handler depends on. Scoring never fails:
/// degenerate input produces a zero score, not an error.
pub trait MatchScorer: Send + Sync {
    fn score_job(&self, profile: &CandidateProfile, job: &JobPosting) -> MatchResult;

    fn score_resource(
        &self,
        profile: &CandidateProfile,
        resource: &ResourcePosting,
    ) -> ResourceMatchResult;
}

/// Default deterministic scorer.
#[derive(Debug, Clone, Default)]
pub struct WeightedMatcher {
    pub weights: MatchWeights,
}

impl WeightedMatcher {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }
}

impl MatchScorer for WeightedMatcher {
    fn score_job(&self, profile: &CandidateProfile, job: &JobPosting) -> MatchResult {
        calculate_job_match(profile, job, &self.weights)
    }

    fn score_resource(
        &self,
        profile: &CandidateProfile,
        resource: &ResourcePosting,
    ) -> ResourceMatchResult {
        calculate_resource_match(profile, resource, &self.weights)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Job matching
// ────────────────────────────────────────────────────────────────────────────

pub fn calculate_job_match(
    profile: &CandidateProfile,
    job: &JobPosting,
    weights: &MatchWeights,
) -> MatchResult {
    let skills = match_skills(&profile.skills, &job.required_skills);
    let experience = match_experience(
        profile.experience_level.as_deref(),
        job.experience_level.as_deref(),
    );
    let track = match_track(profile.preferred_track.as_deref(), job.track.as_deref());

    let total = weights.skills * skills.score
        + weights.experience * f64::from(experience.score)
        + weights.track * f64::from(track.score);

    let mut reasons = skill_reasons(&skills, "required");
    reasons.push(experience_reason(experience).to_string());
    if track.matched {
        if let Some(preferred) = profile.preferred_track.as_deref() {
            reasons.push(format!("Fits your preferred track: {}", preferred.trim()));
        }
    }

    MatchResult {
        score: to_percent(total),
        matched_skills: skills.matched,
        missing_skills: skills.missing,
        experience_match: experience,
        track_match: track,
        reasons,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resource matching
// ────────────────────────────────────────────────────────────────────────────

pub fn calculate_resource_match(
    profile: &CandidateProfile,
    resource: &ResourcePosting,
    weights: &MatchWeights,
) -> ResourceMatchResult {
    let skills = match_skills(&profile.skills, &resource.related_skills);
    let track_related = resource_relates_to_track(profile.preferred_track.as_deref(), resource);

    let mut total = skills.score;
    if track_related {
        total += weights.resource_track_bonus;
    }

    let mut reasons = skill_reasons(&skills, "related");
    if track_related {
        if let Some(preferred) = profile.preferred_track.as_deref() {
            reasons.push(format!("Relevant to your preferred track: {}", preferred.trim()));
        }
    }

    ResourceMatchResult {
        score: to_percent(total),
        matched_skills: skills.matched,
        missing_skills: skills.missing,
        track_related,
        reasons,
    }
}

/// A resource relates to a track when the track appears in its title or
/// category, or overlaps (either direction) with one of its skills.
fn resource_relates_to_track(preferred_track: Option<&str>, resource: &ResourcePosting) -> bool {
    let Some(track) = normalize_optional(preferred_track) else {
        return false;
    };

    if resource.title.to_lowercase().contains(&track) {
        return true;
    }
    if normalize_optional(resource.category.as_deref()).is_some_and(|c| c.contains(&track)) {
        return true;
    }
    resource
        .related_skills
        .iter()
        .filter_map(|s| normalize_label(s))
        .any(|skill| contains_either(&skill, &track))
}

// ────────────────────────────────────────────────────────────────────────────
// Reasons
// ────────────────────────────────────────────────────────────────────────────

fn skill_reasons(skills: &SkillMatch, kind: &str) -> Vec<String> {
    let mut reasons = Vec::new();
    let total = skills.total();

    if skills.is_complete() {
        reasons.push(format!("Has all {total} {kind} skills"));
    } else if !skills.matched.is_empty() {
        reasons.push(format!(
            "Matches {} of {total} {kind} skills: {}",
            skills.matched.len(),
            preview_list(&skills.matched, REASON_PREVIEW)
        ));
    }

    if !skills.missing.is_empty() {
        reasons.push(format!(
            "Missing skills: {}",
            preview_list(&skills.missing, REASON_PREVIEW)
        ));
    }

    reasons
}

fn experience_reason(experience: AxisMatch) -> &'static str {
    match experience.score {
        100 => "Experience level aligns with the role",
        50 => "Experience level partially aligns with the role",
        _ => "Experience level does not match the role",
    }
}

fn to_percent(total: f64) -> u32 {
    total.round().clamp(0.0, 100.0) as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
