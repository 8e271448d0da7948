//! Axum route handlers for the Match API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::matching::models::{
    CandidateProfile, JobPosting, MatchResult, ResourceMatchResult, ResourcePosting,
};
use crate::state::AppState;

/// Upper bound on postings scored in one batch request.
pub const MAX_BATCH_SIZE: usize = 500;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JobMatchRequest {
    pub profile: CandidateProfile,
    pub job: JobPosting,
}

#[derive(Debug, Deserialize)]
pub struct ResourceMatchRequest {
    pub profile: CandidateProfile,
    pub resource: ResourcePosting,
}

#[derive(Debug, Deserialize)]
pub struct JobBatchRequest {
    pub profile: CandidateProfile,
    #[serde(default)]
    pub jobs: Vec<JobPosting>,
    #[serde(default)]
    pub min_score: Option<u32>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ResourceBatchRequest {
    pub profile: CandidateProfile,
    #[serde(default)]
    pub resources: Vec<ResourcePosting>,
    #[serde(default)]
    pub min_score: Option<u32>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RankedMatch<R> {
    pub posting_id: Option<String>,
    pub title: String,
    pub result: R,
}

#[derive(Debug, Serialize)]
pub struct RankedMatchesResponse<R> {
    pub results: Vec<RankedMatch<R>>,
    /// Number of postings that passed `min_score`, before `limit` was applied.
    pub total: usize,
}

/// Scores that can be ranked and filtered by the batch endpoints.
trait Scored {
    fn score(&self) -> u32;
}

impl Scored for MatchResult {
    fn score(&self) -> u32 {
        self.score
    }
}

impl Scored for ResourceMatchResult {
    fn score(&self) -> u32 {
        self.score
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

fn validate_batch(count: usize, min_score: Option<u32>, limit: Option<usize>) -> Result<(), AppError> {
    if count > MAX_BATCH_SIZE {
        return Err(AppError::Validation(format!(
            "at most {MAX_BATCH_SIZE} postings can be scored per request, got {count}"
        )));
    }
    if min_score.is_some_and(|s| s > 100) {
        return Err(AppError::Validation(
            "min_score must be between 0 and 100".to_string(),
        ));
    }
    if limit == Some(0) {
        return Err(AppError::Validation("limit must be at least 1".to_string()));
    }
    Ok(())
}

/// Drops results below `min_score`, sorts by score descending (stable, so
/// ties keep request order), then truncates to `limit`.
fn rank<R: Scored>(
    mut matches: Vec<RankedMatch<R>>,
    min_score: Option<u32>,
    limit: Option<usize>,
) -> RankedMatchesResponse<R> {
    let floor = min_score.unwrap_or(0);
    matches.retain(|m| m.result.score() >= floor);
    matches.sort_by(|a, b| b.result.score().cmp(&a.result.score()));

    let total = matches.len();
    if let Some(limit) = limit {
        matches.truncate(limit);
    }

    RankedMatchesResponse {
        results: matches,
        total,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match/job
pub async fn handle_match_job(
    State(state): State<AppState>,
    Json(request): Json<JobMatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    let result = state.matcher.score_job(&request.profile, &request.job);
    debug!(
        score = result.score,
        matched = result.matched_skills.len(),
        missing = result.missing_skills.len(),
        "Scored job match"
    );
    Ok(Json(result))
}

/// POST /api/v1/match/jobs
///
/// Scores every job for one profile and returns them ranked.
pub async fn handle_rank_jobs(
    State(state): State<AppState>,
    Json(request): Json<JobBatchRequest>,
) -> Result<Json<RankedMatchesResponse<MatchResult>>, AppError> {
    validate_batch(request.jobs.len(), request.min_score, request.limit)?;

    let matches = request
        .jobs
        .into_iter()
        .map(|job| RankedMatch {
            result: state.matcher.score_job(&request.profile, &job),
            posting_id: job.id,
            title: job.title,
        })
        .collect();

    let response = rank(matches, request.min_score, request.limit);
    debug!(total = response.total, returned = response.results.len(), "Ranked jobs");
    Ok(Json(response))
}

/// POST /api/v1/match/resource
pub async fn handle_match_resource(
    State(state): State<AppState>,
    Json(request): Json<ResourceMatchRequest>,
) -> Result<Json<ResourceMatchResult>, AppError> {
    let result = state
        .matcher
        .score_resource(&request.profile, &request.resource);
    debug!(score = result.score, track_related = result.track_related, "Scored resource match");
    Ok(Json(result))
}

/// POST /api/v1/match/resources
///
/// Recommends learning resources for one profile, ranked by relevance.
pub async fn handle_rank_resources(
    State(state): State<AppState>,
    Json(request): Json<ResourceBatchRequest>,
) -> Result<Json<RankedMatchesResponse<ResourceMatchResult>>, AppError> {
    validate_batch(request.resources.len(), request.min_score, request.limit)?;

    let matches = request
        .resources
        .into_iter()
        .map(|resource| RankedMatch {
            result: state.matcher.score_resource(&request.profile, &resource),
            posting_id: resource.id,
            title: resource.title,
        })
        .collect();

    let response = rank(matches, request.min_score, request.limit);
    debug!(total = response.total, returned = response.results.len(), "Ranked resources");
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::AxisMatch;

    fn ranked(title: &str, score: u32) -> RankedMatch<MatchResult> {
        RankedMatch {
            posting_id: None,
            title: title.to_string(),
            result: MatchResult {
                score,
                matched_skills: vec![],
                missing_skills: vec![],
                experience_match: AxisMatch::none(),
                track_match: AxisMatch::none(),
                reasons: vec![],
            },
        }
    }

    #[test]
    fn test_rank_sorts_descending_and_keeps_tie_order() {
        let response = rank(
            vec![ranked("a", 40), ranked("b", 90), ranked("c", 40), ranked("d", 70)],
            None,
            None,
        );
        let titles: Vec<&str> = response.results.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "d", "a", "c"]);
        assert_eq!(response.total, 4);
    }

    #[test]
    fn test_rank_applies_min_score_before_limit() {
        let response = rank(
            vec![ranked("a", 10), ranked("b", 90), ranked("c", 60), ranked("d", 70)],
            Some(50),
            Some(2),
        );
        let titles: Vec<&str> = response.results.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "d"]);
        assert_eq!(response.total, 3);
    }

    #[test]
    fn test_validate_batch_rejects_bad_params() {
        assert!(validate_batch(MAX_BATCH_SIZE + 1, None, None).is_err());
        assert!(validate_batch(1, Some(101), None).is_err());
        assert!(validate_batch(1, None, Some(0)).is_err());
        assert!(validate_batch(0, Some(100), Some(1)).is_ok());
    }
}
