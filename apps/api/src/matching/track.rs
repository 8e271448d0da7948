use crate::matching::normalize::{contains_either, normalize_optional};
use crate::matching::AxisMatch;

/// Equal tracks → 100, one contained in the other → 75, else 0.
pub fn match_track(candidate_track: Option<&str>, posting_track: Option<&str>) -> AxisMatch {
    let (Some(have), Some(want)) = (
        normalize_optional(candidate_track),
        normalize_optional(posting_track),
    ) else {
        return AxisMatch::none();
    };

    if have == want {
        AxisMatch::new(true, 100)
    } else if contains_either(&have, &want) {
        AxisMatch::new(true, 75)
    } else {
        AxisMatch::none()
    }
}
