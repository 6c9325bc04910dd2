//! Individual sub-scores

use std::collections::HashSet;

/// Length of a day in milliseconds
pub const DAY_MILLIS: i64 = 1000 * 60 * 60 * 24;

/// Date difference (in days) at which date similarity reaches zero
pub const DATE_WINDOW_DAYS: f64 = 30.0;

/// Jaccard index of the two tag sets scaled to `[0, 2]`.
///
/// Duplicates collapse, so the score is symmetric. Two empty sets score `1`.
pub fn tag_similarity<S: AsRef<str>>(a: &[S], b: &[S]) -> f64 {
    let left: HashSet<&str> = a.iter().map(AsRef::as_ref).collect();
    let right: HashSet<&str> = b.iter().map(AsRef::as_ref).collect();

    let union = left.union(&right).count();
    if union == 0 {
        return 1.0;
    }
    let common = left.intersection(&right).count();

    (common as f64 / union as f64) * 2.0
}

/// Relative-difference similarity for non-negative quantities (budget, headcount).
///
/// `2 - 2|a - b| / (a + b)`, with `0, 0` treated as identical. This is not a
/// metric; callers must not assume the triangle inequality.
pub fn scalar_similarity(a: f64, b: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        return 2.0;
    }

    let sum = a + b;
    if sum == 0.0 {
        return 0.0;
    }

    2.0 - (2.0 * (a - b).abs()) / sum
}

/// Linear decay from `2` (same day) to `0` at [`DATE_WINDOW_DAYS`] or more.
///
/// The day difference is the ceiling of the absolute millisecond difference
/// over [`DAY_MILLIS`]. A missing date on either side scores `1`.
pub fn date_similarity(a: Option<i64>, b: Option<i64>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 1.0;
    };

    let diff_millis = (a - b).unsigned_abs();
    let diff_days = diff_millis.div_ceil(DAY_MILLIS as u64) as f64;
    let normalized = (diff_days / DATE_WINDOW_DAYS).min(1.0);

    2.0 - normalized * 2.0
}
