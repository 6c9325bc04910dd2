//! Similarity scoring for portfolio events
//!
//! Every measure lives on the same `[0, 2]` scale: `2` means identical,
//! `0` means maximally dissimilar and `1` is the neutral value used when
//! there is nothing to compare.

pub mod aggregate;
pub mod common;
pub mod measures;

pub use aggregate::{compare, group_similarity, quadratic_mean, similarity, SimilarityBreakdown, SimilarityWeights};
pub use common::{has_common, Profile, ProfileData};
pub use measures::{date_similarity, scalar_similarity, tag_similarity, DATE_WINDOW_DAYS, DAY_MILLIS};
