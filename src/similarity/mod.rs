//! Similarity scoring between runner profiles.
//!
//! Profiles are read through [`ProfileAttributes`], encoded as bounded
//! [`FeatureVector`]s, scored with a Euclidean similarity and combined
//! with rule-of-thumb checks into a [`MatchReport`]. Everything here is
//! pure computation with no shared state.

pub mod features;
pub mod performance;
pub mod profile;
pub mod scorer;

pub use features::{FeatureCeilings, FeatureKey, FeatureVector, feature_vector, normalize};
pub use performance::{RaceDistance, parse_duration_secs, race_pace};
pub use profile::{Attribute, ProfileAttributes, ProfileCompletion, ProfileRecord, RunnerLevel};
pub use scorer::{
    AlignmentMode, MatchDetails, MatchReport, RuleFlags, SimilarityConfig, SimilarityScorer,
    euclidean_similarity, keyed_similarity,
};
