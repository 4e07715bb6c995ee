//! Similarity scoring and match decisions between two runner profiles.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::features::{FeatureCeilings, FeatureVector, feature_vector};
use super::profile::{Attribute, ProfileAttributes};
use crate::error::ConfigError;

/// How two feature vectors are lined up before comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    /// Compare the first `min(len)` dimensions of each vector by position.
    ///
    /// Only meaningful when both profiles populate the same attributes;
    /// otherwise unrelated dimensions end up side by side.
    #[default]
    Positional,
    /// Compare only the dimensions whose feature keys both vectors share.
    Keyed,
}

impl FromStr for AlignmentMode {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "positional" => Ok(Self::Positional),
            "keyed" => Ok(Self::Keyed),
            _ => Err(ConfigError::Unsupported {
                key: "SIMILARITY_ALIGNMENT",
                value: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positional => f.write_str("positional"),
            Self::Keyed => f.write_str("keyed"),
        }
    }
}

/// Tunables of the similarity scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Normalisation ceilings.
    pub ceilings: FeatureCeilings,
    /// Minimum score for a match.
    pub match_threshold: f64,
    /// Maximum pace gap for `pace_ok`, seconds per kilometre.
    pub pace_tolerance_s_per_km: f64,
    /// Maximum weekly-volume gap for `weekly_ok`, as a share of the larger volume.
    pub weekly_tolerance_ratio: f64,
    /// Maximum age gap for `age_ok`, years.
    pub age_tolerance_years: f64,
    /// Vector alignment used for the score.
    pub alignment: AlignmentMode,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            ceilings: FeatureCeilings::default(),
            match_threshold: 0.70,
            pace_tolerance_s_per_km: 60.0,
            weekly_tolerance_ratio: 0.30,
            age_tolerance_years: 5.0,
            alignment: AlignmentMode::Positional,
        }
    }
}

/// Rule-of-thumb proximity checks. A flag is `None` when either profile
/// lacks the attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleFlags {
    /// Paces within tolerance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace_ok: Option<bool>,
    /// Weekly volumes within tolerance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_ok: Option<bool>,
    /// Ages within tolerance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_ok: Option<bool>,
    /// Same declared gender. Informational only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_gender: Option<bool>,
}

/// Diagnostics attached to a match decision, for display only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchDetails {
    /// Rule flags that were computable.
    pub rules: RuleFlags,
    /// Dimensions in the first profile's vector.
    pub used_dims_a: usize,
    /// Dimensions in the second profile's vector.
    pub used_dims_b: usize,
    /// Absolute differences of attributes present on both sides.
    pub diffs: BTreeMap<Attribute, f64>,
}

/// Outcome of comparing two profiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    /// Similarity score in `[0, 1]`.
    pub score: f64,
    /// Match decision.
    pub similar: bool,
    /// Diagnostics behind the decision.
    pub details: MatchDetails,
}

/// Euclidean similarity of two positional vectors.
///
/// Both vectors are truncated to their shared prefix of length `L`; the
/// result is `max(0, 1 - distance / sqrt(L))`, and 0 if either is empty.
#[must_use]
pub fn euclidean_similarity(a: &[f64], b: &[f64]) -> f64 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }
    let distance = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt();
    #[allow(clippy::cast_precision_loss)]
    let scale = (len as f64).sqrt();
    (1.0 - distance / scale).max(0.0)
}

/// Euclidean similarity over the feature keys both vectors share.
#[must_use]
pub fn keyed_similarity(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let (left, right): (Vec<f64>, Vec<f64>) = a
        .iter()
        .filter_map(|(key, va)| b.get(key).map(|vb| (va, vb)))
        .unzip();
    euclidean_similarity(&left, &right)
}

/// Scores and matches runner profiles.
#[derive(Debug, Clone, Default)]
pub struct SimilarityScorer {
    config: SimilarityConfig,
}

impl SimilarityScorer {
    /// Creates a scorer with the given tunables.
    #[must_use]
    pub const fn new(config: SimilarityConfig) -> Self {
        Self { config }
    }

    /// Returns the scorer's configuration.
    #[must_use]
    pub const fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// Builds the feature vector of `profile` with the configured ceilings.
    #[must_use]
    pub fn feature_vector<P>(&self, profile: &P) -> FeatureVector
    where
        P: ProfileAttributes + ?Sized,
    {
        feature_vector(profile, &self.config.ceilings)
    }

    /// Scores two feature vectors with the configured alignment.
    #[must_use]
    pub fn score(&self, a: &FeatureVector, b: &FeatureVector) -> f64 {
        match self.config.alignment {
            AlignmentMode::Positional => euclidean_similarity(&a.values(), &b.values()),
            AlignmentMode::Keyed => keyed_similarity(a, b),
        }
    }

    /// Computes the proximity checks that both profiles allow.
    #[must_use]
    pub fn rule_of_thumb_flags<A, B>(&self, a: &A, b: &B) -> RuleFlags
    where
        A: ProfileAttributes + ?Sized,
        B: ProfileAttributes + ?Sized,
    {
        let cfg = &self.config;
        let pair = |attribute: Attribute| a.finite(attribute).zip(b.finite(attribute));

        let same_gender = a
            .gender()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .zip(b.gender().map(str::trim).filter(|g| !g.is_empty()))
            .map(|(ga, gb)| ga.to_lowercase() == gb.to_lowercase());

        RuleFlags {
            pace_ok: pair(Attribute::Pace)
                .map(|(pa, pb)| (pa - pb).abs() <= cfg.pace_tolerance_s_per_km),
            weekly_ok: pair(Attribute::WeeklyDistance).map(|(wa, wb)| {
                let larger = wa.max(wb).max(1.0);
                (wa - wb).abs() <= cfg.weekly_tolerance_ratio * larger
            }),
            age_ok: pair(Attribute::Age)
                .map(|(aa, ab)| (aa - ab).abs() <= cfg.age_tolerance_years),
            same_gender,
        }
    }

    /// Decides whether two profiles match.
    ///
    /// A match needs `score >= match_threshold` and either `pace_ok` or
    /// `weekly_ok`; a flag that could not be computed does not veto.
    #[must_use]
    pub fn is_similar<A, B>(&self, a: &A, b: &B) -> MatchReport
    where
        A: ProfileAttributes + ?Sized,
        B: ProfileAttributes + ?Sized,
    {
        let va = self.feature_vector(a);
        let vb = self.feature_vector(b);
        let score = self.score(&va, &vb);

        let rules = self.rule_of_thumb_flags(a, b);
        let pace_ok = rules.pace_ok.unwrap_or(true);
        let weekly_ok = rules.weekly_ok.unwrap_or(true);
        let similar = score >= self.config.match_threshold && (pace_ok || weekly_ok);

        let diffs = Attribute::ALL
            .into_iter()
            .filter_map(|attribute| {
                a.finite(attribute)
                    .zip(b.finite(attribute))
                    .map(|(x, y)| (attribute, (x - y).abs()))
            })
            .collect();

        tracing::debug!(
            score,
            similar,
            dims_a = va.len(),
            dims_b = vb.len(),
            alignment = %self.config.alignment,
            "profiles scored"
        );

        MatchReport {
            score,
            similar,
            details: MatchDetails {
                rules,
                used_dims_a: va.len(),
                used_dims_b: vb.len(),
                diffs,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::profile::ProfileRecord;

    fn runner(pace: f64, weekly: f64, age: f64) -> ProfileRecord {
        ProfileRecord {
            avg_pace_s_per_km: Some(pace),
            weekly_km: Some(weekly),
            age: Some(age),
            ..ProfileRecord::default()
        }
    }

    #[test]
    fn identical_vectors_score_one() {
        let v = [0.2, 0.7, 0.4];
        assert_eq!(euclidean_similarity(&v, &v), 1.0);
    }

    #[test]
    fn empty_vector_scores_zero() {
        assert_eq!(euclidean_similarity(&[], &[0.5]), 0.0);
        assert_eq!(euclidean_similarity(&[0.5], &[]), 0.0);
    }

    #[test]
    fn opposite_corners_floor_at_zero() {
        assert_eq!(euclidean_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn longer_vector_is_truncated() {
        let score = euclidean_similarity(&[0.5, 0.1], &[0.5, 0.9, 0.3]);
        let expected = 1.0 - 0.8 / 2f64.sqrt();
        assert!((score - expected).abs() < 1e-9);
    }

    #[test]
    fn keyed_similarity_ignores_unshared_dimensions() {
        let scorer = SimilarityScorer::default();
        let a = ProfileRecord {
            weekly_km: Some(60.0),
            age: Some(30.0),
            ..ProfileRecord::default()
        };
        let b = ProfileRecord {
            avg_pace_s_per_km: Some(600.0),
            age: Some(30.0),
            ..ProfileRecord::default()
        };
        let va = scorer.feature_vector(&a);
        let vb = scorer.feature_vector(&b);
        assert_eq!(keyed_similarity(&va, &vb), 1.0);
        assert!(euclidean_similarity(&va.values(), &vb.values()) < 1.0);
    }

    #[test]
    fn flags_only_for_shared_attributes() {
        let scorer = SimilarityScorer::default();
        let a = ProfileRecord {
            avg_pace_s_per_km: Some(300.0),
            gender: Some(" Female".to_string()),
            ..ProfileRecord::default()
        };
        let b = ProfileRecord {
            avg_pace_s_per_km: Some(355.0),
            weekly_km: Some(30.0),
            gender: Some("female ".to_string()),
            ..ProfileRecord::default()
        };
        let flags = scorer.rule_of_thumb_flags(&a, &b);
        assert_eq!(flags.pace_ok, Some(true));
        assert_eq!(flags.weekly_ok, None);
        assert_eq!(flags.age_ok, None);
        assert_eq!(flags.same_gender, Some(true));

        let json = serde_json::to_string(&flags).unwrap_or_default();
        assert!(!json.contains("weekly_ok"));
    }

    #[test]
    fn weekly_tolerance_is_relative_to_larger_volume() {
        let scorer = SimilarityScorer::default();
        let heavy = runner(300.0, 100.0, 30.0);
        let flags = scorer.rule_of_thumb_flags(&runner(300.0, 75.0, 30.0), &heavy);
        assert_eq!(flags.weekly_ok, Some(true));
        let flags = scorer.rule_of_thumb_flags(&runner(300.0, 60.0, 30.0), &heavy);
        assert_eq!(flags.weekly_ok, Some(false));
    }

    #[test]
    fn similar_runners_match() {
        let scorer = SimilarityScorer::default();
        let report = scorer.is_similar(&runner(300.0, 40.0, 30.0), &runner(310.0, 45.0, 32.0));
        assert!(report.score >= 0.70);
        assert!(report.similar);
        assert_eq!(report.details.used_dims_a, 3);
        assert_eq!(report.details.diffs.get(&Attribute::Pace), Some(&10.0));
        assert_eq!(report.details.diffs.get(&Attribute::Age), Some(&2.0));
    }

    #[test]
    fn failing_both_rules_vetoes_high_score() {
        let scorer = SimilarityScorer::default();
        let report = scorer.is_similar(&runner(300.0, 10.0, 30.0), &runner(400.0, 20.0, 30.0));
        assert!(report.score >= 0.70);
        assert_eq!(report.details.rules.pace_ok, Some(false));
        assert_eq!(report.details.rules.weekly_ok, Some(false));
        assert!(!report.similar);
    }

    #[test]
    fn unknown_rules_do_not_veto() {
        let scorer = SimilarityScorer::default();
        let a = ProfileRecord {
            age: Some(30.0),
            ..ProfileRecord::default()
        };
        let report = scorer.is_similar(&a, &a);
        assert_eq!(report.score, 1.0);
        assert!(report.similar);
    }

    #[test]
    fn empty_profiles_never_match() {
        let scorer = SimilarityScorer::default();
        let empty = ProfileRecord::default();
        let report = scorer.is_similar(&empty, &empty);
        assert_eq!(report.score, 0.0);
        assert!(!report.similar);
    }

    #[test]
    fn decision_is_symmetric() {
        let scorer = SimilarityScorer::default();
        let pairs = [
            (runner(300.0, 40.0, 30.0), runner(330.0, 50.0, 36.0)),
            (runner(250.0, 80.0, 25.0), runner(420.0, 20.0, 60.0)),
            (runner(300.0, 10.0, 30.0), runner(400.0, 20.0, 30.0)),
        ];
        for (a, b) in &pairs {
            let ab = scorer.is_similar(a, b);
            let ba = scorer.is_similar(b, a);
            assert_eq!(ab.similar, ba.similar);
            assert_eq!(ab.score, ba.score);
            assert_eq!(ab.details.rules, ba.details.rules);
        }
    }

    #[test]
    fn alignment_mode_parses() {
        assert_eq!("Keyed".parse::<AlignmentMode>().ok(), Some(AlignmentMode::Keyed));
        assert!("diagonal".parse::<AlignmentMode>().is_err());
    }
}
