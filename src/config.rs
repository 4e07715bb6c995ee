//! Runtime configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Missing or unparsable numbers fall
//! back to their defaults; values that parse but make no sense are
//! rejected by validation.

use crate::domain::QuotaLimits;
use crate::error::ConfigError;
use crate::similarity::{AlignmentMode, FeatureCeilings, SimilarityConfig};

/// Top-level configuration for the ledger and the scorer.
///
/// Loaded once at startup via [`RunmatchConfig::from_env`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunmatchConfig {
    /// Free-tier daily quotas.
    pub limits: QuotaLimits,

    /// Similarity scorer tunables.
    pub similarity: SimilarityConfig,
}

impl RunmatchConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `SIMILARITY_ALIGNMENT` is unsupported
    /// or a numeric setting fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`RunmatchConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let num = |key: &str, default: f64| parse_or(&lookup, key, default);

        let limits = QuotaLimits {
            like_limit: parse_or(&lookup, "FREE_LIKE_LIMIT_PER_DAY", defaults.limits.like_limit),
            total_action_limit: parse_or(
                &lookup,
                "FREE_TOTAL_ACTION_LIMIT_PER_DAY",
                defaults.limits.total_action_limit,
            ),
        };

        let c = defaults.similarity.ceilings;
        let ceilings = FeatureCeilings {
            pace_s_per_km: num("CEILING_PACE_S_PER_KM", c.pace_s_per_km),
            weekly_km: num("CEILING_WEEKLY_KM", c.weekly_km),
            long_run_km: num("CEILING_LONG_RUN_KM", c.long_run_km),
            elevation_m: num("CEILING_ELEVATION_M", c.elevation_m),
            preferred_distance_km: num("CEILING_PREFERRED_DISTANCE_KM", c.preferred_distance_km),
            age_years: num("CEILING_AGE_YEARS", c.age_years),
            weight_kg: num("CEILING_WEIGHT_KG", c.weight_kg),
            height_cm: num("CEILING_HEIGHT_CM", c.height_cm),
        };

        let alignment = match lookup("SIMILARITY_ALIGNMENT") {
            Some(raw) => raw.parse::<AlignmentMode>()?,
            None => defaults.similarity.alignment,
        };

        let s = defaults.similarity;
        let config = Self {
            limits,
            similarity: SimilarityConfig {
                ceilings,
                match_threshold: num("MATCH_THRESHOLD", s.match_threshold),
                pace_tolerance_s_per_km: num("PACE_TOLERANCE_S_PER_KM", s.pace_tolerance_s_per_km),
                weekly_tolerance_ratio: num("WEEKLY_TOLERANCE_RATIO", s.weekly_tolerance_ratio),
                age_tolerance_years: num("AGE_TOLERANCE_YEARS", s.age_tolerance_years),
                alignment,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that every numeric setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] for the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in self.similarity.ceilings.named() {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::OutOfRange {
                    key,
                    value,
                    reason: "must be finite and positive",
                });
            }
        }

        let threshold = self.similarity.match_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::OutOfRange {
                key: "MATCH_THRESHOLD",
                value: threshold,
                reason: "must lie in [0, 1]",
            });
        }

        let tolerances = [
            ("PACE_TOLERANCE_S_PER_KM", self.similarity.pace_tolerance_s_per_km),
            ("WEEKLY_TOLERANCE_RATIO", self.similarity.weekly_tolerance_ratio),
            ("AGE_TOLERANCE_YEARS", self.similarity.age_tolerance_years),
        ];
        for (key, value) in tolerances {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::OutOfRange {
                    key,
                    value,
                    reason: "must be finite and non-negative",
                });
            }
        }
        Ok(())
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
