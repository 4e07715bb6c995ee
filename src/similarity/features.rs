//! Feature vectors: bounded numeric encodings of runner profiles.

use serde::{Deserialize, Serialize};

use super::performance::{RaceDistance, race_pace};
use super::profile::{Attribute, ProfileAttributes};

/// Normalisation ceilings, one per numeric attribute.
///
/// A raw value `v` becomes `clamp(v / ceiling, 0, 1)`. Race paces share
/// the pace ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureCeilings {
    /// Pace ceiling, seconds per kilometre.
    pub pace_s_per_km: f64,
    /// Weekly volume ceiling, kilometres.
    pub weekly_km: f64,
    /// Long-run ceiling, kilometres.
    pub long_run_km: f64,
    /// Weekly elevation ceiling, metres.
    pub elevation_m: f64,
    /// Preferred distance ceiling, kilometres.
    pub preferred_distance_km: f64,
    /// Age ceiling, years.
    pub age_years: f64,
    /// Weight ceiling, kilograms.
    pub weight_kg: f64,
    /// Height ceiling, centimetres.
    pub height_cm: f64,
}

impl Default for FeatureCeilings {
    fn default() -> Self {
        Self {
            pace_s_per_km: 600.0,
            weekly_km: 120.0,
            long_run_km: 40.0,
            elevation_m: 3000.0,
            preferred_distance_km: 42.0,
            age_years: 100.0,
            weight_kg: 120.0,
            height_cm: 210.0,
        }
    }
}

impl FeatureCeilings {
    /// Ceiling used for `attribute`.
    #[must_use]
    pub const fn ceiling(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::Pace => self.pace_s_per_km,
            Attribute::WeeklyDistance => self.weekly_km,
            Attribute::LongRun => self.long_run_km,
            Attribute::Elevation => self.elevation_m,
            Attribute::PreferredDistance => self.preferred_distance_km,
            Attribute::Age => self.age_years,
            Attribute::Weight => self.weight_kg,
            Attribute::Height => self.height_cm,
        }
    }

    /// Every ceiling with its environment key, for validation.
    #[must_use]
    pub const fn named(&self) -> [(&'static str, f64); 8] {
        [
            ("CEILING_PACE_S_PER_KM", self.pace_s_per_km),
            ("CEILING_WEEKLY_KM", self.weekly_km),
            ("CEILING_LONG_RUN_KM", self.long_run_km),
            ("CEILING_ELEVATION_M", self.elevation_m),
            ("CEILING_PREFERRED_DISTANCE_KM", self.preferred_distance_km),
            ("CEILING_AGE_YEARS", self.age_years),
            ("CEILING_WEIGHT_KG", self.weight_kg),
            ("CEILING_HEIGHT_CM", self.height_cm),
        ]
    }
}

/// Identity of one feature-vector dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    /// A numeric profile attribute.
    Attribute(Attribute),
    /// Pace derived from a race result.
    RacePace(RaceDistance),
}

/// Ordered, variable-length feature vector. Every value lies in `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureVector {
    entries: Vec<(FeatureKey, f64)>,
}

impl FeatureVector {
    /// The normalised values, in order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }

    /// Iterates over `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Value of the dimension `key`, if present.
    #[must_use]
    pub fn get(&self, key: FeatureKey) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    /// Number of populated dimensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no dimension is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Linearly maps `value` onto `[0, 1]` against `ceiling`.
///
/// A non-positive or non-finite ceiling is treated as 1.
#[must_use]
pub fn normalize(value: f64, ceiling: f64) -> f64 {
    let ceiling = if ceiling.is_finite() && ceiling > 0.0 {
        ceiling
    } else {
        1.0
    };
    (value / ceiling).clamp(0.0, 1.0)
}

/// Builds the feature vector of `profile`.
///
/// Emits the eight numeric attributes in [`Attribute::ALL`] order, then
/// race paces in [`RaceDistance::ALL`] order, skipping anything the
/// profile does not provide.
#[must_use]
pub fn feature_vector<P>(profile: &P, ceilings: &FeatureCeilings) -> FeatureVector
where
    P: ProfileAttributes + ?Sized,
{
    let attributes = Attribute::ALL.into_iter().filter_map(|attribute| {
        profile.finite(attribute).map(|raw| {
            (
                FeatureKey::Attribute(attribute),
                normalize(raw, ceilings.ceiling(attribute)),
            )
        })
    });

    let performances = profile.performances();
    let races = RaceDistance::ALL.into_iter().filter_map(|race| {
        race_pace(performances, race)
            .map(|pace| (FeatureKey::RacePace(race), normalize(pace, ceilings.pace_s_per_km)))
    });

    FeatureVector {
        entries: attributes.chain(races).collect(),
    }
}
