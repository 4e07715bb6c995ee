//! Runner profile attributes as seen by the scorer.
//!
//! The scorer never depends on a concrete profile type. It reads through
//! [`ProfileAttributes`], and [`ProfileRecord`] is the serde-friendly
//! bag the CLI and tests use.

use serde::{Deserialize, Serialize};

/// A numeric profile attribute recognised by the scorer.
///
/// Declaration order is the feature-vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Attribute {
    /// Average pace, seconds per kilometre.
    #[serde(rename = "avg_pace_s_per_km")]
    Pace,
    /// Weekly running volume, kilometres.
    #[serde(rename = "weekly_km")]
    WeeklyDistance,
    /// Longest regular run, kilometres.
    #[serde(rename = "long_run_km")]
    LongRun,
    /// Weekly elevation gain, metres.
    #[serde(rename = "elevation_per_week")]
    Elevation,
    /// Favourite race distance, kilometres.
    #[serde(rename = "preferred_distance_km")]
    PreferredDistance,
    /// Age, years.
    #[serde(rename = "age")]
    Age,
    /// Body weight, kilograms.
    #[serde(rename = "weight_kg")]
    Weight,
    /// Height, centimetres.
    #[serde(rename = "height_cm")]
    Height,
}

impl Attribute {
    /// Every attribute, in feature-vector order.
    pub const ALL: [Self; 8] = [
        Self::Pace,
        Self::WeeklyDistance,
        Self::LongRun,
        Self::Elevation,
        Self::PreferredDistance,
        Self::Age,
        Self::Weight,
        Self::Height,
    ];

    /// Field name of the attribute on a profile record.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pace => "avg_pace_s_per_km",
            Self::WeeklyDistance => "weekly_km",
            Self::LongRun => "long_run_km",
            Self::Elevation => "elevation_per_week",
            Self::PreferredDistance => "preferred_distance_km",
            Self::Age => "age",
            Self::Weight => "weight_kg",
            Self::Height => "height_cm",
        }
    }
}

/// Read-only view of a partially populated runner profile.
pub trait ProfileAttributes {
    /// Returns the raw value of `attribute`, if the profile has one.
    fn attribute(&self, attribute: Attribute) -> Option<f64>;

    /// Self-declared gender, if any.
    fn gender(&self) -> Option<&str> {
        None
    }

    /// Free-text race results such as `"10km en 45min"`.
    fn performances(&self) -> &[String] {
        &[]
    }

    /// Returns `attribute` only if it is present and finite.
    fn finite(&self, attribute: Attribute) -> Option<f64> {
        self.attribute(attribute).filter(|v| v.is_finite())
    }
}

/// Self-assessed running level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerLevel {
    /// Just starting out.
    Beginner,
    /// Runs regularly.
    Intermediate,
    /// Trains for performance.
    Advanced,
}

/// Concrete profile record. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRecord {
    /// Average pace, seconds per kilometre.
    pub avg_pace_s_per_km: Option<f64>,
    /// Weekly running volume, kilometres.
    pub weekly_km: Option<f64>,
    /// Longest regular run, kilometres.
    pub long_run_km: Option<f64>,
    /// Weekly elevation gain, metres.
    pub elevation_per_week: Option<f64>,
    /// Favourite race distance, kilometres.
    #[serde(alias = "prefered_distance_km")]
    pub preferred_distance_km: Option<f64>,
    /// Age, years.
    pub age: Option<f64>,
    /// Body weight, kilograms.
    #[serde(alias = "poids")]
    pub weight_kg: Option<f64>,
    /// Height, centimetres.
    #[serde(alias = "taille")]
    pub height_cm: Option<f64>,
    /// Self-declared gender.
    #[serde(alias = "genre")]
    pub gender: Option<String>,
    /// Free-text race results.
    #[serde(alias = "performance")]
    pub performances: Vec<String>,
    /// Self-assessed level.
    pub level: Option<RunnerLevel>,
    /// Home city.
    pub location_city: Option<String>,
    /// Free-text training goals.
    pub goals: Option<String>,
    /// Available to run on weekdays.
    pub availability_week: bool,
    /// Available to run on weekends.
    pub availability_weekend: bool,
}

/// How complete a profile is, for nudging users to fill it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileCompletion {
    /// Completed share of the tracked sections, 0–100, rounded down.
    pub percent: u8,
    /// Names of the sections still missing.
    pub missing: Vec<&'static str>,
}

impl ProfileRecord {
    /// Reports which of the level, city, goals and availability sections
    /// are filled in. Text counts as filled when it is non-empty.
    #[must_use]
    pub fn completion(&self) -> ProfileCompletion {
        let filled = |text: &Option<String>| text.as_deref().is_some_and(|t| !t.is_empty());
        let sections = [
            ("level", self.level.is_some()),
            ("location_city", filled(&self.location_city)),
            ("goals", filled(&self.goals)),
            (
                "availability",
                self.availability_week || self.availability_weekend,
            ),
        ];

        let done = sections.iter().filter(|(_, ok)| *ok).count();
        let percent = u8::try_from(done * 100 / sections.len()).unwrap_or(100);
        let missing = sections
            .iter()
            .filter(|(_, ok)| !*ok)
            .map(|(name, _)| *name)
            .collect();
        ProfileCompletion { percent, missing }
    }
}

impl ProfileAttributes for ProfileRecord {
    fn attribute(&self, attribute: Attribute) -> Option<f64> {
        match attribute {
            Attribute::Pace => self.avg_pace_s_per_km,
            Attribute::WeeklyDistance => self.weekly_km,
            Attribute::LongRun => self.long_run_km,
            Attribute::Elevation => self.elevation_per_week,
            Attribute::PreferredDistance => self.preferred_distance_km,
            Attribute::Age => self.age,
            Attribute::Weight => self.weight_kg,
            Attribute::Height => self.height_cm,
        }
    }

    fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    fn performances(&self) -> &[String] {
        &self.performances
    }
}
