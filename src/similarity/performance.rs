//! Race paces parsed from free-text performance entries.
//!
//! Entries look like `"10km en 45min"`, `"5k 19min30s"` or
//! `"Semi-marathon en 1h45"`. An entry is attributed to a race by a
//! distance pattern, and the first non-empty `h`/`min`/`s` duration in it
//! becomes the race time.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Race distances recognised in performance entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceDistance {
    /// 5 km.
    FiveK,
    /// 10 km.
    TenK,
    /// Half marathon, 21.1 km.
    HalfMarathon,
    /// Marathon, 42.2 km.
    Marathon,
}

impl RaceDistance {
    /// Every race, in feature-vector order.
    pub const ALL: [Self; 4] = [Self::FiveK, Self::TenK, Self::HalfMarathon, Self::Marathon];

    /// Race length in kilometres.
    #[must_use]
    pub const fn km(self) -> f64 {
        match self {
            Self::FiveK => 5.0,
            Self::TenK => 10.0,
            Self::HalfMarathon => 21.1,
            Self::Marathon => 42.2,
        }
    }
}

struct Patterns {
    duration: Regex,
    five_k: Regex,
    ten_k: Regex,
    half: Regex,
    marathon: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            duration: Regex::new(
                r"(?i)(?:(?P<h>\d+)\s*h(?:\s*(?P<hm>\d{1,2})(?:\s*min)?)?)?\s*(?:(?P<m>\d+)\s*min)?\s*(?:(?P<s>\d+)\s*s\b)?",
            )?,
            five_k: Regex::new(r"(?i)\b5\s*km?\b")?,
            ten_k: Regex::new(r"(?i)\b10\s*km?\b")?,
            half: Regex::new(r"(?i)\b(?:semi|half|21[.,]?\s*1\s*km)\b")?,
            marathon: Regex::new(r"(?i)\b(?:marathon|42[.,]?\s*2\s*km)\b")?,
        })
    }

    fn matches(&self, race: RaceDistance, entry: &str) -> bool {
        match race {
            RaceDistance::FiveK => self.five_k.is_match(entry),
            RaceDistance::TenK => self.ten_k.is_match(entry),
            RaceDistance::HalfMarathon => self.half.is_match(entry),
            // "semi-marathon" must not count as a full marathon.
            RaceDistance::Marathon => self.marathon.is_match(entry) && !self.half.is_match(entry),
        }
    }
}

fn patterns() -> Option<&'static Patterns> {
    static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns::compile().ok()).as_ref()
}

/// Extracts a duration in seconds from free text.
///
/// Returns the first non-empty match of an `Xh[YY]`, `Ymin`, `Zs`
/// sequence, or `None` when the text holds no such duration.
#[must_use]
pub fn parse_duration_secs(text: &str) -> Option<u64> {
    let patterns = patterns()?;
    let caps = patterns
        .duration
        .captures_iter(text)
        .find(|caps| caps.get(0).is_some_and(|m| !m.as_str().trim().is_empty()))?;

    let part = |name: &str| -> u64 {
        caps.name(name)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };
    let minutes = part("hm").saturating_add(part("m"));
    Some(
        part("h")
            .saturating_mul(3600)
            .saturating_add(minutes.saturating_mul(60))
            .saturating_add(part("s")),
    )
}

/// Pace in seconds per kilometre for `race`, from the first entry that
/// names the race and carries a non-zero duration.
#[must_use]
pub fn race_pace(performances: &[String], race: RaceDistance) -> Option<f64> {
    let patterns = patterns()?;
    performances
        .iter()
        .filter(|entry| patterns.matches(race, entry))
        .find_map(|entry| parse_duration_secs(entry).filter(|secs| *secs > 0))
        .map(|secs| {
            #[allow(clippy::cast_precision_loss)]
            let secs = secs as f64;
            secs / race.km()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn parses_minutes_after_distance() {
        assert_eq!(parse_duration_secs("10km en 45min"), Some(2700));
    }

    #[test]
    fn parses_hours_with_trailing_minutes() {
        assert_eq!(parse_duration_secs("Semi-marathon en 1h45"), Some(6300));
        assert_eq!(parse_duration_secs("marathon 3h 30min"), Some(12_600));
    }

    #[test]
    fn parses_minutes_and_seconds() {
        assert_eq!(parse_duration_secs("5k 19min 30s"), Some(1170));
    }

    #[test]
    fn no_duration_is_none() {
        assert_eq!(parse_duration_secs("10km, felt great"), None);
        assert_eq!(parse_duration_secs(""), None);
    }

    #[test]
    fn ten_k_pace() {
        let perf = entries(&["10km en 45min"]);
        assert_eq!(race_pace(&perf, RaceDistance::TenK), Some(270.0));
        assert_eq!(race_pace(&perf, RaceDistance::FiveK), None);
    }

    #[test]
    fn half_marathon_is_not_a_marathon() {
        let perf = entries(&["Semi-marathon en 1h45"]);
        assert!(race_pace(&perf, RaceDistance::HalfMarathon).is_some());
        assert_eq!(race_pace(&perf, RaceDistance::Marathon), None);
    }

    #[test]
    fn skips_entries_without_duration() {
        let perf = entries(&["5km someday", "5 km en 25min"]);
        assert_eq!(race_pace(&perf, RaceDistance::FiveK), Some(300.0));
    }

    #[test]
    fn fifteen_k_is_not_five_k() {
        let perf = entries(&["15km en 75min"]);
        assert_eq!(race_pace(&perf, RaceDistance::FiveK), None);
    }
}
