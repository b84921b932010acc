use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered PM2.5 air-quality buckets, cleanest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AirQualityCategory {
    Excellent,
    Good,
    LightlyPolluted,
    ModeratelyPolluted,
    HeavilyPolluted,
    SeverelyPolluted,
}

impl AirQualityCategory {
    pub const ALL: [AirQualityCategory; 6] = [
        AirQualityCategory::Excellent,
        AirQualityCategory::Good,
        AirQualityCategory::LightlyPolluted,
        AirQualityCategory::ModeratelyPolluted,
        AirQualityCategory::HeavilyPolluted,
        AirQualityCategory::SeverelyPolluted,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            AirQualityCategory::Excellent => "Excellent",
            AirQualityCategory::Good => "Good",
            AirQualityCategory::LightlyPolluted => "Lightly Polluted",
            AirQualityCategory::ModeratelyPolluted => "Moderately Polluted",
            AirQualityCategory::HeavilyPolluted => "Heavily Polluted",
            AirQualityCategory::SeverelyPolluted => "Severely Polluted",
        }
    }

    /// Inclusive upper PM2.5 bound in µg/m³; `None` for the open top bucket
    pub fn upper_bound(&self) -> Option<f64> {
        match self {
            AirQualityCategory::Excellent => Some(15.0),
            AirQualityCategory::Good => Some(35.0),
            AirQualityCategory::LightlyPolluted => Some(55.0),
            AirQualityCategory::ModeratelyPolluted => Some(75.0),
            AirQualityCategory::HeavilyPolluted => Some(100.0),
            AirQualityCategory::SeverelyPolluted => None,
        }
    }

    /// Exclusive lower PM2.5 bound; `None` for the bottom bucket
    pub fn lower_bound(&self) -> Option<f64> {
        match self.index() {
            0 => None,
            i => Self::ALL[i - 1].upper_bound(),
        }
    }

    pub fn contains(&self, pm25: f64) -> bool {
        let above_lower = self.lower_bound().map_or(true, |lower| pm25 > lower);
        let within_upper = self.upper_bound().map_or(true, |upper| pm25 <= upper);
        above_lower && within_upper
    }

    /// Human-readable PM2.5 range, e.g. `15 - 35` or `> 100`
    pub fn range_label(&self) -> String {
        match (self.lower_bound(), self.upper_bound()) {
            (None, Some(upper)) => format!("0 - {}", upper),
            (Some(lower), Some(upper)) => format!("{} - {}", lower, upper),
            (Some(lower), None) => format!("> {}", lower),
            (None, None) => "any".to_string(),
        }
    }
}

impl fmt::Display for AirQualityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_matches_index() {
        for window in AirQualityCategory::ALL.windows(2) {
            assert!(window[0] < window[1]);
            assert_eq!(window[0].index() + 1, window[1].index());
        }
    }

    #[test]
    fn test_bounds_are_contiguous() {
        for window in AirQualityCategory::ALL.windows(2) {
            assert_eq!(window[0].upper_bound(), window[1].lower_bound());
        }
        assert_eq!(AirQualityCategory::Excellent.lower_bound(), None);
        assert_eq!(AirQualityCategory::SeverelyPolluted.upper_bound(), None);
    }

    #[test]
    fn test_contains_is_upper_inclusive() {
        assert!(AirQualityCategory::Excellent.contains(15.0));
        assert!(!AirQualityCategory::Good.contains(15.0));
        assert!(AirQualityCategory::Good.contains(15.0001));
        assert!(AirQualityCategory::SeverelyPolluted.contains(1_000.0));
    }

    #[test]
    fn test_range_labels() {
        assert_eq!(AirQualityCategory::HeavilyPolluted.range_label(), "75 - 100");
        assert_eq!(AirQualityCategory::SeverelyPolluted.range_label(), "> 100");
    }
}
