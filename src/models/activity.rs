//! Supported activities and effort levels

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::LayerupError;

/// Outdoor activity a layering plan is made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Activity {
    Run,
    TrailRun,
    RoadBike,
    MountainBike,
    Hike,
    Ski,
}

impl Activity {
    pub const ALL: [Activity; 6] = [
        Activity::Run,
        Activity::TrailRun,
        Activity::RoadBike,
        Activity::MountainBike,
        Activity::Hike,
        Activity::Ski,
    ];

    /// Identifier used by the CLI, the API and the layering tables
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Activity::Run => "run",
            Activity::TrailRun => "trail-run",
            Activity::RoadBike => "road-bike",
            Activity::MountainBike => "mountain-bike",
            Activity::Hike => "hike",
            Activity::Ski => "ski",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Activity::Run => "Running",
            Activity::TrailRun => "Trail running",
            Activity::RoadBike => "Road cycling",
            Activity::MountainBike => "Mountain biking",
            Activity::Hike => "Hiking",
            Activity::Ski => "Skiing",
        }
    }

    /// Look up an activity by id; unknown ids yield `None`
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|activity| activity.id().eq_ignore_ascii_case(id.trim()))
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// How hard the activity will be done; harder efforts feel warmer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Effort {
    Easy,
    Endurance,
    Tempo,
    AllOut,
}

impl Effort {
    pub const ALL: [Effort; 4] = [Effort::Easy, Effort::Endurance, Effort::Tempo, Effort::AllOut];

    /// Multiplier applied to the felt-temperature offset
    #[must_use]
    pub fn heat_factor(self) -> f64 {
        match self {
            Effort::Easy => 0.7,
            Effort::Endurance => 1.0,
            Effort::Tempo => 1.3,
            Effort::AllOut => 1.6,
        }
    }

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Effort::Easy => "easy",
            Effort::Endurance => "endurance",
            Effort::Tempo => "tempo",
            Effort::AllOut => "all-out",
        }
    }
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Effort {
    type Err = LayerupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|effort| effort.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                LayerupError::validation(format!(
                    "Unknown effort '{s}'. Must be one of: easy, endurance, tempo, all-out"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("easy", Effort::Easy, 0.7)]
    #[case("endurance", Effort::Endurance, 1.0)]
    #[case("Tempo", Effort::Tempo, 1.3)]
    #[case(" all-out ", Effort::AllOut, 1.6)]
    fn test_effort_parsing(#[case] input: &str, #[case] expected: Effort, #[case] factor: f64) {
        let effort: Effort = input.parse().unwrap();
        assert_eq!(effort, expected);
        assert_eq!(effort.heat_factor(), factor);
    }

    #[test]
    fn test_unknown_effort_is_validation_error() {
        let err = "sprint".parse::<Effort>().unwrap_err();
        assert!(matches!(err, LayerupError::Validation { .. }));
    }

    #[test]
    fn test_activity_ids_round_trip() {
        for activity in Activity::ALL {
            assert_eq!(Activity::from_id(activity.id()), Some(activity));
        }
        assert_eq!(Activity::from_id("kitesurf"), None);
    }

    #[test]
    fn test_serde_uses_ids() {
        assert_eq!(serde_json::to_string(&Activity::RoadBike).unwrap(), "\"road-bike\"");
        assert_eq!(serde_json::to_string(&Effort::AllOut).unwrap(), "\"all-out\"");
    }
}
