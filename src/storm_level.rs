use std::fmt;
use serde::{Serialize, Serializer};

/// Geomagnetic storm severity derived from the Kp index
///
/// `Weak` is never produced by [`classify`], it only labels the placeholder forecast.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum StormLevel {
    Calm,
    Weak,
    Minor,
    Moderate,
    Strong,
    VeryStrong,
    Extreme,
}

/// Lower Kp bound of each level, highest first. Bounds are inclusive.
const SEVERITY_TABLE: [(f64, StormLevel); 5] = [
    (9.0, StormLevel::Extreme),
    (8.0, StormLevel::VeryStrong),
    (7.0, StormLevel::Strong),
    (6.0, StormLevel::Moderate),
    (5.0, StormLevel::Minor),
];

const WARNINGS: [(StormLevel, &str); 6] = [
    (StormLevel::Calm, "Geomagnetic conditions are calm"),
    (StormLevel::Minor, "Minor fluctuations are possible"),
    (StormLevel::Moderate, "Attention! Moderate magnetic storm"),
    (StormLevel::Strong, "Caution! Strong magnetic storm"),
    (StormLevel::VeryStrong, "WARNING! Very strong magnetic storm"),
    (StormLevel::Extreme, "CRITICAL! Extreme magnetic storm"),
];

const MONITORING_WARNING: &str = "Monitoring geomagnetic activity";

impl StormLevel {
    pub fn label(&self) -> &'static str {
        match self {
            StormLevel::Calm => "Calm",
            StormLevel::Weak => "Weak storm",
            StormLevel::Minor => "Minor storm",
            StormLevel::Moderate => "Moderate storm",
            StormLevel::Strong => "Strong storm",
            StormLevel::VeryStrong => "Very strong storm",
            StormLevel::Extreme => "Extreme storm",
        }
    }
}

impl fmt::Display for StormLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for StormLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Classifies a Kp index into a storm level
///
/// # Arguments
///
/// * 'kp' - Kp index, nominally 0-9
pub fn classify(kp: f64) -> StormLevel {
    SEVERITY_TABLE
        .iter()
        .find(|(bound, _)| kp >= *bound)
        .map(|(_, level)| *level)
        .unwrap_or(StormLevel::Calm)
}

/// Returns the user facing warning for a storm level
///
/// # Arguments
///
/// * 'level' - the storm level to warn about
pub fn warning(level: StormLevel) -> &'static str {
    WARNINGS
        .iter()
        .find(|(l, _)| *l == level)
        .map(|(_, msg)| *msg)
        .unwrap_or(MONITORING_WARNING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints_are_inclusive() {
        assert_eq!(classify(9.0), StormLevel::Extreme);
        assert_eq!(classify(9.5), StormLevel::Extreme);
        assert_eq!(classify(8.0), StormLevel::VeryStrong);
        assert_eq!(classify(7.0), StormLevel::Strong);
        assert_eq!(classify(6.0), StormLevel::Moderate);
        assert_eq!(classify(5.0), StormLevel::Minor);
        assert_eq!(classify(4.999), StormLevel::Calm);
        assert_eq!(classify(0.0), StormLevel::Calm);
        assert_eq!(classify(-1.0), StormLevel::Calm);
    }

    #[test]
    fn classify_is_monotonic() {
        let mut previous = classify(0.0);
        for step in 0..=1000 {
            let level = classify(step as f64 * 0.01);
            assert!(level >= previous, "level dropped at kp {}", step as f64 * 0.01);
            previous = level;
        }
    }

    #[test]
    fn labels() {
        assert_eq!(classify(9.0).to_string(), "Extreme storm");
        assert_eq!(classify(6.2).label(), "Moderate storm");
        assert_eq!(serde_json::to_string(&StormLevel::VeryStrong).unwrap(), "\"Very strong storm\"");
    }

    #[test]
    fn warnings_cover_every_classified_level() {
        assert_eq!(warning(StormLevel::Calm), "Geomagnetic conditions are calm");
        assert_eq!(warning(StormLevel::Extreme), "CRITICAL! Extreme magnetic storm");
        for (_, level) in SEVERITY_TABLE {
            assert_ne!(warning(level), MONITORING_WARNING);
        }
    }

    #[test]
    fn unknown_level_gets_monitoring_warning() {
        assert_eq!(warning(StormLevel::Weak), "Monitoring geomagnetic activity");
    }
}
