use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Duration in minutes (service durations, buffers, slot lengths).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct DurationMinutes(i64);

impl DurationMinutes {
    pub fn new(minutes: i64) -> Self {
        Self(minutes.max(0))
    }

    pub fn as_minutes(&self) -> i64 {
        self.0
    }

    pub fn as_chrono_duration(&self) -> Duration {
        Duration::minutes(self.0)
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for DurationMinutes {
    fn from(minutes: i64) -> Self {
        Self::new(minutes)
    }
}

impl fmt::Display for DurationMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 60 {
            let hours = self.0 / 60;
            let mins = self.0 % 60;
            if mins == 0 {
                write!(f, "{}h", hours)
            } else {
                write!(f, "{}h {}m", hours, mins)
            }
        } else {
            write!(f, "{}m", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_display() {
        assert_eq!(DurationMinutes::new(90).to_string(), "1h 30m");
        assert_eq!(DurationMinutes::new(30).to_string(), "30m");
        assert_eq!(DurationMinutes::new(120).to_string(), "2h");
    }

    #[test]
    fn test_duration_negative_clamped() {
        assert_eq!(DurationMinutes::new(-10).as_minutes(), 0);
    }
}
