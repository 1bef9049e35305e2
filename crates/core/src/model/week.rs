use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WeekError {
    #[error("week must be between 1 and 24, got {got}")]
    OutOfRange { got: i64 },

    #[error("invalid week number: {0}")]
    Parse(String),
}

/// A scheduling bucket of the 24-week plan (1-based).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeekNumber(u8);

impl WeekNumber {
    pub const FIRST: u8 = 1;
    pub const LAST: u8 = 24;

    /// Build a validated week number.
    ///
    /// # Errors
    ///
    /// Returns `WeekError::OutOfRange` unless `value` is within 1..=24.
    pub fn new(value: u8) -> Result<Self, WeekError> {
        if (Self::FIRST..=Self::LAST).contains(&value) {
            Ok(Self(value))
        } else {
            Err(WeekError::OutOfRange {
                got: i64::from(value),
            })
        }
    }

    #[must_use]
    pub const fn first() -> Self {
        Self(Self::FIRST)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// The following week, staying on week 24 at the end of the plan.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1).min(Self::LAST))
    }

    /// The previous week, staying on week 1 at the start of the plan.
    #[must_use]
    pub fn prev(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::FIRST))
    }
}

impl Default for WeekNumber {
    fn default() -> Self {
        Self::first()
    }
}

impl TryFrom<u8> for WeekNumber {
    type Error = WeekError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WeekNumber> for u8 {
    fn from(week: WeekNumber) -> Self {
        week.0
    }
}

impl std::str::FromStr for WeekNumber {
    type Err = WeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s
            .trim()
            .parse()
            .map_err(|_| WeekError::Parse(s.to_string()))?;
        u8::try_from(raw)
            .map_err(|_| WeekError::OutOfRange { got: raw })
            .and_then(Self::new)
    }
}

impl fmt::Debug for WeekNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WeekNumber({})", self.0)
    }
}

impl fmt::Display for WeekNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plan_bounds() {
        assert_eq!(WeekNumber::new(1).unwrap().value(), 1);
        assert_eq!(WeekNumber::new(24).unwrap().value(), 24);
    }

    #[test]
    fn rejects_zero_and_past_end() {
        assert_eq!(
            WeekNumber::new(0).unwrap_err(),
            WeekError::OutOfRange { got: 0 }
        );
        assert!(WeekNumber::new(25).is_err());
    }

    #[test]
    fn next_and_prev_clamp() {
        let first = WeekNumber::first();
        assert_eq!(first.prev(), first);
        let last = WeekNumber::new(24).unwrap();
        assert_eq!(last.next(), last);
        assert_eq!(first.next().value(), 2);
    }

    #[test]
    fn parses_from_text() {
        assert_eq!("7".parse::<WeekNumber>().unwrap().value(), 7);
        assert_eq!(
            "-3".parse::<WeekNumber>().unwrap_err(),
            WeekError::OutOfRange { got: -3 }
        );
        assert!(matches!(
            "seven".parse::<WeekNumber>(),
            Err(WeekError::Parse(_))
        ));
    }
}
