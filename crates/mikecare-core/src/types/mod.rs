//! # Core Type Definitions
//!
//! Identifiers and value types shared by every MikeCare component:
//! - Concern category identifiers (`CategoryId`)
//! - Step identifiers for progress tracking (`StepId`)
//! - Journal mood scale (`Mood`)
//! - Error types (`CareError`)
//!
//! ## Determinism Guarantees
//!
//! All identifier types implement `Ord` so they can live in `BTreeMap`/`BTreeSet`
//! and always iterate in the same order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// CATEGORY IDENTIFIER
// =============================================================================

/// A concern domain used to key solution content.
///
/// This is a closed set. Every variant has an entry in the category registry
/// and a plan in the solution catalog, so a `CategoryId` can never miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryId {
    Relationships,
    Family,
    Work,
    Financial,
    Personal,
    Social,
    Health,
}

impl CategoryId {
    /// Every category, in registry display order.
    pub const ALL: [CategoryId; 7] = [
        CategoryId::Relationships,
        CategoryId::Family,
        CategoryId::Work,
        CategoryId::Financial,
        CategoryId::Personal,
        CategoryId::Social,
        CategoryId::Health,
    ];

    /// The wire/storage key for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CategoryId::Relationships => "relationships",
            CategoryId::Family => "family",
            CategoryId::Work => "work",
            CategoryId::Financial => "financial",
            CategoryId::Personal => "personal",
            CategoryId::Social => "social",
            CategoryId::Health => "health",
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryId {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| CareError::UnknownCategory(s.to_string()))
    }
}

// =============================================================================
// STEP IDENTIFIER
// =============================================================================

/// Composite key for a checklist item inside a solution plan.
///
/// Formats as `immediate-<index>` for immediate relief steps and
/// `<weekIndex>-<taskIndex>` for healing plan tasks. Indices are zero-based
/// positions, not week numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StepId {
    /// An immediate relief step.
    Immediate(usize),
    /// A task inside a healing plan week.
    Task { week: usize, task: usize },
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepId::Immediate(index) => write!(f, "immediate-{}", index),
            StepId::Task { week, task } => write!(f, "{}-{}", week, task),
        }
    }
}

impl FromStr for StepId {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CareError::InvalidStepId(s.to_string());
        let (head, tail) = s.split_once('-').ok_or_else(invalid)?;
        let second: usize = tail.parse().map_err(|_| invalid())?;

        let id = if head == "immediate" {
            StepId::Immediate(second)
        } else {
            StepId::Task {
                week: head.parse().map_err(|_| invalid())?,
                task: second,
            }
        };
        // `+1` and `01` parse as integers but would alias a canonical id.
        if id.to_string() != s {
            return Err(invalid());
        }
        Ok(id)
    }
}

impl TryFrom<String> for StepId {
    type Error = CareError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StepId> for String {
    fn from(id: StepId) -> Self {
        id.to_string()
    }
}

// =============================================================================
// MOOD
// =============================================================================

/// Self-reported mood on a 1..=5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Mood(u8);

impl Mood {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Create a mood, rejecting values outside 1..=5.
    pub fn new(value: u8) -> Result<Self, CareError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CareError::InvalidMood(value))
        }
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Human label shown next to the mood picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self.0 {
            1 => "Struggling",
            2 => "Difficult",
            3 => "Okay",
            4 => "Good",
            _ => "Great",
        }
    }
}

impl TryFrom<u8> for Mood {
    type Error = CareError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Mood> for u8 {
    fn from(mood: Mood) -> Self {
        mood.0
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in MikeCare.
///
/// - No silent failures except the documented default-plan fallback
/// - The CORE never panics; all errors are recoverable
#[derive(Debug, Error)]
pub enum CareError {
    /// The category key is not part of the registry.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// The step identifier could not be parsed.
    #[error("Invalid step id: {0}")]
    InvalidStepId(String),

    /// The step identifier is well-formed but not part of the mounted plan.
    #[error("Step {0} is not part of the current plan")]
    UnknownStep(StepId),

    /// Mood outside the 1..=5 scale.
    #[error("Mood must be between 1 and 5, got {0}")]
    InvalidMood(u8),

    /// A submission is already waiting on analysis.
    #[error("A submission is already in progress")]
    SubmissionInProgress,

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for id in CategoryId::ALL {
            assert_eq!(id.as_str().parse::<CategoryId>().expect("parse"), id);
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = "astrology".parse::<CategoryId>().unwrap_err();
        assert!(matches!(err, CareError::UnknownCategory(ref s) if s == "astrology"));
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&CategoryId::Work).expect("serialize");
        assert_eq!(json, "\"work\"");
    }

    #[test]
    fn step_id_formats() {
        assert_eq!(StepId::Immediate(2).to_string(), "immediate-2");
        assert_eq!(StepId::Task { week: 1, task: 3 }.to_string(), "1-3");
    }

    #[test]
    fn step_id_parses() {
        assert_eq!(
            "immediate-0".parse::<StepId>().expect("parse"),
            StepId::Immediate(0)
        );
        assert_eq!(
            "2-4".parse::<StepId>().expect("parse"),
            StepId::Task { week: 2, task: 4 }
        );
    }

    #[test]
    fn malformed_step_ids_rejected() {
        for raw in ["", "immediate", "immediate-", "a-1", "1-b", "1_2", "-1"] {
            assert!(raw.parse::<StepId>().is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn non_canonical_step_ids_rejected() {
        for raw in ["immediate-+1", "immediate-01", "01-0", "0-+2", "+1-0"] {
            assert!(
                matches!(raw.parse::<StepId>(), Err(CareError::InvalidStepId(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn step_id_serializes_as_string() {
        let json = serde_json::to_string(&StepId::Task { week: 0, task: 1 }).expect("serialize");
        assert_eq!(json, "\"0-1\"");
        let back: StepId = serde_json::from_str("\"immediate-4\"").expect("deserialize");
        assert_eq!(back, StepId::Immediate(4));
    }

    #[test]
    fn mood_bounds() {
        assert!(Mood::new(0).is_err());
        assert!(Mood::new(6).is_err());
        assert_eq!(Mood::new(1).expect("mood").label(), "Struggling");
        assert_eq!(Mood::new(5).expect("mood").label(), "Great");
    }

    #[test]
    fn mood_deserialization_validates() {
        assert!(serde_json::from_str::<Mood>("9").is_err());
        let mood: Mood = serde_json::from_str("3").expect("deserialize");
        assert_eq!(mood.label(), "Okay");
    }
}
