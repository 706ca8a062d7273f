//! # Submission Flow
//!
//! The `Editing -> Submitting -> Resolved` state machine behind the input
//! screen.
//!
//! The flow itself performs no waiting. [`SubmissionFlow::begin_submit`] moves
//! to `Submitting` and hands out a [`SubmitTicket`]; the caller waits out the
//! analysis delay and then redeems the ticket with
//! [`SubmissionFlow::complete`], which writes the record to the store.
//! While a ticket is outstanding the flow refuses a second submit, which is
//! the only concurrency guard.

use crate::primitives::VOICE_NOTE_MARKER;
use crate::storage::{KeyValueStore, StoreKey};
use crate::{CareError, CategoryId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// SUBMISSION RECORD
// =============================================================================

/// What the user submitted. Written once on submit, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub text: String,
    #[serde(rename = "category", alias = "categoryId")]
    pub category_id: CategoryId,
    /// ISO-8601 UTC with millisecond precision.
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}

// =============================================================================
// FLOW STATE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowState {
    #[default]
    Editing,
    Submitting,
    Resolved,
}

/// Proof that a submit was accepted. Redeem with [`SubmissionFlow::complete`].
///
/// Holds the draft as it was when the user pressed submit.
#[derive(Debug)]
pub struct SubmitTicket {
    text: String,
    category: CategoryId,
}

impl SubmitTicket {
    #[must_use]
    pub fn category(&self) -> CategoryId {
        self.category
    }
}

/// One instance of the input screen.
#[derive(Debug, Clone, Default)]
pub struct SubmissionFlow {
    text: String,
    category: Option<CategoryId>,
    recording: bool,
    state: FlowState,
}

impl SubmissionFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> FlowState {
        self.state
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn category(&self) -> Option<CategoryId> {
        self.category
    }

    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    fn is_editing(&self) -> bool {
        self.state == FlowState::Editing
    }

    /// Replace the draft text. Ignored outside `Editing`.
    pub fn set_text(&mut self, text: impl Into<String>) {
        if self.is_editing() {
            self.text = text.into();
        }
    }

    /// Select a category. Ignored outside `Editing`.
    pub fn select_category(&mut self, category: CategoryId) {
        if self.is_editing() {
            self.category = Some(category);
        }
    }

    /// Start or stop voice recording.
    ///
    /// Stopping appends a voice-note marker to the draft. Returns whether the
    /// flow is now recording.
    pub fn toggle_recording(&mut self) -> bool {
        if !self.is_editing() {
            return self.recording;
        }
        if self.recording {
            self.text.push_str(VOICE_NOTE_MARKER);
        }
        self.recording = !self.recording;
        self.recording
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.is_editing() && !self.text.trim().is_empty() && self.category.is_some()
    }

    /// Press submit.
    ///
    /// Returns `None` without changing state if the draft is incomplete or a
    /// submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        if !self.can_submit() {
            return None;
        }
        let category = self.category?;
        self.state = FlowState::Submitting;
        self.recording = false;
        Some(SubmitTicket {
            text: self.text.clone(),
            category,
        })
    }

    /// Finish a submission after the analysis delay.
    ///
    /// Writes the record under `currentInput` and drops any previously
    /// resolved plan so the Solutions view resolves the new record. On a
    /// store failure the flow returns to `Editing` for a fresh attempt.
    pub fn complete<S: KeyValueStore>(
        &mut self,
        ticket: SubmitTicket,
        now: DateTime<Utc>,
        store: &mut S,
    ) -> Result<SubmissionRecord, CareError> {
        let record = SubmissionRecord {
            text: ticket.text,
            category_id: ticket.category,
            timestamp: now,
        };

        let written = store
            .set_json(StoreKey::CurrentInput, &record)
            .and_then(|()| store.remove(StoreKey::CurrentSolution));

        match written {
            Ok(()) => {
                self.state = FlowState::Resolved;
                Ok(record)
            }
            Err(e) => {
                self.state = FlowState::Editing;
                Err(e)
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
