//! # Simulated Analysis
//!
//! The pause between pressing submit and seeing a plan. Nothing is analysed:
//! the delay stands in for a future engine and the plan comes from the
//! session's resolver afterwards.
//!
//! [`submit_draft`] drives one submission against a shared session. The
//! session lock is released while waiting; the flow's `Submitting` state is
//! what keeps a second submit out. Once accepted, the delay and the write run
//! on a spawned task, so a caller that goes away mid-delay (a dropped HTTP
//! request) cannot leave the flow stuck in `Submitting`.

use chrono::Utc;
use mikecare_core::primitives::MAX_SUBMISSION_TEXT_LENGTH;
use mikecare_core::{CareError, CategoryId, FlowState, Session, SubmissionRecord};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Fixed-latency stand-in for request analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedAnalysis {
    delay: Duration,
}

impl SimulatedAnalysis {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the configured delay.
    pub async fn run(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// What the user typed on the input screen.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub text: String,
    pub category: Option<CategoryId>,
    /// Record (and stop) a voice note before submitting.
    pub voice_note: bool,
}

/// Result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Record written; the Solutions view can mount.
    Resolved(SubmissionRecord),
    /// Empty text or missing category. Nothing written.
    Blocked,
    /// Text longer than the submission limit (byte length given). Nothing written.
    TooLong(usize),
    /// Another submission is still waiting out its delay.
    InProgress,
}

/// Run a draft through the submission flow of a shared session.
pub async fn submit_draft(
    session: &Arc<RwLock<Session>>,
    analysis: SimulatedAnalysis,
    draft: Draft,
) -> Result<SubmitOutcome, CareError> {
    let ticket = {
        let mut session = session.write().await;
        if session.flow().state() == FlowState::Submitting {
            return Ok(SubmitOutcome::InProgress);
        }
        if draft.text.len() > MAX_SUBMISSION_TEXT_LENGTH {
            return Ok(SubmitOutcome::TooLong(draft.text.len()));
        }
        session.open_input()?;

        let flow = session.flow_mut();
        flow.set_text(draft.text);
        if let Some(category) = draft.category {
            flow.select_category(category);
        }
        if draft.voice_note {
            flow.toggle_recording();
            flow.toggle_recording();
        }

        match session.begin_submit() {
            Some(ticket) => ticket,
            None => return Ok(SubmitOutcome::Blocked),
        }
    };

    tracing::debug!(
        category = %ticket.category(),
        delay_ms = analysis.delay().as_millis() as u64,
        "Submission accepted, analysing"
    );

    let shared = Arc::clone(session);
    let task = tokio::spawn(async move {
        analysis.run().await;
        let mut session = shared.write().await;
        session.complete_submit(ticket, Utc::now())
    });
    let record = task
        .await
        .map_err(|e| CareError::IoError(format!("analysis task failed: {e}")))??;

    tracing::info!(category = %record.category_id, "Submission resolved");
    Ok(SubmitOutcome::Resolved(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared() -> Arc<RwLock<Session>> {
        Arc::new(RwLock::new(Session::new()))
    }

    fn draft(text: &str, category: Option<CategoryId>) -> Draft {
        Draft {
            text: text.to_string(),
            category,
            voice_note: false,
        }
    }

    #[tokio::test]
    async fn resolves_valid_draft() {
        let session = shared();
        let outcome = submit_draft(
            &session,
            SimulatedAnalysis::new(Duration::ZERO),
            draft("I feel overwhelmed", Some(CategoryId::Work)),
        )
        .await
        .expect("submit");

        assert!(matches!(outcome, SubmitOutcome::Resolved(ref r) if r.category_id == CategoryId::Work));
        assert!(session.read().await.current_input().expect("get").is_some());
    }

    #[tokio::test]
    async fn blocks_incomplete_draft() {
        let session = shared();
        let analysis = SimulatedAnalysis::new(Duration::ZERO);

        let empty = submit_draft(&session, analysis, draft("  ", Some(CategoryId::Work)))
            .await
            .expect("submit");
        assert_eq!(empty, SubmitOutcome::Blocked);

        let uncategorised = submit_draft(&session, analysis, draft("hello", None))
            .await
            .expect("submit");
        assert_eq!(uncategorised, SubmitOutcome::Blocked);
        assert!(session.read().await.current_input().expect("get").is_none());
    }

    #[tokio::test]
    async fn voice_note_is_appended() {
        let session = shared();
        let mut with_voice = draft("Tired", Some(CategoryId::Health));
        with_voice.voice_note = true;

        let outcome = submit_draft(&session, SimulatedAnalysis::new(Duration::ZERO), with_voice)
            .await
            .expect("submit");
        assert!(
            matches!(outcome, SubmitOutcome::Resolved(ref r) if r.text == "Tired [Voice note recorded]")
        );
    }

    #[tokio::test]
    async fn concurrent_submit_is_refused() {
        let session = shared();
        let slow = SimulatedAnalysis::new(Duration::from_millis(200));

        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move {
                submit_draft(&session, slow, draft("first", Some(CategoryId::Family))).await
            })
        };
        // Let the first submission reach its delay.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let second = submit_draft(&session, slow, draft("second", Some(CategoryId::Social)))
            .await
            .expect("submit");
        assert_eq!(second, SubmitOutcome::InProgress);

        let first = first.await.expect("join").expect("submit");
        assert!(matches!(first, SubmitOutcome::Resolved(ref r) if r.text == "first"));
    }

    #[tokio::test]
    async fn abandoned_submit_still_completes() {
        let session = shared();
        let slow = SimulatedAnalysis::new(Duration::from_millis(200));

        let abandoned = tokio::time::timeout(
            Duration::from_millis(20),
            submit_draft(&session, slow, draft("first", Some(CategoryId::Work))),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;
        {
            let session = session.read().await;
            assert_eq!(session.flow().state(), FlowState::Resolved);
            let stored = session.current_input().expect("get").expect("record");
            assert_eq!(stored.text, "first");
        }

        let second = submit_draft(
            &session,
            SimulatedAnalysis::new(Duration::ZERO),
            draft("second", Some(CategoryId::Social)),
        )
        .await
        .expect("submit");
        assert!(matches!(second, SubmitOutcome::Resolved(ref r) if r.text == "second"));
    }

    #[tokio::test]
    async fn oversized_text_reports_its_length() {
        let session = shared();
        let text = "a".repeat(MAX_SUBMISSION_TEXT_LENGTH + 1);

        let outcome = submit_draft(
            &session,
            SimulatedAnalysis::new(Duration::ZERO),
            draft(&text, Some(CategoryId::Work)),
        )
        .await
        .expect("submit");
        assert_eq!(outcome, SubmitOutcome::TooLong(MAX_SUBMISSION_TEXT_LENGTH + 1));
        assert_eq!(session.read().await.flow().state(), FlowState::Editing);
    }
}
