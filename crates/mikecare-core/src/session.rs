//! # Session Module
//!
//! Application state for the single logical user, combining the durable
//! store with the volatile per-view state.
//!
//! Durable (survives restart through the store):
//! - signed-in user, onboarding flag, language, questionnaire answers
//! - the latest submission and the plan resolved for it
//!
//! Volatile (lives only as long as the `Session`):
//! - the submission flow of the input screen
//! - the mounted plan and its step progress
//!
//! ## Storage Backends
//!
//! - `InMemory`: [`MemoryStore`], nothing survives the process
//! - `Persistent`: [`RedbStore`], disk-backed ACID storage

use crate::auth::User;
use crate::catalog::SolutionPlan;
use crate::primitives::ONBOARDING_COMPLETED;
use crate::progress::{Completion, StepProgress, completion_ratio, validate_step};
use crate::resolver::{CatalogResolver, SolutionResolver};
use crate::routing::{Screen, View};
use crate::storage::{KeyValueStore, MemoryStore, RedbStore, StoreKey};
use crate::submission::{SubmissionFlow, SubmissionRecord, SubmitTicket};
use crate::{CareError, StepId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Storage backend for a Session.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory map (fast, volatile).
    InMemory(MemoryStore),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryStore::new())
    }
}

impl StorageBackend {
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self, StorageBackend::Persistent(_))
    }
}

impl KeyValueStore for StorageBackend {
    fn get(&self, key: StoreKey) -> Result<Option<String>, CareError> {
        match self {
            StorageBackend::InMemory(store) => store.get(key),
            StorageBackend::Persistent(store) => store.get(key),
        }
    }

    fn set(&mut self, key: StoreKey, value: &str) -> Result<(), CareError> {
        match self {
            StorageBackend::InMemory(store) => store.set(key, value),
            StorageBackend::Persistent(store) => store.set(key, value),
        }
    }

    fn remove(&mut self, key: StoreKey) -> Result<(), CareError> {
        match self {
            StorageBackend::InMemory(store) => store.remove(key),
            StorageBackend::Persistent(store) => store.remove(key),
        }
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Preferred interface language chosen during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Swahili,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Swahili => "swahili",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "english" => Ok(Language::English),
            "swahili" => Ok(Language::Swahili),
            other => Err(CareError::DeserializationError(format!(
                "unknown language: {}",
                other
            ))),
        }
    }
}

/// Questionnaire answers keyed by question id.
pub type OnboardingResponses = BTreeMap<String, serde_json::Value>;

/// The durable part of the session, as restored on start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub user: Option<User>,
    pub onboarding_complete: bool,
    pub language: Language,
}

impl AppState {
    /// Restore state from a store.
    ///
    /// Any non-empty onboarding flag counts as completed. An unrecognised
    /// language value falls back to the default; a corrupt user record is an
    /// error.
    pub fn load<S: KeyValueStore>(store: &S) -> Result<Self, CareError> {
        let user = store.get_json::<User>(StoreKey::User)?;
        let onboarding_complete = store
            .get(StoreKey::Onboarding)?
            .is_some_and(|flag| !flag.is_empty());
        let language = store
            .get(StoreKey::Language)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        Ok(Self {
            user,
            onboarding_complete,
            language,
        })
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }
}

/// Outcome of mounting the Solutions view.
#[derive(Debug, Clone, PartialEq)]
pub enum SolutionsView {
    Ready(Box<SolutionPlan>),
    /// Nothing was submitted yet; go back to the dashboard.
    RedirectHome,
}

// =============================================================================
// SESSION
// =============================================================================

/// Load-on-start, persist-on-change application state.
///
/// Note: Session does NOT implement Clone; the redb handle cannot be shared.
#[derive(Debug)]
pub struct Session {
    backend: StorageBackend,
    state: AppState,
    flow: SubmissionFlow,
    mounted: Option<SolutionPlan>,
    progress: StepProgress,
    resolver: Arc<dyn SolutionResolver>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a fresh session with in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::assemble(StorageBackend::default(), AppState::default())
    }

    /// Open a session over a redb database, restoring saved state.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, CareError> {
        Self::with_backend(StorageBackend::Persistent(RedbStore::open(path)?))
    }

    /// Open a session over an existing backend, restoring saved state.
    pub fn with_backend(backend: StorageBackend) -> Result<Self, CareError> {
        let state = AppState::load(&backend)?;
        Ok(Self::assemble(backend, state))
    }

    /// Replace the resolver used when mounting the Solutions view.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn SolutionResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    fn assemble(backend: StorageBackend, state: AppState) -> Self {
        Self {
            backend,
            state,
            flow: SubmissionFlow::new(),
            mounted: None,
            progress: StepProgress::new(),
            resolver: Arc::new(CatalogResolver::default()),
        }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    #[must_use]
    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut StorageBackend {
        &mut self.backend
    }

    // -------------------------------------------------------------------------
    // Authentication & onboarding
    // -------------------------------------------------------------------------

    /// Persist the signed-in user.
    pub fn login(&mut self, user: User) -> Result<(), CareError> {
        self.backend.set_json(StoreKey::User, &user)?;
        self.state.user = Some(user);
        Ok(())
    }

    /// Forget the signed-in user. Onboarding and language are kept.
    pub fn logout(&mut self) -> Result<(), CareError> {
        self.backend.remove(StoreKey::User)?;
        self.state.user = None;
        self.close_solutions();
        Ok(())
    }

    /// Persist language, answers and the completion flag.
    pub fn complete_onboarding(
        &mut self,
        language: Language,
        responses: &OnboardingResponses,
    ) -> Result<(), CareError> {
        self.backend.set(StoreKey::Language, language.as_str())?;
        self.backend.set_json(StoreKey::Responses, responses)?;
        self.backend.set(StoreKey::Onboarding, ONBOARDING_COMPLETED)?;
        self.state.language = language;
        self.state.onboarding_complete = true;
        Ok(())
    }

    /// Saved questionnaire answers (empty before onboarding).
    pub fn responses(&self) -> Result<OnboardingResponses, CareError> {
        Ok(self
            .backend
            .get_json(StoreKey::Responses)?
            .unwrap_or_default())
    }

    /// Gate a requested path: login first, then onboarding, then the view.
    #[must_use]
    pub fn screen_for(&self, path: &str) -> Screen {
        if !self.state.is_authenticated() {
            return Screen::Login;
        }
        if !self.state.onboarding_complete {
            return Screen::Onboarding;
        }
        let view = View::route(path);
        if view.requires_admin() && !self.state.is_admin() {
            return Screen::AccessDenied;
        }
        Screen::View(view)
    }

    // -------------------------------------------------------------------------
    // Input screen
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn flow(&self) -> &SubmissionFlow {
        &self.flow
    }

    pub fn flow_mut(&mut self) -> &mut SubmissionFlow {
        &mut self.flow
    }

    /// Navigate to the input screen with an empty draft.
    ///
    /// Refused while a submission is in flight.
    pub fn open_input(&mut self) -> Result<(), CareError> {
        if self.flow.state() == crate::FlowState::Submitting {
            return Err(CareError::SubmissionInProgress);
        }
        self.flow = SubmissionFlow::new();
        self.close_solutions();
        Ok(())
    }

    /// Press submit on the current draft. See [`SubmissionFlow::begin_submit`].
    pub fn begin_submit(&mut self) -> Option<SubmitTicket> {
        self.flow.begin_submit()
    }

    /// Redeem a ticket once the analysis delay has elapsed.
    pub fn complete_submit(
        &mut self,
        ticket: SubmitTicket,
        now: DateTime<Utc>,
    ) -> Result<SubmissionRecord, CareError> {
        self.flow.complete(ticket, now, &mut self.backend)
    }

    /// The latest stored submission, if any.
    pub fn current_input(&self) -> Result<Option<SubmissionRecord>, CareError> {
        self.backend.get_json(StoreKey::CurrentInput)
    }

    // -------------------------------------------------------------------------
    // Solutions view
    // -------------------------------------------------------------------------

    /// Mount the Solutions view.
    ///
    /// Prefers a stored plan; otherwise resolves the stored submission and
    /// stores the result. Progress starts empty on every mount.
    pub fn open_solutions(&mut self) -> Result<SolutionsView, CareError> {
        self.close_solutions();

        let plan = match self.backend.get_json::<SolutionPlan>(StoreKey::CurrentSolution)? {
            Some(plan) => plan,
            None => match self.current_input()? {
                Some(record) => {
                    let plan = self.resolver.resolve(&record);
                    self.backend.set_json(StoreKey::CurrentSolution, &plan)?;
                    plan
                }
                None => return Ok(SolutionsView::RedirectHome),
            },
        };

        self.mounted = Some(plan.clone());
        Ok(SolutionsView::Ready(Box::new(plan)))
    }

    /// Unmount the Solutions view, discarding progress.
    pub fn close_solutions(&mut self) {
        self.mounted = None;
        self.progress.clear();
    }

    #[must_use]
    pub fn mounted_plan(&self) -> Option<&SolutionPlan> {
        self.mounted.as_ref()
    }

    /// Toggle a checklist item of the mounted plan.
    ///
    /// Returns `true` if the step is now completed.
    pub fn toggle_step(&mut self, step: StepId) -> Result<bool, CareError> {
        let plan = self
            .mounted
            .as_ref()
            .ok_or(CareError::UnknownStep(step))?;
        let step = validate_step(plan, step)?;
        Ok(self.progress.toggle(step))
    }

    #[must_use]
    pub fn progress(&self) -> &StepProgress {
        &self.progress
    }

    /// Completion summary for the mounted plan.
    #[must_use]
    pub fn completion(&self) -> Option<Completion> {
        self.mounted
            .as_ref()
            .map(|plan| Completion::for_plan(&self.progress, plan))
    }

    /// Completion ratio for the mounted plan; `0.0` when nothing is mounted.
    #[must_use]
    pub fn completion_ratio(&self) -> f64 {
        let total = self.mounted.as_ref().map_or(0, SolutionPlan::total_steps);
        completion_ratio(&self.progress, total)
    }
}

// =============================================================================
// TESTS
// =============================================================================
