#![allow(clippy::unwrap_used, clippy::panic)]

//! # End-to-End Scenarios
//!
//! User journeys through the core, from sign-in to a completed checklist.

use chrono::Utc;
use mikecare_core::journal::{self, CategoryFilter};
use mikecare_core::{
    CareError, CategoryId, FlowState, KeyValueStore, Language, OnboardingResponses, Screen,
    Session, SolutionCatalog, SolutionsView, StepId, StoreKey, SubmissionRecord, User, View,
};

fn signed_in() -> Session {
    let mut session = Session::new();
    session
        .login(User {
            id: Some(serde_json::json!(1)),
            name: Some("Amani".to_string()),
            email: "amani@example.com".to_string(),
            is_admin: false,
        })
        .expect("login");
    session
        .complete_onboarding(Language::English, &OnboardingResponses::new())
        .expect("onboard");
    session
}

// =============================================================================
// CATALOG
// =============================================================================

mod catalog {
    use super::*;

    #[test]
    fn every_category_has_steps() {
        for id in CategoryId::ALL {
            let plan = SolutionCatalog::builtin().plan_for(id);
            assert!(plan.total_steps() > 0, "{} has no steps", id);
            assert!(!plan.immediate_steps.is_empty());
            assert!(plan.healing_plan.iter().any(|w| !w.tasks.is_empty()));
        }
    }

    #[test]
    fn unknown_key_falls_back_to_default() {
        let catalog = SolutionCatalog::builtin();
        assert!(catalog.lookup("astrology").is_none());
        assert_eq!(catalog.resolve("astrology"), catalog.default_plan());
    }
}

// =============================================================================
// SUBMISSION → SOLUTIONS
// =============================================================================

mod submission {
    use super::*;

    #[test]
    fn work_submission_resolves_to_work_plan() {
        let mut session = signed_in();
        session.open_input().expect("open input");
        session.flow_mut().set_text("I feel overwhelmed");
        session.flow_mut().select_category(CategoryId::Work);

        let ticket = session.begin_submit().expect("ticket");
        assert_eq!(session.flow().state(), FlowState::Submitting);
        session.complete_submit(ticket, Utc::now()).expect("complete");

        let stored: SubmissionRecord = session
            .backend()
            .get_json(StoreKey::CurrentInput)
            .expect("get")
            .expect("present");
        assert_eq!(stored.text, "I feel overwhelmed");

        match session.open_solutions().expect("open") {
            SolutionsView::Ready(plan) => {
                assert_eq!(plan.title, "Managing Work Stress");
                assert_eq!(plan.estimated_time, "2-4 weeks");
            }
            SolutionsView::RedirectHome => unreachable!("a record was stored"),
        }
    }

    #[test]
    fn empty_text_writes_nothing() {
        let mut session = signed_in();
        session.flow_mut().set_text("");
        session.flow_mut().select_category(CategoryId::Work);

        assert!(session.begin_submit().is_none());
        assert_eq!(session.flow().state(), FlowState::Editing);
        assert!(session.current_input().expect("get").is_none());
    }

    #[test]
    fn new_submission_replaces_cached_plan() {
        let mut session = signed_in();
        for (text, category) in [("deadlines", CategoryId::Work), ("my partner", CategoryId::Relationships)] {
            session.open_input().expect("open input");
            session.flow_mut().set_text(text);
            session.flow_mut().select_category(category);
            let ticket = session.begin_submit().expect("ticket");
            session.complete_submit(ticket, Utc::now()).expect("complete");
        }
        let view = session.open_solutions().expect("open");
        assert!(matches!(
            view,
            SolutionsView::Ready(ref plan) if plan.title == "Building Healthy Relationships"
        ));
    }

    #[test]
    fn checklist_reaches_full_completion() {
        let mut session = signed_in();
        session.flow_mut().set_text("always tired");
        session.flow_mut().select_category(CategoryId::Health);
        let ticket = session.begin_submit().expect("ticket");
        session.complete_submit(ticket, Utc::now()).expect("complete");
        session.open_solutions().expect("open");

        let steps = session
            .mounted_plan()
            .map(mikecare_core::progress::plan_steps)
            .expect("mounted");
        for step in steps {
            session.toggle_step(step).expect("toggle");
        }
        let completion = session.completion().expect("completion");
        assert_eq!(completion.percent, 100);
        assert_eq!(session.completion_ratio(), 1.0);
    }

    #[test]
    fn malformed_step_id_is_rejected() {
        assert!(matches!(
            "week-one".parse::<StepId>(),
            Err(CareError::InvalidStepId(_))
        ));
    }
}

// =============================================================================
// JOURNAL
// =============================================================================

mod journal_filter {
    use super::*;

    #[test]
    fn stress_search_finds_tagged_entry() {
        let matched = journal::filter(journal::sample_entries(), "stress", CategoryFilter::All);
        assert_eq!(matched.len(), 1);
        assert!(matched[0].tags.contains("stress"));
    }

    #[test]
    fn category_filter_is_exact() {
        let filter: CategoryFilter = "relationships".parse().expect("parse");
        let matched = journal::filter(journal::sample_entries(), "", filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].category, CategoryId::Relationships);
    }
}

// =============================================================================
// ROUTING
// =============================================================================

mod routing {
    use super::*;

    #[test]
    fn fresh_session_lands_on_login() {
        assert_eq!(Session::new().screen_for("/"), Screen::Login);
    }

    #[test]
    fn onboarded_session_routes_unknown_to_dashboard() {
        let session = signed_in();
        assert_eq!(session.screen_for("#/settings"), Screen::View(View::Dashboard));
        assert_eq!(session.screen_for("/profile"), Screen::View(View::Profile));
    }
}
