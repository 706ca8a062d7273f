//! # Solution Resolver
//!
//! Capability that turns a submission into a plan. The shipped resolver looks
//! the submitted category up in the catalog and ignores the text. Another
//! resolver can be injected into the [`Session`](crate::Session) without
//! touching the flow.

use crate::catalog::{SolutionCatalog, SolutionPlan};
use crate::submission::SubmissionRecord;
use std::fmt;

/// Resolves a submission into the plan shown on the Solutions view.
pub trait SolutionResolver: Send + Sync + fmt::Debug {
    fn resolve(&self, record: &SubmissionRecord) -> SolutionPlan;
}

/// Resolver backed by a static [`SolutionCatalog`].
#[derive(Debug, Clone, Copy)]
pub struct CatalogResolver {
    catalog: &'static SolutionCatalog,
}

impl CatalogResolver {
    #[must_use]
    pub fn new(catalog: &'static SolutionCatalog) -> Self {
        Self { catalog }
    }
}

impl Default for CatalogResolver {
    fn default() -> Self {
        Self::new(SolutionCatalog::builtin())
    }
}

impl SolutionResolver for CatalogResolver {
    fn resolve(&self, record: &SubmissionRecord) -> SolutionPlan {
        self.catalog.plan_for(record.category_id).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CategoryId;
    use chrono::Utc;

    #[test]
    fn resolves_by_submitted_category() {
        let record = SubmissionRecord {
            text: "I feel overwhelmed".to_string(),
            category_id: CategoryId::Work,
            timestamp: Utc::now(),
        };
        let plan = CatalogResolver::default().resolve(&record);
        assert_eq!(plan.title, "Managing Work Stress");
        assert_eq!(plan.estimated_time, "2-4 weeks");
    }
}
