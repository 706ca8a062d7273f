//! # Category Registry
//!
//! Static enumeration of concern categories with display metadata.

use crate::CategoryId;
use serde::Serialize;

/// A concern category as shown on the input screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub display_name: &'static str,
    pub description: &'static str,
}

const CATEGORIES: [Category; 7] = [
    Category {
        id: CategoryId::Relationships,
        display_name: "Relationships",
        description: "Romantic conflicts, trust, communication",
    },
    Category {
        id: CategoryId::Family,
        display_name: "Family Issues",
        description: "Parenting stress, sibling rivalry, financial burdens",
    },
    Category {
        id: CategoryId::Work,
        display_name: "Work & Career",
        description: "Job stress, burnout, work-life balance",
    },
    Category {
        id: CategoryId::Financial,
        display_name: "Financial Stress",
        description: "Debt, unemployment, budgeting",
    },
    Category {
        id: CategoryId::Personal,
        display_name: "Personal Growth",
        description: "Self-esteem, motivation, identity struggles",
    },
    Category {
        id: CategoryId::Social,
        display_name: "Social Pressures",
        description: "Peer pressure, stigma, isolation",
    },
    Category {
        id: CategoryId::Health,
        display_name: "Health & Lifestyle",
        description: "Chronic illness, sleep, substance use",
    },
];

/// All categories in display order.
#[must_use]
pub fn list_categories() -> &'static [Category] {
    &CATEGORIES
}

/// Metadata for a single category.
#[must_use]
pub fn category(id: CategoryId) -> &'static Category {
    // CATEGORIES is declared in CategoryId discriminant order.
    &CATEGORIES[id as usize]
}
