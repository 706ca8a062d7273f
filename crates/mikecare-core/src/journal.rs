//! # Journal Store
//!
//! Read-only sample journal entries plus the search/category filter used by
//! the journal view.
//!
//! Filtering is a stable subsequence: entries keep their original relative
//! order, nothing is sorted.

use crate::primitives::{ALL_CATEGORIES, JOURNAL_EMPTY_MESSAGE, JOURNAL_NO_MATCHES_MESSAGE};
use crate::{CareError, CategoryId, Mood};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// A journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: u32,
    pub date: NaiveDate,
    pub mood: Mood,
    pub category: CategoryId,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    /// Titles of solution plans linked to this entry.
    pub solutions: Vec<String>,
    pub tags: BTreeSet<String>,
}

impl JournalEntry {
    /// Case-insensitive substring match over title, content, and tags.
    ///
    /// `needle` must already be lowercased.
    fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }
}

// =============================================================================
// CATEGORY FILTER
// =============================================================================

/// Category filter for the journal view: the `all` sentinel or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(CategoryId),
}

impl CategoryFilter {
    /// Filter tabs offered by the journal view, in display order.
    pub const TABS: [CategoryFilter; 5] = [
        CategoryFilter::All,
        CategoryFilter::Only(CategoryId::Work),
        CategoryFilter::Only(CategoryId::Relationships),
        CategoryFilter::Only(CategoryId::Family),
        CategoryFilter::Only(CategoryId::Personal),
    ];

    #[must_use]
    pub fn matches(self, category: CategoryId) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Only(id) => f.write_str(id.as_str()),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_CATEGORIES {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

// =============================================================================
// FILTERING
// =============================================================================

/// Entries matching both the search term and the category filter.
///
/// An empty search term matches every entry.
#[must_use]
pub fn filter<'a>(
    entries: &'a [JournalEntry],
    search_term: &str,
    category: CategoryFilter,
) -> Vec<&'a JournalEntry> {
    let needle = search_term.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.matches_search(&needle) && category.matches(entry.category))
        .collect()
}

/// Message shown when [`filter`] returns nothing.
#[must_use]
pub fn empty_state_message(search_term: &str, category: CategoryFilter) -> &'static str {
    if !search_term.is_empty() || category != CategoryFilter::All {
        JOURNAL_NO_MATCHES_MESSAGE
    } else {
        JOURNAL_EMPTY_MESSAGE
    }
}

// =============================================================================
// SAMPLE ENTRIES
// =============================================================================

static SAMPLES: LazyLock<Vec<JournalEntry>> = LazyLock::new(build_samples);

/// The shipped sample entries, newest first.
#[must_use]
pub fn sample_entries() -> &'static [JournalEntry] {
    &SAMPLES
}

fn sample(
    id: u32,
    (year, month, day): (i32, u32, u32),
    mood: Mood,
    category: CategoryId,
    text: [&str; 3],
    solution: &str,
    tags: [&str; 3],
) -> Option<JournalEntry> {
    let [title, excerpt, content] = text;
    Some(JournalEntry {
        id,
        date: NaiveDate::from_ymd_opt(year, month, day)?,
        mood,
        category,
        title: title.to_string(),
        excerpt: excerpt.to_string(),
        content: content.to_string(),
        solutions: vec![solution.to_string()],
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
    })
}

fn build_samples() -> Vec<JournalEntry> {
    let (Ok(good), Ok(okay), Ok(great)) = (Mood::new(4), Mood::new(3), Mood::new(5)) else {
        return Vec::new();
    };
    [
        sample(
            1,
            (2024, 1, 15),
            good,
            CategoryId::Work,
            [
                "Feeling overwhelmed at work",
                "Had a really challenging day with multiple deadlines...",
                "Had a really challenging day with multiple deadlines. The new project \
                 requirements keep changing and I feel like I'm constantly playing catch-up. \
                 Need to find better ways to manage my stress.",
            ],
            "Managing Work Stress",
            ["stress", "deadlines", "overwhelmed"],
        ),
        sample(
            2,
            (2024, 1, 14),
            okay,
            CategoryId::Relationships,
            [
                "Communication issues with partner",
                "We had another misunderstanding today...",
                "We had another misunderstanding today about household responsibilities. \
                 I feel like we're not really hearing each other. Maybe we need to set aside \
                 dedicated time to talk.",
            ],
            "Building Healthy Relationships",
            ["communication", "relationships", "misunderstanding"],
        ),
        sample(
            3,
            (2024, 1, 13),
            great,
            CategoryId::Personal,
            [
                "Great progress on my goals",
                "Feeling really good about the steps I've taken...",
                "Feeling really good about the steps I've taken this week. Completed my \
                 morning routine consistently and started reading that book I've been \
                 meaning to get to.",
            ],
            "Personal Growth & Self-Esteem",
            ["progress", "goals", "routine"],
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

// =============================================================================
// TESTS
// =============================================================================
