//! # Solution Catalog
//!
//! Static mapping from category to a solution plan.
//!
//! The catalog is built once per process and never mutated. Lookups come in
//! two flavours:
//!
//! - [`SolutionCatalog::plan_for`] takes a [`CategoryId`] and cannot miss:
//!   the catalog stores exactly one plan per variant.
//! - [`SolutionCatalog::resolve`] takes a raw string key and substitutes the
//!   default plan for unknown keys. Use [`SolutionCatalog::lookup`] first when
//!   the caller needs to know that the fallback happened.

use crate::registry;
use crate::CategoryId;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// =============================================================================
// PLAN RECORDS
// =============================================================================

/// Kind of a recommended resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Book,
    Video,
    Helpline,
}

/// A book, video, or support line recommended alongside a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// One week of the healing plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBlock {
    #[serde(alias = "weekNumber")]
    pub week: u32,
    pub title: String,
    pub tasks: Vec<String>,
}

/// The bundle returned for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionPlan {
    pub title: String,
    pub description: String,
    pub estimated_time: String,
    /// Display name of the category, shown as a badge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub immediate_steps: Vec<String>,
    #[serde(default)]
    pub healing_plan: Vec<WeekBlock>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl SolutionPlan {
    /// Immediate steps plus every healing plan task.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.immediate_steps.len()
            + self
                .healing_plan
                .iter()
                .map(|week| week.tasks.len())
                .sum::<usize>()
    }
}

// =============================================================================
// CATALOG
// =============================================================================

static BUILTIN: LazyLock<SolutionCatalog> = LazyLock::new(SolutionCatalog::builtin_content);

/// Immutable category → plan mapping with a designated default plan.
#[derive(Debug, Clone)]
pub struct SolutionCatalog {
    /// One plan per category, indexed by `CategoryId` discriminant.
    plans: [SolutionPlan; 7],
    default_plan: SolutionPlan,
}

impl SolutionCatalog {
    /// The shipped catalog, built on first use.
    #[must_use]
    pub fn builtin() -> &'static SolutionCatalog {
        &BUILTIN
    }

    /// Build a catalog from a per-category plan builder.
    pub fn from_fn(build: impl FnMut(CategoryId) -> SolutionPlan, default_plan: SolutionPlan) -> Self {
        Self {
            plans: CategoryId::ALL.map(build),
            default_plan,
        }
    }

    /// Plan for a known category.
    #[must_use]
    pub fn plan_for(&self, id: CategoryId) -> &SolutionPlan {
        &self.plans[id as usize]
    }

    /// Strict lookup by raw key. `None` for keys outside the registry.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&SolutionPlan> {
        key.parse::<CategoryId>().ok().map(|id| self.plan_for(id))
    }

    /// Lookup by raw key, falling back to the default plan.
    #[must_use]
    pub fn resolve(&self, key: &str) -> &SolutionPlan {
        self.lookup(key).unwrap_or(&self.default_plan)
    }

    /// The plan served for unknown keys.
    #[must_use]
    pub fn default_plan(&self) -> &SolutionPlan {
        &self.default_plan
    }

    fn builtin_content() -> Self {
        Self::from_fn(builtin_plan, default_plan())
    }
}

// =============================================================================
// SHIPPED CONTENT
// =============================================================================

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn weeks(blocks: &[(u32, &str, &[&str])]) -> Vec<WeekBlock> {
    blocks
        .iter()
        .map(|(week, title, tasks)| WeekBlock {
            week: *week,
            title: (*title).to_string(),
            tasks: strings(tasks),
        })
        .collect()
}

fn resource(kind: ResourceKind, title: &str, description: &str, contact: Option<&str>) -> Resource {
    Resource {
        kind,
        title: title.to_string(),
        description: description.to_string(),
        contact: contact.map(str::to_string),
        link: None,
    }
}

fn crisis_line() -> Resource {
    resource(
        ResourceKind::Helpline,
        "Crisis Support Line",
        "Free, confidential support from a trained counsellor, any time of day",
        Some("Call or text your local emergency or crisis number"),
    )
}

fn builtin_plan(id: CategoryId) -> SolutionPlan {
    let badge = Some(registry::category(id).display_name.to_string());
    match id {
        CategoryId::Work => SolutionPlan {
            title: "Managing Work Stress".to_string(),
            description: "Breathing exercises and time management techniques to bring \
                          your workload back under control"
                .to_string(),
            estimated_time: "2-4 weeks".to_string(),
            category: badge,
            immediate_steps: strings(&[
                "Take five slow breaths: in for 4 counts, hold for 4, out for 6",
                "Write down every task on your mind, then circle the three that matter today",
                "Step away from your screen for a 10 minute walk",
                "Tell one colleague or your manager which deadline worries you most",
            ]),
            healing_plan: weeks(&[
                (
                    1,
                    "Understand your stress",
                    &[
                        "Keep a short stress log after each work day",
                        "Note which meetings or tasks drain you the most",
                        "Set a fixed time to stop checking work messages",
                    ],
                ),
                (
                    2,
                    "Take back your time",
                    &[
                        "Block two focus sessions in your calendar each day",
                        "Break your biggest project into steps under one hour",
                        "Practice saying no to one non-essential request",
                    ],
                ),
                (
                    3,
                    "Build recovery habits",
                    &[
                        "Add a 5 minute breathing break before lunch",
                        "Plan one restful activity for each weekend day",
                        "Review your stress log and compare it with week one",
                    ],
                ),
                (
                    4,
                    "Sustain the balance",
                    &[
                        "Agree on realistic priorities with your manager",
                        "Keep the routines that helped and drop the ones that did not",
                    ],
                ),
            ]),
            resources: vec![
                resource(
                    ResourceKind::Book,
                    "Burnout: The Secret to Unlocking the Stress Cycle",
                    "Emily and Amelia Nagoski on completing the stress response",
                    None,
                ),
                resource(
                    ResourceKind::Video,
                    "Box Breathing in Five Minutes",
                    "A guided breathing exercise for busy work days",
                    None,
                ),
                crisis_line(),
            ],
        },
        CategoryId::Relationships => SolutionPlan {
            title: "Building Healthy Relationships".to_string(),
            description: "Communication tools for rebuilding trust and understanding \
                          with your partner"
                .to_string(),
            estimated_time: "3-6 weeks".to_string(),
            category: badge,
            immediate_steps: strings(&[
                "Pause the conversation and agree on a time to continue it",
                "Write down what you need, using \"I feel\" rather than \"you always\"",
                "Do something calming on your own for 20 minutes",
            ]),
            healing_plan: weeks(&[
                (
                    1,
                    "Listen first",
                    &[
                        "Schedule a 20 minute check-in with your partner",
                        "Repeat back what you heard before responding",
                        "Share one thing you appreciate each day",
                    ],
                ),
                (
                    2,
                    "Share responsibilities",
                    &[
                        "List household tasks together and split them fairly",
                        "Agree on how to raise a concern without blame",
                    ],
                ),
                (
                    3,
                    "Reconnect",
                    &[
                        "Plan one shared activity you both enjoy",
                        "Talk about one goal you have as a couple",
                        "Reflect together on what has improved",
                    ],
                ),
            ]),
            resources: vec![
                resource(
                    ResourceKind::Book,
                    "Hold Me Tight",
                    "Sue Johnson's conversations for lasting connection",
                    None,
                ),
                resource(
                    ResourceKind::Video,
                    "Active Listening for Couples",
                    "Short exercises for hearing each other without interrupting",
                    None,
                ),
                resource(
                    ResourceKind::Helpline,
                    "Relationship Counselling Service",
                    "Talk to a counsellor about communication or trust issues",
                    Some("Ask your clinic for a referral to a couples counsellor"),
                ),
            ],
        },
        CategoryId::Family => SolutionPlan {
            title: "Navigating Family Challenges".to_string(),
            description: "Ways to ease parenting stress and share family burdens more evenly"
                .to_string(),
            estimated_time: "4-6 weeks".to_string(),
            category: badge,
            immediate_steps: strings(&[
                "Step outside or into another room for a few minutes to reset",
                "Name the one family situation weighing on you most right now",
                "Reach out to one relative or friend you trust",
            ]),
            healing_plan: weeks(&[
                (
                    1,
                    "Map the pressure points",
                    &[
                        "Write down recurring conflicts and when they happen",
                        "Notice which responsibilities fall only on you",
                    ],
                ),
                (
                    2,
                    "Open the conversation",
                    &[
                        "Hold a calm family meeting at a set time",
                        "Let each person share one need without interruption",
                        "Agree on one small change to try this week",
                    ],
                ),
                (
                    3,
                    "Share the load",
                    &[
                        "Create a simple rota for chores and childcare",
                        "Discuss money worries openly with the adults involved",
                    ],
                ),
                (
                    4,
                    "Protect time together",
                    &[
                        "Plan one low-cost family activity",
                        "Set aside time for yourself without guilt",
                    ],
                ),
            ]),
            resources: vec![
                resource(
                    ResourceKind::Book,
                    "How to Talk So Kids Will Listen & Listen So Kids Will Talk",
                    "Adele Faber and Elaine Mazlish on everyday family communication",
                    None,
                ),
                resource(
                    ResourceKind::Video,
                    "Calm Parenting Basics",
                    "Techniques for staying steady during family conflict",
                    None,
                ),
                crisis_line(),
            ],
        },
        CategoryId::Financial => SolutionPlan {
            title: "Regaining Financial Control".to_string(),
            description: "Practical budgeting and debt steps to reduce money anxiety".to_string(),
            estimated_time: "4-8 weeks".to_string(),
            category: badge,
            immediate_steps: strings(&[
                "Write down exactly how much money you have available today",
                "List your bills in order of due date",
                "Pause any non-essential spending for the next 7 days",
                "Take a few slow breaths before opening any financial mail",
            ]),
            healing_plan: weeks(&[
                (
                    1,
                    "Know your numbers",
                    &[
                        "Track every expense for seven days",
                        "Total your monthly income and fixed costs",
                        "List each debt with its balance and interest rate",
                    ],
                ),
                (
                    2,
                    "Build a simple budget",
                    &[
                        "Set spending limits for food, transport and household",
                        "Choose one expense to cut or renegotiate",
                    ],
                ),
                (
                    3,
                    "Tackle debt",
                    &[
                        "Contact one creditor to discuss a payment plan",
                        "Pick a repayment method and commit to it",
                    ],
                ),
                (
                    4,
                    "Plan ahead",
                    &[
                        "Start a small emergency fund, even a little each week",
                        "Explore one new income or skills opportunity",
                    ],
                ),
            ]),
            resources: vec![
                resource(
                    ResourceKind::Book,
                    "The Total Money Makeover",
                    "Dave Ramsey's step-by-step approach to getting out of debt",
                    None,
                ),
                resource(
                    ResourceKind::Video,
                    "Budgeting for Beginners",
                    "Setting up a first monthly budget",
                    None,
                ),
                resource(
                    ResourceKind::Helpline,
                    "Free Debt Advice",
                    "Independent, no-cost guidance on managing debt",
                    Some("Contact a non-profit debt advice service near you"),
                ),
            ],
        },
        CategoryId::Personal => SolutionPlan {
            title: "Personal Growth & Self-Esteem".to_string(),
            description: "Daily affirmations and goal-setting strategies to build confidence"
                .to_string(),
            estimated_time: "4-6 weeks".to_string(),
            category: badge,
            immediate_steps: strings(&[
                "Write down three things you did well this week",
                "Replace one self-critical thought with a kinder one",
                "Choose one small task you can finish today",
            ]),
            healing_plan: weeks(&[
                (
                    1,
                    "Notice your inner voice",
                    &[
                        "Record negative self-talk when it appears",
                        "Start each morning with one affirmation",
                    ],
                ),
                (
                    2,
                    "Set meaningful goals",
                    &[
                        "Pick one goal for the next month",
                        "Break it into weekly milestones",
                        "Share the goal with someone supportive",
                    ],
                ),
                (
                    3,
                    "Build a routine",
                    &[
                        "Keep a consistent morning routine for five days",
                        "Read for 15 minutes each evening",
                    ],
                ),
                (
                    4,
                    "Celebrate progress",
                    &[
                        "Review what you achieved since week one",
                        "Reward yourself for one milestone",
                    ],
                ),
            ]),
            resources: vec![
                resource(
                    ResourceKind::Book,
                    "The Six Pillars of Self-Esteem",
                    "Nathaniel Branden on the practices behind self-worth",
                    None,
                ),
                resource(
                    ResourceKind::Video,
                    "Goal Setting That Sticks",
                    "Turning big goals into small daily actions",
                    None,
                ),
                crisis_line(),
            ],
        },
        CategoryId::Social => SolutionPlan {
            title: "Handling Social Pressure".to_string(),
            description: "Boundaries and connection strategies for peer pressure, stigma \
                          and isolation"
                .to_string(),
            estimated_time: "3-5 weeks".to_string(),
            category: badge,
            immediate_steps: strings(&[
                "Remind yourself that it is okay to say no",
                "Message one person who makes you feel accepted",
                "Take a short break from social media today",
            ]),
            healing_plan: weeks(&[
                (
                    1,
                    "Recognise the pressure",
                    &[
                        "Note situations where you felt pushed to act against your values",
                        "Write down the values that matter most to you",
                    ],
                ),
                (
                    2,
                    "Practice boundaries",
                    &[
                        "Rehearse a simple, polite way to decline",
                        "Use it once in a low-stakes situation",
                    ],
                ),
                (
                    3,
                    "Find your people",
                    &[
                        "Join one group or activity built around an interest",
                        "Spend time with someone who supports you",
                        "Reflect on how your confidence has changed",
                    ],
                ),
            ]),
            resources: vec![
                resource(
                    ResourceKind::Book,
                    "The Courage to Be Disliked",
                    "Ichiro Kishimi and Fumitake Koga on freedom from others' expectations",
                    None,
                ),
                resource(
                    ResourceKind::Video,
                    "Setting Boundaries with Friends",
                    "Saying no without losing connection",
                    None,
                ),
                crisis_line(),
            ],
        },
        CategoryId::Health => SolutionPlan {
            title: "Healthy Lifestyle Reset".to_string(),
            description: "Small, steady changes to sleep, movement and daily habits".to_string(),
            estimated_time: "4-8 weeks".to_string(),
            category: badge,
            immediate_steps: strings(&[
                "Drink a glass of water",
                "Take a gentle 10 minute walk or stretch",
                "Put screens away 30 minutes before bed tonight",
            ]),
            healing_plan: weeks(&[
                (
                    1,
                    "Sleep foundations",
                    &[
                        "Go to bed and wake up at the same time each day",
                        "Keep a simple sleep diary",
                    ],
                ),
                (
                    2,
                    "Move a little more",
                    &[
                        "Add a 15 minute walk on five days",
                        "Try one new form of gentle exercise",
                    ],
                ),
                (
                    3,
                    "Nourish yourself",
                    &[
                        "Plan three balanced meals ahead of time",
                        "Cut back on one substance that affects your sleep or mood",
                    ],
                ),
                (
                    4,
                    "Check in with care",
                    &[
                        "Book a check-up with a health professional",
                        "Review which habits made the biggest difference",
                    ],
                ),
            ]),
            resources: vec![
                resource(
                    ResourceKind::Book,
                    "Why We Sleep",
                    "Matthew Walker on how sleep shapes health and mood",
                    None,
                ),
                resource(
                    ResourceKind::Video,
                    "Ten Minute Morning Stretch",
                    "A gentle routine for any fitness level",
                    None,
                ),
                resource(
                    ResourceKind::Helpline,
                    "Substance Use Support",
                    "Confidential help for alcohol or drug concerns",
                    Some("Ask your local health centre for a support service"),
                ),
            ],
        },
    }
}

fn default_plan() -> SolutionPlan {
    SolutionPlan {
        title: "General Wellness Plan".to_string(),
        description: "A gentle starting point for whatever you are going through".to_string(),
        estimated_time: "2-4 weeks".to_string(),
        category: None,
        immediate_steps: strings(&[
            "Take five slow, deep breaths",
            "Write down what is on your mind",
            "Talk to someone you trust",
        ]),
        healing_plan: weeks(&[
            (
                1,
                "Check in with yourself",
                &[
                    "Journal for five minutes each day",
                    "Notice what lifts or lowers your mood",
                ],
            ),
            (
                2,
                "Build small habits",
                &[
                    "Keep a regular sleep schedule",
                    "Spend time outdoors each day",
                ],
            ),
        ]),
        resources: vec![crisis_line()],
    }
}

// =============================================================================
// TESTS
// =============================================================================
