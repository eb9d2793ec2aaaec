#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for diversity-constrained selection.

use std::cell::RefCell;

use chrono::NaiveDateTime;
use concourse_core::{
    Amenity, ContextSnapshot, DiversityRules, ScoreBreakdown, ScoredCandidate, ScoringWeights,
    SelectionContext, SelectionResult, Selector,
};
use concourse_selector::DiversitySelector;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Aggregate fixtures shared across the BDD scenarios.
pub struct TestContext {
    snapshot: ContextSnapshot,
    pool: RefCell<Vec<ScoredCandidate>>,
    picks: RefCell<Option<Vec<SelectionResult>>>,
}

#[fixture]
/// Build a fresh `TestContext` for each scenario run.
pub fn context() -> TestContext {
    let selection_context = SelectionContext::new(NaiveDateTime::default());
    TestContext {
        snapshot: ContextSnapshot::capture(&selection_context, &ScoringWeights::default()),
        pool: RefCell::new(Vec::new()),
        picks: RefCell::new(None),
    }
}

fn scored(id: u64, zone: &str, total: f32) -> ScoredCandidate {
    ScoredCandidate {
        amenity: Amenity::new(id, format!("Venue {id}"), format!("Cat {id}"), zone),
        breakdown: ScoreBreakdown {
            total,
            ..ScoreBreakdown::neutral()
        },
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "small test ids convert exactly"
)]
#[expect(
    clippy::float_arithmetic,
    reason = "fixture derives descending scores from ids"
)]
fn descending_total(id: u64) -> f32 {
    1.0 - (id as f32) * 0.01
}

#[given("a scored pool of 3 amenities")]
fn small_pool(context: &TestContext) {
    *context.pool.borrow_mut() = (1..=3)
        .map(|id| scored(id, "A", descending_total(id)))
        .collect();
}

#[given("a scored pool of 20 amenities all in one zone")]
fn crowded_zone_pool(context: &TestContext) {
    *context.pool.borrow_mut() = (1..=20)
        .map(|id| scored(id, "A", descending_total(id)))
        .collect();
}

#[given("an empty scored pool")]
fn empty_pool(context: &TestContext) {
    context.pool.borrow_mut().clear();
}

#[when("I select the top 7")]
fn select_unconstrained(context: &TestContext) {
    run_selection(context, DiversityRules::default());
}

#[when("I select the top 7 with a zone cap of 3")]
fn select_with_zone_cap(context: &TestContext) {
    run_selection(
        context,
        DiversityRules {
            max_same_zone: Some(3),
            ..DiversityRules::default()
        },
    );
}

#[then("every amenity is returned with a maximal score")]
fn assert_whole_pool_returned(context: &TestContext) {
    let picks = recorded_picks(context);
    assert_eq!(picks.len(), 3);
    assert!(picks.iter().all(|p| p.breakdown == ScoreBreakdown::maximal()));
}

#[then("the shortlist holds 7 amenities ranked in score order")]
fn assert_backfilled_shortlist(context: &TestContext) {
    let picks = recorded_picks(context);
    let ids: Vec<u64> = picks.iter().map(|p| p.amenity.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
    let ranks: Vec<usize> = picks.iter().map(|p| p.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6, 7]);
}

#[then("the shortlist is empty")]
fn assert_empty_shortlist(context: &TestContext) {
    assert!(recorded_picks(context).is_empty());
}

fn run_selection(context: &TestContext, rules: DiversityRules) {
    let pool = context.pool.borrow().clone();
    let picks = DiversitySelector.select(pool, 7, &rules, &context.snapshot);
    *context.picks.borrow_mut() = Some(picks);
}

fn recorded_picks(context: &TestContext) -> Vec<SelectionResult> {
    context
        .picks
        .borrow()
        .as_ref()
        .cloned()
        .expect("selection should have run")
}

#[scenario(path = "tests/features/selection.feature", index = 0)]
fn small_pool_returned_whole(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/selection.feature", index = 1)]
fn zone_caps_then_backfill(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/selection.feature", index = 2)]
fn empty_pool_selects_nothing(context: TestContext) {
    let _ = context;
}
